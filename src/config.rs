//! Builder configuration
//!
//! Default texts for new forms, pages and fields, plus the profile that
//! supplies values for prefilled field types. Configurations are TOML
//! documents; every section is optional and anything left out falls back
//! to the built-in defaults below.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse configuration TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Defaults for a new form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormDefaults {
    pub title: String,
    pub description: String,
}

/// Defaults for new and duplicated pages
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageDefaults {
    pub title: String,
    pub description: String,
    /// Appended to the title of a duplicated page
    pub copy_suffix: String,
}

/// Defaults shared by every new field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldTextDefaults {
    pub label: String,
    pub placeholder: String,
    /// Initial options of choice fields
    pub options: Vec<String>,
    /// Description given to prefilled fields
    pub prefilled_description: String,
}

/// Complete builder configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderConfig {
    pub form: FormDefaults,
    pub page: PageDefaults,
    pub field: FieldTextDefaults,
    /// Per-type placeholder overrides, keyed by field type tag
    pub placeholders: BTreeMap<String, String>,
    /// Per-type label overrides, keyed by field type tag
    pub labels: BTreeMap<String, String>,
    /// Values of prefilled field types, keyed by field type tag
    pub profile: BTreeMap<String, String>,
}

/// TOML structure for deserializing configurations
#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    form: TomlForm,
    page: TomlPage,
    field: TomlField,
    placeholders: BTreeMap<String, String>,
    labels: BTreeMap<String, String>,
    profile: BTreeMap<String, String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlForm {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlPage {
    title: Option<String>,
    description: Option<String>,
    copy_suffix: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlField {
    label: Option<String>,
    placeholder: Option<String>,
    options: Option<Vec<String>>,
    prefilled_description: Option<String>,
}

/// Built-in configuration
const DEFAULT_CONFIG: &str = r##"
[form]
title = "Untitled form"
description = "Form description (optional)"

[page]
title = "Untitled page"
description = "Description (optional)"
copy_suffix = " Copy"

[field]
label = "Question"
placeholder = "Type your answer here.."
options = ["Option 1", "Option 2"]
prefilled_description = "This field is filled in automatically."

[placeholders]
tel = "(+33) 01 23 45 67 89"
url = "https://"
email = "name@example.com"

[labels]
full_name = "Full name"
job_title = "Job title"
department = "Department"
location = "Location"
landline = "Landline"
mobile = "Mobile phone"
email_info = "Email address"

# Sample profile; real deployments point this at the signed-in user
[profile]
full_name = "Jean Dupont"
job_title = "Project manager"
department = "IT Department"
location = "Paris - Head office"
landline = "01 23 45 67 89"
mobile = "06 12 34 56 78"
email_info = "jean.dupont@example.com"
"##;

impl BuilderConfig {
    /// Load a configuration from a TOML file, on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a configuration from a TOML string, on top of the defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Self::default().overlay(content)
    }

    /// Apply the settings of a TOML document over this configuration
    pub fn overlay(mut self, content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;

        let TomlConfig {
            form,
            page,
            field,
            placeholders,
            labels,
            profile,
        } = parsed;

        set(&mut self.form.title, form.title);
        set(&mut self.form.description, form.description);
        set(&mut self.page.title, page.title);
        set(&mut self.page.description, page.description);
        set(&mut self.page.copy_suffix, page.copy_suffix);
        set(&mut self.field.label, field.label);
        set(&mut self.field.placeholder, field.placeholder);
        set(&mut self.field.options, field.options);
        set(&mut self.field.prefilled_description, field.prefilled_description);
        self.placeholders.extend(placeholders);
        self.labels.extend(labels);
        self.profile.extend(profile);

        Ok(self)
    }

    /// Set the default form title
    pub fn with_form_title(mut self, title: impl Into<String>) -> Self {
        self.form.title = title.into();
        self
    }

    /// Set the default page title
    pub fn with_page_title(mut self, title: impl Into<String>) -> Self {
        self.page.title = title.into();
        self
    }

    /// Set the initial options of choice fields
    pub fn with_default_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the profile value of a prefilled field type
    pub fn with_profile_value(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.profile.insert(tag.into(), value.into());
        self
    }

    fn empty() -> Self {
        Self {
            form: FormDefaults::default(),
            page: PageDefaults::default(),
            field: FieldTextDefaults::default(),
            placeholders: BTreeMap::new(),
            labels: BTreeMap::new(),
            profile: BTreeMap::new(),
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::empty()
            .overlay(DEFAULT_CONFIG)
            .expect("Default configuration should be valid TOML")
    }
}
