//! Field catalog: the closed set of field types and their defaults
//!
//! Every per-type decision (does it take options, is it prefilled, which
//! validation keys apply, which control renders it) lives in
//! [`FieldType::capabilities`], so adding a type touches one table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::BuilderConfig;
use crate::model::Field;

/// Field type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    // Basic
    Text,
    Textarea,
    Number,
    Select,
    Radio,
    Checkbox,
    Rating,
    // Special inputs
    Date,
    Time,
    Email,
    Tel,
    Url,
    // Prefilled from the profile
    FullName,
    JobTitle,
    Department,
    Location,
    Landline,
    Mobile,
    EmailInfo,
}

/// Sidebar grouping of field types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Basic,
    Special,
    Prefilled,
}

/// Control used to display and edit a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    TextInput,
    TextArea,
    NumberInput,
    DateInput,
    TimeInput,
    EmailInput,
    TelInput,
    UrlInput,
    Select,
    Radio,
    Checkbox,
    Rating,
    ReadOnly,
}

/// What a field type supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub group: FieldGroup,
    pub control: ControlKind,
    /// Needs an `options` list
    pub choice: bool,
    /// Value comes from the profile and is never user-editable
    pub prefilled: bool,
    /// Accepts `minLength`/`maxLength`
    pub length_bounds: bool,
    /// Accepts `min`/`max`
    pub numeric_bounds: bool,
    /// Accepts `pattern`/`errorMessage`
    pub pattern: bool,
}

impl Capabilities {
    const fn input(group: FieldGroup, control: ControlKind) -> Self {
        Self {
            group,
            control,
            choice: false,
            prefilled: false,
            length_bounds: false,
            numeric_bounds: false,
            pattern: false,
        }
    }

    const fn choice(control: ControlKind) -> Self {
        Self {
            choice: true,
            ..Self::input(FieldGroup::Basic, control)
        }
    }

    const fn prefilled() -> Self {
        Self {
            prefilled: true,
            ..Self::input(FieldGroup::Prefilled, ControlKind::ReadOnly)
        }
    }
}

impl FieldType {
    /// Every field type, in sidebar order
    pub const ALL: [FieldType; 19] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Rating,
        FieldType::Date,
        FieldType::Time,
        FieldType::Email,
        FieldType::Tel,
        FieldType::Url,
        FieldType::FullName,
        FieldType::JobTitle,
        FieldType::Department,
        FieldType::Location,
        FieldType::Landline,
        FieldType::Mobile,
        FieldType::EmailInfo,
    ];

    pub fn capabilities(self) -> Capabilities {
        use ControlKind as C;
        use FieldGroup as G;

        match self {
            FieldType::Text => Capabilities {
                length_bounds: true,
                pattern: true,
                ..Capabilities::input(G::Basic, C::TextInput)
            },
            FieldType::Textarea => Capabilities {
                length_bounds: true,
                pattern: true,
                ..Capabilities::input(G::Basic, C::TextArea)
            },
            FieldType::Number => Capabilities {
                numeric_bounds: true,
                pattern: true,
                ..Capabilities::input(G::Basic, C::NumberInput)
            },
            FieldType::Select => Capabilities::choice(C::Select),
            FieldType::Radio => Capabilities::choice(C::Radio),
            FieldType::Checkbox => Capabilities::choice(C::Checkbox),
            FieldType::Rating => Capabilities::input(G::Basic, C::Rating),
            FieldType::Date => Capabilities::input(G::Special, C::DateInput),
            FieldType::Time => Capabilities::input(G::Special, C::TimeInput),
            FieldType::Email => Capabilities::input(G::Special, C::EmailInput),
            FieldType::Tel => Capabilities::input(G::Special, C::TelInput),
            FieldType::Url => Capabilities::input(G::Special, C::UrlInput),
            FieldType::FullName
            | FieldType::JobTitle
            | FieldType::Department
            | FieldType::Location
            | FieldType::Landline
            | FieldType::Mobile
            | FieldType::EmailInfo => Capabilities::prefilled(),
        }
    }

    /// Wire tag, as used by drag gestures, scripts and serialized forms
    pub fn tag(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Rating => "rating",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Url => "url",
            FieldType::FullName => "full_name",
            FieldType::JobTitle => "job_title",
            FieldType::Department => "department",
            FieldType::Location => "location",
            FieldType::Landline => "landline",
            FieldType::Mobile => "mobile",
            FieldType::EmailInfo => "email_info",
        }
    }

    /// Look a type up by its tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// Human-readable name shown in the sidebar
    pub fn display_name(self) -> &'static str {
        match self {
            FieldType::Text => "Short text",
            FieldType::Textarea => "Long text",
            FieldType::Number => "Number",
            FieldType::Select => "Dropdown list",
            FieldType::Radio => "Radio buttons (single choice)",
            FieldType::Checkbox => "Checkboxes (multiple choice)",
            FieldType::Rating => "Rating",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::Email => "Email",
            FieldType::Tel => "Phone",
            FieldType::Url => "URL",
            FieldType::FullName => "Full name",
            FieldType::JobTitle => "Job title",
            FieldType::Department => "Department",
            FieldType::Location => "Location",
            FieldType::Landline => "Landline",
            FieldType::Mobile => "Mobile phone",
            FieldType::EmailInfo => "Email address",
        }
    }

    pub fn is_choice(self) -> bool {
        self.capabilities().choice
    }

    pub fn is_prefilled(self) -> bool {
        self.capabilities().prefilled
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when a tag names no field type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type '{0}'")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}

/// Default metadata for a new field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefaults {
    pub label: String,
    pub placeholder: String,
    pub description: String,
    pub is_choice: bool,
    pub is_prefilled: bool,
    pub prefilled_value: Option<String>,
    pub options: Option<Vec<String>>,
}

/// Read-only source of field defaults
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCatalog {
    config: BuilderConfig,
}

impl FieldCatalog {
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Defaults for a type tag
    ///
    /// Unknown tags get a generic plain-text default.
    pub fn defaults(&self, tag: &str) -> FieldDefaults {
        match FieldType::from_tag(tag) {
            Some(field_type) => self.defaults_for(field_type),
            None => FieldDefaults {
                label: self.config.field.label.clone(),
                placeholder: self.config.field.placeholder.clone(),
                description: String::new(),
                is_choice: false,
                is_prefilled: false,
                prefilled_value: None,
                options: None,
            },
        }
    }

    /// Defaults for a known field type
    pub fn defaults_for(&self, field_type: FieldType) -> FieldDefaults {
        let caps = field_type.capabilities();
        let tag = field_type.tag();
        let field = &self.config.field;

        FieldDefaults {
            label: self.config.labels.get(tag).unwrap_or(&field.label).clone(),
            placeholder: self
                .config
                .placeholders
                .get(tag)
                .unwrap_or(&field.placeholder)
                .clone(),
            description: if caps.prefilled {
                field.prefilled_description.clone()
            } else {
                String::new()
            },
            is_choice: caps.choice,
            is_prefilled: caps.prefilled,
            prefilled_value: caps
                .prefilled
                .then(|| self.prefilled_value(field_type).unwrap_or_default()),
            options: caps.choice.then(|| self.default_options().to_vec()),
        }
    }

    /// Build a field of the given type from its defaults
    pub fn build_field(&self, field_type: FieldType, id: String) -> Field {
        let defaults = self.defaults_for(field_type);
        Field {
            id,
            field_type,
            label: defaults.label,
            required: false,
            description: defaults.description,
            placeholder: defaults.placeholder,
            value: defaults.prefilled_value,
            options: defaults.options,
            validation: None,
        }
    }

    /// Profile value for a prefilled type
    pub fn prefilled_value(&self, field_type: FieldType) -> Option<String> {
        if !field_type.is_prefilled() {
            return None;
        }
        self.config.profile.get(field_type.tag()).cloned()
    }

    /// Options given to new choice fields
    pub fn default_options(&self) -> &[String] {
        &self.config.field.options
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::new(&BuilderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for field_type in FieldType::ALL {
            assert_eq!(FieldType::from_tag(field_type.tag()), Some(field_type));
        }
        assert_eq!("email_info".parse::<FieldType>(), Ok(FieldType::EmailInfo));
        assert!("signature".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_serde_tag_matches_wire_tag() {
        for field_type in FieldType::ALL {
            let json = serde_json::to_string(&field_type).unwrap();
            assert_eq!(json, format!("\"{}\"", field_type.tag()));
        }
    }

    #[test]
    fn test_choice_types() {
        let choices: Vec<_> = FieldType::ALL.into_iter().filter(|t| t.is_choice()).collect();
        assert_eq!(
            choices,
            vec![FieldType::Select, FieldType::Radio, FieldType::Checkbox]
        );
    }

    #[test]
    fn test_bounds_capabilities() {
        assert!(FieldType::Text.capabilities().length_bounds);
        assert!(FieldType::Textarea.capabilities().length_bounds);
        assert!(!FieldType::Number.capabilities().length_bounds);
        assert!(FieldType::Number.capabilities().numeric_bounds);
        assert!(!FieldType::Select.capabilities().pattern);
        assert!(!FieldType::FullName.capabilities().pattern);
    }

    #[test]
    fn test_text_defaults() {
        let catalog = FieldCatalog::default();
        let defaults = catalog.defaults("text");
        assert_eq!(defaults.label, "Question");
        assert_eq!(defaults.placeholder, "Type your answer here..");
        assert!(!defaults.is_choice);
        assert_eq!(defaults.options, None);
        assert_eq!(defaults.prefilled_value, None);
    }

    #[test]
    fn test_choice_defaults() {
        let catalog = FieldCatalog::default();
        let defaults = catalog.defaults("radio");
        assert!(defaults.is_choice);
        assert_eq!(
            defaults.options,
            Some(vec!["Option 1".to_string(), "Option 2".to_string()])
        );
    }

    #[test]
    fn test_prefilled_defaults() {
        let catalog = FieldCatalog::default();
        let defaults = catalog.defaults("job_title");
        assert!(defaults.is_prefilled);
        assert_eq!(defaults.label, "Job title");
        assert_eq!(defaults.prefilled_value.as_deref(), Some("Project manager"));
        assert_eq!(defaults.description, "This field is filled in automatically.");
    }

    #[test]
    fn test_prefilled_without_profile_entry_is_empty() {
        let mut config = BuilderConfig::default();
        config.profile.clear();
        let catalog = FieldCatalog::new(&config);
        assert_eq!(
            catalog.defaults_for(FieldType::Mobile).prefilled_value.as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_per_type_placeholder() {
        let catalog = FieldCatalog::default();
        assert_eq!(catalog.defaults("url").placeholder, "https://");
        assert_eq!(catalog.defaults("email").placeholder, "name@example.com");
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        let catalog = FieldCatalog::default();
        let defaults = catalog.defaults("signature");
        assert_eq!(defaults.label, "Question");
        assert!(!defaults.is_choice);
        assert!(!defaults.is_prefilled);
        assert_eq!(defaults.options, None);
    }

    #[test]
    fn test_build_field() {
        let catalog = FieldCatalog::default();
        let field = catalog.build_field(FieldType::Checkbox, "field-9".to_string());
        assert_eq!(field.id, "field-9");
        assert_eq!(field.field_type, FieldType::Checkbox);
        assert!(!field.required);
        assert_eq!(field.options.as_ref().map(Vec::len), Some(2));
        assert_eq!(field.value, None);
        assert_eq!(field.validation, None);
    }
}
