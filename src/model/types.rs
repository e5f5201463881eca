//! Form, page and field records

use serde::{Deserialize, Serialize};

use crate::catalog::{Capabilities, FieldType};
use crate::config::BuilderConfig;
use crate::ids::{IdGenerator, IdKind};

/// The document being authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub title: String,
    pub description: String,
    pub pages: Vec<Page>,
}

impl Form {
    /// Create a form with a single empty page
    pub fn new(config: &BuilderConfig, ids: &mut IdGenerator) -> Self {
        Self {
            title: config.form.title.clone(),
            description: config.form.description.clone(),
            pages: vec![Page::empty(
                ids.next_id(IdKind::Page),
                &config.page.title,
                &config.page.description,
            )],
        }
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    /// Find a field anywhere in the form, with the page that holds it
    pub fn field(&self, field_id: &str) -> Option<(&Page, &Field)> {
        self.pages
            .iter()
            .find_map(|page| page.field(field_id).map(|field| (page, field)))
    }

    /// All fields in page order
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.pages.iter().flat_map(|p| p.fields.iter())
    }

    pub fn field_count(&self) -> usize {
        self.pages.iter().map(|p| p.fields.len()).sum()
    }
}

/// An ordered group of fields shown together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Page {
    pub(crate) fn empty(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn field_index(&self, field_id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == field_id)
    }
}

/// One input element descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub placeholder: String,
    /// Profile value of a prefilled type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Present exactly for choice types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
}

impl Field {
    #[cfg(test)]
    pub(crate) fn blank(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: String::new(),
            required: false,
            description: String::new(),
            placeholder: String::new(),
            value: None,
            options: field_type.is_choice().then(Vec::new),
            validation: None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.field_type.capabilities()
    }
}

/// Input constraints configured in the advanced field settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Validation {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.min.is_none()
            && self.max.is_none()
            && self.pattern.is_none()
            && self.error_message.is_none()
    }

    /// Drop every key the given capabilities do not accept
    pub fn retain_applicable(&mut self, caps: Capabilities) {
        if !caps.length_bounds {
            self.min_length = None;
            self.max_length = None;
        }
        if !caps.numeric_bounds {
            self.min = None;
            self.max = None;
        }
        if !caps.pattern {
            self.pattern = None;
            self.error_message = None;
        }
    }
}
