//! Partial updates for fields, pages and the form header
//!
//! A patch only carries the members it changes; applying it shallow-merges
//! them into the existing record. Validation members are `Option<Option<T>>`
//! so a patch can clear a bound (`Some(None)`) as well as set it.

use tracing::debug;

use crate::catalog::{FieldCatalog, FieldType};

use super::types::{Field, Form, Page, Validation};

/// Changes to a field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub required: Option<bool>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
    pub validation: ValidationPatch,
}

/// Changes to a field's validation settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationPatch {
    pub min_length: Option<Option<u32>>,
    pub max_length: Option<Option<u32>>,
    pub min: Option<Option<f64>>,
    pub max: Option<Option<f64>>,
    pub pattern: Option<Option<String>>,
    pub error_message: Option<Option<String>>,
}

/// Changes to a page header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Changes to the form header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_validation(mut self, validation: ValidationPatch) -> Self {
        self.validation = validation;
        self
    }

    /// Produce the patched copy of `field`
    ///
    /// A type change runs first so options and validation in the same patch
    /// are checked against the new type. Options on a non-choice type and
    /// validation keys the type does not accept are ignored.
    pub fn apply(&self, field: &Field, catalog: &FieldCatalog) -> Field {
        let mut next = field.clone();

        if let Some(field_type) = self.field_type {
            if field_type != next.field_type {
                next.field_type = field_type;
                normalize_for_type(&mut next, catalog);
            }
        }

        set(&mut next.label, &self.label);
        set(&mut next.required, &self.required);
        set(&mut next.description, &self.description);
        set(&mut next.placeholder, &self.placeholder);

        if let Some(options) = &self.options {
            if next.field_type.is_choice() {
                next.options = Some(options.clone());
            } else {
                debug!(field_id = %next.id, field_type = %next.field_type, "ignoring options on non-choice field");
            }
        }

        self.validation.apply(&mut next);
        next
    }
}

impl ValidationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_length(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_pattern(mut self, pattern: Option<String>) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_error_message(mut self, message: Option<String>) -> Self {
        self.error_message = Some(message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn apply(&self, field: &mut Field) {
        if self.is_empty() {
            return;
        }

        let caps = field.capabilities();
        let mut validation = field.validation.take().unwrap_or_default();

        if caps.length_bounds {
            merge(&mut validation.min_length, &self.min_length);
            merge(&mut validation.max_length, &self.max_length);
        } else if self.min_length.is_some() || self.max_length.is_some() {
            debug!(field_id = %field.id, field_type = %field.field_type, "ignoring length bounds");
        }

        if caps.numeric_bounds {
            merge(&mut validation.min, &self.min);
            merge(&mut validation.max, &self.max);
        } else if self.min.is_some() || self.max.is_some() {
            debug!(field_id = %field.id, field_type = %field.field_type, "ignoring numeric bounds");
        }

        if caps.pattern {
            merge(&mut validation.pattern, &self.pattern);
            merge(&mut validation.error_message, &self.error_message);
        } else if self.pattern.is_some() || self.error_message.is_some() {
            debug!(field_id = %field.id, field_type = %field.field_type, "ignoring pattern");
        }

        field.validation = (!validation.is_empty()).then_some(validation);
    }
}

impl PagePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn apply(&self, page: &Page) -> Page {
        let mut next = page.clone();
        set(&mut next.title, &self.title);
        set(&mut next.description, &self.description);
        next
    }
}

impl FormPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn apply(&self, form: &Form) -> Form {
        let mut next = form.clone();
        set(&mut next.title, &self.title);
        set(&mut next.description, &self.description);
        next
    }
}

/// Bring options, profile value and validation in line with the field's
/// (new) type
fn normalize_for_type(field: &mut Field, catalog: &FieldCatalog) {
    let caps = field.capabilities();

    field.options = if caps.choice {
        Some(
            field
                .options
                .take()
                .unwrap_or_else(|| catalog.default_options().to_vec()),
        )
    } else {
        None
    };

    field.value = if caps.prefilled {
        Some(catalog.prefilled_value(field.field_type).unwrap_or_default())
    } else {
        None
    };

    if let Some(validation) = field.validation.as_mut() {
        validation.retain_applicable(caps);
    }
    if field.validation.as_ref().is_some_and(Validation::is_empty) {
        field.validation = None;
    }
}

fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

fn merge<T: Clone>(slot: &mut Option<T>, patch: &Option<Option<T>>) {
    if let Some(value) = patch {
        *slot = value.clone();
    }
}
