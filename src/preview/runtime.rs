//! Preview runtime: fills in a form page by page
//!
//! A [`PreviewSession`] only reads the form it was created from. Entered
//! values live in the session, keyed by field id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::ControlKind;
use crate::model::{Field, Form, Page};

use super::render::FieldRenderer;
use super::submission::Submission;

/// A value entered for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Rating-style fields
    Number(u32),
    Text(String),
    /// Selected options of a checkbox field
    Choices(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Choices(values.into_iter().map(Into::into).collect())
    }

    /// Empty text, an empty selection and an unset rating all count as no
    /// answer
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Number(n) => *n == 0,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Choices(c) => c.is_empty(),
        }
    }

    /// Whether a control of this kind produces this kind of value
    ///
    /// Checkboxes take a selection, ratings a number, every other control
    /// takes text.
    pub fn fits(&self, control: ControlKind) -> bool {
        match control {
            ControlKind::Checkbox => matches!(self, FieldValue::Choices(_)),
            ControlKind::Rating => matches!(self, FieldValue::Number(_)),
            _ => matches!(self, FieldValue::Text(_)),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Choices(c) => write!(f, "{}", c.join(", ")),
        }
    }
}

/// Errors reported to the person filling in the form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("Please fill in the required field: {label}")]
    RequiredFieldMissing { field_id: String, label: String },
}

/// Navigation and entered values for one preview of a form
#[derive(Debug, Clone)]
pub struct PreviewSession<'a> {
    form: &'a Form,
    current: usize,
    values: BTreeMap<String, FieldValue>,
}

impl<'a> PreviewSession<'a> {
    pub fn new(form: &'a Form) -> Self {
        Self {
            form,
            current: 0,
            values: BTreeMap::new(),
        }
    }

    pub fn form(&self) -> &'a Form {
        self.form
    }

    /// 0-based index of the page being shown
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> Option<&'a Page> {
        self.form.pages.get(self.current)
    }

    pub fn page_count(&self) -> usize {
        self.form.pages.len()
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.page_count()
    }

    /// Record the value entered for a field
    ///
    /// Prefilled fields are read-only and keep their profile value. Values
    /// for unknown ids, or of a kind the field's control cannot produce, are
    /// ignored.
    pub fn set_value(&mut self, field_id: impl Into<String>, value: FieldValue) {
        let field_id = field_id.into();
        let Some((_, field)) = self.form.field(&field_id) else {
            debug!(%field_id, "ignoring input for unknown field");
            return;
        };
        if field.field_type.is_prefilled() {
            debug!(%field_id, "ignoring input on prefilled field");
            return;
        }
        if !value.fits(field.capabilities().control) {
            debug!(%field_id, field_type = %field.field_type, %value, "ignoring value of the wrong kind");
            return;
        }
        self.values.insert(field_id, value);
    }

    /// Check or uncheck one option of a checkbox field
    ///
    /// Options the field does not list are ignored.
    pub fn toggle_option(&mut self, field_id: &str, option: &str, checked: bool) {
        let listed = self
            .form
            .field(field_id)
            .and_then(|(_, field)| field.options.as_ref())
            .is_some_and(|options| options.iter().any(|o| o == option));
        if !listed {
            debug!(field_id, option, "ignoring toggle of unlisted option");
            return;
        }

        let mut selected = match self.values.get(field_id) {
            Some(FieldValue::Choices(current)) => current.clone(),
            _ => Vec::new(),
        };
        if checked {
            if !selected.iter().any(|o| o == option) {
                selected.push(option.to_string());
            }
        } else {
            selected.retain(|o| o != option);
        }
        self.set_value(field_id, FieldValue::Choices(selected));
    }

    /// The value entered for a field id
    pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
        self.values.get(field_id)
    }

    /// Every entered value, keyed by field id
    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// The value a field currently has: its profile value for prefilled
    /// types, the entered value otherwise
    pub fn effective_value(&self, field: &Field) -> Option<FieldValue> {
        if field.field_type.is_prefilled() {
            return field.value.clone().map(FieldValue::Text);
        }
        self.values.get(&field.id).cloned()
    }

    fn is_answered(&self, field: &Field) -> bool {
        let control = field.capabilities().control;
        self.effective_value(field)
            .is_some_and(|v| v.fits(control) && !v.is_empty())
    }

    /// Whether every required field on `page` has an answer
    pub fn can_advance(&self, page: &Page) -> bool {
        self.check_page(page).is_ok()
    }

    /// Report the first required field on `page` without an answer
    pub fn check_page(&self, page: &Page) -> Result<(), PreviewError> {
        match page
            .fields
            .iter()
            .find(|f| f.required && !self.is_answered(f))
        {
            Some(field) => Err(PreviewError::RequiredFieldMissing {
                field_id: field.id.clone(),
                label: field.label.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Advance to the next page, if the current one is complete
    ///
    /// Stays on the last page. Returns the index of the page now shown.
    pub fn go_next(&mut self) -> Result<usize, PreviewError> {
        if let Some(page) = self.current_page() {
            self.check_page(page)?;
        }
        if !self.is_last() {
            self.current += 1;
        }
        Ok(self.current)
    }

    /// Go back one page; stays on the first page
    pub fn go_prev(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    /// Collect every answer, if the last page is complete
    pub fn submit(&self) -> Result<Submission, PreviewError> {
        if let Some(last) = self.form.pages.last() {
            self.check_page(last)?;
        }
        let submission = Submission::collect(self);
        info!(
            form = %submission.form_title,
            answers = submission.values.len(),
            "form submitted"
        );
        Ok(submission)
    }

    /// Render every field of the current page
    ///
    /// Changes the renderer reports through `on_change` are recorded with
    /// [`PreviewSession::set_value`] once rendering is done.
    pub fn render_current<R: FieldRenderer>(&mut self, renderer: &mut R) -> Vec<R::Output> {
        let Some(page) = self.current_page() else {
            return Vec::new();
        };

        let mut changes: Vec<(String, FieldValue)> = Vec::new();
        let outputs: Vec<R::Output> = page
            .fields
            .iter()
            .map(|field| {
                let value = self.effective_value(field);
                renderer.render(field, value.as_ref(), &mut |id: &str, v: FieldValue| {
                    changes.push((id.to_string(), v))
                })
            })
            .collect();

        for (field_id, value) in changes {
            self.set_value(field_id, value);
        }
        outputs
    }
}
