//! Submission records and where they go

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::catalog::FieldType;
use crate::model::Field;

use super::runtime::{FieldValue, PreviewSession};

/// Everything entered in one preview, ready to hand to a sink
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub form_title: String,
    pub form_description: String,
    /// Answer per field label; `null` for unanswered fields. When labels
    /// repeat, the later field wins.
    pub submission_data: BTreeMap<String, Option<FieldValue>>,
    /// Entered values keyed by field id
    pub values: BTreeMap<String, FieldValue>,
    pub pages: Vec<SubmittedPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedPage {
    pub page_title: String,
    pub page_description: String,
    pub fields: Vec<SubmittedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub value: Option<FieldValue>,
    pub required: bool,
    pub placeholder: String,
    pub options: Vec<String>,
    pub description: String,
}

impl Submission {
    pub(crate) fn collect(preview: &PreviewSession<'_>) -> Self {
        let form = preview.form();
        let answer = |field: &Field| preview.effective_value(field).filter(|v| !v.is_empty());

        let submission_data = form
            .fields()
            .map(|field| (field.label.clone(), answer(field)))
            .collect();

        let pages = form
            .pages
            .iter()
            .map(|page| SubmittedPage {
                page_title: page.title.clone(),
                page_description: page.description.clone(),
                fields: page
                    .fields
                    .iter()
                    .map(|field| SubmittedField {
                        id: field.id.clone(),
                        label: field.label.clone(),
                        field_type: field.field_type,
                        value: answer(field),
                        required: field.required,
                        placeholder: field.placeholder.clone(),
                        options: field.options.clone().unwrap_or_default(),
                        description: field.description.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            form_title: form.title.clone(),
            form_description: form.description.clone(),
            submission_data,
            values: preview.values().clone(),
            pages,
        }
    }
}

/// Errors raised while handing a submission to a sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write submission: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode submission: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Receives finished submissions (log, storage, network...)
pub trait SubmissionSink {
    fn accept(&mut self, submission: &Submission) -> Result<(), SinkError>;
}

/// Writes each submission as pretty-printed JSON
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SubmissionSink for JsonSink<W> {
    fn accept(&mut self, submission: &Submission) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut self.writer, submission)?;
        writeln!(self.writer)?;
        info!(form = %submission.form_title, "submission written");
        Ok(())
    }
}

/// Keeps submissions in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub submissions: Vec<Submission>,
}

impl SubmissionSink for MemorySink {
    fn accept(&mut self, submission: &Submission) -> Result<(), SinkError> {
        self.submissions.push(submission.clone());
        Ok(())
    }
}
