//! Preview runtime: navigate a finished form, enter values, submit

mod render;
mod runtime;
mod submission;

pub use render::{outline, FieldRenderer, OutlineRenderer};
pub use runtime::{FieldValue, PreviewError, PreviewSession};
pub use submission::{
    JsonSink, MemorySink, SinkError, Submission, SubmissionSink, SubmittedField, SubmittedPage,
};
