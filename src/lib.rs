//! Form Builder - a state engine for multi-page forms
//!
//! This library provides the builder model (pages, fields and the pure
//! operations over them), the drag-relocation resolver, a preview runtime
//! with required-field gating, and a small script language that replays
//! recorded builder operations.
//!
//! # Example
//!
//! ```rust
//! use form_builder::replay;
//!
//! let outcome = replay(r#"
//!     add field text to page-1
//!     update field field-1 on page-1 [label: "Name", required: true]
//! "#).unwrap();
//!
//! assert_eq!(outcome.form.pages[0].fields[0].label, "Name");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod parser;
pub mod preview;
pub mod resolver;
pub mod session;

pub use catalog::{FieldCatalog, FieldType};
pub use config::{BuilderConfig, ConfigError};
pub use error::{ParseError, ScriptError};
pub use model::{Field, Form, Page};
pub use parser::{parse, Document};
pub use preview::{FieldValue, PreviewSession, Submission};
pub use session::{Effect, ReplayOutcome, Session};

use thiserror::Error;

/// Errors that can occur while replaying a script
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// A statement could not be applied
    #[error("script error: {0}")]
    Script(#[from] ScriptError),
}

impl From<Vec<ParseError>> for ReplayError {
    fn from(errors: Vec<ParseError>) -> Self {
        ReplayError::Parse(errors)
    }
}

impl ReplayError {
    /// Format every error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            ReplayError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
            ReplayError::Script(err) => err.format(source, filename),
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Replay a script against a fresh form with default configuration
pub fn replay(source: &str) -> Result<ReplayOutcome, ReplayError> {
    replay_with_config(source, BuilderConfig::default())
}

/// Replay a script against a fresh form with custom configuration
///
/// # Example
///
/// ```rust
/// use form_builder::{replay_with_config, BuilderConfig};
///
/// let config = BuilderConfig::default().with_form_title("Onboarding");
/// let outcome = replay_with_config("add page", config).unwrap();
/// assert_eq!(outcome.form.title, "Onboarding");
/// assert_eq!(outcome.form.pages.len(), 2);
/// ```
pub fn replay_with_config(
    source: &str,
    config: BuilderConfig,
) -> Result<ReplayOutcome, ReplayError> {
    let doc = parse(source)?;
    let outcome = Session::new(config).execute(&doc)?;
    Ok(outcome)
}
