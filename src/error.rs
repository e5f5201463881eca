//! Error types for parsing and replaying scripts

use ariadne::{Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                report(
                    source,
                    filename,
                    span,
                    message,
                    &format!("{}{}", message, expected_str),
                )
            }
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        // Format expected tokens nicely
        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// A statement that parsed but cannot be applied to a form
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("unknown field type '{tag}'")]
    UnknownFieldType { span: Span, tag: String },

    #[error("invalid modifier '{key}': {message}")]
    InvalidModifier {
        span: Span,
        key: String,
        message: String,
    },
}

impl ScriptError {
    pub fn span(&self) -> &Span {
        match self {
            ScriptError::UnknownFieldType { span, .. } => span,
            ScriptError::InvalidModifier { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let message = self.to_string();
        let note = match self {
            ScriptError::UnknownFieldType { .. } => {
                "not a field type; see --grammar for the list".to_string()
            }
            ScriptError::InvalidModifier { message, .. } => message.clone(),
        };
        report(source, filename, self.span(), &message, &note)
    }
}

fn report(source: &str, filename: &str, span: &Span, message: &str, note: &str) -> String {
    let mut buf = Vec::new();
    let written = Report::build(ReportKind::Error, filename, span.start)
        .with_config(Config::default().with_color(false))
        .with_message(message)
        .with_label(Label::new((filename, span.clone())).with_message(note))
        .finish()
        .write((filename, Source::from(source)), &mut buf);
    if written.is_err() {
        return message.to_string();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::BraceOpen => "'{'".to_string(),
        Token::BraceClose => "'}'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Title => "keyword 'title'".to_string(),
        Token::Description => "keyword 'description'".to_string(),
        Token::Add => "keyword 'add'".to_string(),
        Token::Update => "keyword 'update'".to_string(),
        Token::Delete => "keyword 'delete'".to_string(),
        Token::Duplicate => "keyword 'duplicate'".to_string(),
        Token::Move => "keyword 'move'".to_string(),
        Token::Drag => "keyword 'drag'".to_string(),
        Token::Page => "keyword 'page'".to_string(),
        Token::Field => "keyword 'field'".to_string(),
        Token::To => "keyword 'to'".to_string(),
        Token::From => "keyword 'from'".to_string(),
        Token::On => "keyword 'on'".to_string(),
        Token::Off => "keyword 'off'".to_string(),
        Token::Nowhere => "keyword 'nowhere'".to_string(),
        Token::Up => "keyword 'up'".to_string(),
        Token::Down => "keyword 'down'".to_string(),
        Token::Preview => "keyword 'preview'".to_string(),
        Token::Set => "keyword 'set'".to_string(),
        Token::Toggle => "keyword 'toggle'".to_string(),
        Token::Next => "keyword 'next'".to_string(),
        Token::Prev => "keyword 'prev'".to_string(),
        Token::Submit => "keyword 'submit'".to_string(),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::None => "'none'".to_string(),
        // Skipped by the lexer, never reach the parser
        Token::LineComment | Token::BlockComment => "comment".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_syntax_error_names_found_token() {
        let errors = parse("add field text page-1").unwrap_err();
        let ParseError::Syntax {
            message, expected, ..
        } = &errors[0];
        assert_eq!(message, "Unexpected identifier 'page-1'");
        assert!(expected.contains(&"keyword 'to'".to_string()));
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let errors = parse("move page page-1").unwrap_err();
        let ParseError::Syntax { message, .. } = &errors[0];
        assert_eq!(message, "Unexpected end of input");
    }

    #[test]
    fn test_format_includes_source_line() {
        let source = "add page\nadd field text page-1\n";
        let errors = parse(source).unwrap_err();
        let formatted = errors[0].format(source, "survey.form");
        assert!(formatted.contains("survey.form"));
        assert!(formatted.contains("add field text page-1"));
        assert!(!formatted.contains('\u{1b}'));
    }

    #[test]
    fn test_script_error_format() {
        let source = "add field signature to page-1";
        let err = ScriptError::UnknownFieldType {
            span: 10..19,
            tag: "signature".to_string(),
        };
        assert_eq!(err.to_string(), "unknown field type 'signature'");
        let formatted = err.format(source, "<stdin>");
        assert!(formatted.contains("unknown field type 'signature'"));
    }
}
