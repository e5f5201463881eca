//! Script replay
//!
//! A [`Session`] owns the current form snapshot and applies parsed script
//! statements to it one by one, through the same pure operations an
//! interactive editor would call.

use tracing::{debug, info, warn};

use crate::catalog::{FieldCatalog, FieldType};
use crate::config::BuilderConfig;
use crate::error::{ScriptError, Span};
use crate::ids::IdGenerator;
use crate::model::{self, FieldPatch, Form, FormPatch, PagePatch};
use crate::parser::ast::{
    Document, DragDecl, EnteredValue, Identifier, Modifier, ModifierKey, ModifierValue,
    MoveDirection, PreviewStep, Spanned, Statement,
};
use crate::preview::{FieldValue, PreviewSession, Submission};
use crate::resolver::{self, DragEnd, DropLocation};

/// What a statement did to the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Applied,
    /// The statement named something missing or crossed a boundary
    NoOp,
}

/// One replayed statement
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub span: Span,
    pub summary: String,
    pub effect: Effect,
}

/// Result of one `preview { ... }` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewRun {
    /// Messages shown to the person filling in the form
    pub messages: Vec<String>,
    pub submission: Option<Submission>,
    /// 0-based index of the page shown when the block ended
    pub final_page: usize,
}

/// Everything one call to [`Session::execute`] produced
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub form: Form,
    pub history: Vec<HistoryEntry>,
    pub previews: Vec<PreviewRun>,
}

impl ReplayOutcome {
    /// The last submission made by any preview block
    pub fn last_submission(&self) -> Option<&Submission> {
        self.previews
            .iter()
            .rev()
            .find_map(|run| run.submission.as_ref())
    }
}

/// Owner of the current form snapshot
#[derive(Debug)]
pub struct Session {
    config: BuilderConfig,
    catalog: FieldCatalog,
    ids: IdGenerator,
    form: Form,
}

impl Session {
    /// Start from a fresh form with one empty page
    pub fn new(config: BuilderConfig) -> Self {
        let mut ids = IdGenerator::new();
        let form = Form::new(&config, &mut ids);
        Self {
            catalog: FieldCatalog::new(&config),
            config,
            ids,
            form,
        }
    }

    /// Continue editing an existing form
    pub fn with_form(config: BuilderConfig, form: Form) -> Self {
        Self {
            catalog: FieldCatalog::new(&config),
            ids: IdGenerator::after(&form),
            config,
            form,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Apply every statement of `document` in order
    ///
    /// Stops at the first statement that cannot be applied; statements
    /// before it stay applied.
    pub fn execute(&mut self, document: &Document) -> Result<ReplayOutcome, ScriptError> {
        let mut history = Vec::with_capacity(document.statements.len());
        let mut previews = Vec::new();

        for statement in &document.statements {
            let summary = describe(&statement.node);
            let before = self.form.clone();

            if let Statement::Preview(steps) = &statement.node {
                let run = self.run_preview(steps);
                info!(
                    submitted = run.submission.is_some(),
                    final_page = run.final_page,
                    "preview finished"
                );
                previews.push(run);
            } else {
                self.apply(&statement.node)?;
            }

            // Preview blocks never change the form
            let effect = if self.form != before || matches!(statement.node, Statement::Preview(_))
            {
                info!(statement = %summary, "applied");
                Effect::Applied
            } else {
                debug!(statement = %summary, "no change");
                Effect::NoOp
            };
            history.push(HistoryEntry {
                span: statement.span.clone(),
                summary,
                effect,
            });
        }

        Ok(ReplayOutcome {
            form: self.form.clone(),
            history,
            previews,
        })
    }

    fn apply(&mut self, statement: &Statement) -> Result<(), ScriptError> {
        let pages = &self.form.pages;
        let next_pages = match statement {
            Statement::SetTitle(title) => {
                let patch = FormPatch::new().with_title(title.node.clone());
                self.form = model::update_form_meta(&self.form, &patch);
                return Ok(());
            }
            Statement::SetDescription(description) => {
                let patch = FormPatch::new().with_description(description.node.clone());
                self.form = model::update_form_meta(&self.form, &patch);
                return Ok(());
            }
            Statement::AddPage => model::add_page(pages, &self.config.page, &mut self.ids),
            Statement::AddField {
                field_type,
                page_id,
            } => {
                let field_type = field_type_of(&field_type.node, &field_type.span)?;
                model::add_field(
                    pages,
                    page_id.node.as_str(),
                    field_type,
                    &self.catalog,
                    &mut self.ids,
                )
            }
            Statement::Drag(drag) => {
                resolver::resolve(pages, &drag_end(drag), &self.catalog, &mut self.ids)
            }
            Statement::UpdateField {
                field_id,
                page_id,
                modifiers,
            } => {
                let patch = field_patch(modifiers)?;
                model::update_field(
                    pages,
                    page_id.node.as_str(),
                    field_id.node.as_str(),
                    &patch,
                    &self.catalog,
                )
            }
            Statement::DeleteField { field_id, page_id } => {
                model::delete_field(pages, page_id.node.as_str(), field_id.node.as_str())
            }
            Statement::UpdatePage { page_id, modifiers } => {
                let patch = page_patch(modifiers)?;
                model::update_page_meta(pages, page_id.node.as_str(), &patch)
            }
            Statement::DuplicatePage(page_id) => {
                model::duplicate_page(pages, page_id.node.as_str(), &self.config.page, &mut self.ids)
            }
            Statement::MovePage { page_id, direction } => match direction {
                MoveDirection::Up => model::move_page_up(pages, page_id.node.as_str()),
                MoveDirection::Down => model::move_page_down(pages, page_id.node.as_str()),
            },
            Statement::DeletePage(page_id) => model::delete_page(pages, page_id.node.as_str()),
            Statement::Preview(_) => return Ok(()),
        };
        self.form.pages = next_pages;
        Ok(())
    }

    fn run_preview(&self, steps: &[Spanned<PreviewStep>]) -> PreviewRun {
        let mut preview = PreviewSession::new(&self.form);
        let mut run = PreviewRun::default();

        for step in steps {
            match &step.node {
                PreviewStep::Set { field_id, value } => {
                    let value = self.entered_value(&field_id.node, value);
                    preview.set_value(field_id.node.as_str(), value);
                }
                PreviewStep::Toggle {
                    field_id,
                    option,
                    checked,
                } => preview.toggle_option(field_id.node.as_str(), option, *checked),
                PreviewStep::Next => {
                    if let Err(e) = preview.go_next() {
                        warn!(page = preview.current_index(), %e, "next refused");
                        run.messages.push(e.to_string());
                    }
                }
                PreviewStep::Prev => {
                    preview.go_prev();
                }
                PreviewStep::Submit => {
                    if run.submission.is_some() {
                        debug!("already submitted, ignoring submit");
                        continue;
                    }
                    match preview.submit() {
                        Ok(submission) => run.submission = Some(submission),
                        Err(e) => {
                            warn!(%e, "submit refused");
                            run.messages.push(e.to_string());
                        }
                    }
                }
            }
        }

        run.final_page = preview.current_index();
        run
    }

    /// Numbers are ratings for rating fields and plain text everywhere else
    fn entered_value(&self, field_id: &Identifier, value: &EnteredValue) -> FieldValue {
        match value {
            EnteredValue::Text(text) => FieldValue::text(text.clone()),
            EnteredValue::Choices(choices) => FieldValue::Choices(choices.clone()),
            EnteredValue::Number(n) => {
                let is_rating = self
                    .form
                    .field(field_id.as_str())
                    .is_some_and(|(_, field)| field.field_type == FieldType::Rating);
                if is_rating && *n >= 0.0 && n.fract() == 0.0 {
                    FieldValue::Number(*n as u32)
                } else {
                    FieldValue::text(format_number(*n))
                }
            }
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn field_type_of(tag: &Identifier, span: &Span) -> Result<FieldType, ScriptError> {
    FieldType::from_tag(tag.as_str()).ok_or_else(|| ScriptError::UnknownFieldType {
        span: span.clone(),
        tag: tag.to_string(),
    })
}

fn drag_end(drag: &DragDecl) -> DragEnd {
    DragEnd {
        source: DropLocation::new(drag.source.node.container.as_str(), drag.source.node.index),
        destination: drag
            .destination
            .as_ref()
            .map(|d| DropLocation::new(d.node.container.as_str(), d.node.index)),
        dragged_item_id: drag.item.node.to_string(),
    }
}

fn invalid(modifier: &Spanned<Modifier>, message: impl Into<String>) -> ScriptError {
    ScriptError::InvalidModifier {
        span: modifier.span.clone(),
        key: modifier.node.key.node.to_string(),
        message: message.into(),
    }
}

fn expect_string(modifier: &Spanned<Modifier>) -> Result<String, ScriptError> {
    match &modifier.node.value.node {
        ModifierValue::String(s) => Ok(s.clone()),
        _ => Err(invalid(modifier, "expected a string")),
    }
}

fn optional_string(modifier: &Spanned<Modifier>) -> Result<Option<String>, ScriptError> {
    match &modifier.node.value.node {
        ModifierValue::None => Ok(None),
        ModifierValue::String(s) => Ok(Some(s.clone())),
        _ => Err(invalid(modifier, "expected a string or none")),
    }
}

fn optional_number(modifier: &Spanned<Modifier>) -> Result<Option<f64>, ScriptError> {
    match &modifier.node.value.node {
        ModifierValue::None => Ok(None),
        ModifierValue::Number(n) => Ok(Some(*n)),
        _ => Err(invalid(modifier, "expected a number or none")),
    }
}

fn optional_length(modifier: &Spanned<Modifier>) -> Result<Option<u32>, ScriptError> {
    match optional_number(modifier)? {
        None => Ok(None),
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(Some(n as u32)),
        Some(_) => Err(invalid(modifier, "expected a non-negative whole number")),
    }
}

/// Turn `[key: value, ...]` into a field patch
fn field_patch(modifiers: &[Spanned<Modifier>]) -> Result<FieldPatch, ScriptError> {
    let mut patch = FieldPatch::new();
    for modifier in modifiers {
        let value = &modifier.node.value;
        match &modifier.node.key.node {
            ModifierKey::Type => {
                let tag = match &value.node {
                    ModifierValue::Identifier(id) => id.clone(),
                    ModifierValue::String(s) => Identifier::new(s.clone()),
                    _ => return Err(invalid(modifier, "expected a field type")),
                };
                patch.field_type = Some(field_type_of(&tag, &value.span)?);
            }
            ModifierKey::Label => patch.label = Some(expect_string(modifier)?),
            ModifierKey::Description => patch.description = Some(expect_string(modifier)?),
            ModifierKey::Placeholder => patch.placeholder = Some(expect_string(modifier)?),
            ModifierKey::Required => match &value.node {
                ModifierValue::Bool(b) => patch.required = Some(*b),
                _ => return Err(invalid(modifier, "expected true or false")),
            },
            ModifierKey::Options => match &value.node {
                ModifierValue::List(options) => patch.options = Some(options.clone()),
                _ => return Err(invalid(modifier, "expected a list like (\"A\", \"B\")")),
            },
            ModifierKey::MinLength => {
                patch.validation.min_length = Some(optional_length(modifier)?)
            }
            ModifierKey::MaxLength => {
                patch.validation.max_length = Some(optional_length(modifier)?)
            }
            ModifierKey::Min => patch.validation.min = Some(optional_number(modifier)?),
            ModifierKey::Max => patch.validation.max = Some(optional_number(modifier)?),
            ModifierKey::Pattern => patch.validation.pattern = Some(optional_string(modifier)?),
            ModifierKey::ErrorMessage => {
                patch.validation.error_message = Some(optional_string(modifier)?)
            }
            ModifierKey::Title | ModifierKey::Custom(_) => {
                return Err(invalid(modifier, "not a field setting"))
            }
        }
    }
    Ok(patch)
}

/// Turn `[title: ..., description: ...]` into a page patch
fn page_patch(modifiers: &[Spanned<Modifier>]) -> Result<PagePatch, ScriptError> {
    let mut patch = PagePatch::new();
    for modifier in modifiers {
        match &modifier.node.key.node {
            ModifierKey::Title => patch.title = Some(expect_string(modifier)?),
            ModifierKey::Description => patch.description = Some(expect_string(modifier)?),
            _ => return Err(invalid(modifier, "pages only have a title and a description")),
        }
    }
    Ok(patch)
}

/// One-line rendering of a statement for history and logs
fn describe(statement: &Statement) -> String {
    match statement {
        Statement::SetTitle(title) => format!("title \"{}\"", title.node),
        Statement::SetDescription(d) => format!("description \"{}\"", d.node),
        Statement::AddPage => "add page".to_string(),
        Statement::AddField {
            field_type,
            page_id,
        } => format!("add field {} to {}", field_type.node, page_id.node),
        Statement::Drag(drag) => {
            let destination = drag
                .destination
                .as_ref()
                .map(|d| format!("{}:{}", d.node.container, d.node.index))
                .unwrap_or_else(|| "nowhere".to_string());
            format!(
                "drag {} from {}:{} to {}",
                drag.item.node, drag.source.node.container, drag.source.node.index, destination
            )
        }
        Statement::UpdateField {
            field_id, page_id, ..
        } => format!("update field {} on {}", field_id.node, page_id.node),
        Statement::DeleteField { field_id, page_id } => {
            format!("delete field {} on {}", field_id.node, page_id.node)
        }
        Statement::UpdatePage { page_id, .. } => format!("update page {}", page_id.node),
        Statement::DuplicatePage(page_id) => format!("duplicate page {}", page_id.node),
        Statement::MovePage { page_id, direction } => {
            let direction = match direction {
                MoveDirection::Up => "up",
                MoveDirection::Down => "down",
            };
            format!("move page {} {}", page_id.node, direction)
        }
        Statement::DeletePage(page_id) => format!("delete page {}", page_id.node),
        Statement::Preview(steps) => format!("preview ({} steps)", steps.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> ReplayOutcome {
        let doc = parse(source).expect("Should parse");
        Session::new(BuilderConfig::default())
            .execute(&doc)
            .expect("Should replay")
    }

    fn effects(outcome: &ReplayOutcome) -> Vec<Effect> {
        outcome.history.iter().map(|h| h.effect).collect()
    }

    #[test]
    fn test_add_and_update_field() {
        let outcome = run(r#"
            add field text to page-1
            update field field-1 on page-1 [label: "Name", required: true, min_length: 2]
        "#);
        let field = &outcome.form.pages[0].fields[0];
        assert_eq!(field.label, "Name");
        assert!(field.required);
        assert_eq!(field.validation.as_ref().and_then(|v| v.min_length), Some(2));
        assert_eq!(effects(&outcome), vec![Effect::Applied, Effect::Applied]);
    }

    #[test]
    fn test_missing_targets_are_no_ops() {
        let outcome = run(r#"
            add field text to page-9
            delete page page-1
            move page page-1 up
            drag field-1 from page-1:0 to nowhere
        "#);
        assert_eq!(outcome.form.pages.len(), 1);
        assert_eq!(outcome.form.field_count(), 0);
        assert_eq!(effects(&outcome), vec![Effect::NoOp; 4]);
        assert_eq!(outcome.history[1].summary, "delete page page-1");
    }

    #[test]
    fn test_drag_from_sidebar() {
        let outcome = run(r#"
            add page
            drag rating from sidebar:6 to page-2:0
        "#);
        assert_eq!(outcome.form.pages[1].fields[0].field_type, FieldType::Rating);
        assert_eq!(outcome.history[1].summary, "drag rating from sidebar:6 to page-2:0");
    }

    #[test]
    fn test_unknown_field_type_is_an_error() {
        let doc = parse("add page\nadd field signature to page-1").unwrap();
        let mut session = Session::new(BuilderConfig::default());
        let err = session.execute(&doc).unwrap_err();
        assert_eq!(
            err,
            ScriptError::UnknownFieldType {
                span: 19..28,
                tag: "signature".to_string(),
            }
        );
        // The statement before the error stays applied
        assert_eq!(session.form().pages.len(), 2);
    }

    #[test]
    fn test_invalid_modifiers() {
        let doc = parse(r#"update field field-1 on page-1 [required: "yes"]"#).unwrap();
        let err = Session::new(BuilderConfig::default())
            .execute(&doc)
            .unwrap_err();
        assert!(matches!(err, ScriptError::InvalidModifier { ref key, .. } if key == "required"));

        let doc = parse(r#"update page page-1 [label: "x"]"#).unwrap();
        assert!(Session::new(BuilderConfig::default()).execute(&doc).is_err());
    }

    #[test]
    fn test_preview_records_refusal_and_submission() {
        let outcome = run(r#"
            add field text to page-1
            update field field-1 on page-1 [label: "Name", required: true]
            add page
            add field rating to page-2
            preview {
                next
                set field-1 "Jean"
                next
                set field-2 4
                submit
            }
        "#);
        let run = &outcome.previews[0];
        assert_eq!(
            run.messages,
            vec!["Please fill in the required field: Name".to_string()]
        );
        assert_eq!(run.final_page, 1);
        let submission = run.submission.as_ref().unwrap();
        assert_eq!(submission.values["field-2"], FieldValue::Number(4));
        assert_eq!(submission.submission_data["Name"], Some(FieldValue::text("Jean")));
        assert_eq!(outcome.last_submission(), Some(submission));
    }

    #[test]
    fn test_numbers_are_text_outside_ratings() {
        let outcome = run(r#"
            add field number to page-1
            preview { set field-1 42 submit }
        "#);
        let submission = outcome.last_submission().unwrap();
        assert_eq!(submission.values["field-1"], FieldValue::text("42"));
    }

    #[test]
    fn test_with_form_continues_ids() {
        let first = run("add field text to page-1\nadd page");
        let mut session = Session::with_form(BuilderConfig::default(), first.form);
        let doc = parse("add page\nadd field email to page-3").unwrap();
        let outcome = session.execute(&doc).unwrap();
        assert_eq!(outcome.form.pages[2].id, "page-3");
        assert_eq!(outcome.form.pages[2].fields[0].id, "field-2");
    }
}
