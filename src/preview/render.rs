//! Renderer contract and the plain-text outline renderer

use std::fmt::Write;

use crate::catalog::ControlKind;
use crate::model::{Field, Form};

use super::runtime::FieldValue;

/// Displays a field and reports user input
///
/// Renderers never touch the builder model; input goes through
/// `on_change(field_id, value)`.
pub trait FieldRenderer {
    type Output;

    fn render(
        &mut self,
        field: &Field,
        value: Option<&FieldValue>,
        on_change: &mut dyn FnMut(&str, FieldValue),
    ) -> Self::Output;
}

/// Renders each field as one line of text
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineRenderer;

impl FieldRenderer for OutlineRenderer {
    type Output = String;

    fn render(
        &mut self,
        field: &Field,
        value: Option<&FieldValue>,
        _on_change: &mut dyn FnMut(&str, FieldValue),
    ) -> String {
        let mut line = format!("{} {}", field.id, field.label);
        if field.required {
            line.push_str(" *");
        }
        let _ = write!(line, " [{}]", field.field_type);

        match field.capabilities().control {
            ControlKind::Select | ControlKind::Radio | ControlKind::Checkbox => {
                let options = field.options.as_deref().unwrap_or_default();
                let _ = write!(line, " ({})", options.join(" | "));
            }
            ControlKind::ReadOnly => {}
            _ if !field.placeholder.is_empty() => {
                let _ = write!(line, " \"{}\"", field.placeholder);
            }
            _ => {}
        }

        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let _ = write!(line, " = {}", value);
        }
        line
    }
}

/// Outline of a whole form: header, then every page with its fields
pub fn outline(form: &Form) -> String {
    let mut out = String::new();
    let mut renderer = OutlineRenderer;
    let _ = writeln!(out, "{}", form.title);
    if !form.description.is_empty() {
        let _ = writeln!(out, "{}", form.description);
    }
    for (index, page) in form.pages.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {} ({})", index + 1, page.title, page.id);
        for field in &page.fields {
            let value = field.value.clone().map(FieldValue::Text);
            let line = renderer.render(field, value.as_ref(), &mut |_, _| {});
            let _ = writeln!(out, "   {}", line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldCatalog, FieldType};
    use crate::preview::PreviewSession;

    fn render_one(field: &Field, value: Option<&FieldValue>) -> String {
        OutlineRenderer.render(field, value, &mut |_, _| {})
    }

    #[test]
    fn test_render_text_field() {
        let catalog = FieldCatalog::default();
        let mut field = catalog.build_field(FieldType::Text, "field-1".to_string());
        field.required = true;
        assert_eq!(
            render_one(&field, None),
            "field-1 Question * [text] \"Type your answer here..\""
        );
        assert_eq!(
            render_one(&field, Some(&FieldValue::text("Jean"))),
            "field-1 Question * [text] \"Type your answer here..\" = Jean"
        );
    }

    #[test]
    fn test_render_choice_field() {
        let catalog = FieldCatalog::default();
        let field = catalog.build_field(FieldType::Radio, "field-4".to_string());
        assert_eq!(
            render_one(&field, None),
            "field-4 Question [radio] (Option 1 | Option 2)"
        );
    }

    #[test]
    fn test_render_current_records_changes() {
        struct Typist;

        impl FieldRenderer for Typist {
            type Output = ();

            fn render(
                &mut self,
                field: &Field,
                _value: Option<&FieldValue>,
                on_change: &mut dyn FnMut(&str, FieldValue),
            ) {
                on_change(&field.id, FieldValue::text("typed"));
            }
        }

        let catalog = FieldCatalog::default();
        let mut form = crate::model::Form::new(
            &crate::config::BuilderConfig::default(),
            &mut crate::ids::IdGenerator::new(),
        );
        form.pages[0]
            .fields
            .push(catalog.build_field(FieldType::Textarea, "field-1".to_string()));

        let mut preview = PreviewSession::new(&form);
        let outputs = preview.render_current(&mut Typist);
        assert_eq!(outputs.len(), 1);
        assert_eq!(preview.value("field-1"), Some(&FieldValue::text("typed")));
    }
}
