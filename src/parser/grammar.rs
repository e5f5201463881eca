//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse script source code into an AST
pub fn parse(input: &str) -> Result<Document, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Document, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Basic token parsers
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    let string_literal = select! {
        Token::String(s) => s,
    }
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

    let number = select! {
        Token::Number(n) => n,
    };

    // Positions in a container are non-negative integers
    let index = number.clone().try_map(|n, span| {
        if n >= 0.0 && n.fract() == 0.0 {
            Ok(n as usize)
        } else {
            Err(Rich::custom(span, format!("invalid position {}", n)))
        }
    });

    // container:index
    let location = identifier
        .clone()
        .then_ignore(just(Token::Colon))
        .then(index)
        .map_with(|(container, index), e| {
            Spanned::new(
                Location {
                    container: container.node,
                    index,
                },
                span_range(&e.span()),
            )
        });

    // ("A", "B")
    let string_list = string_literal
        .clone()
        .map(|s| s.node)
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

    // Modifier keys; `title` and `description` are keywords, not identifiers
    let modifier_key = choice((
        just(Token::Title).map_with(|_, e| Spanned::new(ModifierKey::Title, span_range(&e.span()))),
        just(Token::Description)
            .map_with(|_, e| Spanned::new(ModifierKey::Description, span_range(&e.span()))),
        identifier.clone().map(|id| {
            let key = match id.node.as_str() {
                "type" => ModifierKey::Type,
                "label" => ModifierKey::Label,
                "required" => ModifierKey::Required,
                "placeholder" => ModifierKey::Placeholder,
                "options" => ModifierKey::Options,
                "min_length" => ModifierKey::MinLength,
                "max_length" => ModifierKey::MaxLength,
                "min" => ModifierKey::Min,
                "max" => ModifierKey::Max,
                "pattern" => ModifierKey::Pattern,
                "error_message" => ModifierKey::ErrorMessage,
                other => ModifierKey::Custom(other.to_string()),
            };
            Spanned::new(key, id.span)
        }),
    ));

    let modifier_value = choice((
        string_literal.clone().map(|s| ModifierValue::String(s.node)),
        number.clone().map(ModifierValue::Number),
        just(Token::True).to(ModifierValue::Bool(true)),
        just(Token::False).to(ModifierValue::Bool(false)),
        just(Token::None).to(ModifierValue::None),
        string_list.clone().map(ModifierValue::List),
        identifier.clone().map(|id| ModifierValue::Identifier(id.node)),
    ))
    .map_with(|v, e| Spanned::new(v, span_range(&e.span())));

    let modifier = modifier_key
        .then_ignore(just(Token::Colon))
        .then(modifier_value)
        .map_with(|(key, value), e| Spanned::new(Modifier { key, value }, span_range(&e.span())));

    let modifier_block = modifier
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    // title "..." / description "..."
    let form_meta = choice((
        just(Token::Title)
            .ignore_then(string_literal.clone())
            .map(Statement::SetTitle),
        just(Token::Description)
            .ignore_then(string_literal.clone())
            .map(Statement::SetDescription),
    ));

    // add page / add field <type> to <page>
    let add_decl = just(Token::Add).ignore_then(choice((
        just(Token::Page).to(Statement::AddPage),
        just(Token::Field)
            .ignore_then(identifier.clone())
            .then_ignore(just(Token::To))
            .then(identifier.clone())
            .map(|(field_type, page_id)| Statement::AddField {
                field_type,
                page_id,
            }),
    )));

    // drag <item> from <location> to <location>|nowhere
    let drag_decl = just(Token::Drag)
        .ignore_then(identifier.clone())
        .then_ignore(just(Token::From))
        .then(location.clone())
        .then_ignore(just(Token::To))
        .then(choice((
            just(Token::Nowhere).to(None),
            location.map(Some),
        )))
        .map(|((item, source), destination)| {
            Statement::Drag(DragDecl {
                item,
                source,
                destination,
            })
        });

    // update field <field> on <page> [...] / update page <page> [...]
    let update_decl = just(Token::Update).ignore_then(choice((
        just(Token::Field)
            .ignore_then(identifier.clone())
            .then_ignore(just(Token::On))
            .then(identifier.clone())
            .then(modifier_block.clone())
            .map(|((field_id, page_id), modifiers)| Statement::UpdateField {
                field_id,
                page_id,
                modifiers,
            }),
        just(Token::Page)
            .ignore_then(identifier.clone())
            .then(modifier_block)
            .map(|(page_id, modifiers)| Statement::UpdatePage { page_id, modifiers }),
    )));

    // delete field <field> on <page> / delete page <page>
    let delete_decl = just(Token::Delete).ignore_then(choice((
        just(Token::Field)
            .ignore_then(identifier.clone())
            .then_ignore(just(Token::On))
            .then(identifier.clone())
            .map(|(field_id, page_id)| Statement::DeleteField { field_id, page_id }),
        just(Token::Page)
            .ignore_then(identifier.clone())
            .map(Statement::DeletePage),
    )));

    let duplicate_decl = just(Token::Duplicate)
        .ignore_then(just(Token::Page))
        .ignore_then(identifier.clone())
        .map(Statement::DuplicatePage);

    let move_decl = just(Token::Move)
        .ignore_then(just(Token::Page))
        .ignore_then(identifier.clone())
        .then(choice((
            just(Token::Up).to(MoveDirection::Up),
            just(Token::Down).to(MoveDirection::Down),
        )))
        .map(|(page_id, direction)| Statement::MovePage { page_id, direction });

    // Preview steps
    let entered_value = choice((
        string_literal.clone().map(|s| EnteredValue::Text(s.node)),
        number.map(EnteredValue::Number),
        string_list.map(EnteredValue::Choices),
    ));

    let preview_step = choice((
        just(Token::Set)
            .ignore_then(identifier.clone())
            .then(entered_value)
            .map(|(field_id, value)| PreviewStep::Set { field_id, value }),
        just(Token::Toggle)
            .ignore_then(identifier)
            .then(string_literal)
            .then(choice((
                just(Token::On).to(true),
                just(Token::Off).to(false),
            )))
            .map(|((field_id, option), checked)| PreviewStep::Toggle {
                field_id,
                option: option.node,
                checked,
            }),
        just(Token::Next).to(PreviewStep::Next),
        just(Token::Prev).to(PreviewStep::Prev),
        just(Token::Submit).to(PreviewStep::Submit),
    ))
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

    let preview_decl = just(Token::Preview)
        .ignore_then(
            preview_step
                .repeated()
                .collect::<Vec<_>>()
                .delimited_by(just(Token::BraceOpen), just(Token::BraceClose)),
        )
        .map(Statement::Preview);

    let statement = choice((
        form_meta,
        add_decl,
        drag_decl,
        update_decl,
        delete_decl,
        duplicate_decl,
        move_decl,
        preview_decl,
    ))
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
    .boxed();

    // Document is a list of statements
    statement
        .repeated()
        .collect()
        .then_ignore(end())
        .map(|statements| Document { statements })
}
