//! Lexer for the form builder script language using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Form metadata
    #[token("title")]
    Title,
    #[token("description")]
    Description,

    // Builder operations
    #[token("add")]
    Add,
    #[token("update")]
    Update,
    #[token("delete")]
    Delete,
    #[token("duplicate")]
    Duplicate,
    #[token("move")]
    Move,
    #[token("drag")]
    Drag,

    // Targets
    #[token("page")]
    Page,
    #[token("field")]
    Field,

    // Prepositions
    #[token("to")]
    To,
    #[token("from")]
    From,
    #[token("on")]
    On,
    #[token("off")]
    Off,
    #[token("nowhere")]
    Nowhere,

    // Page moves
    #[token("up")]
    Up,
    #[token("down")]
    Down,

    // Preview steps
    #[token("preview")]
    Preview,
    #[token("set")]
    Set,
    #[token("toggle")]
    Toggle,
    #[token("next")]
    Next,
    #[token("prev")]
    Prev,
    #[token("submit")]
    Submit,

    // Literal keywords
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("none")]
    None,

    // Delimiters
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    // Identifiers may contain inner dashes so ids like `page-1` stay one token
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(-[a-zA-Z0-9_]+)*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape(&s[1..s.len()-1])
    })]
    String(String),

    #[regex(r"-?[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
