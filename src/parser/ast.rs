//! Abstract Syntax Tree types for form builder scripts

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Page id, field id, container id or field type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root AST node - a complete script
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub statements: Vec<Spanned<Statement>>,
}

/// One recorded builder operation
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `title "..."`
    SetTitle(Spanned<String>),
    /// `description "..."`
    SetDescription(Spanned<String>),
    /// `add page`
    AddPage,
    /// `add field <type> to <page>`
    AddField {
        field_type: Spanned<Identifier>,
        page_id: Spanned<Identifier>,
    },
    /// `drag <item> from <container>:<index> to <container>:<index>|nowhere`
    Drag(DragDecl),
    /// `update field <field> on <page> [modifiers]`
    UpdateField {
        field_id: Spanned<Identifier>,
        page_id: Spanned<Identifier>,
        modifiers: Vec<Spanned<Modifier>>,
    },
    /// `delete field <field> on <page>`
    DeleteField {
        field_id: Spanned<Identifier>,
        page_id: Spanned<Identifier>,
    },
    /// `update page <page> [modifiers]`
    UpdatePage {
        page_id: Spanned<Identifier>,
        modifiers: Vec<Spanned<Modifier>>,
    },
    /// `duplicate page <page>`
    DuplicatePage(Spanned<Identifier>),
    /// `move page <page> up|down`
    MovePage {
        page_id: Spanned<Identifier>,
        direction: MoveDirection,
    },
    /// `delete page <page>`
    DeletePage(Spanned<Identifier>),
    /// `preview { steps }`
    Preview(Vec<Spanned<PreviewStep>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// End of a drag gesture
#[derive(Debug, Clone, PartialEq)]
pub struct DragDecl {
    pub item: Spanned<Identifier>,
    pub source: Spanned<Location>,
    /// `None` for `to nowhere`
    pub destination: Option<Spanned<Location>>,
}

/// `container:index`
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub container: Identifier,
    pub index: usize,
}

/// `key: value` inside a modifier block
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub key: Spanned<ModifierKey>,
    pub value: Spanned<ModifierValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModifierKey {
    Type,
    Label,
    Required,
    Title,
    Description,
    Placeholder,
    Options,
    MinLength,
    MaxLength,
    Min,
    Max,
    Pattern,
    ErrorMessage,
    Custom(String),
}

impl std::fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModifierKey::Type => "type",
            ModifierKey::Label => "label",
            ModifierKey::Required => "required",
            ModifierKey::Title => "title",
            ModifierKey::Description => "description",
            ModifierKey::Placeholder => "placeholder",
            ModifierKey::Options => "options",
            ModifierKey::MinLength => "min_length",
            ModifierKey::MaxLength => "max_length",
            ModifierKey::Min => "min",
            ModifierKey::Max => "max",
            ModifierKey::Pattern => "pattern",
            ModifierKey::ErrorMessage => "error_message",
            ModifierKey::Custom(other) => other,
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModifierValue {
    String(String),
    Number(f64),
    Bool(bool),
    /// `("A", "B")`
    List(Vec<String>),
    /// Bare word, e.g. a field type tag
    Identifier(Identifier),
    /// `none` clears an optional setting
    None,
}

/// One step of a preview block
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewStep {
    /// `set <field> <value>`
    Set {
        field_id: Spanned<Identifier>,
        value: EnteredValue,
    },
    /// `toggle <field> "<option>" on|off`
    Toggle {
        field_id: Spanned<Identifier>,
        option: String,
        checked: bool,
    },
    Next,
    Prev,
    Submit,
}

/// A value typed into a field during preview
#[derive(Debug, Clone, PartialEq)]
pub enum EnteredValue {
    Text(String),
    Number(f64),
    Choices(Vec<String>),
}
