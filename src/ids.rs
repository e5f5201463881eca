//! Identifier generation for pages and fields
//!
//! Ids have the shape `{prefix}-{n}` with a monotonic counter per kind, so
//! every id issued by one generator is distinct from every other, including
//! ids handed out in a single batch (page duplication).

use std::fmt;

use crate::model::Form;

/// The kind of entity an id is issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Page,
    Field,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Page => "page",
            IdKind::Field => "field",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Issues unique ids for one editing session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGenerator {
    last_page: u64,
    last_field: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator whose counters start past every id already present
    /// in `form`.
    ///
    /// Only ids of the generator's own `{prefix}-{n}` shape can collide, so
    /// ids with any other shape are ignored.
    pub fn after(form: &Form) -> Self {
        let mut ids = Self::new();
        for page in &form.pages {
            ids.observe(IdKind::Page, &page.id);
            for field in &page.fields {
                ids.observe(IdKind::Field, &field.id);
            }
        }
        ids
    }

    /// Issue the next id of the given kind
    pub fn next_id(&mut self, kind: IdKind) -> String {
        let counter = self.counter_mut(kind);
        *counter += 1;
        format!("{}-{}", kind.prefix(), counter)
    }

    fn observe(&mut self, kind: IdKind, id: &str) {
        let Some(n) = parse_suffix(kind, id) else {
            return;
        };
        let counter = self.counter_mut(kind);
        if n > *counter {
            *counter = n;
        }
    }

    fn counter_mut(&mut self, kind: IdKind) -> &mut u64 {
        match kind {
            IdKind::Page => &mut self.last_page,
            IdKind::Field => &mut self.last_field,
        }
    }
}

fn parse_suffix(kind: IdKind, id: &str) -> Option<u64> {
    id.strip_prefix(kind.prefix())?
        .strip_prefix('-')?
        .parse::<u64>()
        .ok()
}
