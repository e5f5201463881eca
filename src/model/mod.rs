//! Builder model: the form tree and the operations that produce new
//! snapshots of it

pub mod ops;
mod patch;
mod types;

pub use ops::{
    add_field, add_page, delete_field, delete_page, duplicate_page, move_field, move_page_down,
    move_page_up, update_field, update_page_meta,
};
pub use patch::{FieldPatch, FormPatch, PagePatch, ValidationPatch};
pub use types::{Field, Form, Page, Validation};

/// Shallow-merge `patch` into the form title/description
pub fn update_form_meta(form: &Form, patch: &FormPatch) -> Form {
    patch.apply(form)
}
