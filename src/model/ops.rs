//! Builder operations
//!
//! Every operation takes the current page sequence and returns the next
//! one; the input is never modified. An operation that names a page or
//! field that does not exist, or that would cross a boundary (moving the
//! first page up, deleting the only page), returns an equal copy of its
//! input.

use tracing::debug;

use crate::catalog::{FieldCatalog, FieldType};
use crate::config::PageDefaults;
use crate::ids::{IdGenerator, IdKind};

use super::patch::{FieldPatch, PagePatch};
use super::types::{Field, Page};

fn page_position(pages: &[Page], page_id: &str) -> Option<usize> {
    pages.iter().position(|p| p.id == page_id)
}

/// Replace the page `page_id` with `f(page)`
fn with_page<F>(pages: &[Page], page_id: &str, operation: &str, f: F) -> Vec<Page>
where
    F: FnOnce(&Page) -> Page,
{
    let mut next = pages.to_vec();
    match page_position(pages, page_id) {
        Some(index) => next[index] = f(&pages[index]),
        None => debug!(operation, page_id, "unknown page, nothing to do"),
    }
    next
}

/// Append a new field of `field_type` to the page `page_id`
pub fn add_field(
    pages: &[Page],
    page_id: &str,
    field_type: FieldType,
    catalog: &FieldCatalog,
    ids: &mut IdGenerator,
) -> Vec<Page> {
    with_page(pages, page_id, "add_field", |page| {
        let mut page = page.clone();
        let field = catalog.build_field(field_type, ids.next_id(IdKind::Field));
        debug!(page_id, field_id = %field.id, %field_type, "field added");
        page.fields.push(field);
        page
    })
}

/// Move the field at `source_index` of one page to `dest_index` of another
/// (or the same) page
///
/// Within one page the field is removed and re-inserted into the same
/// sequence, so `dest_index` is a position in the sequence without the
/// moved field. A destination index past the end appends.
pub fn move_field(
    pages: &[Page],
    source_page_id: &str,
    source_index: usize,
    dest_page_id: &str,
    dest_index: usize,
) -> Vec<Page> {
    let mut next = pages.to_vec();

    let (Some(source), Some(dest)) = (
        page_position(pages, source_page_id),
        page_position(pages, dest_page_id),
    ) else {
        debug!(source_page_id, dest_page_id, "unknown page, field not moved");
        return next;
    };

    if source_index >= next[source].fields.len() {
        debug!(source_page_id, source_index, "source index out of range, field not moved");
        return next;
    }

    let moved = next[source].fields.remove(source_index);
    let fields = &mut next[dest].fields;
    let at = dest_index.min(fields.len());
    debug!(field_id = %moved.id, source_page_id, dest_page_id, at, "field moved");
    fields.insert(at, moved);
    next
}

/// Shallow-merge `patch` into the field `field_id` of page `page_id`
pub fn update_field(
    pages: &[Page],
    page_id: &str,
    field_id: &str,
    patch: &FieldPatch,
    catalog: &FieldCatalog,
) -> Vec<Page> {
    with_page(pages, page_id, "update_field", |page| {
        let mut page = page.clone();
        match page.field_index(field_id) {
            Some(index) => page.fields[index] = patch.apply(&page.fields[index], catalog),
            None => debug!(page_id, field_id, "unknown field, nothing to update"),
        }
        page
    })
}

pub fn delete_field(pages: &[Page], page_id: &str, field_id: &str) -> Vec<Page> {
    with_page(pages, page_id, "delete_field", |page| {
        let mut page = page.clone();
        match page.field_index(field_id) {
            Some(index) => {
                page.fields.remove(index);
            }
            None => debug!(page_id, field_id, "unknown field, nothing to delete"),
        }
        page
    })
}

/// Append a new empty page
pub fn add_page(pages: &[Page], defaults: &PageDefaults, ids: &mut IdGenerator) -> Vec<Page> {
    let mut next = pages.to_vec();
    next.push(Page::empty(
        ids.next_id(IdKind::Page),
        &defaults.title,
        &defaults.description,
    ));
    next
}

/// Remove the page `page_id`, unless it is the only page
pub fn delete_page(pages: &[Page], page_id: &str) -> Vec<Page> {
    if pages.len() <= 1 {
        debug!(page_id, "refusing to delete the only page");
        return pages.to_vec();
    }
    if page_position(pages, page_id).is_none() {
        debug!(page_id, "unknown page, nothing to delete");
    }
    pages.iter().filter(|p| p.id != page_id).cloned().collect()
}

/// Insert a copy of page `page_id` right after it
///
/// The copy gets a fresh page id and a fresh id for every field.
pub fn duplicate_page(
    pages: &[Page],
    page_id: &str,
    defaults: &PageDefaults,
    ids: &mut IdGenerator,
) -> Vec<Page> {
    let mut next = pages.to_vec();
    let Some(index) = page_position(pages, page_id) else {
        debug!(page_id, "unknown page, nothing to duplicate");
        return next;
    };

    let original = &pages[index];
    let copy = Page {
        id: ids.next_id(IdKind::Page),
        title: format!("{}{}", original.title, defaults.copy_suffix),
        description: original.description.clone(),
        fields: original
            .fields
            .iter()
            .map(|field| Field {
                id: ids.next_id(IdKind::Field),
                ..field.clone()
            })
            .collect(),
    };
    next.insert(index + 1, copy);
    next
}

/// Swap page `page_id` with the page before it
pub fn move_page_up(pages: &[Page], page_id: &str) -> Vec<Page> {
    let mut next = pages.to_vec();
    match page_position(pages, page_id) {
        Some(index) if index > 0 => next.swap(index - 1, index),
        Some(_) => debug!(page_id, "page is already first"),
        None => debug!(page_id, "unknown page, nothing to move"),
    }
    next
}

/// Swap page `page_id` with the page after it
pub fn move_page_down(pages: &[Page], page_id: &str) -> Vec<Page> {
    let mut next = pages.to_vec();
    match page_position(pages, page_id) {
        Some(index) if index + 1 < pages.len() => next.swap(index, index + 1),
        Some(_) => debug!(page_id, "page is already last"),
        None => debug!(page_id, "unknown page, nothing to move"),
    }
    next
}

/// Shallow-merge `patch` into the title/description of page `page_id`
pub fn update_page_meta(pages: &[Page], page_id: &str, patch: &PagePatch) -> Vec<Page> {
    with_page(pages, page_id, "update_page_meta", |page| patch.apply(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;
    use crate::model::Form;
    use pretty_assertions::assert_eq;

    struct Fixture {
        pages: Vec<Page>,
        ids: IdGenerator,
        catalog: FieldCatalog,
        defaults: PageDefaults,
    }

    impl Fixture {
        fn new() -> Self {
            let config = BuilderConfig::default();
            let mut ids = IdGenerator::new();
            let form = Form::new(&config, &mut ids);
            Self {
                pages: form.pages,
                ids,
                catalog: FieldCatalog::new(&config),
                defaults: config.page,
            }
        }

        fn add(&mut self, page_id: &str, field_type: FieldType) {
            self.pages = add_field(&self.pages, page_id, field_type, &self.catalog, &mut self.ids);
        }

        fn add_page(&mut self) {
            self.pages = add_page(&self.pages, &self.defaults, &mut self.ids);
        }
    }

    fn field_ids(page: &Page) -> Vec<&str> {
        page.fields.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_add_field_appends() {
        let mut fx = Fixture::new();
        fx.add("page-1", FieldType::Text);
        fx.add("page-1", FieldType::Select);
        assert_eq!(field_ids(&fx.pages[0]), vec!["field-1", "field-2"]);
        assert_eq!(fx.pages[0].fields[1].field_type, FieldType::Select);
    }

    #[test]
    fn test_add_field_unknown_page_is_noop() {
        let mut fx = Fixture::new();
        let before = fx.pages.clone();
        fx.add("page-99", FieldType::Text);
        assert_eq!(fx.pages, before);
    }

    #[test]
    fn test_reorder_within_page() {
        let mut fx = Fixture::new();
        for _ in 0..3 {
            fx.add("page-1", FieldType::Text);
        }
        let moved = move_field(&fx.pages, "page-1", 0, "page-1", 2);
        assert_eq!(field_ids(&moved[0]), vec!["field-2", "field-3", "field-1"]);

        let back = move_field(&moved, "page-1", 2, "page-1", 0);
        assert_eq!(field_ids(&back[0]), vec!["field-1", "field-2", "field-3"]);
    }

    #[test]
    fn test_move_across_pages() {
        let mut fx = Fixture::new();
        fx.add("page-1", FieldType::Text);
        fx.add("page-1", FieldType::Number);
        fx.add_page();

        let moved = move_field(&fx.pages, "page-1", 0, "page-2", 0);
        assert_eq!(field_ids(&moved[0]), vec!["field-2"]);
        assert_eq!(field_ids(&moved[1]), vec!["field-1"]);
        assert_eq!(moved[1].fields[0], fx.pages[0].fields[0]);
    }

    #[test]
    fn test_move_with_bad_source_is_noop() {
        let mut fx = Fixture::new();
        fx.add("page-1", FieldType::Text);
        assert_eq!(move_field(&fx.pages, "page-1", 1, "page-1", 0), fx.pages);
        assert_eq!(move_field(&fx.pages, "page-9", 0, "page-1", 0), fx.pages);
        assert_eq!(move_field(&fx.pages, "page-1", 0, "page-9", 0), fx.pages);
    }

    #[test]
    fn test_move_clamps_destination() {
        let mut fx = Fixture::new();
        fx.add("page-1", FieldType::Text);
        fx.add("page-1", FieldType::Text);
        let moved = move_field(&fx.pages, "page-1", 0, "page-1", 10);
        assert_eq!(field_ids(&moved[0]), vec!["field-2", "field-1"]);
    }

    #[test]
    fn test_update_and_delete_field() {
        let mut fx = Fixture::new();
        fx.add("page-1", FieldType::Text);

        let updated = update_field(
            &fx.pages,
            "page-1",
            "field-1",
            &FieldPatch::new().with_label("Email"),
            &fx.catalog,
        );
        assert_eq!(updated[0].fields[0].label, "Email");

        assert_eq!(
            update_field(&fx.pages, "page-1", "field-9", &FieldPatch::new().with_label("x"), &fx.catalog),
            fx.pages
        );

        let deleted = delete_field(&updated, "page-1", "field-1");
        assert!(deleted[0].fields.is_empty());
        assert_eq!(delete_field(&updated, "page-1", "field-5"), updated);
    }

    #[test]
    fn test_delete_only_page_is_noop() {
        let fx = Fixture::new();
        assert_eq!(delete_page(&fx.pages, "page-1"), fx.pages);
    }

    #[test]
    fn test_delete_page() {
        let mut fx = Fixture::new();
        fx.add_page();
        let remaining = delete_page(&fx.pages, "page-1");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "page-2");
        assert_eq!(delete_page(&fx.pages, "page-7"), fx.pages);
    }

    #[test]
    fn test_duplicate_page_uses_fresh_ids() {
        let mut fx = Fixture::new();
        fx.add("page-1", FieldType::Text);
        fx.add("page-1", FieldType::Radio);
        fx.add_page();

        let pages = duplicate_page(&fx.pages, "page-1", &fx.defaults, &mut fx.ids);
        let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["page-1", "page-3", "page-2"]);

        let copy = &pages[1];
        assert_eq!(copy.title, "Untitled page Copy");
        assert_eq!(field_ids(copy), vec!["field-3", "field-4"]);
        assert_eq!(copy.fields[1].options, pages[0].fields[1].options);
    }

    #[test]
    fn test_move_page_boundaries() {
        let mut fx = Fixture::new();
        fx.add_page();
        assert_eq!(move_page_up(&fx.pages, "page-1"), fx.pages);
        assert_eq!(move_page_down(&fx.pages, "page-2"), fx.pages);

        let down = move_page_down(&fx.pages, "page-1");
        assert_eq!(down[0].id, "page-2");
        assert_eq!(move_page_up(&down, "page-1"), fx.pages);
    }

    #[test]
    fn test_update_page_meta() {
        let fx = Fixture::new();
        let pages = update_page_meta(
            &fx.pages,
            "page-1",
            &PagePatch::new().with_description("Who you are"),
        );
        assert_eq!(pages[0].description, "Who you are");
        assert_eq!(pages[0].title, fx.pages[0].title);
    }
}
