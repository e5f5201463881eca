//! Drag-relocation resolver
//!
//! Turns the end of a drag gesture into exactly one builder operation, or
//! nothing. Rules, in priority order:
//!
//! 1. no destination: ignored
//! 2. sidebar → page: create a field whose type is the dragged item's tag
//! 3. page → page (same or different): relocate an existing field
//! 4. anything else: ignored
//!
//! The sidebar is a source only. Dragging from it never removes anything
//! from the catalog.

use std::fmt;

use tracing::debug;

use crate::catalog::{FieldCatalog, FieldType};
use crate::ids::IdGenerator;
use crate::model::{self, Page};

/// Container id of the field-type sidebar
pub const SIDEBAR: &str = "sidebar";

/// A position inside a drop container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropLocation {
    pub container_id: String,
    pub index: usize,
}

impl DropLocation {
    pub fn new(container_id: impl Into<String>, index: usize) -> Self {
        Self {
            container_id: container_id.into(),
            index,
        }
    }

    pub fn sidebar(index: usize) -> Self {
        Self::new(SIDEBAR, index)
    }

    pub fn is_sidebar(&self) -> bool {
        self.container_id == SIDEBAR
    }
}

impl fmt::Display for DropLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.container_id, self.index)
    }
}

/// The end of a drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    pub source: DropLocation,
    /// `None` when dropped outside every container
    pub destination: Option<DropLocation>,
    /// Field type tag when dragged from the sidebar, field id otherwise
    pub dragged_item_id: String,
}

/// Why a gesture was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    NoDestination,
    UnknownFieldType(String),
    UnknownContainer(String),
    SourceIndexOutOfRange { page_id: String, index: usize },
    DestinationIndexOutOfRange { page_id: String, index: usize },
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::NoDestination => write!(f, "dropped outside every container"),
            IgnoreReason::UnknownFieldType(tag) => write!(f, "unknown field type '{}'", tag),
            IgnoreReason::UnknownContainer(id) => write!(f, "'{}' is not a drop target", id),
            IgnoreReason::SourceIndexOutOfRange { page_id, index } => {
                write!(f, "no field at {}:{}", page_id, index)
            }
            IgnoreReason::DestinationIndexOutOfRange { page_id, index } => {
                write!(f, "cannot insert at {}:{}", page_id, index)
            }
        }
    }
}

/// The operation a gesture maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    CreateField {
        page_id: String,
        field_type: FieldType,
    },
    Relocate {
        source_page_id: String,
        source_index: usize,
        dest_page_id: String,
        dest_index: usize,
    },
    Ignored(IgnoreReason),
}

/// Decide what a drag gesture means for the given pages
pub fn classify(pages: &[Page], event: &DragEnd) -> Resolution {
    let Some(destination) = &event.destination else {
        return Resolution::Ignored(IgnoreReason::NoDestination);
    };

    let Some(dest_page) = pages.iter().find(|p| p.id == destination.container_id) else {
        return Resolution::Ignored(IgnoreReason::UnknownContainer(
            destination.container_id.clone(),
        ));
    };

    if event.source.is_sidebar() {
        return match FieldType::from_tag(&event.dragged_item_id) {
            Some(field_type) => Resolution::CreateField {
                page_id: dest_page.id.clone(),
                field_type,
            },
            None => Resolution::Ignored(IgnoreReason::UnknownFieldType(
                event.dragged_item_id.clone(),
            )),
        };
    }

    let Some(source_page) = pages.iter().find(|p| p.id == event.source.container_id) else {
        return Resolution::Ignored(IgnoreReason::UnknownContainer(
            event.source.container_id.clone(),
        ));
    };

    if event.source.index >= source_page.fields.len() {
        return Resolution::Ignored(IgnoreReason::SourceIndexOutOfRange {
            page_id: source_page.id.clone(),
            index: event.source.index,
        });
    }

    // Within one page the moved field leaves a gap, so the last valid slot
    // is one less than across pages.
    let max_dest = if source_page.id == dest_page.id {
        dest_page.fields.len() - 1
    } else {
        dest_page.fields.len()
    };
    if destination.index > max_dest {
        return Resolution::Ignored(IgnoreReason::DestinationIndexOutOfRange {
            page_id: dest_page.id.clone(),
            index: destination.index,
        });
    }

    Resolution::Relocate {
        source_page_id: source_page.id.clone(),
        source_index: event.source.index,
        dest_page_id: dest_page.id.clone(),
        dest_index: destination.index,
    }
}

/// Apply a drag gesture, returning the next page sequence
pub fn resolve(
    pages: &[Page],
    event: &DragEnd,
    catalog: &FieldCatalog,
    ids: &mut IdGenerator,
) -> Vec<Page> {
    match classify(pages, event) {
        Resolution::CreateField {
            page_id,
            field_type,
        } => model::add_field(pages, &page_id, field_type, catalog, ids),
        Resolution::Relocate {
            source_page_id,
            source_index,
            dest_page_id,
            dest_index,
        } => model::move_field(pages, &source_page_id, source_index, &dest_page_id, dest_index),
        Resolution::Ignored(reason) => {
            debug!(item = %event.dragged_item_id, source = %event.source, %reason, "drag ignored");
            pages.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;
    use crate::model::Form;
    use pretty_assertions::assert_eq;

    fn drag(item: &str, source: DropLocation, destination: Option<DropLocation>) -> DragEnd {
        DragEnd {
            source,
            destination,
            dragged_item_id: item.to_string(),
        }
    }

    fn two_pages() -> (Vec<Page>, FieldCatalog, IdGenerator) {
        let config = BuilderConfig::default();
        let catalog = FieldCatalog::new(&config);
        let mut ids = IdGenerator::new();
        let form = Form::new(&config, &mut ids);
        let mut pages = model::add_page(&form.pages, &config.page, &mut ids);
        pages = model::add_field(&pages, "page-1", FieldType::Text, &catalog, &mut ids);
        pages = model::add_field(&pages, "page-1", FieldType::Email, &catalog, &mut ids);
        (pages, catalog, ids)
    }

    #[test]
    fn test_no_destination_is_ignored() {
        let (pages, _, _) = two_pages();
        let event = drag("field-1", DropLocation::new("page-1", 0), None);
        assert_eq!(
            classify(&pages, &event),
            Resolution::Ignored(IgnoreReason::NoDestination)
        );
    }

    #[test]
    fn test_sidebar_to_page_creates_field() {
        let (pages, catalog, mut ids) = two_pages();
        let event = drag(
            "checkbox",
            DropLocation::sidebar(5),
            Some(DropLocation::new("page-2", 0)),
        );
        assert_eq!(
            classify(&pages, &event),
            Resolution::CreateField {
                page_id: "page-2".to_string(),
                field_type: FieldType::Checkbox,
            }
        );

        let next = resolve(&pages, &event, &catalog, &mut ids);
        assert_eq!(next[1].fields.len(), 1);
        assert_eq!(next[1].fields[0].id, "field-3");
        assert_eq!(next[1].fields[0].field_type, FieldType::Checkbox);
    }

    #[test]
    fn test_sidebar_unknown_tag_is_ignored() {
        let (pages, catalog, mut ids) = two_pages();
        let event = drag(
            "signature",
            DropLocation::sidebar(0),
            Some(DropLocation::new("page-1", 0)),
        );
        assert_eq!(resolve(&pages, &event, &catalog, &mut ids), pages);
    }

    #[test]
    fn test_page_to_page_relocates() {
        let (pages, catalog, mut ids) = two_pages();
        let event = drag(
            "field-1",
            DropLocation::new("page-1", 0),
            Some(DropLocation::new("page-2", 0)),
        );
        let next = resolve(&pages, &event, &catalog, &mut ids);
        assert_eq!(next[0].fields.len(), 1);
        assert_eq!(next[0].fields[0].id, "field-2");
        assert_eq!(next[1].fields[0].id, "field-1");
    }

    #[test]
    fn test_reorder_within_page() {
        let (pages, catalog, mut ids) = two_pages();
        let event = drag(
            "field-1",
            DropLocation::new("page-1", 0),
            Some(DropLocation::new("page-1", 1)),
        );
        let next = resolve(&pages, &event, &catalog, &mut ids);
        let order: Vec<_> = next[0].fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(order, vec!["field-2", "field-1"]);
    }

    #[test]
    fn test_drop_on_sidebar_is_ignored() {
        let (pages, _, _) = two_pages();
        let event = drag(
            "field-1",
            DropLocation::new("page-1", 0),
            Some(DropLocation::sidebar(0)),
        );
        assert_eq!(
            classify(&pages, &event),
            Resolution::Ignored(IgnoreReason::UnknownContainer("sidebar".to_string()))
        );
    }

    #[test]
    fn test_unknown_source_container_is_ignored() {
        let (pages, _, _) = two_pages();
        let event = drag(
            "field-1",
            DropLocation::new("trash", 0),
            Some(DropLocation::new("page-1", 0)),
        );
        assert!(matches!(
            classify(&pages, &event),
            Resolution::Ignored(IgnoreReason::UnknownContainer(id)) if id == "trash"
        ));
    }

    #[test]
    fn test_out_of_range_indices_are_ignored() {
        let (pages, _, _) = two_pages();
        let bad_source = drag(
            "field-9",
            DropLocation::new("page-1", 2),
            Some(DropLocation::new("page-2", 0)),
        );
        assert!(matches!(
            classify(&pages, &bad_source),
            Resolution::Ignored(IgnoreReason::SourceIndexOutOfRange { .. })
        ));

        let same_page_past_end = drag(
            "field-1",
            DropLocation::new("page-1", 0),
            Some(DropLocation::new("page-1", 2)),
        );
        assert!(matches!(
            classify(&pages, &same_page_past_end),
            Resolution::Ignored(IgnoreReason::DestinationIndexOutOfRange { .. })
        ));

        let other_page_end = drag(
            "field-1",
            DropLocation::new("page-1", 0),
            Some(DropLocation::new("page-2", 0)),
        );
        assert!(matches!(
            classify(&pages, &other_page_end),
            Resolution::Relocate { .. }
        ));
    }

    #[test]
    fn test_ignore_reason_display() {
        let reason = IgnoreReason::SourceIndexOutOfRange {
            page_id: "page-1".to_string(),
            index: 4,
        };
        assert_eq!(reason.to_string(), "no field at page-1:4");
    }
}
