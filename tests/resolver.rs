//! Drag gestures resolved against a small two-page form

use form_builder::config::BuilderConfig;
use form_builder::ids::IdGenerator;
use form_builder::model::{self, Page};
use form_builder::resolver::{classify, resolve, DragEnd, DropLocation, IgnoreReason, Resolution};
use form_builder::{FieldCatalog, FieldType, Form};
use pretty_assertions::assert_eq;

struct Canvas {
    pages: Vec<Page>,
    catalog: FieldCatalog,
    ids: IdGenerator,
}

/// page-1: [field-1 text, field-2 number, field-3 select], page-2: []
fn canvas() -> Canvas {
    let config = BuilderConfig::default();
    let catalog = FieldCatalog::new(&config);
    let mut ids = IdGenerator::new();
    let form = Form::new(&config, &mut ids);
    let mut pages = model::add_page(&form.pages, &config.page, &mut ids);
    for field_type in [FieldType::Text, FieldType::Number, FieldType::Select] {
        pages = model::add_field(&pages, "page-1", field_type, &catalog, &mut ids);
    }
    Canvas {
        pages,
        catalog,
        ids,
    }
}

fn gesture(item: &str, from: (&str, usize), to: Option<(&str, usize)>) -> DragEnd {
    DragEnd {
        source: DropLocation::new(from.0, from.1),
        destination: to.map(|(id, index)| DropLocation::new(id, index)),
        dragged_item_id: item.to_string(),
    }
}

fn order(page: &Page) -> Vec<&str> {
    page.fields.iter().map(|f| f.id.as_str()).collect()
}

#[test]
fn test_every_field_type_can_be_dropped() {
    let mut c = canvas();
    for (index, field_type) in FieldType::ALL.iter().enumerate() {
        let event = gesture(field_type.tag(), ("sidebar", index), Some(("page-2", index)));
        c.pages = resolve(&c.pages, &event, &c.catalog, &mut c.ids);
    }
    let types: Vec<FieldType> = c.pages[1].fields.iter().map(|f| f.field_type).collect();
    assert_eq!(types, FieldType::ALL.to_vec());
}

#[test]
fn test_sidebar_drop_appends_regardless_of_index() {
    let mut c = canvas();
    let event = gesture("email", ("sidebar", 9), Some(("page-1", 0)));
    let next = resolve(&c.pages, &event, &c.catalog, &mut c.ids);
    assert_eq!(
        order(&next[0]),
        vec!["field-1", "field-2", "field-3", "field-4"]
    );
    assert_eq!(next[0].fields[3].placeholder, "name@example.com");
}

#[test]
fn test_sidebar_is_never_consumed() {
    let mut c = canvas();
    let event = gesture("date", ("sidebar", 7), Some(("page-2", 0)));
    let once = resolve(&c.pages, &event, &c.catalog, &mut c.ids);
    let twice = resolve(&once, &event, &c.catalog, &mut c.ids);
    assert_eq!(order(&twice[1]), vec!["field-4", "field-5"]);
}

#[test]
fn test_same_page_reorders() {
    let mut c = canvas();
    let event = gesture("field-1", ("page-1", 0), Some(("page-1", 2)));
    let next = resolve(&c.pages, &event, &c.catalog, &mut c.ids);
    assert_eq!(order(&next[0]), vec!["field-2", "field-3", "field-1"]);

    let back = gesture("field-1", ("page-1", 2), Some(("page-1", 0)));
    let restored = resolve(&next, &back, &c.catalog, &mut c.ids);
    assert_eq!(restored, c.pages);
}

#[test]
fn test_cross_page_move_keeps_field() {
    let mut c = canvas();
    let event = gesture("field-2", ("page-1", 1), Some(("page-2", 0)));
    let next = resolve(&c.pages, &event, &c.catalog, &mut c.ids);
    assert_eq!(order(&next[0]), vec!["field-1", "field-3"]);
    assert_eq!(next[1].fields, vec![c.pages[0].fields[1].clone()]);
}

#[test]
fn test_ignored_gestures_leave_pages_equal() {
    let mut c = canvas();
    let cases = [
        (
            gesture("field-1", ("page-1", 0), None),
            IgnoreReason::NoDestination,
        ),
        (
            gesture("signature", ("sidebar", 0), Some(("page-1", 0))),
            IgnoreReason::UnknownFieldType("signature".to_string()),
        ),
        (
            gesture("text", ("sidebar", 0), Some(("sidebar", 1))),
            IgnoreReason::UnknownContainer("sidebar".to_string()),
        ),
        (
            gesture("field-1", ("page-1", 0), Some(("page-9", 0))),
            IgnoreReason::UnknownContainer("page-9".to_string()),
        ),
        (
            gesture("field-1", ("page-1", 5), Some(("page-2", 0))),
            IgnoreReason::SourceIndexOutOfRange {
                page_id: "page-1".to_string(),
                index: 5,
            },
        ),
        (
            gesture("field-1", ("page-1", 0), Some(("page-2", 1))),
            IgnoreReason::DestinationIndexOutOfRange {
                page_id: "page-2".to_string(),
                index: 1,
            },
        ),
    ];

    for (event, reason) in cases {
        assert_eq!(classify(&c.pages, &event), Resolution::Ignored(reason));
        assert_eq!(resolve(&c.pages, &event, &c.catalog, &mut c.ids), c.pages);
    }

    // Ignored sidebar drops do not consume ids
    let event = gesture("text", ("sidebar", 0), Some(("page-2", 0)));
    let next = resolve(&c.pages, &event, &c.catalog, &mut c.ids);
    assert_eq!(next[1].fields[0].id, "field-4");
}
