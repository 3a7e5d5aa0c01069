//! Integration tests for State derive macro.
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use reqform_state::{
    new_id, path, Access, DateValue, Lens, List, Readable, Shape, State, StateError, Store,
    TextList, TimeValue,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(
    rename_all = "camelCase",
    computed(key = "lineTotal", with = "line_total", ty = "f64")
)]
struct Line {
    #[reqform(id)]
    id: String,
    #[reqform(required)]
    label: String,
    quantity: f64,
    unit_price: f64,
    notes: TextList,
}

impl Line {
    fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
struct Section {
    #[reqform(id)]
    id: String,
    heading: String,
    lines: List<Line>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
struct Header {
    #[reqform(required)]
    title: String,
    due: Option<DateValue>,
    start: TimeValue,
    urgent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, State)]
#[serde(default)]
struct Order {
    header: Arc<Header>,
    sections: List<Section>,
    #[serde(rename = "ref")]
    #[reqform(rename = "ref")]
    reference: String,
}

fn line(label: &str, quantity: f64, unit_price: f64) -> Line {
    Line {
        id: new_id(),
        label: label.into(),
        quantity,
        unit_price,
        notes: TextList::from(vec!["first note"]),
    }
}

fn order() -> Order {
    Order {
        header: Arc::new(Header {
            title: "Quarterly supplies".into(),
            due: None,
            start: TimeValue::clock("08:00 AM"),
            urgent: false,
        }),
        sections: List::from(vec![Section {
            id: new_id(),
            heading: "Office".into(),
            lines: List::from(vec![line("pens", 10.0, 2.5), line("paper", 2.0, 4.0)]),
        }]),
        reference: "PR-1".into(),
    }
}

// ============================================================================
// Shape
// ============================================================================

#[test]
fn test_shape_lists_every_path() {
    assert_eq!(
        Order::shape().paths(),
        vec![
            "header",
            "header.title",
            "header.due",
            "header.start",
            "header.urgent",
            "sections",
            "sections.*.id",
            "sections.*.heading",
            "sections.*.lines",
            "sections.*.lines.*.id",
            "sections.*.lines.*.label",
            "sections.*.lines.*.quantity",
            "sections.*.lines.*.unitPrice",
            "sections.*.lines.*.notes",
            "sections.*.lines.*.lineTotal",
            "ref",
        ]
    );
    assert_eq!(
        Order::shape().required_paths(),
        vec!["header.title", "sections.*.lines.*.label"]
    );
}

#[test]
fn test_shape_access_policies() {
    let shape = Order::shape();
    assert_eq!(
        shape.access(&path!("sections", 0, "lines", 1, "lineTotal")).unwrap(),
        Access::Derived
    );
    assert_eq!(shape.access(&path!("sections", 0, "id")).unwrap(), Access::Identity);
    assert!(matches!(
        shape.resolve(&path!("header", "start")).unwrap(),
        Shape::Leaf(_)
    ));
}

#[test]
fn test_carries_ids() {
    assert!(Order::CARRIES_IDS);
    assert!(Line::CARRIES_IDS);
    assert!(!Header::CARRIES_IDS);
}

// ============================================================================
// Lenses
// ============================================================================

#[test]
fn test_lens_paths_use_keys() {
    let lens = Order::lens().sections().at(0).lines().at(1).unit_price();
    assert_eq!(lens.path().to_string(), "sections.0.lines.1.unitPrice");
    assert_eq!(Order::lens().reference().path().to_string(), "ref");
}

#[test]
fn test_lens_reads_typed_values() {
    let doc = order();
    let root = Order::lens();

    assert_eq!(root.header().title().get(&doc).unwrap(), "Quarterly supplies");
    assert_eq!(root.header().start().get(&doc).unwrap(), TimeValue::clock("08:00 AM"));
    assert_eq!(root.sections().at(0).lines().at(0).line_total().get(&doc).unwrap(), 25.0);

    let header = root.header().get(&doc).unwrap();
    assert!(Arc::ptr_eq(&header, &doc.header));

    let lines = root.sections().at(0).lines().get(&doc).unwrap();
    assert!(lines.ptr_eq(&doc.sections[0].lines));
}

#[test]
fn test_record_lens_at_root_wraps_owned_value() {
    let doc = order();
    let whole = Order::lens().get(&doc).unwrap();
    assert_eq!(*whole, doc);
}

#[test]
fn test_lens_write_through_store() {
    let mut store = Store::new(order());
    let price = Order::lens().sections().at(0).lines().at(1).unit_price();

    store.set(&price, 5.0).unwrap();
    assert_eq!(store.read(&price).unwrap(), 5.0);
    assert_eq!(
        store.get("sections.0.lines.1.lineTotal").unwrap(),
        json!(10.0)
    );
}

// ============================================================================
// Identity and derived fields
// ============================================================================

#[test]
fn test_identity_and_derived_fields_are_read_only() {
    let mut store = Store::new(order());
    for path in ["sections.0.id", "sections.0.lines.0.id", "sections.0.lines.0.lineTotal"] {
        let err = store.set_value(path, json!("x")).unwrap_err();
        assert!(
            matches!(err, StateError::ReadOnly { .. }),
            "{path} should be read-only, got {err}"
        );
    }
    assert_eq!(store.revision(), 0);
}

#[test]
fn test_assigning_a_record_keeps_its_id() {
    let mut store = Store::new(order());
    let before = store.document().sections[0].lines[0].id.clone();

    store
        .set_value(
            "sections.0.lines.0",
            json!({"id": "forged", "label": "markers", "quantity": 3, "unitPrice": 1.5}),
        )
        .unwrap();

    let doc = store.document();
    let line = &doc.sections[0].lines[0];
    assert_eq!(line.id, before);
    assert_eq!(line.label, "markers");
    assert_eq!(line.line_total(), 4.5);
    assert!(line.notes.is_empty());
}

#[test]
fn test_derived_value_is_not_serialized() {
    let value = serde_json::to_value(&order()).unwrap();
    let line = &value["sections"][0]["lines"][0];
    assert!(line.get("lineTotal").is_none());
    assert_eq!(line["unitPrice"], json!(2.5));
    assert_eq!(value["ref"], json!("PR-1"));
}

#[test]
fn test_duplicate_reissues_ids_deeply() {
    let mut store = Store::new(order());
    store.duplicate_at("sections", 0).unwrap();

    let doc = store.document();
    let (original, copy) = (&doc.sections[0], &doc.sections[1]);
    assert_ne!(original.id, copy.id);
    assert_eq!(original.heading, copy.heading);
    for (a, b) in original.lines.iter().zip(copy.lines.iter()) {
        assert_ne!(a.id, b.id);
        assert_eq!(a.label, b.label);
        assert_eq!(a.notes, b.notes);
    }
}

#[test]
fn test_append_creates_default_with_fresh_id() {
    let mut store = Store::new(order());
    store.append(&Order::lens().sections().at(0).lines()).unwrap();

    let doc = store.document();
    let added = &doc.sections[0].lines[2];
    assert!(added.id.starts_with("item-"));
    assert_eq!(added.label, "");
    assert_eq!(added.line_total(), 0.0);
}

// ============================================================================
// Structural sharing
// ============================================================================

#[test]
fn test_edit_shares_untouched_subtrees() {
    let mut store = Store::new(order());
    let before = store.document();

    store.set_value("sections.0.lines.1.label", json!("card stock")).unwrap();
    let after = store.document();

    assert!(Arc::ptr_eq(&before.header, &after.header));
    assert!(!before.sections.ptr_eq(&after.sections));
    assert!(Arc::ptr_eq(
        before.sections[0].lines.get(0).unwrap(),
        after.sections[0].lines.get(0).unwrap()
    ));
    assert_eq!(before.sections[0].lines[1].label, "paper");
    assert_eq!(after.sections[0].lines[1].label, "card stock");
}

#[test]
fn test_missing_required_walks_lists() {
    let mut doc = order();
    Arc::make_mut(&mut doc.header).title = "  ".into();
    let mut store = Store::new(doc);
    store.append("sections.0.lines").unwrap();

    let missing: Vec<String> = store
        .missing_required()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(missing, ["header.title", "sections.0.lines.2.label"]);
}
