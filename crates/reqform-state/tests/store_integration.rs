//! Integration tests for Store: subscriptions, history and reset.
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use reqform_state::{path, Batch, Command, List, State, Store, StoreConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
struct Row {
    #[reqform(id)]
    id: String,
    label: String,
    qty: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
struct Owner {
    name: String,
    office: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
struct Sheet {
    title: String,
    owner: Arc<Owner>,
    rows: List<Row>,
    extras: List<Row>,
}

fn sheet() -> Sheet {
    let mut rows = List::new();
    for label in ["chairs", "tables"] {
        let mut row = Row {
            label: label.into(),
            qty: 1.0,
            ..Row::default()
        };
        row.reissue_ids();
        rows.push(row);
    }
    Sheet {
        title: "Venue".into(),
        owner: Arc::new(Owner {
            name: "Procurement".into(),
            office: "socd".into(),
        }),
        rows,
        extras: List::new(),
    }
}

fn counter() -> (Arc<AtomicUsize>, impl FnMut(&String) + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    (count, move |_: &String| {
        seen.fetch_add(1, Ordering::SeqCst);
    })
}

// ============================================================================
// Subscriptions
// ============================================================================

#[test]
fn test_leaf_subscription_fires_only_on_change() {
    let mut store = Store::new(sheet());
    let titles = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&titles);
    store.subscribe(
        |doc: &Sheet| doc.title.clone(),
        move |title: &String| sink.lock().unwrap().push(title.clone()),
    );

    store.set_value("rows.0.qty", json!(4)).unwrap();
    store.set_value("title", json!("Venue")).unwrap();
    store.set_value("title", json!("Training venue")).unwrap();
    store.set_value("title", json!("Training venue")).unwrap();

    assert_eq!(*titles.lock().unwrap(), ["Training venue"]);
    assert_eq!(store.revision(), 4);
}

#[test]
fn test_list_subscription_uses_shared_storage() {
    let mut store = Store::new(sheet());
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&hits);
    store.subscribe(
        |doc: &Sheet| doc.rows.clone(),
        move |_: &List<Row>| {
            seen.fetch_add(1, Ordering::SeqCst);
        },
    );

    store.set_value("owner.name", json!("Supply")).unwrap();
    store.append("extras").unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    store.set_value("rows.1.label", json!("folding tables")).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    store.move_item("rows", 0, 1).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_record_subscription_through_arc() {
    let mut store = Store::new(sheet());
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&hits);
    store.subscribe(
        |doc: &Sheet| Arc::clone(&doc.owner),
        move |owner: &Arc<Owner>| {
            assert_eq!(owner.office, "crasd");
            seen.fetch_add(1, Ordering::SeqCst);
        },
    );

    store.set_value("title", json!("Other")).unwrap();
    store.set_value("owner.office", json!("crasd")).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_tuple_selection() {
    let mut store = Store::new(sheet());
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&hits);
    store.subscribe(
        |doc: &Sheet| (doc.title.clone(), doc.rows.len()),
        move |_: &(String, usize)| {
            seen.fetch_add(1, Ordering::SeqCst);
        },
    );

    store.set_value("rows.0.label", json!("benches")).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    store.append("rows").unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_transaction_notifies_once() {
    let mut store = Store::new(sheet());
    let (count, on_change) = counter();
    store.subscribe(|doc: &Sheet| doc.title.clone(), on_change);

    let mut batch = Batch::new();
    batch
        .set(path!("title"), "First")
        .set(path!("title"), "Second")
        .append(path!("rows"));
    store.transact(batch).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(store.revision(), 1);
    assert_eq!(store.document().title, "Second");
    assert_eq!(store.document().rows.len(), 3);
}

#[test]
fn test_rejected_edit_notifies_nobody() {
    let mut store = Store::new(sheet());
    let (count, on_change) = counter();
    store.subscribe(|doc: &Sheet| doc.title.clone(), on_change);

    assert!(store.set_value("title", json!(["not", "text"])).is_err());
    assert!(store
        .transact([
            Command::set(path!("title"), "Changed"),
            Command::remove_at(path!("rows"), 5),
        ])
        .is_err());
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unsubscribe() {
    let mut store = Store::new(sheet());
    let (count, on_change) = counter();
    let id = store.subscribe(|doc: &Sheet| doc.title.clone(), on_change);

    store.set_value("title", json!("One")).unwrap();
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.set_value("title", json!("Two")).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_notify_on_subscribe() {
    let config: StoreConfig = serde_json::from_value(json!({"notify_on_subscribe": true})).unwrap();
    assert_eq!(config.history_limit, 64);

    let mut store = Store::with_config(sheet(), config);
    let (count, on_change) = counter();
    store.subscribe(|doc: &Sheet| doc.title.clone(), on_change);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Reset and history
// ============================================================================

#[test]
fn test_reset_restores_template() {
    let mut store = Store::new(sheet());
    store.set_value("title", json!("Changed")).unwrap();
    store.remove_at("rows", 0).unwrap();

    let (count, on_change) = counter();
    store.subscribe(|doc: &Sheet| doc.title.clone(), on_change);
    store.reset();

    assert!(Arc::ptr_eq(&store.document(), &store.template()));
    assert_eq!(store.document().title, "Venue");
    assert_eq!(store.document().rows.len(), 2);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(store.revision(), 3);
}

#[test]
fn test_reset_command_inside_transaction() {
    let mut store = Store::new(sheet());
    store.set_value("title", json!("Changed")).unwrap();
    store
        .transact([Command::Reset, Command::set(path!("owner", "name"), "Admin")])
        .unwrap();

    let doc = store.document();
    assert_eq!(doc.title, "Venue");
    assert_eq!(doc.owner.name, "Admin");
    assert!(doc.rows.ptr_eq(&store.template().rows));
}

#[test]
fn test_history_keeps_old_snapshots() {
    let mut store = Store::new(sheet());
    store.set_value("title", json!("Second")).unwrap();
    store.append("rows").unwrap();

    let labels: Vec<_> = store.history().map(|rev| (rev.number, rev.label)).collect();
    assert_eq!(labels, [(1, "set"), (2, "append")]);

    assert_eq!(store.snapshot_at(0).unwrap().title, "Venue");
    assert_eq!(store.snapshot_at(1).unwrap().title, "Second");
    assert_eq!(store.snapshot_at(1).unwrap().rows.len(), 2);
    assert_eq!(store.snapshot_at(2).unwrap().rows.len(), 3);
    assert!(store.snapshot_at(3).is_none());

    let last = store.history().last().unwrap();
    assert_eq!(last.path.as_ref().map(ToString::to_string).as_deref(), Some("rows"));
}

#[test]
fn test_history_limit() {
    let config = StoreConfig {
        history_limit: 2,
        ..StoreConfig::default()
    };
    let mut store = Store::with_config(sheet(), config);
    for n in 0..5 {
        store.set_value("rows.0.qty", json!(n)).unwrap();
    }

    let kept: Vec<u64> = store.history().map(|rev| rev.number).collect();
    assert_eq!(kept, [4, 5]);
    assert!(store.snapshot_at(1).is_none());
    assert_eq!(store.snapshot_at(5).unwrap().rows[0].qty, 4.0);

    store.clear_history();
    assert_eq!(store.history().count(), 0);
    assert_eq!(store.document().rows[0].qty, 4.0);
}

#[test]
fn test_history_disabled() {
    let config = StoreConfig {
        history_limit: 0,
        ..StoreConfig::default()
    };
    let mut store = Store::with_config(sheet(), config);
    store.set_value("title", json!("x")).unwrap();
    assert_eq!(store.history().count(), 0);
    assert_eq!(store.revision(), 1);
}

#[test]
fn test_readers_keep_their_snapshot() {
    let mut store = Store::new(sheet());
    let reader = store.document();

    store.set_value("rows.0.label", json!("stools")).unwrap();
    store.remove_at("rows", 1).unwrap();

    assert_eq!(reader.rows.len(), 2);
    assert_eq!(reader.rows[0].label, "chairs");
    assert_eq!(store.document().rows.len(), 1);
    assert!(format!("{store:?}").contains("revision: 2"));
}
