//! Path-addressed, copy-on-write document state.
//!
//! `reqform-state` keeps a form document as a tree of plain Rust values and
//! edits it the way a form does: by dotted path (`lotItem.0.lotTitle`), by
//! typed lens, or through list commands (append, remove, duplicate, move,
//! reorder). Every edit yields a new snapshot that shares all untouched
//! subtrees with the previous one.
//!
//! # Core Concepts
//!
//! - **Path**: dotted address of a value; numeric segments are list indices
//! - **Node / State**: traversal and schema traits, derived with `#[derive(State)]`
//! - **Lens**: compile-time checked path with a known value type
//! - **Command**: serializable edit for untyped callers
//! - **Store**: single-writer owner of the current snapshot, with subscriptions
//!
//! # Quick Start
//!
//! ```
//! use reqform_state::{path, List, State, Store};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, State)]
//! #[serde(rename_all = "camelCase")]
//! #[reqform(rename_all = "camelCase")]
//! struct Row {
//!     #[reqform(id)]
//!     id: String,
//!     label: String,
//! }
//!
//! #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, State)]
//! #[serde(rename_all = "camelCase")]
//! #[reqform(rename_all = "camelCase")]
//! struct Sheet {
//!     title: String,
//!     rows: List<Row>,
//! }
//!
//! let mut store = Store::new(Sheet::default());
//! store.set_value("title", json!("Supplies")).unwrap();
//! store.append("rows").unwrap();
//! store.set(&Sheet::lens().rows().at(0).label(), "Paper".to_string()).unwrap();
//!
//! let doc = store.document();
//! assert_eq!(doc.title, "Supplies");
//! assert_eq!(doc.rows[0].label, "Paper");
//! assert!(doc.rows[0].id.starts_with("item-"));
//! assert!(store.set_value(&path!("rows", 0, "id"), json!("forged")).is_err());
//! ```

extern crate self as reqform_state;

pub mod access;
mod batch;
mod command;
mod config;
mod error;
mod ids;
mod lens;
mod list;
mod node;
mod path;
mod required;
mod selection;
mod shape;
mod store;
mod value;

pub use access::{get_at, set_at, Selector};
pub use batch::Batch;
pub use command::{apply_command, apply_commands, Command};
pub use config::StoreConfig;
pub use error::{value_type_name, Fault, StateError, StateResult, StepError};
pub use ids::new_id;
pub use lens::{Field, Lens, ListLens, ReadOnly, Readable};
pub use list::{List, ListNode, TextList};
pub use node::{Mismatch, Node, State};
pub use path::{Path, Seg};
pub use required::missing_required;
pub use selection::Selection;
pub use shape::{Access, FieldShape, LeafKind, RecordShape, Shape};
pub use store::{Revision, Store, SubscriptionId};
pub use value::{DateValue, TimeValue};

#[doc(hidden)]
pub use lens::read_record;
#[doc(hidden)]
pub use node::{computed_value, decode_leaf, decode_record};

#[cfg(feature = "derive")]
pub use reqform_state_derive::State;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
