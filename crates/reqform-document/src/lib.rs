//! Purchase request document for procurement forms.
//!
//! Binds the purchase request schema to `reqform-state`: every field is
//! addressable by its camelCase path (`lotItem.0.lotDescription.0.items.0.unitCost`)
//! or by typed lens, item totals are derived on read, and new items, groups
//! and lots start from the form's templates.
//!
//! # Quick Start
//!
//! ```
//! use reqform_document::{new_store, DocumentEdits, ItemScope};
//! use serde_json::json;
//!
//! let mut store = new_store();
//! let scope = ItemScope::Lot { lot: 0, description: 0 };
//!
//! store.set_value("lotItem.0.lotDescription.0.items.0.quantity", json!(2)).unwrap();
//! store.set(&scope.item(0).unit_cost(), 150.0).unwrap();
//! store.duplicate_item(scope, 0).unwrap();
//!
//! assert_eq!(
//!     store.get("lotItem.0.lotDescription.0.items.1.totalCost").unwrap(),
//!     json!(300.0)
//! );
//! assert_eq!(store.document().grand_total(), 600.0);
//! assert!(store.set_value("lotItem.0.lotDescription.0.items.0.totalCost", json!(1)).is_err());
//! ```

mod edits;
mod mode;
mod model;
mod templates;
pub mod text;
mod totals;

pub use edits::{DocumentEdits, ItemScope, LineEdits};
pub use mode::ItemLayout;
pub use model::{
    Activity, ActivityLens, Delivery, DeliveryLens, ItemDescription, ItemDescriptionLens,
    LotDescription, LotDescriptionLens, LotItem, LotItemLens, NestedSpecification,
    NestedSpecificationLens, NormalItem, NormalItemLens, OfficeSection, PriorityLevel,
    ProcurementMode, PurchaseRequest, PurchaseRequestLens, Schedule, ScheduleLens,
    Specifications, SpecificationsLens,
};
pub use templates::{template, DEFAULT_LOCATION, DEFAULT_TIME_END, DEFAULT_TIME_START};
pub use totals::derive_total_cost;

pub use reqform_state::{missing_required, Command, StateError, StateResult, StoreConfig};

/// Store holding one purchase request.
pub type DocumentStore = reqform_state::Store<PurchaseRequest>;

/// A store opened on the document template.
pub fn new_store() -> DocumentStore {
    DocumentStore::new(template())
}

/// A store opened on the document template with explicit options.
pub fn new_store_with(config: StoreConfig) -> DocumentStore {
    DocumentStore::with_config(template(), config)
}
