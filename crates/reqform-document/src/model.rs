//! Purchase request document types.
//!
//! Nested records sit behind `Arc` so an edit deep inside one item leaves
//! every sibling subtree shared with the previous snapshot. Lists of records
//! use [`List`]; lists of free-text lines use [`TextList`] and are edited
//! as whole values.

use reqform_state::{leaf_state, DateValue, LeafKind, List, State, TextList, TimeValue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How the request is procured. Decides which item collection is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcurementMode {
    /// Small value procurement with a flat item list.
    SmallValue,
    /// Small value procurement, lotted.
    SmallValueLot,
    /// Small value procurement, items inside lots.
    SmallValueInlot,
    /// Venue lease, items inside lots.
    LeaseVenueInlot,
    /// Venue lease, lotted.
    #[default]
    LeaseVenueLot,
}

/// Urgency of the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    /// Low.
    Low,
    /// Normal.
    Normal,
    /// Urgent.
    #[default]
    Urgent,
}

/// Requesting office section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficeSection {
    /// SOCD.
    #[default]
    Socd,
    /// CRASD.
    Crasd,
    /// ORD.
    Ord,
}

leaf_state!(
    ProcurementMode,
    LeafKind::Choice(&[
        "small_value",
        "small_value_lot",
        "small_value_inlot",
        "lease_venue_inlot",
        "lease_venue_lot",
    ])
);
leaf_state!(PriorityLevel, LeafKind::Choice(&["low", "normal", "urgent"]));
leaf_state!(OfficeSection, LeafKind::Choice(&["socd", "crasd", "ord"]));

/// Date and time window of the activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
pub struct Schedule {
    #[reqform(required)]
    pub date_start: Option<DateValue>,
    #[reqform(required)]
    pub date_end: Option<DateValue>,
    #[reqform(required)]
    pub time_start: TimeValue,
    #[reqform(required)]
    pub time_end: TimeValue,
}

/// The activity the purchase supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
pub struct Activity {
    #[reqform(required)]
    pub title: String,
    pub schedule: Arc<Schedule>,
    pub venue: String,
    #[reqform(required)]
    pub purpose: String,
}

/// A titled group of specification lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
pub struct NestedSpecification {
    pub title: String,
    pub specifications: TextList,
}

/// Specification lines of an item: loose lines plus titled groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
pub struct Specifications {
    pub single: TextList,
    pub nested: List<NestedSpecification>,
}

/// Item title and its subtitle lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
pub struct ItemDescription {
    pub title: String,
    pub descriptions: TextList,
}

/// A line item.
///
/// `totalCost` is derived from quantity and unit cost on every read. It is
/// never serialized and cannot be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(
    rename_all = "camelCase",
    computed(key = "totalCost", with = "total_cost", ty = "f64")
)]
pub struct NormalItem {
    #[reqform(id)]
    pub id: String,
    pub stock_property_no: String,
    pub unit: String,
    pub item_description: Arc<ItemDescription>,
    pub quantity: f64,
    pub unit_cost: f64,
    pub specifications: Arc<Specifications>,
}

/// A description block inside a lot, with its own items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
pub struct LotDescription {
    pub title: String,
    pub items: List<NormalItem>,
}

/// A lot of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
pub struct LotItem {
    #[reqform(id)]
    pub id: String,
    pub lot_title: String,
    /// Keyed `additionalInclustions` in stored documents.
    #[serde(rename = "additionalInclustions")]
    #[reqform(rename = "additionalInclustions")]
    pub additional_inclusions: TextList,
    pub lot_description: List<LotDescription>,
}

/// Where and when the purchase is delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
pub struct Delivery {
    #[reqform(required)]
    pub additional_instruction: String,
    #[reqform(required)]
    pub date: Option<DateValue>,
    #[reqform(required)]
    pub time: TimeValue,
    #[reqform(required)]
    pub location: String,
}

/// The purchase request document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, State)]
#[serde(rename_all = "camelCase", default)]
#[reqform(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub pr_number: String,
    #[reqform(required)]
    pub fund_cluster: String,
    #[reqform(required)]
    pub rcc: String,
    pub draft_date: Option<DateValue>,
    #[reqform(required)]
    pub procurement_mode: ProcurementMode,
    #[reqform(required)]
    pub priority_level: PriorityLevel,
    #[reqform(required)]
    pub charged_to: String,
    #[reqform(required)]
    pub pap_code: String,
    #[reqform(required)]
    pub office_section: OfficeSection,

    pub activity: Arc<Activity>,

    pub normal_item: List<NormalItem>,
    pub lot_item: List<LotItem>,

    pub delivery: Arc<Delivery>,

    pub notes: TextList,
    pub inclusions: TextList,
    pub room_accommodations: TextList,
    pub function_rooms: TextList,
    pub additional_requirements: TextList,

    pub requested_by: String,
    pub approved_by: String,
    pub inclusioned_by: String,
}
