//! Choice codes: display labels and the item layout each procurement mode
//! selects.

use crate::model::{OfficeSection, PriorityLevel, ProcurementMode};
use serde::{Deserialize, Serialize};

/// Which item collection a procurement mode edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemLayout {
    /// Flat list under `normalItem`.
    Normal,
    /// Lots of descriptions of items under `lotItem`.
    Lot,
}

impl ItemLayout {
    /// Document key of the collection.
    pub fn collection_key(self) -> &'static str {
        match self {
            ItemLayout::Normal => "normalItem",
            ItemLayout::Lot => "lotItem",
        }
    }
}

impl ProcurementMode {
    /// Every mode, in the order the form lists them.
    pub const ALL: [ProcurementMode; 5] = [
        ProcurementMode::SmallValue,
        ProcurementMode::SmallValueLot,
        ProcurementMode::SmallValueInlot,
        ProcurementMode::LeaseVenueInlot,
        ProcurementMode::LeaseVenueLot,
    ];

    /// The item collection this mode edits.
    pub fn layout(self) -> ItemLayout {
        match self {
            ProcurementMode::SmallValue => ItemLayout::Normal,
            _ => ItemLayout::Lot,
        }
    }

    /// Stored code.
    pub fn code(self) -> &'static str {
        match self {
            ProcurementMode::SmallValue => "small_value",
            ProcurementMode::SmallValueLot => "small_value_lot",
            ProcurementMode::SmallValueInlot => "small_value_inlot",
            ProcurementMode::LeaseVenueInlot => "lease_venue_inlot",
            ProcurementMode::LeaseVenueLot => "lease_venue_lot",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            ProcurementMode::SmallValue => "Small Value",
            ProcurementMode::SmallValueLot => "Small Value Lot",
            ProcurementMode::SmallValueInlot => "Small Value inLot",
            ProcurementMode::LeaseVenueInlot => "Lease Venue inLot",
            ProcurementMode::LeaseVenueLot => "Lease Venue Lot",
        }
    }
}

impl PriorityLevel {
    /// Every level, lowest first.
    pub const ALL: [PriorityLevel; 3] = [PriorityLevel::Low, PriorityLevel::Normal, PriorityLevel::Urgent];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            PriorityLevel::Low => "Low",
            PriorityLevel::Normal => "Normal",
            PriorityLevel::Urgent => "Urgent",
        }
    }
}

impl OfficeSection {
    /// Every section.
    pub const ALL: [OfficeSection; 3] = [OfficeSection::Socd, OfficeSection::Crasd, OfficeSection::Ord];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            OfficeSection::Socd => "SOCD",
            OfficeSection::Crasd => "CRASD",
            OfficeSection::Ord => "ORD",
        }
    }
}
