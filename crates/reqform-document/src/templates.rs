//! Default values for new documents and new list elements.
//!
//! Appending to a list creates the element's `Default`, so these impls are
//! the templates the form starts every new item, group and lot from.

use crate::model::{
    Activity, Delivery, LotDescription, LotItem, NestedSpecification, NormalItem,
    OfficeSection, PriorityLevel, ProcurementMode, PurchaseRequest, Schedule, Specifications,
};
use reqform_state::{new_id, List, TextList, TimeValue};
use std::sync::Arc;

/// Sample location used for the venue and the delivery.
pub const DEFAULT_LOCATION: &str = "Butuan City, Agusan del Norte";
/// Start of the default working window.
pub const DEFAULT_TIME_START: &str = "08:00 AM";
/// End of the default working window.
pub const DEFAULT_TIME_END: &str = "05:00 PM";

const GROUPED_SPECS: usize = 3;

impl Default for NestedSpecification {
    fn default() -> Self {
        Self {
            title: "Grouped Title".into(),
            specifications: TextList::from(vec!["Spec 1", "Spec 2"]),
        }
    }
}

impl Default for Specifications {
    fn default() -> Self {
        Self {
            single: TextList::from(vec!["Single Spec 1", "Single Spec 2"]),
            nested: (0..GROUPED_SPECS)
                .map(|_| NestedSpecification::default())
                .collect(),
        }
    }
}

impl Default for NormalItem {
    fn default() -> Self {
        Self {
            id: new_id(),
            stock_property_no: String::new(),
            unit: String::new(),
            item_description: Arc::default(),
            quantity: 0.0,
            unit_cost: 0.0,
            specifications: Arc::new(Specifications::default()),
        }
    }
}

impl Default for LotDescription {
    fn default() -> Self {
        Self {
            title: "This is a sample title for this item".into(),
            items: List::from(vec![NormalItem::default()]),
        }
    }
}

impl Default for LotItem {
    fn default() -> Self {
        Self {
            id: new_id(),
            lot_title: "Lot Title".into(),
            additional_inclusions: TextList::from(vec![
                "Additional Inclusion 1",
                "Additional Inclusion 2",
            ]),
            lot_description: List::from(vec![LotDescription::default()]),
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            date_start: None,
            date_end: None,
            time_start: TimeValue::clock(DEFAULT_TIME_START),
            time_end: TimeValue::clock(DEFAULT_TIME_END),
        }
    }
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            title: "This is a sample title for this procurement".into(),
            schedule: Arc::default(),
            venue: DEFAULT_LOCATION.into(),
            purpose: "This is a sample purpose for this procurement".into(),
        }
    }
}

impl Default for Delivery {
    fn default() -> Self {
        Self {
            additional_instruction: "10 days after the receipt of PO".into(),
            date: None,
            time: TimeValue::clock(DEFAULT_TIME_START),
            location: DEFAULT_LOCATION.into(),
        }
    }
}

impl Default for PurchaseRequest {
    fn default() -> Self {
        Self {
            pr_number: String::new(),
            fund_cluster: "FC".into(),
            rcc: "RCC".into(),
            draft_date: None,
            procurement_mode: ProcurementMode::default(),
            priority_level: PriorityLevel::default(),
            charged_to: String::new(),
            pap_code: String::new(),
            office_section: OfficeSection::default(),
            activity: Arc::default(),
            normal_item: List::new(),
            lot_item: List::from(vec![LotItem::default()]),
            delivery: Arc::default(),
            notes: TextList::new(),
            inclusions: TextList::new(),
            room_accommodations: TextList::new(),
            function_rooms: TextList::new(),
            additional_requirements: TextList::new(),
            requested_by: String::new(),
            approved_by: String::new(),
            inclusioned_by: String::new(),
        }
    }
}

/// A fresh document as the form opens it: sample activity text, default
/// times and locations, and one lot ready to fill in.
pub fn template() -> PurchaseRequest {
    PurchaseRequest::default()
}
