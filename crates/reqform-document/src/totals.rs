//! Derived amounts.
//!
//! Nothing here is stored. Item totals are also readable at
//! `<item path>.totalCost`, which is computed through [`NormalItem::total_cost`].

use crate::mode::ItemLayout;
use crate::model::{LotDescription, LotItem, NormalItem, PurchaseRequest};

/// Total cost of one item: quantity times unit cost.
pub fn derive_total_cost(item: &NormalItem) -> f64 {
    item.quantity * item.unit_cost
}

impl NormalItem {
    /// Total cost of this item.
    pub fn total_cost(&self) -> f64 {
        derive_total_cost(self)
    }
}

impl LotDescription {
    /// Sum of the item totals under this description.
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.total_cost()).sum()
    }
}

impl LotItem {
    /// Sum over every description in the lot.
    pub fn total(&self) -> f64 {
        self.lot_description.iter().map(|d| d.total()).sum()
    }
}

impl PurchaseRequest {
    /// The item layout selected by the procurement mode.
    pub fn layout(&self) -> ItemLayout {
        self.procurement_mode.layout()
    }

    /// Sum of the active item collection. The inactive one is ignored even
    /// if it holds items.
    pub fn grand_total(&self) -> f64 {
        match self.layout() {
            ItemLayout::Normal => self.normal_item.iter().map(|item| item.total_cost()).sum(),
            ItemLayout::Lot => self.lot_item.iter().map(|lot| lot.total()).sum(),
        }
    }
}
