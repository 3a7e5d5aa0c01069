//! Typed edit helpers for the purchase request form.
//!
//! Each helper resolves a lens and delegates to the store's generic
//! commands, so every edit is validated, logged and committed the same way
//! as a raw path edit.

use crate::mode::ItemLayout;
use crate::model::{LotItemLens, NormalItem, NormalItemLens, ProcurementMode, PurchaseRequest};
use crate::text::lines_to_list;
use reqform_state::{Field, Lens, ListLens, State, StateError, StateResult, Store, TextList};
use std::sync::Arc;
use tracing::debug;

/// Which item list an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemScope {
    /// `normalItem`.
    Normal,
    /// `lotItem.<lot>.lotDescription.<description>.items`.
    Lot {
        /// Lot index.
        lot: usize,
        /// Description index inside the lot.
        description: usize,
    },
}

impl ItemScope {
    /// Lens onto the item list.
    pub fn items(self) -> ListLens<NormalItem> {
        let root = PurchaseRequest::lens();
        match self {
            ItemScope::Normal => root.normal_item(),
            ItemScope::Lot { lot, description } => root
                .lot_item()
                .at(lot)
                .lot_description()
                .at(description)
                .items(),
        }
    }

    /// Lens onto one item.
    pub fn item(self, index: usize) -> NormalItemLens {
        self.items().at(index)
    }
}

/// Line-level edits on string-list fields.
///
/// String lists have no per-line paths; these read the list, change one
/// line and write the whole list back.
pub trait LineEdits {
    /// Replace the line at `index`.
    fn set_line(
        &mut self,
        list: &Field<TextList>,
        index: usize,
        value: impl Into<String>,
    ) -> StateResult<()>;

    /// Replace the whole list with the non-blank lines of `text`.
    fn set_lines_from_text(&mut self, list: &Field<TextList>, text: &str) -> StateResult<()>;
}

impl<R: State> LineEdits for Store<R> {
    fn set_line(
        &mut self,
        list: &Field<TextList>,
        index: usize,
        value: impl Into<String>,
    ) -> StateResult<()> {
        let current = self.read(list)?;
        if index >= current.len() {
            return Err(StateError::index_out_of_bounds(
                list.path().clone(),
                index as i64,
                current.len(),
            ));
        }
        let mut lines = current.as_slice().to_vec();
        lines[index] = value.into();
        self.set(list, TextList::from(lines))
    }

    fn set_lines_from_text(&mut self, list: &Field<TextList>, text: &str) -> StateResult<()> {
        self.set(list, lines_to_list(text))
    }
}

/// The form's item, specification and lot actions.
pub trait DocumentEdits {
    /// Switch procurement mode. The inactive collection is kept as is.
    fn set_procurement_mode(&mut self, mode: ProcurementMode) -> StateResult<()>;

    /// Append a new item.
    fn add_item(&mut self, scope: ItemScope) -> StateResult<()>;
    /// Remove an item.
    fn delete_item(&mut self, scope: ItemScope, index: usize) -> StateResult<()>;
    /// Insert a copy of an item after it, with a fresh id.
    fn duplicate_item(&mut self, scope: ItemScope, index: usize) -> StateResult<()>;
    /// Move an item from one position to another.
    fn move_item_in(&mut self, scope: ItemScope, from: usize, to: usize) -> StateResult<()>;
    /// Replace the item list with a rearrangement of the same items.
    fn reorder_items(&mut self, scope: ItemScope, items: Vec<Arc<NormalItem>>) -> StateResult<()>;

    /// Append an empty single specification line.
    fn add_single_spec(&mut self, scope: ItemScope, item: usize) -> StateResult<()>;
    /// Remove a single specification line.
    fn remove_single_spec(&mut self, scope: ItemScope, item: usize, spec: usize) -> StateResult<()>;
    /// Rewrite a single specification line.
    fn update_single_spec(
        &mut self,
        scope: ItemScope,
        item: usize,
        spec: usize,
        value: &str,
    ) -> StateResult<()>;

    /// Append a specification group from the template.
    fn add_nested_spec(&mut self, scope: ItemScope, item: usize) -> StateResult<()>;
    /// Insert a copy of a specification group after it.
    fn duplicate_nested_spec(&mut self, scope: ItemScope, item: usize, group: usize) -> StateResult<()>;
    /// Remove a specification group.
    fn remove_nested_spec(&mut self, scope: ItemScope, item: usize, group: usize) -> StateResult<()>;
    /// Rename a specification group.
    fn update_nested_spec_title(
        &mut self,
        scope: ItemScope,
        item: usize,
        group: usize,
        title: &str,
    ) -> StateResult<()>;
    /// Append an empty line to a specification group.
    fn add_nested_spec_line(&mut self, scope: ItemScope, item: usize, group: usize) -> StateResult<()>;
    /// Remove a line from a specification group.
    fn remove_nested_spec_line(
        &mut self,
        scope: ItemScope,
        item: usize,
        group: usize,
        line: usize,
    ) -> StateResult<()>;
    /// Rewrite a line of a specification group.
    fn update_nested_spec_line(
        &mut self,
        scope: ItemScope,
        item: usize,
        group: usize,
        line: usize,
        value: &str,
    ) -> StateResult<()>;

    /// Append an empty subtitle to the item description.
    fn add_subtitle(&mut self, scope: ItemScope, item: usize) -> StateResult<()>;
    /// Remove a subtitle.
    fn remove_subtitle(&mut self, scope: ItemScope, item: usize, subtitle: usize) -> StateResult<()>;
    /// Rewrite a subtitle.
    fn update_subtitle(
        &mut self,
        scope: ItemScope,
        item: usize,
        subtitle: usize,
        value: &str,
    ) -> StateResult<()>;

    /// Append a lot from the template.
    fn add_lot(&mut self) -> StateResult<()>;
    /// Insert a copy of a lot after it. The copy and its items get fresh ids.
    fn duplicate_lot(&mut self, lot: usize) -> StateResult<()>;
    /// Remove a lot.
    fn remove_lot(&mut self, lot: usize) -> StateResult<()>;
    /// Append a description, with one new item, to a lot.
    fn add_lot_description(&mut self, lot: usize) -> StateResult<()>;
    /// Insert a copy of a description after it, with fresh item ids.
    fn duplicate_lot_description(&mut self, lot: usize, description: usize) -> StateResult<()>;
    /// Remove a description from a lot.
    fn remove_lot_description(&mut self, lot: usize, description: usize) -> StateResult<()>;
}

fn lot(index: usize) -> LotItemLens {
    PurchaseRequest::lens().lot_item().at(index)
}

impl DocumentEdits for Store<PurchaseRequest> {
    fn set_procurement_mode(&mut self, mode: ProcurementMode) -> StateResult<()> {
        let before: ItemLayout = self.document().layout();
        self.set(&PurchaseRequest::lens().procurement_mode(), mode)?;
        if before != mode.layout() {
            debug!(
                mode = mode.code(),
                collection = mode.layout().collection_key(),
                "item layout switched"
            );
        }
        Ok(())
    }

    fn add_item(&mut self, scope: ItemScope) -> StateResult<()> {
        self.append(&scope.items())
    }

    fn delete_item(&mut self, scope: ItemScope, index: usize) -> StateResult<()> {
        self.remove_at(&scope.items(), index)
    }

    fn duplicate_item(&mut self, scope: ItemScope, index: usize) -> StateResult<()> {
        self.duplicate_at(&scope.items(), index)
    }

    fn move_item_in(&mut self, scope: ItemScope, from: usize, to: usize) -> StateResult<()> {
        self.move_item(&scope.items(), from, to)
    }

    fn reorder_items(&mut self, scope: ItemScope, items: Vec<Arc<NormalItem>>) -> StateResult<()> {
        self.reorder(&scope.items(), items)
    }

    fn add_single_spec(&mut self, scope: ItemScope, item: usize) -> StateResult<()> {
        self.append(&scope.item(item).specifications().single())
    }

    fn remove_single_spec(&mut self, scope: ItemScope, item: usize, spec: usize) -> StateResult<()> {
        self.remove_at(&scope.item(item).specifications().single(), spec)
    }

    fn update_single_spec(
        &mut self,
        scope: ItemScope,
        item: usize,
        spec: usize,
        value: &str,
    ) -> StateResult<()> {
        self.set_line(&scope.item(item).specifications().single(), spec, value)
    }

    fn add_nested_spec(&mut self, scope: ItemScope, item: usize) -> StateResult<()> {
        self.append(&scope.item(item).specifications().nested())
    }

    fn duplicate_nested_spec(&mut self, scope: ItemScope, item: usize, group: usize) -> StateResult<()> {
        self.duplicate_at(&scope.item(item).specifications().nested(), group)
    }

    fn remove_nested_spec(&mut self, scope: ItemScope, item: usize, group: usize) -> StateResult<()> {
        self.remove_at(&scope.item(item).specifications().nested(), group)
    }

    fn update_nested_spec_title(
        &mut self,
        scope: ItemScope,
        item: usize,
        group: usize,
        title: &str,
    ) -> StateResult<()> {
        let lens = scope.item(item).specifications().nested().at(group).title();
        self.set(&lens, title.to_string())
    }

    fn add_nested_spec_line(&mut self, scope: ItemScope, item: usize, group: usize) -> StateResult<()> {
        self.append(&scope.item(item).specifications().nested().at(group).specifications())
    }

    fn remove_nested_spec_line(
        &mut self,
        scope: ItemScope,
        item: usize,
        group: usize,
        line: usize,
    ) -> StateResult<()> {
        let lens = scope.item(item).specifications().nested().at(group).specifications();
        self.remove_at(&lens, line)
    }

    fn update_nested_spec_line(
        &mut self,
        scope: ItemScope,
        item: usize,
        group: usize,
        line: usize,
        value: &str,
    ) -> StateResult<()> {
        let lens = scope.item(item).specifications().nested().at(group).specifications();
        self.set_line(&lens, line, value)
    }

    fn add_subtitle(&mut self, scope: ItemScope, item: usize) -> StateResult<()> {
        self.append(&scope.item(item).item_description().descriptions())
    }

    fn remove_subtitle(&mut self, scope: ItemScope, item: usize, subtitle: usize) -> StateResult<()> {
        self.remove_at(&scope.item(item).item_description().descriptions(), subtitle)
    }

    fn update_subtitle(
        &mut self,
        scope: ItemScope,
        item: usize,
        subtitle: usize,
        value: &str,
    ) -> StateResult<()> {
        self.set_line(&scope.item(item).item_description().descriptions(), subtitle, value)
    }

    fn add_lot(&mut self) -> StateResult<()> {
        self.append(&PurchaseRequest::lens().lot_item())
    }

    fn duplicate_lot(&mut self, lot: usize) -> StateResult<()> {
        self.duplicate_at(&PurchaseRequest::lens().lot_item(), lot)
    }

    fn remove_lot(&mut self, lot: usize) -> StateResult<()> {
        self.remove_at(&PurchaseRequest::lens().lot_item(), lot)
    }

    fn add_lot_description(&mut self, index: usize) -> StateResult<()> {
        self.append(&lot(index).lot_description())
    }

    fn duplicate_lot_description(&mut self, index: usize, description: usize) -> StateResult<()> {
        self.duplicate_at(&lot(index).lot_description(), description)
    }

    fn remove_lot_description(&mut self, index: usize, description: usize) -> StateResult<()> {
        self.remove_at(&lot(index).lot_description(), description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::template;

    fn store() -> Store<PurchaseRequest> {
        Store::new(template())
    }

    #[test]
    fn test_scope_paths() {
        assert_eq!(ItemScope::Normal.items().path().to_string(), "normalItem");
        let scope = ItemScope::Lot {
            lot: 1,
            description: 2,
        };
        assert_eq!(
            scope.item(3).unit_cost().path().to_string(),
            "lotItem.1.lotDescription.2.items.3.unitCost"
        );
    }

    #[test]
    fn test_single_spec_lines() {
        let mut store = store();
        let scope = ItemScope::Normal;
        store.add_item(scope).unwrap();

        store.update_single_spec(scope, 0, 1, "Ergonomic").unwrap();
        store.add_single_spec(scope, 0).unwrap();
        store.remove_single_spec(scope, 0, 0).unwrap();

        let doc = store.document();
        assert_eq!(
            doc.normal_item[0].specifications.single.as_slice(),
            ["Ergonomic", ""]
        );
        assert!(matches!(
            store.update_single_spec(scope, 0, 5, "x").unwrap_err(),
            StateError::IndexOutOfBounds { index: 5, len: 2, .. }
        ));
    }

    #[test]
    fn test_nested_spec_groups() {
        let mut store = store();
        let scope = ItemScope::Lot {
            lot: 0,
            description: 0,
        };

        store.update_nested_spec_title(scope, 0, 0, "Frame").unwrap();
        store.duplicate_nested_spec(scope, 0, 0).unwrap();
        store.add_nested_spec_line(scope, 0, 1).unwrap();
        store.update_nested_spec_line(scope, 0, 1, 2, "Steel").unwrap();
        store.remove_nested_spec_line(scope, 0, 1, 0).unwrap();
        store.remove_nested_spec(scope, 0, 3).unwrap();
        store.add_nested_spec(scope, 0).unwrap();

        let doc = store.document();
        let groups = &doc.lot_item[0].lot_description[0].items[0].specifications.nested;
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].title, "Frame");
        assert_eq!(groups[1].title, "Frame");
        assert_eq!(groups[1].specifications.as_slice(), ["Spec 2", "Steel"]);
        assert_eq!(groups[0].specifications.as_slice(), ["Spec 1", "Spec 2"]);
        assert_eq!(groups[3].title, "Grouped Title");
    }

    #[test]
    fn test_subtitles() {
        let mut store = store();
        let scope = ItemScope::Lot {
            lot: 0,
            description: 0,
        };
        store.add_subtitle(scope, 0).unwrap();
        store.add_subtitle(scope, 0).unwrap();
        store.update_subtitle(scope, 0, 1, "Color: black").unwrap();
        store.remove_subtitle(scope, 0, 0).unwrap();

        let doc = store.document();
        let description = &doc.lot_item[0].lot_description[0].items[0].item_description;
        assert_eq!(description.descriptions.as_slice(), ["Color: black"]);
    }

    #[test]
    fn test_lot_actions_reissue_ids() {
        let mut store = store();
        store.add_lot_description(0).unwrap();
        store.duplicate_lot(0).unwrap();
        store.duplicate_lot_description(1, 0).unwrap();
        store.remove_lot_description(1, 2).unwrap();

        let doc = store.document();
        let (first, copy) = (&doc.lot_item[0], &doc.lot_item[1]);
        assert_ne!(first.id, copy.id);
        assert_eq!(first.lot_description.len(), 2);
        assert_eq!(copy.lot_description.len(), 2);
        assert_ne!(
            first.lot_description[0].items[0].id,
            copy.lot_description[0].items[0].id
        );
        assert_ne!(
            copy.lot_description[0].items[0].id,
            copy.lot_description[1].items[0].id
        );

        store.remove_lot(0).unwrap();
        store.add_lot().unwrap();
        assert_eq!(store.document().lot_item.len(), 2);
    }

    #[test]
    fn test_mode_switch_keeps_collections() {
        let mut store = store();
        store.set_procurement_mode(ProcurementMode::SmallValue).unwrap();
        store.add_item(ItemScope::Normal).unwrap();

        let doc = store.document();
        assert_eq!(doc.layout(), ItemLayout::Normal);
        assert_eq!(doc.lot_item.len(), 1);
        assert_eq!(doc.normal_item.len(), 1);
    }

    #[test]
    fn test_lines_from_text() {
        let mut store = store();
        let notes = PurchaseRequest::lens().notes();
        store.set_lines_from_text(&notes, "Bring IDs\n\n  Arrive early ").unwrap();
        assert_eq!(store.document().notes.as_slice(), ["Bring IDs", "Arrive early"]);
    }

    #[test]
    fn test_item_moves() {
        let mut store = store();
        let scope = ItemScope::Normal;
        for _ in 0..3 {
            store.add_item(scope).unwrap();
        }
        let ids: Vec<String> = store.document().normal_item.iter().map(|i| i.id.clone()).collect();

        store.move_item_in(scope, 0, 2).unwrap();
        let moved: Vec<String> = store.document().normal_item.iter().map(|i| i.id.clone()).collect();
        assert_eq!(moved, [ids[1].clone(), ids[2].clone(), ids[0].clone()]);

        store.duplicate_item(scope, 1).unwrap();
        store.delete_item(scope, 2).unwrap();
        let after: Vec<String> = store.document().normal_item.iter().map(|i| i.id.clone()).collect();
        assert_eq!(after, moved);
    }
}
