//! Ordered collections with copy-on-write storage.
//!
//! [`List`] holds records behind `Arc`, so editing one element copies the
//! spine and that element and nothing else. [`TextList`] is a list of plain
//! strings edited as a single field (specification lines, inclusions).
//! Both expose the same [`ListNode`] commands to the untyped channel.

use crate::error::{Fault, StateResult, StepError};
use crate::node::{decode_leaf, Mismatch, Node};
use crate::shape::{LeafKind, Shape};
use crate::{Field, ListLens, Seg, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::ops::Index;
use std::sync::Arc;

/// Structural list operations, callable without knowing the element type.
///
/// Indices are validated by the caller; implementations may assume
/// `index < len()`.
pub trait ListNode {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the list has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a fresh default element.
    fn append_default(&mut self);

    /// Remove the element at `index`.
    fn remove_at(&mut self, index: usize);

    /// Insert a copy of the element at `index` directly after it.
    fn duplicate_at(&mut self, index: usize);

    /// Move the element at `from` so it ends up at `to`.
    fn move_item(&mut self, from: usize, to: usize);

    /// Rearrange so that position `i` holds the element previously at
    /// `order[i]`. `order` must be a permutation of `0..len()`.
    fn permute(&mut self, order: &[usize]);
}

/// An ordered list of records.
///
/// Cloning is O(1). Elements are shared between snapshots until edited.
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent, bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct List<T>(Arc<Vec<Arc<T>>>);

impl<T> List<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(Arc::new(Vec::new()))
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Arc<T>> {
        self.0.get(index)
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<T>> {
        self.0.iter()
    }

    /// Whether both lists share the same storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Append an element.
    pub fn push(&mut self, item: impl Into<Arc<T>>) {
        Arc::make_mut(&mut self.0).push(item.into());
    }

    fn elements_mut(&mut self) -> &mut Vec<Arc<T>> {
        Arc::make_mut(&mut self.0)
    }
}

impl<T: State> List<T> {
    /// Resolve `reordered` into positions of the current elements.
    ///
    /// Elements match by shared storage, then by stable id, then by value.
    /// Returns `None` unless `reordered` is a permutation of this list.
    pub fn positions_of(&self, reordered: &[Arc<T>]) -> Option<Vec<usize>> {
        if reordered.len() != self.len() {
            return None;
        }
        let mut taken = vec![false; self.len()];
        let mut order = Vec::with_capacity(self.len());
        for wanted in reordered {
            let found = self.find_unused(&taken, |cur| Arc::ptr_eq(cur, wanted))
                .or_else(|| match wanted.stable_id() {
                    Some(id) => self.find_unused(&taken, |cur| cur.stable_id() == Some(id)),
                    None => None,
                })
                .or_else(|| self.find_unused(&taken, |cur| **cur == **wanted))?;
            taken[found] = true;
            order.push(found);
        }
        Some(order)
    }

    fn find_unused(&self, taken: &[bool], matches: impl Fn(&Arc<T>) -> bool) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .position(|(i, cur)| !taken[i] && matches(cur))
    }
}

impl<T> Clone for List<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl<T> Index<usize> for List<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().map(Arc::new).collect()))
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a Arc<T>;
    type IntoIter = std::slice::Iter<'a, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: State + Default> ListNode for List<T> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn append_default(&mut self) {
        let mut item = T::default();
        item.reissue_ids();
        self.elements_mut().push(Arc::new(item));
    }

    fn remove_at(&mut self, index: usize) {
        self.elements_mut().remove(index);
    }

    fn duplicate_at(&mut self, index: usize) {
        let mut copy = T::clone(&self.0[index]);
        copy.reissue_ids();
        self.elements_mut().insert(index + 1, Arc::new(copy));
    }

    fn move_item(&mut self, from: usize, to: usize) {
        let items = self.elements_mut();
        let item = items.remove(from);
        items.insert(to, item);
    }

    fn permute(&mut self, order: &[usize]) {
        let next = order.iter().map(|&i| Arc::clone(&self.0[i])).collect();
        self.0 = Arc::new(next);
    }
}

impl<T: State + Default> Node for List<T> {
    fn child(&self, seg: &Seg) -> Result<&dyn Node, StepError> {
        match seg {
            Seg::Index(index) => self.0.get(*index).map(|item| item as &dyn Node).ok_or(
                StepError::OutOfBounds {
                    index: *index,
                    len: self.len(),
                },
            ),
            Seg::Key(key) => Err(Fault::ExpectedIndex(key.clone()).into()),
        }
    }

    fn child_mut(&mut self, seg: &Seg) -> Result<&mut dyn Node, StepError> {
        let len = self.len();
        match seg {
            Seg::Index(index) if *index < len => {
                Ok(&mut self.elements_mut()[*index] as &mut dyn Node)
            }
            Seg::Index(index) => Err(StepError::OutOfBounds { index: *index, len }),
            Seg::Key(key) => Err(Fault::ExpectedIndex(key.clone()).into()),
        }
    }

    fn to_value(&self) -> StateResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn assign(&mut self, value: Value) -> Result<(), Mismatch> {
        let mut next: Self = crate::node::decode_record(value, "list")?;
        if T::CARRIES_IDS {
            next.adopt_ids(self);
        }
        *self = next;
        Ok(())
    }

    fn as_list(&self) -> Option<&dyn ListNode> {
        Some(self)
    }

    fn as_list_mut(&mut self) -> Option<&mut dyn ListNode> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: State + Default> State for List<T> {
    type Lens = ListLens<T>;

    const CARRIES_IDS: bool = T::CARRIES_IDS;

    fn shape() -> Shape {
        Shape::List(Box::new(T::shape()))
    }

    fn reissue_ids(&mut self) {
        if T::CARRIES_IDS {
            for item in self.elements_mut().iter_mut() {
                Arc::make_mut(item).reissue_ids();
            }
        }
    }

    fn adopt_ids(&mut self, previous: &Self) {
        if !T::CARRIES_IDS || self.ptr_eq(previous) {
            return;
        }
        let mut claimed = vec![false; previous.len()];
        for (i, item) in self.elements_mut().iter_mut().enumerate() {
            // Elements without an id of their own line up by position.
            let matched = match item.stable_id() {
                Some(id) => previous
                    .iter()
                    .enumerate()
                    .position(|(j, old)| !claimed[j] && old.stable_id() == Some(id)),
                None => (i < previous.len() && !claimed[i]).then_some(i),
            };
            match matched {
                Some(j) => {
                    claimed[j] = true;
                    State::adopt_ids(item, &previous.0[j]);
                }
                None => State::reissue_ids(item),
            }
        }
    }
}

/// An ordered list of strings, addressed and written as one field.
///
/// Elements have no paths of their own; the list itself supports the
/// structural commands.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextList(Arc<Vec<String>>);

impl TextList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The lines as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Whether both lists share the same storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn lines_mut(&mut self) -> &mut Vec<String> {
        Arc::make_mut(&mut self.0)
    }
}

impl PartialEq for TextList {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl<S: Into<String>> FromIterator<S> for TextList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().map(Into::into).collect()))
    }
}

impl<S: Into<String>> From<Vec<S>> for TextList {
    fn from(lines: Vec<S>) -> Self {
        lines.into_iter().collect()
    }
}

impl Index<usize> for TextList {
    type Output = String;

    fn index(&self, index: usize) -> &String {
        &self.0[index]
    }
}

impl ListNode for TextList {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn append_default(&mut self) {
        self.lines_mut().push(String::new());
    }

    fn remove_at(&mut self, index: usize) {
        self.lines_mut().remove(index);
    }

    fn duplicate_at(&mut self, index: usize) {
        let copy = self.0[index].clone();
        self.lines_mut().insert(index + 1, copy);
    }

    fn move_item(&mut self, from: usize, to: usize) {
        let lines = self.lines_mut();
        let line = lines.remove(from);
        lines.insert(to, line);
    }

    fn permute(&mut self, order: &[usize]) {
        let next = order.iter().map(|&i| self.0[i].clone()).collect();
        self.0 = Arc::new(next);
    }
}

impl Node for TextList {
    fn child(&self, _seg: &Seg) -> Result<&dyn Node, StepError> {
        Err(Fault::Terminal.into())
    }

    fn child_mut(&mut self, _seg: &Seg) -> Result<&mut dyn Node, StepError> {
        Err(Fault::Terminal.into())
    }

    fn to_value(&self) -> StateResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn assign(&mut self, value: Value) -> Result<(), Mismatch> {
        *self = decode_leaf(value, LeafKind::TextList, |_| None)?;
        Ok(())
    }

    fn as_list(&self) -> Option<&dyn ListNode> {
        Some(self)
    }

    fn as_list_mut(&mut self) -> Option<&mut dyn ListNode> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl State for TextList {
    type Lens = Field<TextList>;

    fn shape() -> Shape {
        Shape::Leaf(LeafKind::TextList)
    }
}
