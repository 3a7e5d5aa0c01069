//! Nested access by path.
//!
//! Reads walk the tree by reference. Writes walk it with
//! [`Node::child_mut`], which copies every shared node on the way down, so
//! a write on a draft leaves the snapshot it was cloned from intact while
//! everything off the path stays shared.

use crate::error::{Fault, StateError, StateResult};
use crate::lens::Lens;
use crate::list::ListNode;
use crate::node::{Node, State};
use crate::{Path, Seg};
use serde_json::Value;
use std::sync::Arc;

/// Anything that names a position in a document: a dotted string, a
/// [`Path`], or a typed lens.
pub trait Selector {
    /// Resolve to a path.
    fn to_path(&self) -> StateResult<Path>;
}

impl Selector for str {
    fn to_path(&self) -> StateResult<Path> {
        Path::parse(self)
    }
}

impl Selector for String {
    fn to_path(&self) -> StateResult<Path> {
        Path::parse(self)
    }
}

impl Selector for Path {
    fn to_path(&self) -> StateResult<Path> {
        Ok(self.clone())
    }
}

impl<L: Lens> Selector for L {
    fn to_path(&self) -> StateResult<Path> {
        Ok(self.path().clone())
    }
}

/// Resolve the node at `path`.
pub fn node_at<'a>(root: &'a dyn Node, path: &Path) -> StateResult<&'a dyn Node> {
    let mut current = root;
    for (i, seg) in path.iter().enumerate() {
        current = current
            .child(seg)
            .map_err(|step| StateError::from_step(step, path.prefix(i + 1)))?;
    }
    Ok(current)
}

/// Resolve the node at `path` for writing, copying shared nodes on the way.
pub fn node_at_mut<'a>(root: &'a mut dyn Node, path: &Path) -> StateResult<&'a mut dyn Node> {
    let mut current = root;
    for (i, seg) in path.iter().enumerate() {
        current = current
            .child_mut(seg)
            .map_err(|step| StateError::from_step(step, path.prefix(i + 1)))?;
    }
    Ok(current)
}

/// Read the value at `path` as JSON.
///
/// A final segment naming a derived field is computed from its record.
///
/// ```
/// use reqform_state::access::get_at;
/// use reqform_state::path;
///
/// let title = String::from("Office supplies");
/// assert_eq!(get_at(&title, &path!()).unwrap(), "Office supplies");
/// assert!(get_at(&title, &path!("len")).is_err());
/// ```
pub fn get_at(root: &dyn Node, path: &Path) -> StateResult<Value> {
    let Some(parent) = path.parent() else {
        return root.to_value();
    };
    let holder = node_at(root, &parent)?;
    let Some(last) = path.last() else {
        return holder.to_value();
    };
    if let Seg::Key(key) = last {
        if let Some(derived) = holder.computed(key) {
            return derived;
        }
    }
    holder
        .child(last)
        .map_err(|step| StateError::from_step(step, path.clone()))?
        .to_value()
}

/// Replace the value at `path` in place.
///
/// Identity and derived fields are rejected. The value must fit the target
/// type; numeric strings are accepted for numbers.
pub fn write_at(root: &mut dyn Node, path: &Path, value: Value) -> StateResult<()> {
    let target = node_at_mut(root, path)?;
    target
        .assign(value)
        .map_err(|m| StateError::type_mismatch(path.clone(), m.expected, m.found))
}

/// Pure write: the document with `value` at `path`.
///
/// `doc` is not modified. The result shares every subtree off the path
/// with `doc`.
pub fn set_at<R: State>(doc: &Arc<R>, path: &Path, value: Value) -> StateResult<Arc<R>> {
    let mut draft = Arc::clone(doc);
    let target: &mut R = Arc::make_mut(&mut draft);
    write_at(target, path, value)?;
    Ok(draft)
}

/// Resolve the list at `path`.
pub fn list_at<'a>(root: &'a dyn Node, path: &Path) -> StateResult<&'a dyn ListNode> {
    node_at(root, path)?
        .as_list()
        .ok_or_else(|| StateError::malformed(path.clone(), Fault::NotAList))
}

/// Resolve the list at `path` for writing.
pub fn list_at_mut<'a>(root: &'a mut dyn Node, path: &Path) -> StateResult<&'a mut dyn ListNode> {
    node_at_mut(root, path)?
        .as_list_mut()
        .ok_or_else(|| StateError::malformed(path.clone(), Fault::NotAList))
}
