//! Typed lenses: compile-time checked paths.
//!
//! `#[derive(State)]` generates a lens type per record with one method per
//! field, so `PurchaseRequest::lens().activity().schedule().date_start()`
//! is a [`Field`] whose value type is known. A misspelled field is a compile
//! error, and a [`ReadOnly`] lens has no `set`:
//!
//! ```compile_fail
//! use reqform_state::{Lens, Path, ReadOnly};
//!
//! let total: ReadOnly<f64> = ReadOnly::from_path(Path::root().key("totalCost"));
//! let mut doc = String::new();
//! total.set(&mut doc, 1.0).unwrap();
//! ```

use crate::access::{get_at, node_at, node_at_mut};
use crate::error::{StateError, StateResult};
use crate::list::List;
use crate::node::{Node, State};
use crate::Path;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A typed position in a document.
pub trait Lens: Sized {
    /// Create a lens at `path`.
    fn from_path(path: Path) -> Self;

    /// The path this lens addresses.
    fn path(&self) -> &Path;
}

/// A lens that can read its value from a document.
pub trait Readable: Lens {
    /// The value read.
    type Value;

    /// Read the addressed value from `root`.
    fn get(&self, root: &dyn Node) -> StateResult<Self::Value>;
}

fn expected_type<V>(path: &Path) -> StateError {
    StateError::type_mismatch(path.clone(), std::any::type_name::<V>(), "other")
}

/// Lens onto a stored, writable field.
pub struct Field<V> {
    path: Path,
    _value: PhantomData<fn() -> V>,
}

impl<V> Lens for Field<V> {
    fn from_path(path: Path) -> Self {
        Self {
            path,
            _value: PhantomData,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl<V: State> Readable for Field<V> {
    type Value = V;

    fn get(&self, root: &dyn Node) -> StateResult<V> {
        node_at(root, &self.path)?
            .as_any()
            .downcast_ref::<V>()
            .cloned()
            .ok_or_else(|| expected_type::<V>(&self.path))
    }
}

impl<V: State> Field<V> {
    /// Write `value` in place.
    ///
    /// Shared storage on the path is copied first; other snapshots holding
    /// the same subtrees are unaffected.
    pub fn set(&self, root: &mut dyn Node, value: V) -> StateResult<()> {
        let slot = node_at_mut(root, &self.path)?
            .as_any_mut()
            .downcast_mut::<V>()
            .ok_or_else(|| expected_type::<V>(&self.path))?;
        let mut value = value;
        if V::CARRIES_IDS {
            value.adopt_ids(slot);
        }
        *slot = value;
        Ok(())
    }
}

/// Lens onto a derived or identity field. Readable only.
pub struct ReadOnly<V> {
    path: Path,
    _value: PhantomData<fn() -> V>,
}

impl<V> Lens for ReadOnly<V> {
    fn from_path(path: Path) -> Self {
        Self {
            path,
            _value: PhantomData,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl<V: DeserializeOwned> Readable for ReadOnly<V> {
    type Value = V;

    fn get(&self, root: &dyn Node) -> StateResult<V> {
        Ok(serde_json::from_value(get_at(root, &self.path)?)?)
    }
}

/// Lens onto a list of records.
pub struct ListLens<T> {
    path: Path,
    _item: PhantomData<fn() -> T>,
}

impl<T> Lens for ListLens<T> {
    fn from_path(path: Path) -> Self {
        Self {
            path,
            _item: PhantomData,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: State> ListLens<T> {
    /// Lens onto the element at `index`.
    pub fn at(&self, index: usize) -> T::Lens {
        T::Lens::from_path(self.path.clone().index(index))
    }
}

impl<T: State + Default> Readable for ListLens<T> {
    type Value = List<T>;

    fn get(&self, root: &dyn Node) -> StateResult<List<T>> {
        node_at(root, &self.path)?
            .as_any()
            .downcast_ref::<List<T>>()
            .cloned()
            .ok_or_else(|| expected_type::<List<T>>(&self.path))
    }
}

/// Read a record through a derived lens.
///
/// Records are stored behind `Arc` inside a document; at the root they are
/// held directly and get wrapped here.
#[doc(hidden)]
pub fn read_record<T: State>(root: &dyn Node, path: &Path) -> StateResult<Arc<T>> {
    let node = node_at(root, path)?.as_any();
    if let Some(shared) = node.downcast_ref::<Arc<T>>() {
        return Ok(Arc::clone(shared));
    }
    node.downcast_ref::<T>()
        .map(|owned| Arc::new(owned.clone()))
        .ok_or_else(|| expected_type::<T>(path))
}

macro_rules! lens_common {
    ($name:ident < $param:ident >) => {
        impl<$param> Clone for $name<$param> {
            fn clone(&self) -> Self {
                Self::from_path(self.path.clone())
            }
        }

        impl<$param> fmt::Debug for $name<$param> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.path).finish()
            }
        }

        impl<$param> PartialEq for $name<$param> {
            fn eq(&self, other: &Self) -> bool {
                self.path == other.path
            }
        }
    };
}

lens_common!(Field<V>);
lens_common!(ReadOnly<V>);
lens_common!(ListLens<T>);
