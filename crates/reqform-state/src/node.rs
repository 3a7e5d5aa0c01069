//! Traversable document nodes.
//!
//! A document is a tree of plain Rust values. [`Node`] is the object-safe
//! view the path machinery walks: one segment at a time, read-only or
//! copy-on-write. [`State`] is the typed side a schema type implements,
//! normally through `#[derive(State)]`.

use crate::error::{value_type_name, StateResult, StepError};
use crate::list::ListNode;
use crate::shape::{LeafKind, Shape};
use crate::value::{DateValue, TimeValue};
use crate::{Lens, Path, Seg};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// A supplied value did not fit the node it was assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// What the node holds.
    pub expected: &'static str,
    /// What was supplied.
    pub found: &'static str,
}

/// Object-safe access to one node of a document.
///
/// Implementations resolve a single segment; [`crate::access`] strings the
/// steps together and attaches paths to failures.
pub trait Node: Any + Send + Sync {
    /// Resolve a child for reading.
    fn child(&self, seg: &Seg) -> Result<&dyn Node, StepError>;

    /// Resolve a child for writing.
    ///
    /// Shared storage on the way is cloned before the reference is handed
    /// out, so the previous snapshot is never touched.
    fn child_mut(&mut self, seg: &Seg) -> Result<&mut dyn Node, StepError>;

    /// Value of the derived field `key`, if this node defines one.
    fn computed(&self, _key: &str) -> Option<StateResult<Value>> {
        None
    }

    /// Serialize this node.
    fn to_value(&self) -> StateResult<Value>;

    /// Replace this node with a value decoded from JSON.
    fn assign(&mut self, value: Value) -> Result<(), Mismatch>;

    /// List operations, if this node is a list.
    fn as_list(&self) -> Option<&dyn ListNode> {
        None
    }

    /// Mutable list operations, if this node is a list.
    fn as_list_mut(&mut self) -> Option<&mut dyn ListNode> {
        None
    }

    /// Downcast support for typed lenses.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support for typed lenses.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A value that can live in a document.
///
/// Usually derived:
///
/// ```
/// use reqform_state::{Readable, State};
///
/// #[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize, State)]
/// #[serde(rename_all = "camelCase")]
/// #[reqform(rename_all = "camelCase")]
/// struct Venue {
///     location_name: String,
///     seats: f64,
/// }
///
/// let venue = Venue { location_name: "Hall A".into(), seats: 40.0 };
/// assert_eq!(Venue::lens().seats().get(&venue).unwrap(), 40.0);
/// assert_eq!(Venue::shape().paths(), vec!["locationName", "seats"]);
/// ```
pub trait State: Node + Clone + PartialEq + Serialize + DeserializeOwned {
    /// Typed lens addressing a value of this type.
    type Lens: Lens;

    /// Whether this type, or anything below it, carries a stable id.
    const CARRIES_IDS: bool = false;

    /// Schema of this type.
    fn shape() -> Shape;

    /// Replace every stable id in this value with a fresh one.
    fn reissue_ids(&mut self) {}

    /// Take stable ids from `previous`, the value this one replaces.
    ///
    /// A record keeps its predecessor's id. A list element keeps its id only
    /// if it names an element of `previous` not already claimed; any other
    /// element gets fresh ids, so written JSON can never forge or copy one.
    fn adopt_ids(&mut self, _previous: &Self) {}

    /// This value's own stable id, if it has one.
    fn stable_id(&self) -> Option<&str> {
        None
    }

    /// Lens addressing a value of this type at the document root.
    fn lens() -> Self::Lens {
        Self::Lens::from_path(Path::root())
    }
}

/// Decode a terminal value, falling back to `coerce` when the JSON shape
/// does not deserialize directly.
#[doc(hidden)]
pub fn decode_leaf<T: DeserializeOwned>(
    value: Value,
    kind: LeafKind,
    coerce: impl Fn(&Value) -> Option<T>,
) -> Result<T, Mismatch> {
    match T::deserialize(&value) {
        Ok(decoded) => Ok(decoded),
        Err(_) => coerce(&value).ok_or(Mismatch {
            expected: kind.name(),
            found: value_type_name(&value),
        }),
    }
}

/// Decode a whole record.
#[doc(hidden)]
pub fn decode_record<T: DeserializeOwned>(value: Value, name: &'static str) -> Result<T, Mismatch> {
    let found = value_type_name(&value);
    serde_json::from_value(value).map_err(|_| Mismatch {
        expected: name,
        found,
    })
}

/// Serialize a derived value.
#[doc(hidden)]
pub fn computed_value<V: Serialize>(value: &V) -> StateResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Numeric strings such as `"12.5"` are accepted where a number is expected.
fn coerce_number(value: &Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|f| f.is_finite())
}

fn coerce_date(value: &Value) -> Option<Option<DateValue>> {
    let raw = value.as_str()?.trim();
    raw.parse::<i64>().ok().map(|ts| Some(DateValue::Timestamp(ts)))
}

/// Implement [`Node`] and [`State`] for a terminal type.
///
/// Terminals have no children and are stored by value. Choice enums in a
/// schema use this with [`LeafKind::Choice`]:
///
/// ```
/// use reqform_state::{leaf_state, LeafKind, State};
///
/// #[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// #[serde(rename_all = "snake_case")]
/// enum Tier {
///     #[default]
///     Basic,
///     Premium,
/// }
///
/// leaf_state!(Tier, LeafKind::Choice(&["basic", "premium"]));
///
/// assert_eq!(Tier::shape(), reqform_state::Shape::Leaf(LeafKind::Choice(&["basic", "premium"])));
/// ```
#[macro_export]
macro_rules! leaf_state {
    ($ty:ty, $kind:expr) => {
        $crate::leaf_state!($ty, $kind, |_: &$crate::__private::serde_json::Value| None);
    };
    ($ty:ty, $kind:expr, $coerce:expr) => {
        impl $crate::Node for $ty {
            fn child(&self, _seg: &$crate::Seg) -> ::std::result::Result<&dyn $crate::Node, $crate::StepError> {
                ::std::result::Result::Err($crate::StepError::Fault($crate::Fault::Terminal))
            }

            fn child_mut(
                &mut self,
                _seg: &$crate::Seg,
            ) -> ::std::result::Result<&mut dyn $crate::Node, $crate::StepError> {
                ::std::result::Result::Err($crate::StepError::Fault($crate::Fault::Terminal))
            }

            fn to_value(&self) -> $crate::StateResult<$crate::__private::serde_json::Value> {
                ::std::result::Result::Ok($crate::__private::serde_json::to_value(self)?)
            }

            fn assign(
                &mut self,
                value: $crate::__private::serde_json::Value,
            ) -> ::std::result::Result<(), $crate::Mismatch> {
                *self = $crate::decode_leaf(value, $kind, $coerce)?;
                ::std::result::Result::Ok(())
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }

        impl $crate::State for $ty {
            type Lens = $crate::Field<$ty>;

            fn shape() -> $crate::Shape {
                $crate::Shape::Leaf($kind)
            }
        }

        impl $crate::Selection for $ty {
            fn same(&self, other: &Self) -> bool {
                self == other
            }
        }
    };
}

leaf_state!(String, LeafKind::Text);
leaf_state!(f64, LeafKind::Number, coerce_number);
leaf_state!(bool, LeafKind::Boolean);
leaf_state!(Option<DateValue>, LeafKind::Date, coerce_date);
leaf_state!(TimeValue, LeafKind::Time);

impl<T: State> Node for Arc<T> {
    fn child(&self, seg: &Seg) -> Result<&dyn Node, StepError> {
        (**self).child(seg)
    }

    fn child_mut(&mut self, seg: &Seg) -> Result<&mut dyn Node, StepError> {
        Arc::make_mut(self).child_mut(seg)
    }

    fn computed(&self, key: &str) -> Option<StateResult<Value>> {
        (**self).computed(key)
    }

    fn to_value(&self) -> StateResult<Value> {
        (**self).to_value()
    }

    fn assign(&mut self, value: Value) -> Result<(), Mismatch> {
        let mut next = T::clone(self);
        next.assign(value)?;
        *self = Arc::new(next);
        Ok(())
    }

    fn as_list(&self) -> Option<&dyn ListNode> {
        (**self).as_list()
    }

    fn as_list_mut(&mut self) -> Option<&mut dyn ListNode> {
        Arc::make_mut(self).as_list_mut()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: State> State for Arc<T> {
    type Lens = T::Lens;

    const CARRIES_IDS: bool = T::CARRIES_IDS;

    fn shape() -> Shape {
        T::shape()
    }

    fn reissue_ids(&mut self) {
        if T::CARRIES_IDS {
            Arc::make_mut(self).reissue_ids();
        }
    }

    fn adopt_ids(&mut self, previous: &Self) {
        if T::CARRIES_IDS && !Arc::ptr_eq(self, previous) {
            Arc::make_mut(self).adopt_ids(previous);
        }
    }

    fn stable_id(&self) -> Option<&str> {
        (**self).stable_id()
    }
}
