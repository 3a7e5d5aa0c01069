//! Change detection for subscriptions.

use crate::list::{List, TextList};
use serde_json::Value;
use std::sync::Arc;

/// A value picked out of a document by a subscription selector.
///
/// `same` decides whether a subscriber is notified: records and lists
/// compare by shared storage, so an untouched subtree is recognised
/// without walking it; terminals compare by value.
pub trait Selection {
    /// Whether `self` and `other` represent the same selected value.
    fn same(&self, other: &Self) -> bool;
}

impl<T> Selection for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T> Selection for List<T> {
    fn same(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Selection for TextList {
    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

impl Selection for Value {
    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

impl Selection for usize {
    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: Selection> Selection for Vec<T> {
    fn same(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same(b))
    }
}

macro_rules! tuple_selection {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Selection),+> Selection for ($($name,)+) {
            fn same(&self, other: &Self) -> bool {
                $(self.$idx.same(&other.$idx))&&+
            }
        }
    };
}

tuple_selection!(A: 0, B: 1);
tuple_selection!(A: 0, B: 1, C: 2);
tuple_selection!(A: 0, B: 1, C: 2, D: 3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_compares_identity() {
        let a = Arc::new(String::from("x"));
        let b = Arc::new(String::from("x"));
        assert!(a.same(&Arc::clone(&a)));
        assert!(!a.same(&b));
    }

    #[test]
    fn test_terminals_compare_values() {
        assert!(String::from("x").same(&String::from("x")));
        assert!(1.5_f64.same(&1.5));
        assert!(!true.same(&false));
    }

    #[test]
    fn test_tuples_combine() {
        let a = Arc::new(1.0_f64);
        let pair = (Arc::clone(&a), String::from("k"));
        assert!(pair.same(&(Arc::clone(&a), String::from("k"))));
        assert!(!pair.same(&(Arc::new(1.0), String::from("k"))));
    }
}
