//! Required-field checks.

use crate::node::{Node, State};
use crate::shape::{Access, Shape};
use crate::{Path, Seg};
use serde_json::Value;

/// Paths of required fields that hold no value.
///
/// Null, blank strings and empty lists count as missing. Lists are walked
/// element by element, so a blank field in the third row is reported with
/// its index.
pub fn missing_required<R: State>(doc: &R) -> Vec<Path> {
    let mut out = Vec::new();
    walk(&R::shape(), doc, &mut Path::root(), &mut out);
    out
}

fn walk(shape: &Shape, node: &dyn Node, at: &mut Path, out: &mut Vec<Path>) {
    match shape {
        Shape::Leaf(_) => {}
        Shape::Record(record) => {
            for field in &record.fields {
                if field.access == Access::Derived {
                    continue;
                }
                let seg = Seg::key(field.key);
                let Ok(child) = node.child(&seg) else {
                    continue;
                };
                at.push(seg);
                if field.required && is_blank(child) {
                    out.push(at.clone());
                }
                walk(&field.shape, child, at, out);
                at.pop();
            }
        }
        Shape::List(element) => {
            let len = node.as_list().map_or(0, |list| list.len());
            for index in 0..len {
                let seg = Seg::Index(index);
                if let Ok(child) = node.child(&seg) {
                    at.push(seg);
                    walk(element, child, at, out);
                    at.pop();
                }
            }
        }
    }
}

fn is_blank(node: &dyn Node) -> bool {
    match node.to_value() {
        Ok(Value::Null) => true,
        Ok(Value::String(s)) => s.trim().is_empty(),
        Ok(Value::Array(items)) => items.is_empty(),
        Ok(_) => false,
        Err(_) => true,
    }
}
