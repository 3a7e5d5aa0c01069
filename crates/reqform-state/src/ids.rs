//! Stable identifiers for list elements.

use uuid::Uuid;

/// Generate a fresh element id.
///
/// Ids are time-ordered, so elements created later sort after earlier ones.
pub fn new_id() -> String {
    format!("item-{}", Uuid::now_v7().simple())
}
