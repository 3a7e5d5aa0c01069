//! Store configuration.

use serde::Deserialize;

/// Options for a [`Store`](crate::Store).
///
/// Deserializable so a host can keep it next to its other settings:
///
/// ```
/// use reqform_state::StoreConfig;
///
/// let config: StoreConfig = serde_json::from_str(r#"{"history_limit": 8}"#).unwrap();
/// assert_eq!(config.history_limit, 8);
/// assert!(!config.notify_on_subscribe);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of past snapshots kept. Zero disables history.
    pub history_limit: usize,
    /// Call a new subscriber once with the current selection.
    pub notify_on_subscribe: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_limit: 64,
            notify_on_subscribe: false,
        }
    }
}
