//! Mutation commands.
//!
//! A [`Command`] is the serializable form of one edit, as a form widget
//! would send it. Commands apply to an `Arc`-held document and return the
//! next snapshot; the input snapshot is never modified.

use crate::access::{list_at_mut, write_at};
use crate::error::{StateError, StateResult};
use crate::node::State;
use crate::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// A single edit to a document.
///
/// List indices are signed so a malformed request from the untyped channel
/// (a negative index) is reported as out of bounds rather than failing to
/// decode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Replace the value at `path`.
    ///
    /// The path must exist. Identity and derived fields are rejected.
    Set {
        /// Target path.
        path: Path,
        /// New value.
        value: Value,
    },

    /// Append a default element to the list at `path`.
    Append {
        /// Target list.
        path: Path,
    },

    /// Remove the element at `index`.
    RemoveAt {
        /// Target list.
        path: Path,
        /// Element index.
        index: i64,
    },

    /// Insert a copy of the element at `index` right after it.
    ///
    /// The copy and every record inside it get fresh ids.
    DuplicateAt {
        /// Target list.
        path: Path,
        /// Element index.
        index: i64,
    },

    /// Move the element at `from` so it ends up at `to`.
    Move {
        /// Target list.
        path: Path,
        /// Current index.
        from: i64,
        /// Destination index.
        to: i64,
    },

    /// Rearrange the list: position `i` receives the element at `order[i]`.
    Reorder {
        /// Target list.
        path: Path,
        /// A permutation of the current indices.
        order: Vec<usize>,
    },

    /// Restore the template document.
    Reset,
}

impl Command {
    /// Create a Set command.
    #[inline]
    pub fn set(path: Path, value: impl Into<Value>) -> Self {
        Command::Set {
            path,
            value: value.into(),
        }
    }

    /// Create an Append command.
    #[inline]
    pub fn append(path: Path) -> Self {
        Command::Append { path }
    }

    /// Create a RemoveAt command.
    #[inline]
    pub fn remove_at(path: Path, index: usize) -> Self {
        Command::RemoveAt {
            path,
            index: index as i64,
        }
    }

    /// Create a DuplicateAt command.
    #[inline]
    pub fn duplicate_at(path: Path, index: usize) -> Self {
        Command::DuplicateAt {
            path,
            index: index as i64,
        }
    }

    /// Create a Move command.
    #[inline]
    pub fn move_item(path: Path, from: usize, to: usize) -> Self {
        Command::Move {
            path,
            from: from as i64,
            to: to as i64,
        }
    }

    /// Create a Reorder command.
    #[inline]
    pub fn reorder(path: Path, order: Vec<usize>) -> Self {
        Command::Reorder { path, order }
    }

    /// Get the path this command targets. `Reset` targets the root.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Command::Set { path, .. }
            | Command::Append { path }
            | Command::RemoveAt { path, .. }
            | Command::DuplicateAt { path, .. }
            | Command::Move { path, .. }
            | Command::Reorder { path, .. } => Some(path),
            Command::Reset => None,
        }
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "set",
            Command::Append { .. } => "append",
            Command::RemoveAt { .. } => "remove_at",
            Command::DuplicateAt { .. } => "duplicate_at",
            Command::Move { .. } => "move",
            Command::Reorder { .. } => "reorder",
            Command::Reset => "reset",
        }
    }
}

fn checked_index(path: &Path, index: i64, len: usize) -> StateResult<usize> {
    if index < 0 || index as u64 >= len as u64 {
        return Err(StateError::index_out_of_bounds(path.clone(), index, len));
    }
    Ok(index as usize)
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    order
        .iter()
        .all(|&i| i < len && !std::mem::replace(&mut seen[i], true))
}

/// Apply a command to a draft in place.
///
/// On error the draft may be partially modified; callers discard it.
pub(crate) fn apply_in_place<R: State>(doc: &mut R, template: &R, command: &Command) -> StateResult<()> {
    match command {
        Command::Set { path, value } => write_at(doc, path, value.clone()),
        Command::Append { path } => {
            list_at_mut(doc, path)?.append_default();
            Ok(())
        }
        Command::RemoveAt { path, index } => {
            let list = list_at_mut(doc, path)?;
            let index = checked_index(path, *index, list.len())?;
            list.remove_at(index);
            Ok(())
        }
        Command::DuplicateAt { path, index } => {
            let list = list_at_mut(doc, path)?;
            let index = checked_index(path, *index, list.len())?;
            list.duplicate_at(index);
            Ok(())
        }
        Command::Move { path, from, to } => {
            let list = list_at_mut(doc, path)?;
            let from = checked_index(path, *from, list.len())?;
            let to = checked_index(path, *to, list.len())?;
            if from != to {
                list.move_item(from, to);
            }
            Ok(())
        }
        Command::Reorder { path, order } => {
            let list = list_at_mut(doc, path)?;
            if !is_permutation(order, list.len()) {
                return Err(StateError::NotAPermutation {
                    path: path.clone(),
                    expected: list.len(),
                    found: order.len(),
                });
            }
            list.permute(order);
            Ok(())
        }
        Command::Reset => {
            *doc = template.clone();
            Ok(())
        }
    }
}

/// Apply a command, returning the next snapshot.
///
/// ```
/// use reqform_state::{apply_command, path, Command, List};
/// use std::sync::Arc;
///
/// let doc: Arc<List<String>> = Arc::new(vec!["a".to_string(), "b".to_string()].into());
/// let next = apply_command(&doc, &doc, &Command::remove_at(path!(), 0)).unwrap();
///
/// assert_eq!(doc.len(), 2);
/// assert_eq!(next.len(), 1);
/// assert_eq!(next[0], "b");
/// ```
pub fn apply_command<R: State>(doc: &Arc<R>, template: &Arc<R>, command: &Command) -> StateResult<Arc<R>> {
    if matches!(command, Command::Reset) {
        return Ok(Arc::clone(template));
    }
    let mut draft = Arc::clone(doc);
    apply_in_place(Arc::make_mut(&mut draft), template, command)?;
    Ok(draft)
}

/// Apply several commands atomically: either all succeed or `doc` is
/// returned to the caller unchanged through the error.
pub fn apply_commands<'a, R: State>(
    doc: &Arc<R>,
    template: &Arc<R>,
    commands: impl IntoIterator<Item = &'a Command>,
) -> StateResult<Arc<R>> {
    let mut current = Arc::clone(doc);
    for command in commands {
        current = apply_command(&current, template, command)?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::List;
    use crate::path;
    use serde_json::json;

    fn letters() -> Arc<List<String>> {
        Arc::new(
            ["a", "b", "c"]
                .iter()
                .map(|s| s.to_string())
                .collect::<List<String>>(),
        )
    }

    fn contents(list: &List<String>) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_command_constructors() {
        let set = Command::set(path!("a"), json!(1));
        assert_eq!(set.name(), "set");
        assert_eq!(set.path(), Some(&path!("a")));

        assert_eq!(Command::Reset.name(), "reset");
        assert_eq!(Command::Reset.path(), None);
    }

    #[test]
    fn test_command_serde_wire_form() {
        let cmd = Command::move_item(path!("lotItem", 0, "lotDescription"), 2, 0);
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            json,
            json!({"op": "move", "path": "lotItem.0.lotDescription", "from": 2, "to": 0})
        );
        let parsed: Command = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, cmd);

        let reset: Command = serde_json::from_value(json!({"op": "reset"})).unwrap();
        assert_eq!(reset, Command::Reset);
    }

    #[test]
    fn test_list_commands() {
        let doc = letters();

        let appended = apply_command(&doc, &doc, &Command::append(path!())).unwrap();
        assert_eq!(contents(&appended), ["a", "b", "c", ""]);

        let duplicated = apply_command(&doc, &doc, &Command::duplicate_at(path!(), 1)).unwrap();
        assert_eq!(contents(&duplicated), ["a", "b", "b", "c"]);

        let moved = apply_command(&doc, &doc, &Command::move_item(path!(), 0, 2)).unwrap();
        assert_eq!(contents(&moved), ["b", "c", "a"]);

        let reordered = apply_command(&doc, &doc, &Command::reorder(path!(), vec![2, 0, 1])).unwrap();
        assert_eq!(contents(&reordered), ["c", "a", "b"]);

        assert_eq!(contents(&doc), ["a", "b", "c"]);
    }

    #[test]
    fn test_negative_and_large_indices_are_out_of_bounds() {
        let doc = letters();
        for cmd in [
            Command::RemoveAt {
                path: path!(),
                index: -1,
            },
            Command::remove_at(path!(), 3),
            Command::Move {
                path: path!(),
                from: 0,
                to: 3,
            },
        ] {
            assert!(matches!(
                apply_command(&doc, &doc, &cmd),
                Err(StateError::IndexOutOfBounds { len: 3, .. })
            ));
        }
    }

    #[test]
    fn test_reorder_rejects_non_permutations() {
        let doc = letters();
        for order in [vec![0, 1], vec![0, 0, 1], vec![0, 1, 3]] {
            assert!(matches!(
                apply_command(&doc, &doc, &Command::reorder(path!(), order)),
                Err(StateError::NotAPermutation { expected: 3, .. })
            ));
        }
    }

    #[test]
    fn test_apply_commands_is_atomic() {
        let doc = letters();
        let batch = [
            Command::remove_at(path!(), 0),
            Command::remove_at(path!(), 5),
        ];
        assert!(apply_commands(&doc, &doc, &batch).is_err());
        assert_eq!(contents(&doc), ["a", "b", "c"]);

        let batch = [Command::remove_at(path!(), 0), Command::append(path!())];
        let next = apply_commands(&doc, &doc, &batch).unwrap();
        assert_eq!(contents(&next), ["b", "c", ""]);
    }

    #[test]
    fn test_reset_returns_template() {
        let template = letters();
        let edited = apply_command(&template, &template, &Command::remove_at(path!(), 0)).unwrap();
        let reset = apply_command(&edited, &template, &Command::Reset).unwrap();
        assert!(Arc::ptr_eq(&reset, &template));
    }
}
