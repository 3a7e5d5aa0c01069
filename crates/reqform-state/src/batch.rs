//! Builder for grouped commands.
//!
//! `Batch` collects commands relative to a base path, for handing to
//! [`Store::transact`](crate::Store::transact) as one atomic edit.

use crate::{Command, Path};
use serde_json::Value;

/// A list of commands under a common base path.
///
/// # Examples
///
/// ```
/// use reqform_state::{path, Batch};
/// use serde_json::json;
///
/// let mut b = Batch::at(path!("lotItem", 0));
/// b.set(path!("lotTitle"), json!("Catering"));
/// b.append(path!("lotDescription"));
///
/// let commands = b.build();
/// assert_eq!(commands.len(), 2);
/// assert_eq!(commands[0].path().unwrap().to_string(), "lotItem.0.lotTitle");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Batch {
    base: Path,
    commands: Vec<Command>,
}

impl Batch {
    /// Create a new batch at the document root.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new batch at the specified base path.
    #[inline]
    pub fn at(base: Path) -> Self {
        Self {
            base,
            commands: Vec::new(),
        }
    }

    /// Get the base path of this batch.
    #[inline]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Create an empty batch at a path relative to this one.
    ///
    /// Use `merge` to fold its commands back in.
    #[inline]
    pub fn nested(&self, path: Path) -> Self {
        Self::at(self.base.join(&path))
    }

    #[inline]
    fn full_path(&self, path: Path) -> Path {
        self.base.join(&path)
    }

    /// Set a value.
    pub fn set(&mut self, path: Path, value: impl Into<Value>) -> &mut Self {
        let path = self.full_path(path);
        self.commands.push(Command::set(path, value));
        self
    }

    /// Append a default element to a list.
    pub fn append(&mut self, path: Path) -> &mut Self {
        let path = self.full_path(path);
        self.commands.push(Command::append(path));
        self
    }

    /// Remove a list element.
    pub fn remove_at(&mut self, path: Path, index: usize) -> &mut Self {
        let path = self.full_path(path);
        self.commands.push(Command::remove_at(path, index));
        self
    }

    /// Duplicate a list element.
    pub fn duplicate_at(&mut self, path: Path, index: usize) -> &mut Self {
        let path = self.full_path(path);
        self.commands.push(Command::duplicate_at(path, index));
        self
    }

    /// Move a list element.
    pub fn move_item(&mut self, path: Path, from: usize, to: usize) -> &mut Self {
        let path = self.full_path(path);
        self.commands.push(Command::move_item(path, from, to));
        self
    }

    /// Reorder a list by index permutation.
    pub fn reorder(&mut self, path: Path, order: Vec<usize>) -> &mut Self {
        let path = self.full_path(path);
        self.commands.push(Command::reorder(path, order));
        self
    }

    /// Take the commands of another batch.
    pub fn merge(&mut self, mut other: Batch) -> &mut Self {
        self.commands.append(&mut other.commands);
        self
    }

    /// Consume the batch.
    #[inline]
    pub fn build(self) -> Vec<Command> {
        self.commands
    }

    /// Check if this batch has any commands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of commands.
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl IntoIterator for Batch {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
