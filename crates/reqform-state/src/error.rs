//! Error types for reqform-state operations.

use crate::Path;
use std::fmt;
use thiserror::Error;

/// Result type alias for reqform-state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Why a path failed to resolve against a document shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// A segment of the textual path was empty.
    EmptySegment,
    /// The record has no field with this name.
    UnknownField(String),
    /// An index was used where a record was expected.
    UnexpectedIndex(usize),
    /// A field name was used where a list was expected.
    ExpectedIndex(String),
    /// The path continues below a terminal value.
    Terminal,
    /// The path does not name a list.
    NotAList,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::EmptySegment => f.write_str("empty path segment"),
            Fault::UnknownField(name) => write!(f, "no field named `{}`", name),
            Fault::UnexpectedIndex(i) => write!(f, "index {} applied to a record", i),
            Fault::ExpectedIndex(name) => write!(f, "field `{}` applied to a list", name),
            Fault::Terminal => f.write_str("cannot descend into a terminal value"),
            Fault::NotAList => f.write_str("target is not a list"),
        }
    }
}

/// A single navigation step failure, before the full path is known.
///
/// Node implementations report these; the traversal attaches the path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// The segment does not resolve.
    Fault(Fault),
    /// The index is outside the list.
    OutOfBounds {
        /// Requested index.
        index: usize,
        /// List length.
        len: usize,
    },
    /// The segment names a derived or identity field that cannot be written.
    ReadOnly,
}

impl From<Fault> for StepError {
    fn from(fault: Fault) -> Self {
        StepError::Fault(fault)
    }
}

/// Errors that can occur during reqform-state operations.
///
/// All of them are recoverable: a store that rejects a command keeps its
/// last committed snapshot.
#[derive(Debug, Error)]
pub enum StateError {
    /// The path does not resolve against the document.
    #[error("malformed path {path}: {fault}")]
    MalformedPath {
        /// The path up to and including the failing segment.
        path: Path,
        /// What went wrong at that segment.
        fault: Fault,
    },

    /// List index is out of bounds.
    #[error("index {index} out of bounds (len: {len}) at path {path}")]
    IndexOutOfBounds {
        /// The path to the list.
        path: Path,
        /// The index that was requested; negative values come from the
        /// untyped command channel.
        index: i64,
        /// The actual length of the list.
        len: usize,
    },

    /// The supplied value does not fit the type at the path.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The path being written.
        path: Path,
        /// The expected type.
        expected: &'static str,
        /// The type actually supplied.
        found: &'static str,
    },

    /// The path names a derived or identity field.
    #[error("{path} is read-only")]
    ReadOnly {
        /// The read-only path.
        path: Path,
    },

    /// A reorder did not supply the same elements as the list holds.
    #[error("reorder at {path} is not a permutation (expected {expected} elements, got {found})")]
    NotAPermutation {
        /// The list being reordered.
        path: Path,
        /// Current list length.
        expected: usize,
        /// Length of the supplied order.
        found: usize,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StateError {
    /// Create a malformed path error.
    #[inline]
    pub fn malformed(path: Path, fault: Fault) -> Self {
        StateError::MalformedPath { path, fault }
    }

    /// Create an index out of bounds error.
    #[inline]
    pub fn index_out_of_bounds(path: Path, index: i64, len: usize) -> Self {
        StateError::IndexOutOfBounds { path, index, len }
    }

    /// Create a type mismatch error.
    #[inline]
    pub fn type_mismatch(path: Path, expected: &'static str, found: &'static str) -> Self {
        StateError::TypeMismatch {
            path,
            expected,
            found,
        }
    }

    /// Create a read-only error.
    #[inline]
    pub fn read_only(path: Path) -> Self {
        StateError::ReadOnly { path }
    }

    /// Attach a path to a navigation step failure.
    ///
    /// `at` is the path up to and including the failing segment; for
    /// out-of-bounds failures the reported path is the list itself.
    pub fn from_step(step: StepError, at: Path) -> Self {
        match step {
            StepError::Fault(fault) => StateError::MalformedPath { path: at, fault },
            StepError::OutOfBounds { index, len } => StateError::IndexOutOfBounds {
                path: at.parent().unwrap_or_default(),
                index: index as i64,
                len,
            },
            StepError::ReadOnly => StateError::ReadOnly { path: at },
        }
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            StateError::MalformedPath { path, .. }
            | StateError::IndexOutOfBounds { path, .. }
            | StateError::TypeMismatch { path, .. }
            | StateError::ReadOnly { path }
            | StateError::NotAPermutation { path, .. } => Some(path),
            StateError::Serialization(_) => None,
        }
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
