//! Runtime description of a document schema.
//!
//! Every [`State`](crate::State) type describes itself as a [`Shape`]. The
//! shape is what lets a dotted path from a widget be checked before it ever
//! touches the document, and what drives the required-field walk.

use crate::error::{Fault, StateError, StateResult};
use crate::{Path, Seg};

/// Kind of a terminal value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafKind {
    /// Free text.
    Text,
    /// A finite number.
    Number,
    /// A flag.
    Boolean,
    /// A date, possibly unset.
    Date,
    /// A time of day.
    Time,
    /// One of a closed set of codes.
    Choice(&'static [&'static str]),
    /// An ordered list of strings edited as one field.
    TextList,
}

impl LeafKind {
    /// Name used in type mismatch errors.
    pub fn name(&self) -> &'static str {
        match self {
            LeafKind::Text => "string",
            LeafKind::Number => "number",
            LeafKind::Boolean => "boolean",
            LeafKind::Date => "date",
            LeafKind::Time => "time",
            LeafKind::Choice(_) => "choice",
            LeafKind::TextList => "string list",
        }
    }
}

/// How a record field may be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Ordinary stored field.
    Writable,
    /// Stable identity, assigned on creation and never written by callers.
    Identity,
    /// Computed on read, never stored.
    Derived,
}

/// One field of a record shape.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldShape {
    /// Key as it appears in paths and JSON.
    pub key: &'static str,
    /// Shape of the field's value.
    pub shape: Shape,
    /// Write policy.
    pub access: Access,
    /// Whether the form treats the field as mandatory.
    pub required: bool,
}

/// A record: a fixed set of named fields.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordShape {
    /// Rust type name of the record.
    pub name: &'static str,
    /// Fields in declaration order.
    pub fields: Vec<FieldShape>,
}

/// The shape of a value in a document.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Terminal value.
    Leaf(LeafKind),
    /// Record with named fields.
    Record(RecordShape),
    /// Ordered list of records.
    List(Box<Shape>),
}

impl Shape {
    /// Look up a field of a record shape.
    pub fn field(&self, key: &str) -> Option<&FieldShape> {
        match self {
            Shape::Record(record) => record.fields.iter().find(|f| f.key == key),
            _ => None,
        }
    }

    /// Resolve the shape addressed by `path`.
    ///
    /// Indices are not bounds-checked; that needs a concrete document.
    pub fn resolve(&self, path: &Path) -> StateResult<&Shape> {
        Ok(self.resolve_field(path)?.0)
    }

    /// Resolve `path` and report how its final segment may be written.
    ///
    /// List elements and the root are writable.
    pub fn access(&self, path: &Path) -> StateResult<Access> {
        Ok(self.resolve_field(path)?.1)
    }

    fn resolve_field(&self, path: &Path) -> StateResult<(&Shape, Access)> {
        let mut current = self;
        let mut access = Access::Writable;
        for (i, seg) in path.iter().enumerate() {
            let fault = match (current, seg) {
                (Shape::Record(record), Seg::Key(key)) => {
                    match record.fields.iter().find(|f| f.key == key) {
                        Some(field) => {
                            current = &field.shape;
                            access = field.access;
                            None
                        }
                        None => Some(Fault::UnknownField(key.clone())),
                    }
                }
                (Shape::Record(_), Seg::Index(index)) => Some(Fault::UnexpectedIndex(*index)),
                (Shape::List(element), Seg::Index(_)) => {
                    current = element;
                    access = Access::Writable;
                    None
                }
                (Shape::List(_), Seg::Key(key)) => Some(Fault::ExpectedIndex(key.clone())),
                (Shape::Leaf(_), _) => Some(Fault::Terminal),
            };
            if let Some(fault) = fault {
                return Err(StateError::malformed(path.prefix(i + 1), fault));
            }
        }
        Ok((current, access))
    }

    /// Every addressable path pattern, with `*` standing for list indices.
    ///
    /// ```
    /// use reqform_state::{Access, FieldShape, LeafKind, RecordShape, Shape};
    ///
    /// let row = Shape::Record(RecordShape {
    ///     name: "Row",
    ///     fields: vec![FieldShape {
    ///         key: "label",
    ///         shape: Shape::Leaf(LeafKind::Text),
    ///         access: Access::Writable,
    ///         required: false,
    ///     }],
    /// });
    /// let table = Shape::List(Box::new(row));
    /// assert_eq!(table.paths(), vec!["*.label".to_string()]);
    /// ```
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths(&mut Vec::new(), &mut out, &|_| true);
        out
    }

    /// Path patterns of every field marked required.
    pub fn required_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths(&mut Vec::new(), &mut out, &|f| f.required);
        out
    }

    fn collect_paths(
        &self,
        prefix: &mut Vec<&'static str>,
        out: &mut Vec<String>,
        keep: &dyn Fn(&FieldShape) -> bool,
    ) {
        match self {
            Shape::Leaf(_) => {}
            Shape::Record(record) => {
                for field in &record.fields {
                    prefix.push(field.key);
                    if keep(field) {
                        out.push(prefix.join("."));
                    }
                    field.shape.collect_paths(prefix, out, keep);
                    prefix.pop();
                }
            }
            Shape::List(element) => {
                prefix.push("*");
                element.collect_paths(prefix, out, keep);
                prefix.pop();
            }
        }
    }
}
