//! Derive macro for the reqform-state `State` trait.
//!
//! `#[derive(State)]` on a record with named fields generates:
//! - `impl Node for {Name}`: segment-by-segment traversal
//! - `impl State for {Name}`: schema, identity handling, lens type
//! - `{Name}Lens`: typed lens with one method per field
//!
//! # Usage
//!
//! ```ignore
//! use reqform_state::{List, State};
//!
//! #[derive(Clone, Default, PartialEq, Serialize, Deserialize, State)]
//! #[serde(rename_all = "camelCase")]
//! #[reqform(
//!     rename_all = "camelCase",
//!     computed(key = "totalCost", with = "total_cost", ty = "f64")
//! )]
//! struct NormalItem {
//!     #[reqform(id)]
//!     id: String,
//!     quantity: f64,
//!     unit_cost: f64,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod parse;

/// Derive the `State` trait for a record.
///
/// Every field type must itself implement `State`: terminals (`String`,
/// `f64`, `bool`, `Option<DateValue>`, `TimeValue`, choice enums declared
/// with `leaf_state!`), `TextList`, `List<T>` of records, or `Arc<T>` of a
/// nested record.
///
/// # Attributes
///
/// ## Struct Attributes
///
/// - `#[reqform(rename_all = "camelCase")]`: key casing; must match the
///   serde attribute on the same struct
/// - `#[reqform(computed(key = "...", with = "method", ty = "Type"))]`: a
///   read-only derived field computed by `self.method()`; repeatable
///
/// ## Field Attributes
///
/// - `#[reqform(rename = "key")]`: use a different key
/// - `#[reqform(id)]`: stable identity (`String`); fresh on creation and
///   duplication, rejected by writes
/// - `#[reqform(required)]`: reported by `missing_required` when blank
#[proc_macro_derive(State, attributes(reqform))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match codegen::expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
