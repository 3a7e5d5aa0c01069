//! Parsing logic for State derive macro.

use darling::{ast, FromDeriveInput, FromField, FromMeta};
use syn::{Generics, Ident, Type, Visibility};

/// Parsed struct-level options.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(reqform), supports(struct_named))]
pub struct StateInput {
    /// The struct identifier.
    pub ident: Ident,

    /// The struct visibility.
    pub vis: Visibility,

    /// Generic parameters. Generic records are rejected.
    pub generics: Generics,

    /// Struct data (fields).
    pub data: ast::Data<(), FieldInput>,

    /// Key casing, mirroring `#[serde(rename_all = "...")]`.
    #[darling(default)]
    pub rename_all: Option<String>,

    /// Derived fields, computed from the record on read.
    #[darling(multiple)]
    pub computed: Vec<ComputedInput>,
}

/// A derived field: `computed(key = "totalCost", with = "total_cost", ty = "f64")`.
#[derive(Debug, FromMeta)]
pub struct ComputedInput {
    /// Key the derived value is read under.
    pub key: String,
    /// Method on the record computing the value.
    pub with: String,
    /// Value type returned by the method.
    pub ty: String,
}

impl StateInput {
    /// Get the fields as a vector.
    pub fn fields(&self) -> Vec<&FieldInput> {
        self.data
            .as_ref()
            .take_struct()
            .map(|s| s.fields.to_vec())
            .unwrap_or_default()
    }

    /// JSON key for a field, applying `rename` then `rename_all`.
    pub fn key_of(&self, field: &FieldInput) -> String {
        if let Some(rename) = &field.rename {
            return rename.clone();
        }
        let name = field.ident().to_string();
        match self.rename_all.as_deref() {
            Some("camelCase") => to_camel_case(&name),
            _ => name,
        }
    }
}

/// Parsed field-level options.
#[derive(Debug, FromField)]
#[darling(attributes(reqform))]
pub struct FieldInput {
    /// Field identifier.
    pub ident: Option<Ident>,

    /// Field type.
    pub ty: Type,

    /// Rename the field in paths and JSON.
    #[darling(default)]
    pub rename: Option<String>,

    /// Stable identity: assigned on creation, never written through paths.
    #[darling(default)]
    pub id: bool,

    /// Field the form treats as mandatory.
    #[darling(default)]
    pub required: bool,
}

impl FieldInput {
    /// Get the field identifier.
    ///
    /// `supports(struct_named)` guarantees every field has one.
    pub fn ident(&self) -> &Ident {
        self.ident
            .as_ref()
            .unwrap_or_else(|| unreachable!("named struct field without identifier"))
    }
}

/// `snake_case` to `camelCase`, the same way serde renames fields.
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use darling::FromDeriveInput;
    use syn::parse_quote;

    #[test]
    fn test_parse_basic_struct() {
        let input: syn::DeriveInput = parse_quote! {
            struct Delivery {
                location: String,
                additional_instruction: String,
            }
        };

        let parsed = StateInput::from_derive_input(&input).unwrap();
        assert_eq!(parsed.ident.to_string(), "Delivery");

        let fields = parsed.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(parsed.key_of(fields[1]), "additional_instruction");
    }

    #[test]
    fn test_parse_with_attributes() {
        let input: syn::DeriveInput = parse_quote! {
            #[reqform(
                rename_all = "camelCase",
                computed(key = "totalCost", with = "total_cost", ty = "f64")
            )]
            struct NormalItem {
                #[reqform(id)]
                id: String,
                #[reqform(rename = "qty", required)]
                quantity: f64,
                unit_cost: f64,
            }
        };

        let parsed = StateInput::from_derive_input(&input).unwrap();
        let fields = parsed.fields();

        assert!(fields[0].id);
        assert_eq!(parsed.key_of(fields[1]), "qty");
        assert!(fields[1].required);
        assert_eq!(parsed.key_of(fields[2]), "unitCost");

        assert_eq!(parsed.computed.len(), 1);
        assert_eq!(parsed.computed[0].key, "totalCost");
        assert_eq!(parsed.computed[0].with, "total_cost");
        assert_eq!(parsed.computed[0].ty, "f64");
    }

    #[test]
    fn test_parse_rejects_tuple_structs() {
        let input: syn::DeriveInput = parse_quote! {
            struct Pair(String, String);
        };
        assert!(StateInput::from_derive_input(&input).is_err());
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("pap_code"), "papCode");
        assert_eq!(to_camel_case("additional_inclustions"), "additionalInclustions");
        assert_eq!(to_camel_case("title"), "title");
        assert_eq!(to_camel_case("_private"), "private");
    }
}
