//! Code generation for State derive macro.

mod lens;
mod state;

use crate::parse::StateInput;
use darling::FromDeriveInput;
use proc_macro2::TokenStream;
use std::collections::HashSet;
use syn::DeriveInput;

/// Main entry point for code generation.
pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let parsed = StateInput::from_derive_input(input)
        .map_err(|e| syn::Error::new_spanned(input, e.to_string()))?;

    validate(&parsed)?;

    let lens = lens::generate(&parsed)?;
    let state = state::generate(&parsed)?;
    Ok(quote::quote! {
        #lens
        #state
    })
}

fn validate(input: &StateInput) -> syn::Result<()> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(State)] does not support generic records",
        ));
    }

    if let Some(rule) = input.rename_all.as_deref() {
        if rule != "camelCase" && rule != "snake_case" {
            return Err(syn::Error::new_spanned(
                &input.ident,
                format!("unsupported rename_all rule `{rule}`; use \"camelCase\" or \"snake_case\""),
            ));
        }
    }

    let fields = input.fields();
    let ids: Vec<_> = fields.iter().filter(|f| f.id).collect();
    if ids.len() > 1 {
        return Err(syn::Error::new_spanned(
            ids[1].ident(),
            "a record can have at most one #[reqform(id)] field",
        ));
    }
    if let Some(id) = ids.first() {
        if id.required {
            return Err(syn::Error::new_spanned(
                id.ident(),
                "#[reqform(id)] fields are assigned automatically and cannot be required",
            ));
        }
    }

    let mut keys = HashSet::new();
    for field in &fields {
        let key = input.key_of(field);
        if !keys.insert(key.clone()) {
            return Err(syn::Error::new_spanned(
                field.ident(),
                format!("duplicate key `{key}`"),
            ));
        }
    }
    for computed in &input.computed {
        if fields.iter().any(|f| f.ident() == computed.with.as_str()) {
            return Err(syn::Error::new_spanned(
                &input.ident,
                format!("computed method `{}` shadows a field lens", computed.with),
            ));
        }
        if !keys.insert(computed.key.clone()) {
            return Err(syn::Error::new_spanned(
                &input.ident,
                format!("computed key `{}` collides with another field", computed.key),
            ));
        }
    }
    Ok(())
}
