//! Lens code generation.
//!
//! Generates `{Name}Lens`: one method per field returning that field's own
//! lens type, so chains like `doc.activity().schedule().date_start()` are
//! checked by the compiler.

use crate::parse::StateInput;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Type};

/// Generate the lens struct and its trait impls.
pub fn generate(input: &StateInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let lens_name = format_ident!("{}Lens", name);
    let vis = &input.vis;
    let doc = format!("Typed lens onto a [`{name}`].");

    let field_methods = input.fields().into_iter().map(|field| {
        let ident = field.ident();
        let ty = &field.ty;
        let key = input.key_of(field);
        let doc = format!("Lens onto `{key}`.");
        if field.id {
            quote! {
                #[doc = #doc]
                pub fn #ident(&self) -> ::reqform_state::ReadOnly<#ty> {
                    ::reqform_state::Lens::from_path(self.path.clone().key(#key))
                }
            }
        } else {
            quote! {
                #[doc = #doc]
                pub fn #ident(&self) -> <#ty as ::reqform_state::State>::Lens {
                    ::reqform_state::Lens::from_path(self.path.clone().key(#key))
                }
            }
        }
    });

    let computed_methods = input
        .computed
        .iter()
        .map(|c| {
            let method: Ident = syn::parse_str(&c.with)?;
            let ty: Type = syn::parse_str(&c.ty)?;
            let key = &c.key;
            let doc = format!("Lens onto the derived `{key}`.");
            Ok(quote! {
                #[doc = #doc]
                pub fn #method(&self) -> ::reqform_state::ReadOnly<#ty> {
                    ::reqform_state::Lens::from_path(self.path.clone().key(#key))
                }
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        #[doc = #doc]
        #[derive(Clone, Debug, PartialEq)]
        #vis struct #lens_name {
            path: ::reqform_state::Path,
        }

        impl #lens_name {
            #(#field_methods)*

            #(#computed_methods)*
        }

        impl ::reqform_state::Lens for #lens_name {
            fn from_path(path: ::reqform_state::Path) -> Self {
                Self { path }
            }

            fn path(&self) -> &::reqform_state::Path {
                &self.path
            }
        }

        impl ::reqform_state::Readable for #lens_name {
            type Value = ::std::sync::Arc<#name>;

            fn get(
                &self,
                root: &dyn ::reqform_state::Node,
            ) -> ::reqform_state::StateResult<Self::Value> {
                ::reqform_state::read_record::<#name>(root, &self.path)
            }
        }
    })
}
