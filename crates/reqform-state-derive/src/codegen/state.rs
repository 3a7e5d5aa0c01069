//! `Node` and `State` implementations for a record.
//!
//! Each field delegates to its own type's `Node`/`State` impls, so records,
//! lists and terminals nest without the macro knowing which is which.

use crate::parse::StateInput;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Type};

struct Computed {
    key: String,
    with: Ident,
    ty: Type,
}

fn computed_fields(input: &StateInput) -> syn::Result<Vec<Computed>> {
    input
        .computed
        .iter()
        .map(|c| {
            Ok(Computed {
                key: c.key.clone(),
                with: syn::parse_str(&c.with)?,
                ty: syn::parse_str(&c.ty)?,
            })
        })
        .collect()
}

/// Generate the `Node` and `State` impls.
pub fn generate(input: &StateInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();
    let lens_name = quote::format_ident!("{}Lens", name);
    let fields = input.fields();
    let computed = computed_fields(input)?;

    let keys: Vec<String> = fields.iter().map(|f| input.key_of(f)).collect();
    let idents: Vec<&Ident> = fields.iter().map(|f| f.ident()).collect();
    let types: Vec<&Type> = fields.iter().map(|f| &f.ty).collect();
    let id_field = fields.iter().find(|f| f.id).map(|f| f.ident());

    let computed_keys: Vec<&str> = computed.iter().map(|c| c.key.as_str()).collect();
    let computed_withs: Vec<&Ident> = computed.iter().map(|c| &c.with).collect();
    let computed_types: Vec<&Type> = computed.iter().map(|c| &c.ty).collect();

    let child_mut_arms = fields.iter().zip(&keys).map(|(f, key)| {
        let ident = f.ident();
        if f.id {
            quote! { #key => ::std::result::Result::Err(::reqform_state::StepError::ReadOnly), }
        } else {
            quote! { #key => ::std::result::Result::Ok(&mut self.#ident as &mut dyn ::reqform_state::Node), }
        }
    });

    let adopt = fields.iter().map(|f| {
        let ident = f.ident();
        if f.id {
            quote! { self.#ident = ::std::clone::Clone::clone(&previous.#ident); }
        } else {
            quote! { ::reqform_state::State::adopt_ids(&mut self.#ident, &previous.#ident); }
        }
    });

    let has_id = id_field.is_some();
    let reissue = fields.iter().map(|f| {
        let ident = f.ident();
        if f.id {
            quote! { self.#ident = ::reqform_state::new_id(); }
        } else {
            quote! { ::reqform_state::State::reissue_ids(&mut self.#ident); }
        }
    });
    let stable_id = match id_field {
        Some(id) => quote! {
            fn stable_id(&self) -> ::std::option::Option<&str> {
                ::std::option::Option::Some(self.#id.as_str())
            }
        },
        None => TokenStream::new(),
    };

    let field_shapes = fields.iter().zip(&keys).map(|(f, key)| {
        let ty = &f.ty;
        let required = f.required;
        let access = if f.id {
            quote! { ::reqform_state::Access::Identity }
        } else {
            quote! { ::reqform_state::Access::Writable }
        };
        quote! {
            ::reqform_state::FieldShape {
                key: #key,
                shape: <#ty as ::reqform_state::State>::shape(),
                access: #access,
                required: #required,
            }
        }
    });

    Ok(quote! {
        impl ::reqform_state::Node for #name {
            fn child(
                &self,
                seg: &::reqform_state::Seg,
            ) -> ::std::result::Result<&dyn ::reqform_state::Node, ::reqform_state::StepError> {
                match seg {
                    ::reqform_state::Seg::Key(key) => match key.as_str() {
                        #(#keys => ::std::result::Result::Ok(&self.#idents as &dyn ::reqform_state::Node),)*
                        #(#computed_keys => ::std::result::Result::Err(
                            ::reqform_state::StepError::Fault(::reqform_state::Fault::Terminal),
                        ),)*
                        other => ::std::result::Result::Err(::reqform_state::StepError::Fault(
                            ::reqform_state::Fault::UnknownField(::std::string::ToString::to_string(other)),
                        )),
                    },
                    ::reqform_state::Seg::Index(index) => ::std::result::Result::Err(
                        ::reqform_state::StepError::Fault(::reqform_state::Fault::UnexpectedIndex(*index)),
                    ),
                }
            }

            fn child_mut(
                &mut self,
                seg: &::reqform_state::Seg,
            ) -> ::std::result::Result<&mut dyn ::reqform_state::Node, ::reqform_state::StepError> {
                match seg {
                    ::reqform_state::Seg::Key(key) => match key.as_str() {
                        #(#child_mut_arms)*
                        #(#computed_keys => ::std::result::Result::Err(::reqform_state::StepError::ReadOnly),)*
                        other => ::std::result::Result::Err(::reqform_state::StepError::Fault(
                            ::reqform_state::Fault::UnknownField(::std::string::ToString::to_string(other)),
                        )),
                    },
                    ::reqform_state::Seg::Index(index) => ::std::result::Result::Err(
                        ::reqform_state::StepError::Fault(::reqform_state::Fault::UnexpectedIndex(*index)),
                    ),
                }
            }

            fn computed(
                &self,
                key: &str,
            ) -> ::std::option::Option<::reqform_state::StateResult<::reqform_state::__private::serde_json::Value>> {
                match key {
                    #(#computed_keys => ::std::option::Option::Some(
                        ::reqform_state::computed_value::<#computed_types>(&self.#computed_withs()),
                    ),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn to_value(&self) -> ::reqform_state::StateResult<::reqform_state::__private::serde_json::Value> {
                ::std::result::Result::Ok(::reqform_state::__private::serde_json::to_value(self)?)
            }

            fn assign(
                &mut self,
                value: ::reqform_state::__private::serde_json::Value,
            ) -> ::std::result::Result<(), ::reqform_state::Mismatch> {
                let mut next: Self = ::reqform_state::decode_record(value, #name_str)?;
                if <Self as ::reqform_state::State>::CARRIES_IDS {
                    ::reqform_state::State::adopt_ids(&mut next, self);
                }
                *self = next;
                ::std::result::Result::Ok(())
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }

        impl ::reqform_state::State for #name {
            type Lens = #lens_name;

            const CARRIES_IDS: bool = #has_id #(|| <#types as ::reqform_state::State>::CARRIES_IDS)*;

            fn shape() -> ::reqform_state::Shape {
                ::reqform_state::Shape::Record(::reqform_state::RecordShape {
                    name: #name_str,
                    fields: ::std::vec![
                        #(#field_shapes,)*
                        #(::reqform_state::FieldShape {
                            key: #computed_keys,
                            shape: <#computed_types as ::reqform_state::State>::shape(),
                            access: ::reqform_state::Access::Derived,
                            required: false,
                        },)*
                    ],
                })
            }

            fn reissue_ids(&mut self) {
                #(#reissue)*
            }

            #[allow(unused_variables)]
            fn adopt_ids(&mut self, previous: &Self) {
                if <Self as ::reqform_state::State>::CARRIES_IDS {
                    #(#adopt)*
                }
            }

            #stable_id
        }
    })
}
