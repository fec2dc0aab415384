//! 字段注入派生宏实现

use crate::utils::{extract_contract_type, parse_marker};
use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

/// 字段标记属性名称
pub const MARKER: &str = "auto_inject";

/// 实现 #[derive(AutoInjectable)]
pub fn derive_auto_injectable_impl(input: DeriveInput) -> TokenStream {
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "AutoInjectable 只支持具名字段的结构体",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "AutoInjectable 只能用于结构体",
            ))
        }
    };

    let mut points = Vec::new();
    let mut assign_arms = Vec::new();

    for field in fields {
        let Some(marker) = parse_marker(field, MARKER)? else {
            continue;
        };

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.unraw().to_string();

        let contract = extract_contract_type(&field.ty).ok_or_else(|| {
            syn::Error::new_spanned(
                &field.ty,
                format!("#[{}] 字段必须声明为 Option<Arc<T>>", MARKER),
            )
        })?;

        let point = match &marker.key {
            Some(key) => quote! {
                ::di_abstractions::InjectionPoint::of::<#contract>(#field_name).with_key(#key)
            },
            None => quote! {
                ::di_abstractions::InjectionPoint::of::<#contract>(#field_name)
            },
        };
        points.push(point);

        assign_arms.push(quote! {
            #field_name => {
                self.#ident = ::core::option::Option::Some(instance.into_shared::<#contract>()?);
                ::core::result::Result::Ok(())
            }
        });
    }

    Ok(quote! {
        impl #impl_generics ::di_abstractions::Injectable for #struct_name #ty_generics #where_clause {
            fn injection_points() -> ::std::vec::Vec<::di_abstractions::InjectionPoint> {
                ::std::vec![#(#points),*]
            }

            fn assign(
                &mut self,
                field: &str,
                instance: ::di_abstractions::ProvidedInstance,
            ) -> ::core::result::Result<(), ::di_abstractions::AssignError> {
                match field {
                    #(#assign_arms)*
                    _ => {
                        let _ = instance;
                        ::core::result::Result::Err(::di_abstractions::AssignError::UnknownField {
                            field: ::std::string::ToString::to_string(field),
                        })
                    }
                }
            }
        }
    })
}
