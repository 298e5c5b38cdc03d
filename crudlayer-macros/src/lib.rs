//! Procedural macros for the crudlayer project.
//!
//! This crate provides `#[derive(Record)]`, which implements `crudlayer::record::Record` for a
//! struct with named fields. The identifier is the field annotated `#[record(id)]`, or failing
//! that, the field named `id`. It must be of type `ObjectId`.

#[allow(unused_extern_crates)]
extern crate self as crudlayer_macros;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Ident, parse_macro_input};

#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_record(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs",
            ));
        }
    };

    let id_field = id_field(&input.ident, fields.iter())?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::crudlayer::record::Record for #name #ty_generics #where_clause {
            fn id(&self) -> ::crudlayer::bson::oid::ObjectId {
                self.#id_field
            }

            fn set_id(&mut self, id: ::crudlayer::bson::oid::ObjectId) {
                self.#id_field = id;
            }
        }
    })
}

/// Picks the identifier field: the one marked `#[record(id)]`, else the one named `id`.
fn id_field<'a>(
    name: &Ident,
    fields: impl Iterator<Item = &'a Field> + Clone,
) -> syn::Result<&'a Ident> {
    let mut marked = None;

    for field in fields.clone() {
        if is_marked_id(field)? {
            if marked.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field may be marked #[record(id)]",
                ));
            }
            marked = field.ident.as_ref();
        }
    }

    marked
        .or_else(|| {
            fields
                .filter_map(|field| field.ident.as_ref())
                .find(|ident| *ident == "id")
        })
        .ok_or_else(|| {
            syn::Error::new_spanned(
                name,
                "Record needs a field named `id` or a field marked #[record(id)]",
            )
        })
}

fn is_marked_id(field: &Field) -> syn::Result<bool> {
    let mut marked = false;

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                marked = true;
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute"))
            }
        })?;
    }

    Ok(marked)
}
