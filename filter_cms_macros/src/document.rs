use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Ident, LitStr};

pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match named_fields(&input) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let collection = extract_collection(&input);

    let id_field = match find_marked(&fields, "id").or_else(|| find_named(&fields, "id")) {
        Some(ident) => ident,
        None => {
            return syn::Error::new_spanned(
                name,
                "Document derive: no field marked with #[document(id)] and no field named `id`",
            )
            .to_compile_error()
            .into()
        }
    };

    let ordered_impl = find_marked(&fields, "order").map(|order_field| {
        quote! {
            impl filter_cms::Ordered for #name {
                fn order(&self) -> u32 {
                    self.#order_field
                }

                fn set_order(&mut self, order: u32) {
                    self.#order_field = order;
                }
            }
        }
    });

    let expanded = quote! {
        impl filter_cms::Document for #name {
            const COLLECTION: &'static str = #collection;

            fn id(&self) -> &str {
                &self.#id_field
            }
        }

        #ordered_impl
    };

    TokenStream::from(expanded)
}

fn named_fields(input: &DeriveInput) -> syn::Result<Vec<Field>> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            return Ok(fields.named.iter().cloned().collect());
        }
    }

    Err(syn::Error::new_spanned(
        &input.ident,
        "Document derive: only structs with named fields are supported",
    ))
}

fn extract_collection(input: &DeriveInput) -> String {
    for attr in &input.attrs {
        if !attr.path().is_ident("document") {
            continue;
        }

        let mut collection = None;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
            }
            Ok(())
        });

        if let Some(c) = collection {
            return c;
        }
    }

    let name = input.ident.to_string();
    format!("{}s", to_snake_case(&name))
}

/// Field carrying `#[document(<marker>)]`.
fn find_marked(fields: &[Field], marker: &str) -> Option<Ident> {
    fields.iter().find_map(|field| {
        let marked = field.attrs.iter().any(|attr| {
            if !attr.path().is_ident("document") {
                return false;
            }
            let mut hit = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(marker) {
                    hit = true;
                }
                Ok(())
            });
            hit
        });
        if marked {
            field.ident.clone()
        } else {
            None
        }
    })
}

fn find_named(fields: &[Field], wanted: &str) -> Option<Ident> {
    fields
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| *ident == wanted)
        .cloned()
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
