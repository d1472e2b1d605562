// Record derive implementation
//
// Turns `#[tag(...)]` annotations into a `Record::fields()` table of
// accessor-backed field definitions.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse2, Attribute, Data, DeriveInput, Error, Field, Fields, LitStr, Result};

/// Parsed field-level `#[tag(...)]` annotations
#[derive(Debug, Default)]
struct FieldTags {
    flatten: bool,
    keys: Vec<(String, LitStr)>,
}

/// Parse struct-level `#[tag(table = "...")]`
fn parse_table(input: &DeriveInput) -> Result<Option<LitStr>> {
    let mut table = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("tag")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                table = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("expected `table = \"...\"` on a record"))
            }
        })?;
    }
    Ok(table)
}

/// Parse every `#[tag(...)]` on a field
fn parse_field_tags(attrs: &[Attribute]) -> Result<FieldTags> {
    let mut tags = FieldTags::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("tag")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("flatten") {
                tags.flatten = true;
                return Ok(());
            }

            let namespace = meta
                .path
                .get_ident()
                .map(|ident| ident.to_string())
                .ok_or_else(|| meta.error("expected a namespace such as `sql = \"id\"`"))?;
            let key = meta.value()?.parse::<LitStr>()?;

            if tags.keys.iter().any(|(ns, _)| *ns == namespace) {
                return Err(meta.error(format!("namespace `{namespace}` is tagged twice")));
            }
            tags.keys.push((namespace, key));
            Ok(())
        })?;
    }
    Ok(tags)
}

fn field_entry(field: &Field) -> Result<Option<TokenStream>> {
    let tags = parse_field_tags(&field.attrs)?;
    let Some(ident) = &field.ident else {
        return Err(Error::new_spanned(field, "Record fields must be named"));
    };
    let ty = &field.ty;
    let name = ident.to_string();
    let namespaces = tags.keys.iter().map(|(ns, _)| ns);
    let keys = tags.keys.iter().map(|(_, key)| key);
    let tag_table = quote! { &[#((#namespaces, #keys)),*] };

    let entry = if tags.flatten {
        // A key other than the skip marker maps the whole record as one column
        let compound = tags.keys.iter().any(|(_, key)| key.value() != "-");
        let constructor = if compound {
            quote! { embedded_with_value }
        } else {
            quote! { embedded }
        };
        quote! {
            ::rowbind_core::FieldDef::#constructor::<#ty>(
                #name,
                #tag_table,
                |record: &Self| &record.#ident,
                |record: &mut Self| &mut record.#ident,
            )
        }
    } else if tags.keys.is_empty() {
        return Ok(None);
    } else {
        quote! {
            ::rowbind_core::FieldDef::value(
                #name,
                #tag_table,
                ::rowbind_core::Accessor::new(
                    |record: &Self| &record.#ident,
                    |record: &mut Self| &mut record.#ident,
                ),
            )
        }
    };
    Ok(Some(entry))
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new_spanned(
                    name,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => return Err(Error::new_spanned(name, "Record can only be derived for structs")),
    };

    let mut entries = Vec::with_capacity(fields.len());
    for field in fields {
        if let Some(entry) = field_entry(field)? {
            entries.push(entry);
        }
    }

    let table_fn = parse_table(&input)?.map(|table| {
        quote! {
            fn table() -> ::std::option::Option<&'static str> {
                ::std::option::Option::Some(#table)
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::rowbind_core::Record for #name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::rowbind_core::FieldDef<Self>> {
                ::std::vec![#(#entries),*]
            }

            #table_fn

            fn record_name() -> &'static str {
                #name_str
            }
        }
    })
}

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = match parse2::<DeriveInput>(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    expand(input).unwrap_or_else(Error::into_compile_error)
}
