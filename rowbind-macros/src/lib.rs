//! Procedural macros for Rowbind
//!
//! This crate provides the `Record` derive, which generates the field table
//! `rowbind_core` uses to discover columns.

use proc_macro::TokenStream;

mod record;

/// Derive macro for the `Record` trait
///
/// Field keys are given per namespace with `#[tag(...)]`. A key of `"-"`
/// excludes the field from that namespace, `flatten` marks a field whose type
/// is itself a `Record` and whose columns are spliced in place. A `flatten`
/// field that also carries a real key is mapped as one column under that key,
/// which needs the embedded type to implement `Serialize` and `Deserialize`.
/// Fields without any tag are not mapped.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Record, Serialize, Deserialize)]
/// #[tag(table = "feeds")]
/// struct Feed {
///     #[tag(sql = "id", cql = "id")]
///     id: i64,
///     #[tag(sql = "url", cql = "-")]
///     url: String,
///     #[tag(flatten)]
///     ftp: Ftp,
/// }
/// ```
#[proc_macro_derive(Record, attributes(tag))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
