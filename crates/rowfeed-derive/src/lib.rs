use proc_macro::TokenStream;

mod record;
mod util;

/// Derive an automatic column mapping: one column per named field, in
/// declaration order.
///
/// Container attribute: `#[record(rename_all = "PascalCase")]`.
/// Field attributes: `#[column(rename = "Name")]`, `#[column(skip)]`.
#[proc_macro_derive(Record, attributes(record, column))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
