use proc_macro2::TokenStream;
use quote::quote;
use syn::WhereClause;

pub fn where_clause_with_bounds(
    where_clause: Option<&WhereClause>,
    bounds: &[TokenStream],
) -> TokenStream {
    if bounds.is_empty() {
        return where_clause.map_or_else(|| quote!(), |wc| quote!(#wc));
    }

    let preds = where_clause
        .into_iter()
        .flat_map(|wc| wc.predicates.iter());

    quote!(where #(#preds,)* #(#bounds),*)
}
