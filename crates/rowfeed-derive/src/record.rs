use crate::util::where_clause_with_bounds;
use convert_case::{Case, Casing};
use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Generics, Ident, Type};

///
/// RecordInput
///

#[derive(FromDeriveInput)]
#[darling(attributes(record), supports(struct_named))]
struct RecordInput {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, RecordField>,

    #[darling(default)]
    rename_all: Option<String>,
}

///
/// RecordField
///

#[derive(FromField)]
#[darling(attributes(column))]
struct RecordField {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    rename: Option<String>,

    #[darling(default)]
    skip: bool,
}

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.write_errors(),
    }
}

fn expand(input: &DeriveInput) -> darling::Result<TokenStream> {
    let record = RecordInput::from_derive_input(input)?;
    let ident = &record.ident;
    let (impl_generics, ty_generics, where_clause) = record.generics.split_for_impl();

    let Data::Struct(fields) = &record.data else {
        return Err(darling::Error::unsupported_shape("enum").with_span(ident));
    };

    let mut columns = Vec::new();
    let mut bounds = Vec::new();
    let mut names = Vec::new();

    for field in fields.iter().filter(|field| !field.skip) {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_ty = &field.ty;
        let name = column_name(field, field_ident, record.rename_all.as_deref())?;

        if names.contains(&name) {
            return Err(
                darling::Error::custom(format!("duplicate column name `{name}`"))
                    .with_span(field_ident),
            );
        }

        columns.push(quote! {
            ::rowfeed::column::Column::from_field::<#field_ty>(
                #name,
                |record: &Self| &record.#field_ident,
            )
        });
        bounds.push(quote!(#field_ty: ::rowfeed::traits::FieldValue + 'static));
        names.push(name);
    }

    let where_clause = where_clause_with_bounds(where_clause, &bounds);

    Ok(quote! {
        impl #impl_generics ::rowfeed::traits::Record for #ident #ty_generics #where_clause {
            fn describe() -> ::std::vec::Vec<::rowfeed::column::Column<Self>> {
                ::std::vec![
                    #(#columns),*
                ]
            }
        }
    })
}

fn column_name(
    field: &RecordField,
    field_ident: &Ident,
    rename_all: Option<&str>,
) -> darling::Result<String> {
    if let Some(rename) = &field.rename {
        if rename.trim().is_empty() {
            return Err(
                darling::Error::custom("column rename cannot be empty").with_span(field_ident)
            );
        }

        return Ok(rename.clone());
    }

    let name = field_ident.to_string();
    let name = name.strip_prefix("r#").unwrap_or(&name);

    match rename_all {
        None => Ok(name.to_string()),
        Some(rule) => apply_case(name, rule).ok_or_else(|| {
            darling::Error::custom(format!("unknown rename_all rule `{rule}`"))
                .with_span(field_ident)
        }),
    }
}

fn apply_case(name: &str, rule: &str) -> Option<String> {
    let renamed = match rule {
        "PascalCase" => name.to_case(Case::Pascal),
        "camelCase" => name.to_case(Case::Camel),
        "snake_case" => name.to_case(Case::Snake),
        "SCREAMING_SNAKE_CASE" => name.to_case(Case::UpperSnake),
        "kebab-case" => name.to_case(Case::Kebab),
        "lowercase" => name.to_case(Case::Flat),
        "UPPERCASE" => name.to_case(Case::UpperFlat),
        _ => return None,
    };

    Some(renamed)
}
