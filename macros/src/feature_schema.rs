//! FeatureSchema derive macro implementation
//!
//! Generates the ordered feature names and the numeric vector conversion
//! for a struct of model inputs.

use darling::{ast, FromDeriveInput, FromField};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::utils;

/// Receiver for the struct that derives `FeatureSchema`
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(model_feature), supports(struct_named))]
struct FeatureSchemaReceiver {
    /// The struct identifier
    ident: syn::Ident,
    /// The struct data with parsed fields
    data: ast::Data<(), FeatureFieldReceiver>,
}

/// Receiver for the fields in the struct
#[derive(Debug, FromField)]
#[darling(attributes(model_feature))]
struct FeatureFieldReceiver {
    /// The field identifier
    ident: Option<syn::Ident>,
    /// The field type
    ty: syn::Type,
    /// Name of the feature in the trained model
    #[darling(default, rename = "name")]
    feature_name: Option<String>,
}

/// Process the `FeatureSchema` derive macro
pub fn process_derive_feature_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let receiver = match FeatureSchemaReceiver::from_derive_input(&input) {
        Ok(receiver) => receiver,
        Err(err) => return err.write_errors().into(),
    };

    let ast::Data::Struct(fields) = &receiver.data else {
        unreachable!("Darling ensures this is a struct")
    };

    match generate_feature_schema_impl(&receiver.ident, fields) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate the `FeatureSchema` implementation
fn generate_feature_schema_impl(
    struct_name: &syn::Ident,
    fields: &ast::Fields<FeatureFieldReceiver>,
) -> syn::Result<proc_macro2::TokenStream> {
    let mut feature_names = Vec::with_capacity(fields.len());
    let mut conversions = Vec::with_capacity(fields.len());

    for field in fields.iter() {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };

        // Missing values must be defaulted before the record is built
        if utils::is_option_type(&field.ty) {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "feature fields cannot be optional",
            ));
        }
        if !utils::is_lossless_f64_type(&field.ty) {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "feature fields must be numeric types convertible to f64 without loss",
            ));
        }

        let feature_name = field
            .feature_name
            .clone()
            .unwrap_or_else(|| field_ident.to_string());

        feature_names.push(feature_name);
        conversions.push(quote! { f64::from(self.#field_ident) });
    }

    let width = feature_names.len();

    Ok(quote! {
        impl crate::models::feature::FeatureSchema for #struct_name {
            const WIDTH: usize = #width;

            const FEATURE_NAMES: &'static [&'static str] = &[#(#feature_names),*];

            fn to_vector(&self) -> Vec<f64> {
                vec![#(#conversions),*]
            }
        }
    })
}
