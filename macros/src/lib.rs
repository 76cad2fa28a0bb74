//! Procedural macros for the cvd-risk crate
//!
//! This crate provides the derive that turns a plain struct of numeric
//! clinical features into an ordered, named model input vector.

use proc_macro::TokenStream;

mod feature_schema;
mod utils;

/// Derive macro for ordered model feature vectors
///
/// Field declaration order is the vector order. Each field may carry a
/// `#[model_feature(name = "...")]` attribute giving the name the model was
/// trained with; without it the Rust field name is used.
///
/// The generated code implements `crate::models::feature::FeatureSchema`,
/// so the derive is only usable inside the cvd-risk crate.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(FeatureSchema)]
/// struct FeatureRecord {
///     #[model_feature(name = "age")]
///     age: i32,
///
///     #[model_feature(name = "BPMeds")]
///     bp_meds: u8,
///
///     #[model_feature(name = "BMI")]
///     bmi: f64,
/// }
/// ```
#[proc_macro_derive(FeatureSchema, attributes(model_feature))]
pub fn derive_feature_schema(input: TokenStream) -> TokenStream {
    feature_schema::process_derive_feature_schema(input)
}
