//! Utility functions for procedural macros
//!
//! Type inspection helpers used when generating feature vector code.

use syn::Type;

/// Numeric primitives that convert to `f64` without loss via `f64::from`
const LOSSLESS_F64_TYPES: [&str; 8] = ["i8", "i16", "i32", "u8", "u16", "u32", "f32", "f64"];

/// Check if a type is an Option<T>
pub fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => {
            let path = &type_path.path;
            if path.segments.len() == 1 {
                let segment = &path.segments[0];
                segment.ident == "Option"
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Check if a type is a numeric primitive that `f64::from` accepts
pub fn is_lossless_f64_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        let path = &type_path.path;
        if path.segments.len() == 1 {
            let ident = path.segments[0].ident.to_string();
            return LOSSLESS_F64_TYPES.contains(&ident.as_str());
        }
    }
    false
}
