use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Path, Result, Type, parse_macro_input};

mod naming;
mod parsed;

use parsed::{ParsedEnum, ParsedRecord, Side};

/// Emits the record descriptor, reflection impls and registration for a schema message.
///
/// Container: `#[bridge(legacy = "LegacyTypeName")]`.
/// Fields: `#[bridge(name = "legacyFieldName")]`, `#[bridge(shape = "LegacyTypeName")]`.
#[proc_macro_derive(SchemaMessage, attributes(bridge))]
pub fn derive_schema_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedRecord::from_input(&input, Side::Schema) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Emits the record descriptor and reflection impls for a legacy client type.
///
/// Container: `#[bridge(name = "WireTypeName")]`.
/// Fields: `#[bridge(embed)]`, `#[bridge(rename = "wireName")]`.
#[proc_macro_derive(LegacyObject, attributes(bridge))]
pub fn derive_legacy_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedRecord::from_input(&input, Side::Legacy) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Bridges a schema enum to its legacy counterpart named in `#[bridge(legacy = "path::To::Enum")]`.
#[proc_macro_derive(SchemaEnum, attributes(bridge))]
pub fn derive_schema_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedEnum::from_input(&input, Side::Schema) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[proc_macro_derive(LegacyEnum, attributes(bridge))]
pub fn derive_legacy_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedEnum::from_input(&input, Side::Legacy) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
