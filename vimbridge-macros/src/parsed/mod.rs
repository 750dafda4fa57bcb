#[allow(unused_imports)]
use super::*;

mod enumeration;
mod field;
mod record;

pub(crate) use enumeration::ParsedEnum;
pub(crate) use record::ParsedRecord;

/// Hierarchy a derive targets; decides which `#[bridge(...)]` keys are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Schema,
    Legacy,
}

impl Side {
    fn tokens(self) -> TokenStream2 {
        match self {
            Side::Schema => quote!(::vimbridge::types::Side::Schema),
            Side::Legacy => quote!(::vimbridge::types::Side::Legacy),
        }
    }

    fn record_derive(self) -> &'static str {
        match self {
            Side::Schema => "SchemaMessage",
            Side::Legacy => "LegacyObject",
        }
    }

    fn enum_derive(self) -> &'static str {
        match self {
            Side::Schema => "SchemaEnum",
            Side::Legacy => "LegacyEnum",
        }
    }
}

fn lit(value: &str) -> LitStr {
    LitStr::new(value, Span::call_site())
}

fn option_lit(value: Option<&str>) -> TokenStream2 {
    match value {
        Some(value) => {
            let value = lit(value);
            quote!(::std::option::Option::Some(#value))
        }
        None => quote!(::std::option::Option::None),
    }
}
