#[allow(unused_imports)]
use super::*;

use crate::naming::{lower_first, strip_enum_prefix};

struct ParsedVariant {
    ident: Ident,
    /// Legacy wire identifier (legacy enums only).
    wire: String,
    /// Legacy variant this schema variant maps to; `None` for the unspecified variant.
    legacy_variant: Option<Ident>,
}

pub(crate) struct ParsedEnum {
    name: Ident,
    side: Side,
    /// Wire type name of a legacy enum.
    type_name: String,
    legacy: Option<Path>,
    variants: Vec<ParsedVariant>,
}

impl ParsedEnum {
    pub(crate) fn from_input(input: &DeriveInput, side: Side) -> Result<Self> {
        let derive = side.enum_derive();
        let Data::Enum(data) = &input.data else {
            return Err(Error::new(
                input.ident.span(),
                format!("{derive} can only be derived for enums"),
            ));
        };
        if !input.generics.params.is_empty() {
            return Err(Error::new(
                input.generics.span(),
                format!("{derive} does not support generic types"),
            ));
        }
        if data.variants.is_empty() {
            return Err(Error::new(
                input.ident.span(),
                format!("{derive} requires at least one variant"),
            ));
        }

        let mut type_name = None;
        let mut legacy = None;
        for attr in &input.attrs {
            if attr.path().is_ident("bridge") {
                attr.parse_nested_meta(|meta| {
                    if side == Side::Schema && meta.path.is_ident("legacy") {
                        let value: LitStr = meta.value()?.parse()?;
                        legacy = Some(value.parse::<Path>()?);
                    } else if side == Side::Legacy && meta.path.is_ident("name") {
                        let value: LitStr = meta.value()?.parse()?;
                        type_name = Some(value.value());
                    } else {
                        return Err(meta.error(format!("unknown {derive} container attribute")));
                    }
                    Ok(())
                })?;
            }
        }

        let enum_name = input.ident.to_string();
        let mut variants = Vec::with_capacity(data.variants.len());
        let mut unspecified: Option<Ident> = None;

        for variant in &data.variants {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(Error::new(
                    variant.span(),
                    format!("{derive} requires fieldless variants"),
                ));
            }

            let mut rename = None;
            let mut marked_unspecified = false;
            for attr in &variant.attrs {
                if attr.path().is_ident("bridge") {
                    attr.parse_nested_meta(|meta| {
                        if side == Side::Legacy && meta.path.is_ident("rename") {
                            let value: LitStr = meta.value()?.parse()?;
                            rename = Some(value.value());
                        } else if side == Side::Schema && meta.path.is_ident("unspecified") {
                            marked_unspecified = true;
                        } else {
                            return Err(meta.error(format!("unknown {derive} variant attribute")));
                        }
                        Ok(())
                    })?;
                }
            }

            let ident_text = variant.ident.to_string();
            let is_unspecified = side == Side::Schema && (marked_unspecified || ident_text.contains("Unspecified"));
            if is_unspecified {
                if let Some(previous) = &unspecified {
                    return Err(Error::new(
                        variant.ident.span(),
                        format!("{derive} allows exactly one unspecified variant, `{previous}` is already one"),
                    ));
                }
                unspecified = Some(variant.ident.clone());
            }

            let legacy_variant = (side == Side::Schema && !is_unspecified)
                .then(|| Ident::new(strip_enum_prefix(&enum_name, &ident_text), variant.ident.span()));

            variants.push(ParsedVariant {
                ident: variant.ident.clone(),
                wire: rename.unwrap_or_else(|| lower_first(&ident_text)),
                legacy_variant,
            });
        }

        if side == Side::Schema {
            if legacy.is_none() {
                return Err(Error::new(
                    input.ident.span(),
                    "SchemaEnum requires #[bridge(legacy = \"path::to::LegacyEnum\")]",
                ));
            }
            if unspecified.is_none() {
                return Err(Error::new(
                    input.ident.span(),
                    "SchemaEnum requires an `Unspecified` variant (or one marked #[bridge(unspecified)])",
                ));
            }
        }

        Ok(Self {
            name: input.ident.clone(),
            side,
            type_name: type_name.unwrap_or(enum_name),
            legacy,
            variants,
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        match (self.side, &self.legacy) {
            (Side::Schema, Some(legacy)) => self.emit_schema(legacy),
            _ => self.emit_legacy(),
        }
    }

    fn emit_schema(&self, legacy: &Path) -> TokenStream2 {
        let name = &self.name;
        let name_lit = lit(&self.name.to_string());
        let all: Vec<&Ident> = self.variants.iter().map(|variant| &variant.ident).collect();
        let unspecified = self
            .variants
            .iter()
            .find(|variant| variant.legacy_variant.is_none())
            .map(|variant| &variant.ident);

        let mapped: Vec<&ParsedVariant> = self
            .variants
            .iter()
            .filter(|variant| variant.legacy_variant.is_some())
            .collect();
        let mapped_idents: Vec<&Ident> = mapped.iter().map(|variant| &variant.ident).collect();
        let mapped_lits: Vec<LitStr> = mapped.iter().map(|variant| lit(&variant.ident.to_string())).collect();
        let legacy_idents: Vec<&Ident> = mapped.iter().filter_map(|variant| variant.legacy_variant.as_ref()).collect();

        quote! {
            impl ::vimbridge::SchemaEnum for #name {
                type Legacy = #legacy;

                const NAME: &'static str = #name_lit;

                const UNSPECIFIED: Self = Self::#unspecified;

                fn variants() -> &'static [Self] {
                    &[#(Self::#all),*]
                }

                fn number(&self) -> i32 {
                    match self {
                        #(Self::#all => Self::#all as i32,)*
                    }
                }

                fn from_number(number: i32) -> ::std::option::Option<Self> {
                    #(
                        if number == Self::#all as i32 {
                            return ::std::option::Option::Some(Self::#all);
                        }
                    )*
                    ::std::option::Option::None
                }

                fn to_legacy(&self) -> ::std::result::Result<#legacy, ::vimbridge::EnumUndefined> {
                    match self {
                        #(Self::#mapped_idents => ::std::result::Result::Ok(#legacy::#legacy_idents),)*
                        _ => ::std::result::Result::Err(::vimbridge::EnumUndefined::new(
                            <Self as ::vimbridge::SchemaEnum>::NAME,
                            ::vimbridge::SchemaEnum::number(self),
                        )),
                    }
                }

                fn from_legacy(&mut self, value: &str) {
                    #(
                        if value == ::vimbridge::LegacyEnum::as_str(&#legacy::#legacy_idents) {
                            *self = Self::#mapped_idents;
                            return;
                        }
                    )*
                }

                fn bridge_table() -> ::std::vec::Vec<(&'static str, &'static str)> {
                    ::std::vec![
                        #((#mapped_lits, ::vimbridge::LegacyEnum::as_str(&#legacy::#legacy_idents)),)*
                    ]
                }
            }

            impl ::vimbridge::Reflect for #name {
                fn shape() -> ::vimbridge::types::Shape {
                    ::vimbridge::types::Shape::Enum {
                        name: #name_lit,
                        side: ::vimbridge::types::Side::Schema,
                    }
                }

                fn reflect(&self) -> ::vimbridge::Value {
                    ::vimbridge::enums::reflect_schema_enum(self)
                }

                fn absorb(&mut self, value: ::vimbridge::Value) -> ::std::result::Result<(), ::vimbridge::ConvertError> {
                    ::vimbridge::enums::absorb_schema_enum(self, value)
                }

                fn instantiate(value: ::vimbridge::Value) -> ::std::result::Result<Self, ::vimbridge::ConvertError> {
                    ::vimbridge::enums::instantiate_schema_enum(value)
                }
            }

            ::vimbridge::inventory::submit! {
                ::vimbridge::registry::EnumRegistration {
                    type_name: #name_lit,
                    legacy_type_name: <#legacy as ::vimbridge::LegacyEnum>::NAME,
                    table_fn: <#name as ::vimbridge::SchemaEnum>::bridge_table,
                }
            }
        }
    }

    fn emit_legacy(&self) -> TokenStream2 {
        let name = &self.name;
        let type_name_lit = lit(&self.type_name);
        let idents: Vec<&Ident> = self.variants.iter().map(|variant| &variant.ident).collect();
        let wires: Vec<LitStr> = self.variants.iter().map(|variant| lit(&variant.wire)).collect();

        quote! {
            impl ::vimbridge::LegacyEnum for #name {
                const NAME: &'static str = #type_name_lit;

                fn as_str(&self) -> &'static str {
                    match self {
                        #(Self::#idents => #wires,)*
                    }
                }

                fn parse(value: &str) -> ::std::option::Option<Self> {
                    match value {
                        #(#wires => ::std::option::Option::Some(Self::#idents),)*
                        _ => ::std::option::Option::None,
                    }
                }

                fn identifiers() -> &'static [&'static str] {
                    &[#(#wires),*]
                }
            }

            impl ::vimbridge::Reflect for #name {
                fn shape() -> ::vimbridge::types::Shape {
                    ::vimbridge::types::Shape::Enum {
                        name: #type_name_lit,
                        side: ::vimbridge::types::Side::Legacy,
                    }
                }

                fn reflect(&self) -> ::vimbridge::Value {
                    ::vimbridge::Value::Text(::std::string::ToString::to_string(
                        ::vimbridge::LegacyEnum::as_str(self),
                    ))
                }

                fn absorb(&mut self, value: ::vimbridge::Value) -> ::std::result::Result<(), ::vimbridge::ConvertError> {
                    ::vimbridge::enums::absorb_legacy_enum(self, value)
                }

                fn instantiate(value: ::vimbridge::Value) -> ::std::result::Result<Self, ::vimbridge::ConvertError> {
                    ::vimbridge::enums::instantiate_legacy_enum(value)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn schema_variants_map_to_stripped_legacy_variants() {
        let input: DeriveInput = parse_quote! {
            #[bridge(legacy = "vim::TaskInfoState")]
            enum TaskInfoState {
                Unspecified = 0,
                TaskInfoStateQueued = 1,
                Running = 2,
            }
        };
        let parsed = ParsedEnum::from_input(&input, Side::Schema).unwrap();
        let legacy: Vec<Option<String>> = parsed
            .variants
            .iter()
            .map(|variant| variant.legacy_variant.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(legacy, vec![None, Some("Queued".into()), Some("Running".into())]);
    }

    #[test]
    fn schema_enum_requires_legacy_path() {
        let input: DeriveInput = parse_quote! {
            enum PropertyChangeOp { Unspecified, Add }
        };
        let err = ParsedEnum::from_input(&input, Side::Schema).err().unwrap();
        assert!(err.to_string().contains("#[bridge(legacy"));
    }

    #[test]
    fn schema_enum_requires_exactly_one_unspecified_variant() {
        let missing: DeriveInput = parse_quote! {
            #[bridge(legacy = "vim::PropertyChangeOp")]
            enum PropertyChangeOp { Add, Remove }
        };
        assert!(ParsedEnum::from_input(&missing, Side::Schema).is_err());

        let doubled: DeriveInput = parse_quote! {
            #[bridge(legacy = "vim::PropertyChangeOp")]
            enum PropertyChangeOp { Unspecified, #[bridge(unspecified)] Unknown, Add }
        };
        let err = ParsedEnum::from_input(&doubled, Side::Schema).err().unwrap();
        assert!(err.to_string().contains("exactly one unspecified variant"));
    }

    #[test]
    fn legacy_variants_default_to_lower_camel_identifiers() {
        let input: DeriveInput = parse_quote! {
            #[bridge(name = "PropertyChangeOp")]
            enum PropertyChangeOp { Add, IndirectRemove, #[bridge(rename = "assign")] Set }
        };
        let parsed = ParsedEnum::from_input(&input, Side::Legacy).unwrap();
        let wires: Vec<&str> = parsed.variants.iter().map(|variant| variant.wire.as_str()).collect();
        assert_eq!(wires, vec!["add", "indirectRemove", "assign"]);
    }

    #[test]
    fn data_carrying_variants_are_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Op { Add(i32) }
        };
        assert!(ParsedEnum::from_input(&input, Side::Legacy).is_err());

        let empty: DeriveInput = parse_quote! { enum Never {} };
        assert!(ParsedEnum::from_input(&empty, Side::Legacy).is_err());
    }
}
