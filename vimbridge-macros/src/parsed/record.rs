#[allow(unused_imports)]
use super::*;

use super::field::ParsedField;

pub(crate) struct ParsedRecord {
    name: Ident,
    side: Side,
    /// Wire type name (legacy) or message name (schema).
    type_name: String,
    legacy_alias: Option<String>,
    fields: Vec<ParsedField>,
}

impl ParsedRecord {
    pub(crate) fn from_input(input: &DeriveInput, side: Side) -> Result<Self> {
        let derive = side.record_derive();
        if !input.generics.params.is_empty() {
            return Err(Error::new(
                input.generics.span(),
                format!("{derive} does not support generic types"),
            ));
        }

        let mut type_name = None;
        let mut legacy_alias = None;
        for attr in &input.attrs {
            if attr.path().is_ident("bridge") {
                Self::parse_container_attr(attr, side, &mut type_name, &mut legacy_alias)?;
            }
        }

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => {
                    let mut parsed = Vec::new();
                    for field in &named.named {
                        parsed.push(ParsedField::from_field(field, side)?);
                    }
                    parsed
                }
                _ => return Err(Error::new(input.ident.span(), format!("{derive} requires named fields"))),
            },
            _ => {
                return Err(Error::new(
                    input.ident.span(),
                    format!("{derive} can only be derived for structs"),
                ));
            }
        };

        Ok(Self {
            name: input.ident.clone(),
            side,
            type_name: type_name.unwrap_or_else(|| crate::naming::unraw(&input.ident.to_string()).to_string()),
            legacy_alias,
            fields,
        })
    }

    fn parse_container_attr(
        attr: &Attribute,
        side: Side,
        type_name: &mut Option<String>,
        legacy_alias: &mut Option<String>,
    ) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if side == Side::Schema && meta.path.is_ident("legacy") {
                let value: LitStr = meta.value()?.parse()?;
                *legacy_alias = Some(value.value());
            } else if side == Side::Legacy && meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                *type_name = Some(value.value());
            } else {
                return Err(meta.error(format!(
                    "unknown {} container attribute",
                    side.record_derive()
                )));
            }
            Ok(())
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let type_name_lit = lit(&self.type_name);
        let rust_name_lit = lit(&self.name.to_string());
        let side = self.side.tokens();
        let legacy_alias = option_lit(self.legacy_alias.as_deref());
        let descriptor_static_ident = format_ident!("__VIMBRIDGE_DESCRIPTOR_{}", self.name.to_string().to_uppercase());

        let field_inits = self.fields.iter().map(ParsedField::to_descriptor_tokens);
        let reflect_fields = self.fields.iter().map(ParsedField::reflect_tokens);
        let absorb_arms = self.fields.iter().map(ParsedField::absorb_arm_tokens);

        let marker = match self.side {
            Side::Schema => quote!(impl ::vimbridge::SchemaRecord for #name {}),
            Side::Legacy => quote!(impl ::vimbridge::LegacyRecord for #name {}),
        };

        let registration = match self.side {
            Side::Schema => quote! {
                ::vimbridge::inventory::submit! {
                    ::vimbridge::registry::MessageRegistration {
                        type_name: #rust_name_lit,
                        legacy_alias: #legacy_alias,
                        descriptor_fn: <#name as ::vimbridge::Record>::descriptor,
                    }
                }
            },
            Side::Legacy => quote!(),
        };

        quote! {
            #[allow(non_upper_case_globals)]
            static #descriptor_static_ident: ::std::sync::OnceLock<::vimbridge::types::RecordDescriptor> =
                ::std::sync::OnceLock::new();

            impl ::vimbridge::Record for #name {
                fn descriptor() -> &'static ::vimbridge::types::RecordDescriptor {
                    #descriptor_static_ident.get_or_init(|| ::vimbridge::types::RecordDescriptor {
                        name: #type_name_lit,
                        rust_name: #rust_name_lit,
                        side: #side,
                        legacy_alias: #legacy_alias,
                        fields: ::std::vec![#(#field_inits),*],
                        type_id: ::std::any::TypeId::of::<#name>(),
                    })
                }
            }

            impl ::vimbridge::Reflect for #name {
                fn shape() -> ::vimbridge::types::Shape {
                    ::vimbridge::types::Shape::Record(::vimbridge::types::RecordRef::of::<#name>())
                }

                fn reflect(&self) -> ::vimbridge::Value {
                    let mut record = ::vimbridge::RecordValue::new(#rust_name_lit);
                    #(#reflect_fields)*
                    ::vimbridge::Value::Record(record)
                }

                fn absorb(&mut self, value: ::vimbridge::Value) -> ::std::result::Result<(), ::vimbridge::ConvertError> {
                    match value {
                        ::vimbridge::Value::Null => {
                            *self = <#name as ::std::default::Default>::default();
                        }
                        ::vimbridge::Value::Record(record) => {
                            for (field, value) in record.fields {
                                match field {
                                    #(#absorb_arms)*
                                    _ => {
                                        let _ = value;
                                    }
                                }
                            }
                        }
                        other => {
                            return ::std::result::Result::Err(::vimbridge::ConvertError::mismatch(
                                other.kind(),
                                <#name as ::vimbridge::Reflect>::shape(),
                            ));
                        }
                    }
                    ::std::result::Result::Ok(())
                }

                fn instantiate(value: ::vimbridge::Value) -> ::std::result::Result<Self, ::vimbridge::ConvertError> {
                    ::vimbridge::reflect::instantiate_default(value)
                }
            }

            #marker

            #registration
        }
    }
}
