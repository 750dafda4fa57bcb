#[allow(unused_imports)]
use super::*;

use crate::naming::{lower_camel, unraw};

pub(crate) struct ParsedField {
    pub(crate) ident: Ident,
    /// Identifier text without the raw prefix.
    pub(crate) ident_name: String,
    /// Wire name for legacy fields, identifier for schema fields.
    pub(crate) name: String,
    pub(crate) ty: Type,
    pub(crate) embedded: bool,
    pub(crate) legacy_name: Option<String>,
    pub(crate) legacy_shape: Option<String>,
}

impl ParsedField {
    pub(crate) fn from_field(field: &Field, side: Side) -> Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new(field.span(), format!("{} requires named fields", side.record_derive())))?;
        let ident_name = unraw(&ident.to_string()).to_string();

        let mut embedded = false;
        let mut rename = None;
        let mut legacy_name = None;
        let mut legacy_shape = None;

        for attr in &field.attrs {
            if attr.path().is_ident("bridge") {
                Self::parse_field_attr(
                    attr,
                    side,
                    &mut embedded,
                    &mut rename,
                    &mut legacy_name,
                    &mut legacy_shape,
                )?;
            }
        }

        if embedded && wrapper_name(&field.ty).is_some() {
            return Err(Error::new(
                field.ty.span(),
                "#[bridge(embed)] requires a plain composite type, not Option, Vec or Box",
            ));
        }

        let name = match side {
            Side::Schema => ident_name.clone(),
            Side::Legacy => rename.unwrap_or_else(|| lower_camel(&ident_name)),
        };

        Ok(Self {
            ident,
            ident_name,
            name,
            ty: field.ty.clone(),
            embedded,
            legacy_name,
            legacy_shape,
        })
    }

    fn parse_field_attr(
        attr: &Attribute,
        side: Side,
        embedded: &mut bool,
        rename: &mut Option<String>,
        legacy_name: &mut Option<String>,
        legacy_shape: &mut Option<String>,
    ) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            let key = meta
                .path
                .get_ident()
                .map(ToString::to_string)
                .unwrap_or_default();
            match (side, key.as_str()) {
                (Side::Schema, "name") => {
                    let value: LitStr = meta.value()?.parse()?;
                    *legacy_name = Some(non_empty(value)?);
                }
                (Side::Schema, "shape") => {
                    let value: LitStr = meta.value()?.parse()?;
                    *legacy_shape = Some(non_empty(value)?);
                }
                (Side::Legacy, "embed") => *embedded = true,
                (Side::Legacy, "rename") => {
                    let value: LitStr = meta.value()?.parse()?;
                    *rename = Some(non_empty(value)?);
                }
                (_, "name" | "shape" | "embed" | "rename") => {
                    return Err(meta.error(format!(
                        "`{key}` is not supported on {} fields",
                        side.record_derive()
                    )));
                }
                _ => return Err(meta.error("unknown bridge field attribute")),
            }
            Ok(())
        })
    }

    pub(crate) fn to_descriptor_tokens(&self) -> TokenStream2 {
        let ident_lit = lit(&self.ident_name);
        let name_lit = lit(&self.name);
        let ty = &self.ty;
        let embedded = self.embedded;
        let legacy_name = option_lit(self.legacy_name.as_deref());
        let legacy_shape = option_lit(self.legacy_shape.as_deref());

        quote! {
            ::vimbridge::types::FieldDescriptor {
                ident: #ident_lit,
                name: #name_lit,
                shape: <#ty as ::vimbridge::Reflect>::shape(),
                embedded: #embedded,
                legacy_name: #legacy_name,
                legacy_shape: #legacy_shape,
            }
        }
    }

    pub(crate) fn reflect_tokens(&self) -> TokenStream2 {
        let ident = &self.ident;
        let ident_lit = lit(&self.ident_name);
        quote! {
            record.set(#ident_lit, ::vimbridge::Reflect::reflect(&self.#ident));
        }
    }

    pub(crate) fn absorb_arm_tokens(&self) -> TokenStream2 {
        let ident = &self.ident;
        let ident_lit = lit(&self.ident_name);
        quote! {
            #ident_lit => ::vimbridge::Reflect::absorb(&mut self.#ident, value).map_err(|err| err.at(#ident_lit))?,
        }
    }
}

fn non_empty(value: LitStr) -> Result<String> {
    let text = value.value();
    if text.is_empty() {
        return Err(Error::new(value.span(), "bridge attribute value must not be empty"));
    }
    Ok(text)
}

/// Outer wrapper of a field type when it is `Option`, `Vec` or `Box`.
fn wrapper_name(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let name = segment.ident.to_string();
    matches!(name.as_str(), "Option" | "Vec" | "Box").then_some(name)
}
