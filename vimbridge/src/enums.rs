//! Enum bridge between schema enumerations and legacy identifier enums.
//!
//! Both traits are implemented by derives. The correspondence table is the naming
//! convention itself: a schema variant `PropertyChangeOpAssign` (or plain `Assign`) maps to the
//! legacy variant `Assign`, whose wire identifier is `"assign"`.

use crate::errors::{ConvertError, EnumUndefined};
use crate::reflect::Reflect;
use crate::value::{EnumValue, Value};

/// Legacy enumeration whose wire form is an identifier string.
pub trait LegacyEnum: Sized + 'static {
    /// Wire type name.
    const NAME: &'static str;

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self>;

    /// Every identifier, in declaration order.
    fn identifiers() -> &'static [&'static str];
}

/// Schema enumeration with a designated unspecified value and a legacy counterpart.
pub trait SchemaEnum: Reflect + 'static {
    type Legacy: LegacyEnum;

    const NAME: &'static str;

    /// The zero value, never mapped to any legacy identifier.
    const UNSPECIFIED: Self;

    /// Every declared value, in declaration order.
    fn variants() -> &'static [Self];

    fn number(&self) -> i32;

    fn from_number(number: i32) -> Option<Self>;

    /// Converts to the legacy value; the unspecified value has no counterpart.
    fn to_legacy(&self) -> Result<Self::Legacy, EnumUndefined>;

    /// Sets `self` from a legacy identifier. Unknown identifiers leave `self` unchanged.
    fn from_legacy(&mut self, value: &str);

    /// `(schema variant, legacy identifier)` pairs for every mapped value.
    fn bridge_table() -> Vec<(&'static str, &'static str)>;

    fn must_to_legacy(&self) -> Option<Self::Legacy> {
        self.to_legacy().ok()
    }

    /// Converts a raw number, including numbers outside the declared set.
    fn number_to_legacy(number: i32) -> Result<Self::Legacy, EnumUndefined> {
        match Self::from_number(number) {
            Some(value) => value.to_legacy(),
            None => Err(EnumUndefined::new(Self::NAME, number)),
        }
    }

    fn is_unspecified(&self) -> bool {
        self.number() == Self::UNSPECIFIED.number()
    }
}

pub fn reflect_schema_enum<E: SchemaEnum>(value: &E) -> Value {
    Value::Enum(EnumValue {
        enum_name: E::NAME,
        number: value.number(),
        legacy: value.must_to_legacy().map(|legacy| legacy.as_str()),
    })
}

/// Stores a converted value into a schema enum.
///
/// Text goes through [`SchemaEnum::from_legacy`] starting from the unspecified value, so an
/// unrecognized identifier yields the unspecified value.
pub fn absorb_schema_enum<E: SchemaEnum>(target: &mut E, value: Value) -> Result<(), ConvertError> {
    match value {
        Value::Null => *target = E::UNSPECIFIED,
        Value::Text(text) => {
            *target = E::UNSPECIFIED;
            target.from_legacy(&text);
        }
        Value::Enum(value) if value.enum_name == E::NAME => {
            *target = E::from_number(value.number).unwrap_or(E::UNSPECIFIED);
        }
        Value::Enum(value) => {
            *target = E::UNSPECIFIED;
            if let Some(identifier) = value.legacy {
                target.from_legacy(identifier);
            }
        }
        Value::Int(number) => {
            let number = i32::try_from(number).map_err(|_| ConvertError::out_of_range(number, E::NAME))?;
            *target = E::from_number(number).unwrap_or(E::UNSPECIFIED);
        }
        other => return Err(ConvertError::mismatch(other.kind(), E::shape())),
    }
    Ok(())
}

pub fn instantiate_schema_enum<E: SchemaEnum>(value: Value) -> Result<E, ConvertError> {
    let mut out = E::UNSPECIFIED;
    absorb_schema_enum(&mut out, value)?;
    Ok(out)
}

/// Stores an identifier into a legacy enum. A null leaves the value unchanged.
pub fn absorb_legacy_enum<E: LegacyEnum + Reflect>(target: &mut E, value: Value) -> Result<(), ConvertError> {
    match value {
        Value::Null => {}
        Value::Text(text) => *target = parse_identifier(&text)?,
        other => return Err(ConvertError::mismatch(other.kind(), E::shape())),
    }
    Ok(())
}

pub fn instantiate_legacy_enum<E: LegacyEnum + Reflect>(value: Value) -> Result<E, ConvertError> {
    match value {
        Value::Text(text) => parse_identifier(&text),
        other => Err(ConvertError::mismatch(other.kind(), E::shape())),
    }
}

fn parse_identifier<E: LegacyEnum>(text: &str) -> Result<E, ConvertError> {
    E::parse(text).ok_or_else(|| ConvertError::out_of_range(format!("{text:?}"), E::NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples::v1;
    use crate::examples::vim;

    #[test]
    fn unspecified_never_maps_to_legacy() {
        let err = v1::PropertyChangeOp::Unspecified.to_legacy().unwrap_err();
        assert_eq!(err, EnumUndefined::new("PropertyChangeOp", 0));
        assert_eq!(v1::PropertyChangeOp::Unspecified.must_to_legacy(), None);
        assert!(v1::PropertyChangeOp::Unspecified.is_unspecified());
    }

    #[test]
    fn numbers_outside_declared_set_are_undefined() {
        assert_eq!(
            v1::PropertyChangeOp::number_to_legacy(99),
            Err(EnumUndefined::new("PropertyChangeOp", 99))
        );
        assert_eq!(
            v1::PropertyChangeOp::number_to_legacy(3),
            Ok(vim::PropertyChangeOp::Assign)
        );
    }

    #[test]
    fn unknown_identifier_leaves_value_unchanged() {
        let mut op = v1::PropertyChangeOp::Remove;
        op.from_legacy("replace");
        assert_eq!(op, v1::PropertyChangeOp::Remove);
    }

    #[test]
    fn absorbing_unknown_text_resets_to_unspecified() {
        let mut op = v1::PropertyChangeOp::Remove;
        absorb_schema_enum(&mut op, Value::Text("replace".into())).unwrap();
        assert_eq!(op, v1::PropertyChangeOp::Unspecified);
    }

    #[test]
    fn prefixed_variants_strip_the_type_name() {
        assert_eq!(
            v1::TaskInfoState::TaskInfoStateRunning.to_legacy(),
            Ok(vim::TaskInfoState::Running)
        );
        let mut state = v1::TaskInfoState::Unspecified;
        state.from_legacy("error");
        assert_eq!(state, v1::TaskInfoState::TaskInfoStateError);
    }

    #[test]
    fn legacy_enum_rejects_unknown_identifier() {
        let mut op = vim::PropertyChangeOp::Add;
        let err = absorb_legacy_enum(&mut op, Value::Text("replace".into())).unwrap_err();
        assert!(matches!(err, ConvertError::OutOfRange { .. }));
        absorb_legacy_enum(&mut op, Value::Text("indirectRemove".into())).unwrap();
        assert_eq!(op, vim::PropertyChangeOp::IndirectRemove);
    }
}
