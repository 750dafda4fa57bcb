//! Structural conversion between schema records and legacy records.
//!
//! A conversion reflects the source into a [`Value`] graph, rewrites that graph against the
//! destination's shapes using the cached [`Resolution`] tables, then absorbs the result into
//! the destination. Destination fields with no counterpart are never touched.

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use log::trace;

use crate::errors::ConvertError;
use crate::naming::{LowerCamelCase, NamingStrategy};
use crate::reflect::{LegacyRecord, Reflect, Record, SchemaRecord};
use crate::resolve::{Resolution, ResolutionCache};
use crate::types::{RecordDescriptor, ScalarKind, Shape, Side};
use crate::value::{RecordValue, Value};

/// Direction of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    FromLegacy,
    ToLegacy,
}

/// Converter holding a naming strategy and the resolution cache built with it.
pub struct Converter {
    naming: Box<dyn NamingStrategy>,
    cache: ResolutionCache,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("cached_resolutions", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::with_naming(LowerCamelCase)
    }

    pub fn with_naming(naming: impl NamingStrategy + 'static) -> Self {
        Self {
            naming: Box::new(naming),
            cache: ResolutionCache::default(),
        }
    }

    /// Field correspondence table for a type pair, computed on first use.
    pub fn resolution<S: SchemaRecord, L: LegacyRecord>(&self) -> Arc<Resolution> {
        self.resolve(S::descriptor(), L::descriptor())
    }

    /// Populates `target` from a legacy object.
    pub fn from_legacy<L: LegacyRecord, S: SchemaRecord>(&self, source: &L, target: &mut S) -> Result<(), ConvertError> {
        self.convert(source, target, Direction::FromLegacy)
    }

    /// Populates a legacy object from `source`, leaving unmatched legacy fields untouched.
    pub fn to_legacy<S: SchemaRecord, L: LegacyRecord>(&self, source: &S, target: &mut L) -> Result<(), ConvertError> {
        self.convert(source, target, Direction::ToLegacy)
    }

    fn convert<F: Record, T: Record>(&self, source: &F, target: &mut T, direction: Direction) -> Result<(), ConvertError> {
        if let Some(value) = self.translate(source.reflect(), &F::shape(), &T::shape(), direction)? {
            target.absorb(value)?;
        }
        Ok(())
    }

    fn resolve(&self, schema: &'static RecordDescriptor, legacy: &'static RecordDescriptor) -> Arc<Resolution> {
        self.cache.get_or_resolve(schema, legacy, self.naming.as_ref())
    }

    /// Rewrites `value` of shape `source` into a value for a `target` slot.
    ///
    /// `None` means the destination slot is left as it is.
    fn translate(
        &self,
        value: Value,
        source: &Shape,
        target: &Shape,
        direction: Direction,
    ) -> Result<Option<Value>, ConvertError> {
        match (source, target) {
            (_, Shape::Optional(inner)) => {
                if value.is_null() {
                    return Ok(Some(Value::Null));
                }
                if direction == Direction::ToLegacy && !source.is_optional() && value.is_zero() {
                    return Ok(Some(Value::Null));
                }
                self.translate(value, source.strip_optional(), inner, direction)
            }
            (Shape::Optional(inner), _) => {
                if value.is_null() {
                    return Ok(Some(Value::Null));
                }
                self.translate(value, inner, target, direction)
            }
            (Shape::Time, _) if !matches!(value, Value::Time(_)) => match value {
                Value::Text(instant) => Err(ConvertError::out_of_range(instant, "timestamp")),
                other => Err(ConvertError::mismatch(other.kind(), target)),
            },
            (Shape::Any, Shape::Any) => Ok(Some(value)),
            (Shape::Any, _) => {
                trace!("dropping free-form value: destination is {target}");
                Ok(None)
            }
            (_, Shape::Any) => Ok(Some(Value::Any(value.into_json()))),
            (Shape::Repeated(from), Shape::Repeated(to)) => self.translate_list(value, from, to, direction),
            (Shape::Record(_) | Shape::Interface(_), Shape::Record(_) | Shape::Interface(_)) => {
                let (Some(from), Some(to)) = (source.record(), target.record()) else {
                    return Err(ConvertError::mismatch(source, target));
                };
                if matches!(source, Shape::Interface(_)) || matches!(target, Shape::Interface(_)) {
                    trace!("projecting {source} onto {target} through its base record");
                }
                self.translate_record(value, from, to, direction)
            }
            (Shape::Time, Shape::Time) => match value {
                Value::Time(time) => Ok(Some(Value::Time(time.with_timezone(&Utc).fixed_offset()))),
                other => Err(ConvertError::mismatch(other.kind(), target)),
            },
            (Shape::Enum { side: Side::Schema, .. }, to) if is_textual(to) => match value {
                Value::Enum(found) => match found.legacy {
                    Some(identifier) => Ok(Some(Value::Text(identifier.to_string()))),
                    None => {
                        trace!("{} value {} has no legacy identifier; leaving {target} unset", found.enum_name, found.number);
                        Ok(None)
                    }
                },
                other => Err(ConvertError::mismatch(other.kind(), target)),
            },
            (from, Shape::Enum { side: Side::Schema, .. }) if is_textual(from) => match value {
                Value::Text(text) => Ok(Some(Value::Text(text))),
                other => Err(ConvertError::mismatch(other.kind(), target)),
            },
            (Shape::Enum { name: from, .. }, Shape::Enum { name: to, .. }) if from == to => Ok(Some(value)),
            (from, to) if is_textual(from) && is_textual(to) => Ok(Some(value)),
            (Shape::Scalar(from), Shape::Scalar(to)) if from.converts_to(*to) => Ok(Some(value)),
            _ => Err(ConvertError::mismatch(source, target)),
        }
    }

    fn translate_list(
        &self,
        value: Value,
        source: &Shape,
        target: &Shape,
        direction: Direction,
    ) -> Result<Option<Value>, ConvertError> {
        let items = match value {
            Value::Null => return Ok(Some(Value::List(Vec::new()))),
            Value::List(items) => items,
            other => return Err(ConvertError::mismatch(other.kind(), Shape::Repeated(Box::new(target.clone())))),
        };
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match self
                .translate(item, source, target, direction)
                .map_err(|err| err.at_index(index))?
            {
                Some(converted) => out.push(converted),
                None => trace!("dropping element {index}: nothing to store in {target}"),
            }
        }
        Ok(Some(Value::List(out)))
    }

    fn translate_record(
        &self,
        value: Value,
        source: &'static RecordDescriptor,
        target: &'static RecordDescriptor,
        direction: Direction,
    ) -> Result<Option<Value>, ConvertError> {
        let record = match value {
            Value::Null => return Ok(Some(Value::Null)),
            Value::Record(record) => record,
            other => return Err(ConvertError::mismatch(other.kind(), format!("record {}", target.name))),
        };

        let mut out = RecordValue::new(target.rust_name);
        match direction {
            Direction::FromLegacy => {
                let resolution = self.resolve(target, source);
                for found in &resolution.matches {
                    let schema_field = resolution.schema_field(found);
                    let legacy_field = resolution.legacy_field(found);
                    let Some(value) = record.lookup(&resolution.legacy_idents(found)) else {
                        continue;
                    };
                    let converted = self
                        .translate(value.clone(), &legacy_field.shape, &schema_field.shape, direction)
                        .map_err(|err| err.at(schema_field.ident))?;
                    if let Some(converted) = converted {
                        out.set(schema_field.ident, converted);
                    }
                }
            }
            Direction::ToLegacy => {
                let resolution = self.resolve(source, target);
                for found in &resolution.matches {
                    let schema_field = resolution.schema_field(found);
                    let legacy_field = resolution.legacy_field(found);
                    let Some(value) = record.get(schema_field.ident) else {
                        continue;
                    };
                    let converted = self
                        .translate(value.clone(), &schema_field.shape, &legacy_field.shape, direction)
                        .map_err(|err| err.at(schema_field.ident))?;
                    if let Some(converted) = converted {
                        let mut slot = &mut out;
                        for step in &found.embedding {
                            slot = slot.record_entry(step.ident, step.record.rust_name);
                        }
                        slot.set(legacy_field.ident, converted);
                    }
                }
            }
        }
        Ok(Some(Value::Record(out)))
    }
}

fn is_textual(shape: &Shape) -> bool {
    matches!(
        shape,
        Shape::Scalar(ScalarKind::String) | Shape::Enum { side: Side::Legacy, .. }
    )
}

static DEFAULT_CONVERTER: OnceLock<Converter> = OnceLock::new();

/// Process-wide converter using [`LowerCamelCase`] naming.
pub fn default_converter() -> &'static Converter {
    DEFAULT_CONVERTER.get_or_init(Converter::new)
}

/// Populates `target` from a legacy object with the default converter.
pub fn from_legacy<L: LegacyRecord, S: SchemaRecord>(source: &L, target: &mut S) -> Result<(), ConvertError> {
    default_converter().from_legacy(source, target)
}

/// Populates a legacy object from `source` with the default converter.
pub fn to_legacy<S: SchemaRecord, L: LegacyRecord>(source: &S, target: &mut L) -> Result<(), ConvertError> {
    default_converter().to_legacy(source, target)
}
