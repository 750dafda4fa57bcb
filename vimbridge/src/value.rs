use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::Value as Json;

/// Dynamic view of a field value, produced by [`crate::Reflect::reflect`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent optional, unset interface slot or JSON null.
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Enum(EnumValue),
    Time(DateTime<FixedOffset>),
    List(Vec<Value>),
    Record(RecordValue),
    Any(Json),
}

/// Schema enumeration value together with its legacy identifier, when it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    pub enum_name: &'static str,
    pub number: i32,
    pub legacy: Option<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordValue {
    pub type_name: &'static str,
    pub fields: Vec<(&'static str, Value)>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value equals the zero value of its type.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(value) => !value,
            Self::Int(value) => *value == 0,
            Self::Uint(value) => *value == 0,
            Self::Float(value) => *value == 0.0,
            Self::Text(value) => value.is_empty(),
            Self::Enum(value) => value.number == 0,
            Self::Time(_) | Self::Record(_) | Self::Any(_) => false,
            Self::List(items) => items.is_empty(),
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::Uint(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Enum(_) => "enum",
            Self::Time(_) => "time",
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Any(_) => "any",
        }
    }

    /// Renders the value as JSON for opaque destinations.
    pub fn into_json(self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::Bool(value) => Json::Bool(value),
            Self::Int(value) => Json::from(value),
            Self::Uint(value) => Json::from(value),
            Self::Float(value) => serde_json::Number::from_f64(value).map_or(Json::Null, Json::Number),
            Self::Text(value) => Json::String(value),
            Self::Enum(value) => match value.legacy {
                Some(identifier) => Json::String(identifier.to_string()),
                None => Json::from(value.number),
            },
            Self::Time(value) => Json::String(value.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::List(items) => Json::Array(items.into_iter().map(Value::into_json).collect()),
            Self::Record(record) => Json::Object(
                record
                    .fields
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), value.into_json()))
                    .collect(),
            ),
            Self::Any(value) => value,
        }
    }
}

impl RecordValue {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    pub fn get(&self, ident: &str) -> Option<&Value> {
        self.fields.iter().find(|(name, _)| *name == ident).map(|(_, value)| value)
    }

    /// Sets a field, replacing any previous value under the same identifier.
    pub fn set(&mut self, ident: &'static str, value: Value) {
        match self.fields.iter_mut().find(|(name, _)| *name == ident) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((ident, value)),
        }
    }

    /// Follows a chain of nested record fields.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let value = self.get(first)?;
        if rest.is_empty() {
            return Some(value);
        }
        match value {
            Value::Record(record) => record.lookup(rest),
            _ => None,
        }
    }

    /// Nested record stored under `ident`, created empty when missing.
    pub fn record_entry(&mut self, ident: &'static str, type_name: &'static str) -> &mut RecordValue {
        let index = match self.fields.iter().position(|(name, _)| *name == ident) {
            Some(index) => index,
            None => {
                self.fields.push((ident, Value::Null));
                self.fields.len() - 1
            }
        };
        let slot = &mut self.fields[index].1;
        if !matches!(slot, Value::Record(_)) {
            *slot = Value::Record(RecordValue::new(type_name));
        }
        match slot {
            Value::Record(record) => record,
            _ => unreachable!("slot was just replaced with a record"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_entry_builds_nested_path() {
        let mut root = RecordValue::new("VmLimitLicense");
        root.record_entry("not_enough_licenses", "NotEnoughLicenses")
            .record_entry("runtime_fault", "RuntimeFault")
            .set("localized", Value::Text("hello".into()));
        root.record_entry("not_enough_licenses", "NotEnoughLicenses")
            .set("other", Value::Bool(true));

        assert_eq!(root.fields.len(), 1);
        assert_eq!(
            root.lookup(&["not_enough_licenses", "runtime_fault", "localized"]),
            Some(&Value::Text("hello".into()))
        );
        assert_eq!(root.lookup(&["not_enough_licenses", "other"]), Some(&Value::Bool(true)));
        assert_eq!(root.lookup(&["not_enough_licenses", "missing"]), None);
    }

    #[test]
    fn zero_detection_follows_field_types() {
        assert!(Value::Int(0).is_zero());
        assert!(Value::Text(String::new()).is_zero());
        assert!(!Value::Uint(10).is_zero());
        assert!(!Value::Record(RecordValue::new("ManagedObjectReference")).is_zero());
    }

    #[test]
    fn records_render_as_json_objects() {
        let mut record = RecordValue::new("KeyAnyValue");
        record.set("key", Value::Text("arg-1".into()));
        record.set("value", Value::Any(json!(2)));
        record.set("key", Value::Text("arg-2".into()));

        assert_eq!(Value::Record(record).into_json(), json!({"key": "arg-2", "value": 2}));
    }
}
