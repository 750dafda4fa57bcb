use std::fmt::Display;

use thiserror::Error;

/// Structural failure raised while converting between the schema and legacy models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The two sides of a matched field pair have incompatible shapes.
    #[error("shape mismatch at `{}`: cannot convert {source_shape} into {target_shape}", display_path(.path))]
    ShapeMismatch {
        path: String,
        source_shape: String,
        target_shape: String,
    },

    /// A numeric or textual value does not fit the destination type.
    #[error("value out of range at `{}`: {value} does not fit {target}", display_path(.path))]
    OutOfRange { path: String, value: String, target: String },
}

impl ConvertError {
    pub fn mismatch(source_shape: impl Display, target_shape: impl Display) -> Self {
        Self::ShapeMismatch {
            path: String::new(),
            source_shape: source_shape.to_string(),
            target_shape: target_shape.to_string(),
        }
    }

    pub fn out_of_range(value: impl Display, target: impl Display) -> Self {
        Self::OutOfRange {
            path: String::new(),
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    /// Dotted field path from the conversion root to the failing field.
    pub fn path(&self) -> &str {
        match self {
            Self::ShapeMismatch { path, .. } | Self::OutOfRange { path, .. } => path,
        }
    }

    /// Prefixes the path with an enclosing field name.
    pub fn at(self, field: &str) -> Self {
        self.prefixed(field)
    }

    /// Prefixes the path with a sequence index.
    pub fn at_index(self, index: usize) -> Self {
        self.prefixed(&format!("[{index}]"))
    }

    fn prefixed(mut self, segment: &str) -> Self {
        let path = match &mut self {
            Self::ShapeMismatch { path, .. } | Self::OutOfRange { path, .. } => path,
        };
        *path = if path.is_empty() {
            segment.to_string()
        } else if path.starts_with('[') {
            format!("{segment}{path}")
        } else {
            format!("{segment}.{path}")
        };
        self
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

/// Raised by [`crate::SchemaEnum::to_legacy`] for the unspecified value or an undeclared number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("enum {enum_name} value {number} is undefined or unspecified")]
pub struct EnumUndefined {
    pub enum_name: &'static str,
    pub number: i32,
}

impl EnumUndefined {
    pub fn new(enum_name: &'static str, number: i32) -> Self {
        Self { enum_name, number }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_compose_outside_in() {
        let err = ConvertError::mismatch("text", "record ManagedObjectReference")
            .at("key")
            .at_index(0)
            .at("fault_message")
            .at("fault");
        assert_eq!(err.path(), "fault.fault_message[0].key");
        assert_eq!(
            err.to_string(),
            "shape mismatch at `fault.fault_message[0].key`: cannot convert text into record ManagedObjectReference"
        );
    }

    #[test]
    fn root_errors_render_placeholder_path() {
        let err = ConvertError::out_of_range(1_u64 << 40, "i32");
        assert_eq!(err.path(), "");
        assert_eq!(err.to_string(), "value out of range at `<root>`: 1099511627776 does not fit i32");
    }

    #[test]
    fn enum_undefined_names_type_and_number() {
        let err = EnumUndefined::new("PropertyChangeOp", 0);
        assert_eq!(err.to_string(), "enum PropertyChangeOp value 0 is undefined or unspecified");
    }
}
