//! vimbridge core library.
//!
//! Converts between schema-generated message types and the legacy vim client model by
//! matching fields on metadata emitted by the derive macros, and bridges schema enums to
//! legacy identifier enums.

extern crate self as vimbridge;

pub mod convert;
pub mod enums;
pub mod errors;
pub mod examples;
pub mod naming;
pub mod reflect;
pub mod registry;
pub mod resolve;
pub mod timestamp;
pub mod types;
pub mod value;

pub use convert::{Converter, Direction, default_converter, from_legacy, to_legacy};
pub use enums::{LegacyEnum, SchemaEnum};
pub use errors::{ConvertError, EnumUndefined};
pub use naming::{LowerCamelCase, NamingStrategy};
pub use reflect::{Interface, LegacyRecord, Poly, Record, Reflect, SchemaRecord};
pub use resolve::{EmbedStep, FieldMatch, Resolution};
pub use timestamp::Timestamp;
pub use types::{FieldDescriptor, RecordDescriptor, Shape, Side};
pub use value::{EnumValue, RecordValue, Value};

pub use vimbridge_macros::{LegacyEnum, LegacyObject, SchemaEnum, SchemaMessage};

// Re-export inventory for auto-registration in the derive macros
pub use inventory;
