use std::any::TypeId;
use std::fmt;

use crate::reflect::Record;

/// Which of the two type hierarchies a record or enumeration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Types generated from the schema definitions.
    Schema,
    /// Types of the legacy RPC client model.
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
}

impl ScalarKind {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::U8 | Self::U16 | Self::U32 | Self::U64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Whether a value of this kind may be copied into a slot of `target` kind.
    ///
    /// Integer narrowing is accepted here and range-checked when the value is stored.
    pub fn converts_to(self, target: ScalarKind) -> bool {
        match (self, target) {
            (Self::Bool, Self::Bool) | (Self::String, Self::String) => true,
            (source, target) if source.is_integer() => target.is_integer() || target.is_float(),
            (source, target) if source.is_float() => target.is_float(),
            _ => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
        }
    }
}

/// Lazy handle to a record descriptor, so recursive types can describe each other.
#[derive(Clone, Copy)]
pub struct RecordRef(fn() -> &'static RecordDescriptor);

impl RecordRef {
    pub fn of<T: Record>() -> Self {
        Self(T::descriptor)
    }

    pub fn get(self) -> &'static RecordDescriptor {
        (self.0)()
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.get().rust_name).finish()
    }
}

/// Polymorphic legacy slot: any concrete type exposing the shared `base` record.
#[derive(Debug, Clone, Copy)]
pub struct InterfaceShape {
    pub name: &'static str,
    pub base: RecordRef,
}

/// Structural shape of a field, as seen by the converter.
#[derive(Debug, Clone)]
pub enum Shape {
    Scalar(ScalarKind),
    Enum { name: &'static str, side: Side },
    Time,
    /// Free-form value carried as JSON.
    Any,
    Optional(Box<Shape>),
    Repeated(Box<Shape>),
    Record(RecordRef),
    Interface(InterfaceShape),
}

impl Shape {
    /// Shape with any optional wrapper removed.
    pub fn strip_optional(&self) -> &Shape {
        match self {
            Self::Optional(inner) => inner.strip_optional(),
            other => other,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Record reached through this shape; interfaces expose their base record.
    pub fn record(&self) -> Option<&'static RecordDescriptor> {
        match self.strip_optional() {
            Self::Record(record) => Some(record.get()),
            Self::Interface(interface) => Some(interface.base.get()),
            _ => None,
        }
    }

    /// Innermost type name, used to match `#[bridge(shape = "...")]` overrides.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Enum { name, .. } => *name,
            Self::Time => "time",
            Self::Any => "any",
            Self::Optional(inner) | Self::Repeated(inner) => inner.type_name(),
            Self::Record(record) => record.get().name,
            Self::Interface(interface) => interface.name,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(kind.name()),
            Self::Enum { name, side: Side::Schema } => write!(f, "enum {name}"),
            Self::Enum { name, side: Side::Legacy } => write!(f, "legacy enum {name}"),
            Self::Time => f.write_str("time"),
            Self::Any => f.write_str("any"),
            Self::Optional(inner) => write!(f, "optional {inner}"),
            Self::Repeated(inner) => write!(f, "repeated {inner}"),
            Self::Record(record) => write!(f, "record {}", record.get().name),
            Self::Interface(interface) => write!(f, "interface {}", interface.name),
        }
    }
}

/// Metadata emitted by `#[derive(SchemaMessage)]` and `#[derive(LegacyObject)]`.
#[derive(Debug)]
pub struct RecordDescriptor {
    /// Wire type name; for schema records the message name.
    pub name: &'static str,
    pub rust_name: &'static str,
    pub side: Side,
    /// Legacy type a schema message corresponds to.
    pub legacy_alias: Option<&'static str>,
    pub fields: Vec<FieldDescriptor>,
    pub type_id: TypeId,
}

impl RecordDescriptor {
    pub fn field(&self, ident: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.ident == ident)
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Rust field identifier (raw prefix stripped).
    pub ident: &'static str,
    /// Legacy wire name for legacy fields; the identifier for schema fields.
    pub name: &'static str,
    pub shape: Shape,
    /// Legacy embedded composite whose fields are promoted into the container.
    pub embedded: bool,
    /// Schema-side override of the legacy field name to match.
    pub legacy_name: Option<&'static str>,
    /// Schema-side restriction on the legacy field's type name.
    pub legacy_shape: Option<&'static str>,
}
