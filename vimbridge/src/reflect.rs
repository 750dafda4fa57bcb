//! Reflection layer shared by both type hierarchies.
//!
//! Every field type participating in a conversion implements [`Reflect`]: it reports its
//! [`Shape`], renders itself as a dynamic [`Value`], and absorbs a [`Value`] back in place.
//! Records get these impls from the derive macros; the scalar, container, time and
//! free-form impls live here.

use std::fmt;
use std::ops::{Deref, DerefMut};

use chrono::{DateTime, FixedOffset, Utc};

use crate::errors::ConvertError;
use crate::types::{InterfaceShape, RecordDescriptor, RecordRef, ScalarKind, Shape};
use crate::value::Value;

pub trait Reflect: Sized {
    fn shape() -> Shape;

    fn reflect(&self) -> Value;

    /// Writes `value` into `self`. Record fields missing from `value` are left untouched.
    fn absorb(&mut self, value: Value) -> Result<(), ConvertError>;

    fn instantiate(value: Value) -> Result<Self, ConvertError>;
}

/// Composite type with field metadata, implemented by the derive macros.
pub trait Record: Reflect + Default + 'static {
    fn descriptor() -> &'static RecordDescriptor;
}

/// Marker for records generated from the schema definitions.
pub trait SchemaRecord: Record {}

/// Marker for records of the legacy client model.
pub trait LegacyRecord: Record {}

/// Builds a value by absorbing into its default.
pub fn instantiate_default<T: Reflect + Default>(value: Value) -> Result<T, ConvertError> {
    let mut out = T::default();
    out.absorb(value)?;
    Ok(out)
}

macro_rules! reflect_signed {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Reflect for $ty {
            fn shape() -> Shape {
                Shape::Scalar(ScalarKind::$kind)
            }

            fn reflect(&self) -> Value {
                Value::Int(i64::from(*self))
            }

            fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
                *self = match value {
                    Value::Null => 0,
                    Value::Int(number) => {
                        <$ty>::try_from(number).map_err(|_| ConvertError::out_of_range(number, stringify!($ty)))?
                    }
                    Value::Uint(number) => {
                        <$ty>::try_from(number).map_err(|_| ConvertError::out_of_range(number, stringify!($ty)))?
                    }
                    other => return Err(ConvertError::mismatch(other.kind(), Self::shape())),
                };
                Ok(())
            }

            fn instantiate(value: Value) -> Result<Self, ConvertError> {
                instantiate_default(value)
            }
        }
    )*};
}

macro_rules! reflect_unsigned {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Reflect for $ty {
            fn shape() -> Shape {
                Shape::Scalar(ScalarKind::$kind)
            }

            fn reflect(&self) -> Value {
                Value::Uint(u64::from(*self))
            }

            fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
                *self = match value {
                    Value::Null => 0,
                    Value::Int(number) => {
                        <$ty>::try_from(number).map_err(|_| ConvertError::out_of_range(number, stringify!($ty)))?
                    }
                    Value::Uint(number) => {
                        <$ty>::try_from(number).map_err(|_| ConvertError::out_of_range(number, stringify!($ty)))?
                    }
                    other => return Err(ConvertError::mismatch(other.kind(), Self::shape())),
                };
                Ok(())
            }

            fn instantiate(value: Value) -> Result<Self, ConvertError> {
                instantiate_default(value)
            }
        }
    )*};
}

reflect_signed!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
reflect_unsigned!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);

macro_rules! reflect_float {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Reflect for $ty {
            fn shape() -> Shape {
                Shape::Scalar(ScalarKind::$kind)
            }

            fn reflect(&self) -> Value {
                Value::Float(f64::from(*self))
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
                *self = match value {
                    Value::Null => 0.0,
                    Value::Float(number) => number as $ty,
                    Value::Int(number) => number as $ty,
                    Value::Uint(number) => number as $ty,
                    other => return Err(ConvertError::mismatch(other.kind(), Self::shape())),
                };
                Ok(())
            }

            fn instantiate(value: Value) -> Result<Self, ConvertError> {
                instantiate_default(value)
            }
        }
    )*};
}

reflect_float!(f32 => F32, f64 => F64);

impl Reflect for bool {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::Bool)
    }

    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }

    fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
        *self = match value {
            Value::Null => false,
            Value::Bool(flag) => flag,
            other => return Err(ConvertError::mismatch(other.kind(), Self::shape())),
        };
        Ok(())
    }

    fn instantiate(value: Value) -> Result<Self, ConvertError> {
        instantiate_default(value)
    }
}

impl Reflect for String {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::String)
    }

    fn reflect(&self) -> Value {
        Value::Text(self.clone())
    }

    fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
        match value {
            Value::Null => self.clear(),
            Value::Text(text) => *self = text,
            other => return Err(ConvertError::mismatch(other.kind(), Self::shape())),
        }
        Ok(())
    }

    fn instantiate(value: Value) -> Result<Self, ConvertError> {
        instantiate_default(value)
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }

    fn reflect(&self) -> Value {
        match self {
            Some(inner) => inner.reflect(),
            None => Value::Null,
        }
    }

    fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        if let Some(inner) = self.as_mut() {
            return inner.absorb(value);
        }
        *self = Some(T::instantiate(value)?);
        Ok(())
    }

    fn instantiate(value: Value) -> Result<Self, ConvertError> {
        let mut out: Self = None;
        out.absorb(value)?;
        Ok(out)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn shape() -> Shape {
        Shape::Repeated(Box::new(T::shape()))
    }

    fn reflect(&self) -> Value {
        Value::List(self.iter().map(Reflect::reflect).collect())
    }

    /// Rebuilds every element from its value. Interface slots are the exception: they update
    /// in place position by position so an existing concrete value keeps its own fields.
    fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
        let items = match value {
            Value::Null => Vec::new(),
            Value::List(items) => items,
            other => return Err(ConvertError::mismatch(other.kind(), Self::shape())),
        };
        if !matches!(T::shape().strip_optional(), Shape::Interface(_)) {
            *self = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| T::instantiate(item).map_err(|err| err.at_index(index)))
                .collect::<Result<_, _>>()?;
            return Ok(());
        }
        self.truncate(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match self.get_mut(index) {
                Some(existing) => existing.absorb(item).map_err(|err| err.at_index(index))?,
                None => self.push(T::instantiate(item).map_err(|err| err.at_index(index))?),
            }
        }
        Ok(())
    }

    fn instantiate(value: Value) -> Result<Self, ConvertError> {
        instantiate_default(value)
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn reflect(&self) -> Value {
        (**self).reflect()
    }

    fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
        (**self).absorb(value)
    }

    fn instantiate(value: Value) -> Result<Self, ConvertError> {
        T::instantiate(value).map(Box::new)
    }
}

fn epoch() -> DateTime<FixedOffset> {
    DateTime::<Utc>::default().fixed_offset()
}

impl Reflect for DateTime<Utc> {
    fn shape() -> Shape {
        Shape::Time
    }

    fn reflect(&self) -> Value {
        Value::Time(self.fixed_offset())
    }

    fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
        *self = match value {
            Value::Null => DateTime::<Utc>::default(),
            Value::Time(time) => time.with_timezone(&Utc),
            other => return Err(ConvertError::mismatch(other.kind(), Self::shape())),
        };
        Ok(())
    }

    fn instantiate(value: Value) -> Result<Self, ConvertError> {
        instantiate_default(value)
    }
}

impl Reflect for DateTime<FixedOffset> {
    fn shape() -> Shape {
        Shape::Time
    }

    fn reflect(&self) -> Value {
        Value::Time(*self)
    }

    fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
        *self = match value {
            Value::Null => epoch(),
            Value::Time(time) => time,
            other => return Err(ConvertError::mismatch(other.kind(), Self::shape())),
        };
        Ok(())
    }

    fn instantiate(value: Value) -> Result<Self, ConvertError> {
        let mut out = epoch();
        out.absorb(value)?;
        Ok(out)
    }
}

impl Reflect for serde_json::Value {
    fn shape() -> Shape {
        Shape::Any
    }

    fn reflect(&self) -> Value {
        match self {
            serde_json::Value::Null => Value::Null,
            other => Value::Any(other.clone()),
        }
    }

    fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
        *self = value.into_json();
        Ok(())
    }

    fn instantiate(value: Value) -> Result<Self, ConvertError> {
        Ok(value.into_json())
    }
}

/// Capability shared by every concrete type that may occupy a polymorphic legacy slot.
///
/// Implemented for the trait object (`impl Interface for dyn Fault`); the converter only
/// reads and writes the [`Interface::Base`] record and never sees the concrete variants.
pub trait Interface {
    type Base: Record;

    const NAME: &'static str;

    fn base(&self) -> &Self::Base;

    fn base_mut(&mut self) -> &mut Self::Base;

    /// Wraps a bare base record when the converter has to create the slot.
    fn from_base(base: Self::Base) -> Box<Self>;
}

/// Owned polymorphic value, e.g. `Poly<dyn Fault>`.
pub struct Poly<T: ?Sized>(pub Box<T>);

impl<T: ?Sized> Poly<T> {
    pub fn new(inner: Box<T>) -> Self {
        Self(inner)
    }

    pub fn into_inner(self) -> Box<T> {
        self.0
    }
}

impl<T: ?Sized> Deref for Poly<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> DerefMut for Poly<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Poly<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<T: ?Sized + Interface> Reflect for Poly<T> {
    fn shape() -> Shape {
        Shape::Interface(InterfaceShape {
            name: T::NAME,
            base: RecordRef::of::<T::Base>(),
        })
    }

    fn reflect(&self) -> Value {
        self.0.base().reflect()
    }

    fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
        self.0.base_mut().absorb(value)
    }

    fn instantiate(value: Value) -> Result<Self, ConvertError> {
        let base = <T::Base as Reflect>::instantiate(value)?;
        Ok(Self(T::from_base(base)))
    }
}
