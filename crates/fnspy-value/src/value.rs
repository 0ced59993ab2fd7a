//! Runtime values

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ConversionError;

/// Runtime type of an argument or result slot
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueType {
    Unit,
    Bool,
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
    F32,
    F64,
    Char,
    String,
    List(Box<ValueType>),
    Option(Box<ValueType>),
    Result { ok: Box<ValueType>, err: Box<ValueType> },
    Record { name: String, fields: Vec<(String, ValueType)> },
    Tuple(Vec<ValueType>),
    /// Accepts any value; the dynamic escape hatch.
    Any,
}

impl ValueType {
    /// The zero value for a slot of this type.
    ///
    /// Numbers are zero, strings and lists empty, options `none`, results
    /// `ok` of the zero success value, records and tuples zeroed field by
    /// field. `unit` and `any` both yield `Value::Unit`.
    pub fn zero_value(&self) -> Value {
        match self {
            ValueType::Unit | ValueType::Any => Value::Unit,
            ValueType::Bool => Value::Bool(false),
            ValueType::U8 => Value::U8(0),
            ValueType::U16 => Value::U16(0),
            ValueType::U32 => Value::U32(0),
            ValueType::U64 => Value::U64(0),
            ValueType::S8 => Value::S8(0),
            ValueType::S16 => Value::S16(0),
            ValueType::S32 => Value::S32(0),
            ValueType::S64 => Value::S64(0),
            ValueType::F32 => Value::F32(0.0),
            ValueType::F64 => Value::F64(0.0),
            ValueType::Char => Value::Char('\0'),
            ValueType::String => Value::String(String::new()),
            ValueType::List(elem) => Value::List {
                elem_type: (**elem).clone(),
                items: Vec::new(),
            },
            ValueType::Option(inner) => Value::Option {
                inner_type: (**inner).clone(),
                value: None,
            },
            ValueType::Result { ok, err } => Value::Result {
                ok_type: (**ok).clone(),
                err_type: (**err).clone(),
                value: Ok(Box::new(ok.zero_value())),
            },
            ValueType::Record { name, fields } => Value::Record {
                type_name: name.clone(),
                fields: fields
                    .iter()
                    .map(|(field, ty)| (field.clone(), ty.zero_value()))
                    .collect(),
            },
            ValueType::Tuple(types) => Value::Tuple(types.iter().map(ValueType::zero_value).collect()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Unit => write!(f, "unit"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::U8 => write!(f, "u8"),
            ValueType::U16 => write!(f, "u16"),
            ValueType::U32 => write!(f, "u32"),
            ValueType::U64 => write!(f, "u64"),
            ValueType::S8 => write!(f, "s8"),
            ValueType::S16 => write!(f, "s16"),
            ValueType::S32 => write!(f, "s32"),
            ValueType::S64 => write!(f, "s64"),
            ValueType::F32 => write!(f, "f32"),
            ValueType::F64 => write!(f, "f64"),
            ValueType::Char => write!(f, "char"),
            ValueType::String => write!(f, "string"),
            ValueType::List(elem) => write!(f, "list<{}>", elem),
            ValueType::Option(inner) => write!(f, "option<{}>", inner),
            ValueType::Result { ok, err } => write!(f, "result<{}, {}>", ok, err),
            ValueType::Record { name, .. } => write!(f, "{}", name),
            ValueType::Tuple(types) => {
                write!(f, "tuple<")?;
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", ty)?;
                }
                write!(f, ">")
            }
            ValueType::Any => write!(f, "any"),
        }
    }
}

/// A dynamically typed argument or result value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    // Primitives
    Unit,
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S8(i8),
    S16(i16),
    S32(i32),
    S64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),

    // Compound types carry their element types so empty values stay typed
    List { elem_type: ValueType, items: Vec<Value> },
    Option { inner_type: ValueType, value: Option<Box<Value>> },
    Result { ok_type: ValueType, err_type: ValueType, value: Result<Box<Value>, Box<Value>> },
    Record { type_name: String, fields: Vec<(String, Value)> },

    // Positional, no type info needed
    Tuple(Vec<Value>),
}

impl Value {
    /// Infer the ValueType from this Value
    pub fn infer_type(&self) -> ValueType {
        match self {
            Value::Unit => ValueType::Unit,
            Value::Bool(_) => ValueType::Bool,
            Value::U8(_) => ValueType::U8,
            Value::U16(_) => ValueType::U16,
            Value::U32(_) => ValueType::U32,
            Value::U64(_) => ValueType::U64,
            Value::S8(_) => ValueType::S8,
            Value::S16(_) => ValueType::S16,
            Value::S32(_) => ValueType::S32,
            Value::S64(_) => ValueType::S64,
            Value::F32(_) => ValueType::F32,
            Value::F64(_) => ValueType::F64,
            Value::Char(_) => ValueType::Char,
            Value::String(_) => ValueType::String,
            Value::List { elem_type, .. } => ValueType::List(Box::new(elem_type.clone())),
            Value::Option { inner_type, .. } => ValueType::Option(Box::new(inner_type.clone())),
            Value::Result { ok_type, err_type, .. } => ValueType::Result {
                ok: Box::new(ok_type.clone()),
                err: Box::new(err_type.clone()),
            },
            Value::Record { type_name, fields } => ValueType::Record {
                name: type_name.clone(),
                fields: fields
                    .iter()
                    .map(|(field, v)| (field.clone(), v.infer_type()))
                    .collect(),
            },
            Value::Tuple(items) => ValueType::Tuple(items.iter().map(|v| v.infer_type()).collect()),
        }
    }

    /// Check that this value can occupy a slot of type `ty`.
    ///
    /// Compound values must declare the expected element types and every
    /// nested value must conform as well. `any` accepts everything.
    pub fn conforms_to(&self, ty: &ValueType) -> bool {
        match (self, ty) {
            (_, ValueType::Any) => true,
            (Value::Unit, ValueType::Unit)
            | (Value::Bool(_), ValueType::Bool)
            | (Value::U8(_), ValueType::U8)
            | (Value::U16(_), ValueType::U16)
            | (Value::U32(_), ValueType::U32)
            | (Value::U64(_), ValueType::U64)
            | (Value::S8(_), ValueType::S8)
            | (Value::S16(_), ValueType::S16)
            | (Value::S32(_), ValueType::S32)
            | (Value::S64(_), ValueType::S64)
            | (Value::F32(_), ValueType::F32)
            | (Value::F64(_), ValueType::F64)
            | (Value::Char(_), ValueType::Char)
            | (Value::String(_), ValueType::String) => true,
            (Value::List { elem_type, items }, ValueType::List(expected)) => {
                elem_type == expected.as_ref() && items.iter().all(|item| item.conforms_to(expected))
            }
            (Value::Option { inner_type, value }, ValueType::Option(expected)) => {
                inner_type == expected.as_ref()
                    && value.as_ref().map_or(true, |v| v.conforms_to(expected))
            }
            (Value::Result { ok_type, err_type, value }, ValueType::Result { ok, err }) => {
                ok_type == ok.as_ref()
                    && err_type == err.as_ref()
                    && match value {
                        Ok(v) => v.conforms_to(ok),
                        Err(e) => e.conforms_to(err),
                    }
            }
            (Value::Record { type_name, fields }, ValueType::Record { name, fields: expected }) => {
                type_name == name
                    && fields.len() == expected.len()
                    && fields
                        .iter()
                        .zip(expected)
                        .all(|((field, v), (want, ty))| field == want && v.conforms_to(ty))
            }
            (Value::Tuple(items), ValueType::Tuple(types)) => {
                items.len() == types.len() && items.iter().zip(types).all(|(v, ty)| v.conforms_to(ty))
            }
            _ => false,
        }
    }
}

// ============================================================================
// Reflect - static types of Rust values
// ============================================================================

/// Rust types that know their [`ValueType`] at compile time.
///
/// Used to derive a function signature from a closure's argument and
/// result types.
pub trait Reflect: Into<Value> {
    /// Set only by [`Variadic`]; marks a trailing variadic parameter.
    const IS_VARIADIC: bool = false;

    /// Returns the ValueType for this type.
    fn value_type() -> ValueType;
}

/// Trait for converting from a Value.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

fn mismatch(expected: impl fmt::Display, got: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        expected: expected.to_string(),
        got: got.infer_type().to_string(),
    }
}

macro_rules! primitive_values {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl Reflect for $ty {
                fn value_type() -> ValueType {
                    ValueType::$variant
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch(ValueType::$variant, &other)),
                    }
                }
            }
        )*
    };
}

primitive_values! {
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => S8,
    i16 => S16,
    i32 => S32,
    i64 => S64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl Reflect for () {
    fn value_type() -> ValueType {
        ValueType::Unit
    }
}

impl FromValue for () {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Unit => Ok(()),
            other => Err(mismatch(ValueType::Unit, &other)),
        }
    }
}

// Value itself stands for "any value"
impl Reflect for Value {
    fn value_type() -> ValueType {
        ValueType::Any
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl<T: Reflect> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List {
            elem_type: T::value_type(),
            items: v.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::List(Box::new(T::value_type()))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::List { items, .. } => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    T::from_value(item).map_err(|e| ConversionError::IndexError(i, Box::new(e)))
                })
                .collect(),
            other => Err(mismatch("list", &other)),
        }
    }
}

impl<T: Reflect> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Option {
            inner_type: T::value_type(),
            value: v.map(|x| Box::new(x.into())),
        }
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn value_type() -> ValueType {
        ValueType::Option(Box::new(T::value_type()))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Option { value: None, .. } => Ok(None),
            Value::Option { value: Some(inner), .. } => T::from_value(*inner)
                .map(Some)
                .map_err(|e| ConversionError::PayloadError(Box::new(e))),
            other => Err(mismatch("option", &other)),
        }
    }
}

impl<T: Reflect, E: Reflect> From<Result<T, E>> for Value {
    fn from(r: Result<T, E>) -> Self {
        Value::Result {
            ok_type: T::value_type(),
            err_type: E::value_type(),
            value: r.map(|v| Box::new(v.into())).map_err(|e| Box::new(e.into())),
        }
    }
}

impl<T: Reflect, E: Reflect> Reflect for Result<T, E> {
    fn value_type() -> ValueType {
        ValueType::Result {
            ok: Box::new(T::value_type()),
            err: Box::new(E::value_type()),
        }
    }
}

impl<T: FromValue, E: FromValue> FromValue for Result<T, E> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Result { value: Ok(inner), .. } => T::from_value(*inner)
                .map(Ok)
                .map_err(|e| ConversionError::PayloadError(Box::new(e))),
            Value::Result { value: Err(inner), .. } => E::from_value(*inner)
                .map(Err)
                .map_err(|e| ConversionError::PayloadError(Box::new(e))),
            other => Err(mismatch("result", &other)),
        }
    }
}

// ============================================================================
// Variadic parameters
// ============================================================================

/// The trailing variadic parameter of a function.
///
/// Call-site arguments after the fixed parameters are collected into a
/// single `list<T>` slot, so a spy records `f("A", 1, 2)` on
/// `f(string, ...s32)` as `("A", [1, 2])`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variadic<T>(pub Vec<T>);

impl<T> From<Vec<T>> for Variadic<T> {
    fn from(items: Vec<T>) -> Self {
        Variadic(items)
    }
}

impl<T: Reflect> From<Variadic<T>> for Value {
    fn from(v: Variadic<T>) -> Self {
        v.0.into()
    }
}

impl<T: Reflect> Reflect for Variadic<T> {
    const IS_VARIADIC: bool = true;

    fn value_type() -> ValueType {
        ValueType::List(Box::new(T::value_type()))
    }
}

impl<T: FromValue> FromValue for Variadic<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Vec::<T>::from_value(value).map(Variadic)
    }
}
