//! Dynamic values for fnspy
//!
//! Arguments and results crossing a spied function variable are carried as
//! [`Value`]s, tagged with enough type information ([`ValueType`]) to check
//! them against a function signature and to fabricate zero values for any
//! declared result slot.
//!
//! ```
//! use fnspy_value::{FromValue, Reflect, Value, ValueType};
//!
//! let v: Value = vec![1i32, 2, 3].into();
//! assert_eq!(v.infer_type(), Vec::<i32>::value_type());
//! assert!(v.conforms_to(&ValueType::List(Box::new(ValueType::S32))));
//! assert_eq!(Vec::<i32>::from_value(v).unwrap(), vec![1, 2, 3]);
//!
//! assert_eq!(ValueType::String.zero_value(), Value::String(String::new()));
//! ```

mod value;

pub use value::{FromValue, Reflect, Value, ValueType, Variadic};

use thiserror::Error;

/// Errors from converting a [`Value`] back into a Rust type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("element {0}: {1}")]
    IndexError(usize, Box<ConversionError>),

    #[error("payload: {0}")]
    PayloadError(Box<ConversionError>),

    #[error("expected {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },
}
