//! What a spied call returns
//!
//! Each spy picks one [`Behavior`] at construction and keeps it:
//!
//! - **Transparent** forwards to the captured original function.
//! - **Defaults** ignores the call and returns fixed values: supplied
//!   literals where given, the declared type's zero value elsewhere.
//! - **Delegate** forwards to a replacement function of identical
//!   signature; the original is never called.

use std::fmt;

use fnspy_value::Value;

use crate::error::{CallError, SpyError};
use crate::func::Func;
use crate::signature::Signature;

/// The kind of behavior a spy was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    Transparent,
    Defaults,
    Delegate,
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorKind::Transparent => write!(f, "transparent"),
            BehaviorKind::Defaults => write!(f, "defaults"),
            BehaviorKind::Delegate => write!(f, "delegate"),
        }
    }
}

pub(crate) enum Behavior {
    Transparent { original: Func },
    Defaults { results: Vec<Value> },
    Delegate { replacement: Func },
}

impl Behavior {
    pub(crate) fn transparent(original: Func) -> Self {
        Behavior::Transparent { original }
    }

    /// Fixed results for `signature`.
    ///
    /// `literals` is either empty (all zero values) or has one entry per
    /// result slot; a `None` entry falls back to that slot's zero value.
    pub(crate) fn defaults(
        target: &str,
        signature: &Signature,
        literals: Vec<Option<Value>>,
    ) -> Result<Self, SpyError> {
        let expected = signature.num_out();
        if !literals.is_empty() && literals.len() != expected {
            return Err(SpyError::ReturnCountMismatch {
                target: target.to_string(),
                expected,
                got: literals.len(),
            });
        }

        let mut literals = literals.into_iter();
        let mut results = Vec::with_capacity(expected);
        for (index, ty) in signature.results().iter().enumerate() {
            let value = match literals.next().flatten() {
                Some(value) if !value.conforms_to(ty) => {
                    return Err(SpyError::ReturnTypeMismatch {
                        target: target.to_string(),
                        index,
                        expected: ty.to_string(),
                        actual: value.infer_type().to_string(),
                    });
                }
                Some(value) => value,
                None => ty.zero_value(),
            };
            results.push(value);
        }

        Ok(Behavior::Defaults { results })
    }

    pub(crate) fn delegate(
        target: &str,
        signature: &Signature,
        replacement: Func,
    ) -> Result<Self, SpyError> {
        if replacement.signature() != signature {
            return Err(SpyError::SignatureMismatch {
                target: target.to_string(),
                expected: signature.to_string(),
                actual: replacement.signature().to_string(),
            });
        }
        if replacement.is_nil() {
            return Err(SpyError::NilReplacement {
                target: target.to_string(),
            });
        }

        Ok(Behavior::Delegate { replacement })
    }

    pub(crate) fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Transparent { .. } => BehaviorKind::Transparent,
            Behavior::Defaults { .. } => BehaviorKind::Defaults,
            Behavior::Delegate { .. } => BehaviorKind::Delegate,
        }
    }

    /// Produce the results for one call; `args` are in declared slots.
    pub(crate) fn dispatch(&self, args: &[Value]) -> Result<Vec<Value>, CallError> {
        match self {
            Behavior::Transparent { original } => original.call_slice(args),
            Behavior::Defaults { results } => Ok(results.clone()),
            Behavior::Delegate { replacement } => replacement.call_slice(args),
        }
    }
}
