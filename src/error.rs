//! Error types for spies and function calls.

use fnspy_value::ConversionError;
use thiserror::Error;

/// Errors raised while building or querying a [`Spy`](crate::Spy).
///
/// All of these are caller mistakes. Construction either fails with one of
/// them and leaves the target untouched, or succeeds with the substitution
/// installed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpyError {
    /// The target cannot be substituted (unset, or already substituted).
    #[error("spy target '{target}' is not substitutable: {reason}")]
    InvalidTarget { target: String, reason: String },

    /// A non-empty literal return list with the wrong number of values.
    #[error(
        "invalid number of return values for '{target}': expected {expected}, got {got}; \
         specify every return value or none for defaults"
    )]
    ReturnCountMismatch {
        target: String,
        expected: usize,
        got: usize,
    },

    /// A literal return value that does not fit its declared slot.
    #[error("return value {index} for '{target}' has type {actual}, expected {expected}")]
    ReturnTypeMismatch {
        target: String,
        index: usize,
        expected: String,
        actual: String,
    },

    /// A function whose signature differs from the target's.
    #[error("fake function for '{target}' has to have the same signature as the target [target: {expected}, fake: {actual}]")]
    SignatureMismatch {
        target: String,
        expected: String,
        actual: String,
    },

    /// Delegate mode was given a nil function.
    #[error("fake function for '{target}' is nil")]
    NilReplacement { target: String },

    #[error("no call at index {index} for '{target}': {count} calls recorded")]
    CallIndexOutOfRange {
        target: String,
        index: usize,
        count: usize,
    },
}

/// Errors from invoking a [`Func`](crate::Func) or a function variable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    #[error("call of nil function {signature}")]
    NilFunction { signature: String },

    #[error("wrong argument count for {signature}: expected {expected}, got {got}")]
    ArgumentCount {
        signature: String,
        expected: usize,
        got: usize,
    },

    #[error("argument {index} of {signature}: expected {expected}, got {actual}")]
    ArgumentType {
        signature: String,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("wrong result count from {signature}: expected {expected}, got {got}")]
    ResultCount {
        signature: String,
        expected: usize,
        got: usize,
    },

    #[error("result {index} of {signature}: expected {expected}, got {actual}")]
    ResultType {
        signature: String,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("value conversion failed: {0}")]
    Conversion(#[from] ConversionError),
}
