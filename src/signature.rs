//! Function signatures
//!
//! A [`Signature`] is the declared shape of a function variable: ordered
//! parameter types, ordered result types, and whether the last parameter is
//! variadic. Spies derive everything they need about a target from it, and
//! every call through a function value is checked against it.

use std::fmt;

use fnspy_value::{Value, ValueType};
use serde::{Deserialize, Serialize};

use crate::error::CallError;

/// The declared type of a function value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    params: Vec<ValueType>,
    results: Vec<ValueType>,
    variadic: bool,
}

impl Signature {
    /// A fixed-arity signature.
    pub fn new(params: Vec<ValueType>, results: Vec<ValueType>) -> Self {
        Self {
            params,
            results,
            variadic: false,
        }
    }

    /// A signature whose trailing parameter collects `elem` values.
    ///
    /// The trailing slot is declared as `list<elem>`.
    pub fn variadic(fixed: Vec<ValueType>, elem: ValueType, results: Vec<ValueType>) -> Self {
        let mut params = fixed;
        params.push(ValueType::List(Box::new(elem)));
        Self {
            params,
            results,
            variadic: true,
        }
    }

    /// Build from derived parts; `variadic` is ignored unless the last
    /// parameter is a list.
    pub(crate) fn from_parts(params: Vec<ValueType>, results: Vec<ValueType>, variadic: bool) -> Self {
        let variadic = variadic && matches!(params.last(), Some(ValueType::List(_)));
        Self {
            params,
            results,
            variadic,
        }
    }

    pub fn params(&self) -> &[ValueType] {
        &self.params
    }

    pub fn results(&self) -> &[ValueType] {
        &self.results
    }

    pub fn num_in(&self) -> usize {
        self.params.len()
    }

    pub fn num_out(&self) -> usize {
        self.results.len()
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Element type of the variadic tail, if any.
    pub fn variadic_elem(&self) -> Option<&ValueType> {
        if !self.variadic {
            return None;
        }
        match self.params.last() {
            Some(ValueType::List(elem)) => Some(elem.as_ref()),
            _ => None,
        }
    }

    /// Collapse call-site arguments into declared parameter slots.
    ///
    /// For a variadic signature everything after the fixed parameters is
    /// gathered into one `list<elem>` value in the last slot. Fixed-arity
    /// signatures pass the arguments through unchanged.
    pub fn collapse(&self, mut args: Vec<Value>) -> Result<Vec<Value>, CallError> {
        let Some(elem) = self.variadic_elem() else {
            return Ok(args);
        };

        let fixed = self.params.len() - 1;
        if args.len() < fixed {
            return Err(CallError::ArgumentCount {
                signature: self.to_string(),
                expected: fixed,
                got: args.len(),
            });
        }

        let tail = args.split_off(fixed);
        args.push(Value::List {
            elem_type: elem.clone(),
            items: tail,
        });
        Ok(args)
    }

    /// Check collapsed arguments against the parameter types.
    pub fn check_args(&self, args: &[Value]) -> Result<(), CallError> {
        if args.len() != self.params.len() {
            return Err(CallError::ArgumentCount {
                signature: self.to_string(),
                expected: self.params.len(),
                got: args.len(),
            });
        }

        for (index, (arg, ty)) in args.iter().zip(&self.params).enumerate() {
            if !arg.conforms_to(ty) {
                return Err(CallError::ArgumentType {
                    signature: self.to_string(),
                    index,
                    expected: ty.to_string(),
                    actual: arg.infer_type().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check values produced by a function body against the result types.
    pub fn check_results(&self, results: &[Value]) -> Result<(), CallError> {
        if results.len() != self.results.len() {
            return Err(CallError::ResultCount {
                signature: self.to_string(),
                expected: self.results.len(),
                got: results.len(),
            });
        }

        for (index, (value, ty)) in results.iter().zip(&self.results).enumerate() {
            if !value.conforms_to(ty) {
                return Err(CallError::ResultType {
                    signature: self.to_string(),
                    index,
                    expected: ty.to_string(),
                    actual: value.infer_type().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match param {
                ValueType::List(elem) if self.variadic && i == last => write!(f, "...{}", elem)?,
                other => write!(f, "{}", other)?,
            }
        }
        write!(f, ")")?;

        match self.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {}", single),
            many => {
                write!(f, " -> (")?;
                for (i, ty) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", ty)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> Signature {
        Signature::new(
            vec![ValueType::String, ValueType::S32, ValueType::Bool],
            vec![ValueType::String, ValueType::S32],
        )
    }

    #[test]
    fn display_fixed_and_variadic() {
        assert_eq!(lookup().to_string(), "fn(string, s32, bool) -> (string, s32)");

        let log = Signature::variadic(vec![ValueType::String], ValueType::Any, vec![ValueType::S64]);
        assert_eq!(log.to_string(), "fn(string, ...any) -> s64");

        assert_eq!(Signature::new(vec![], vec![]).to_string(), "fn()");
    }

    #[test]
    fn collapse_gathers_variadic_tail() {
        let sig = Signature::variadic(vec![ValueType::String], ValueType::S32, vec![]);
        let collapsed = sig
            .collapse(vec![Value::from("B"), Value::S32(1), Value::S32(2)])
            .unwrap();
        assert_eq!(collapsed, vec![Value::from("B"), Value::from(vec![1i32, 2])]);

        let empty_tail = sig.collapse(vec![Value::from("C")]).unwrap();
        assert_eq!(empty_tail, vec![Value::from("C"), Value::from(Vec::<i32>::new())]);

        assert!(matches!(
            sig.collapse(vec![]),
            Err(CallError::ArgumentCount { expected: 1, got: 0, .. })
        ));
    }

    #[test]
    fn collapse_is_identity_for_fixed_arity() {
        let args = vec![Value::from("x"), Value::S32(1), Value::Bool(true)];
        assert_eq!(lookup().collapse(args.clone()).unwrap(), args);
    }

    #[test]
    fn check_args_reports_position_and_types() {
        let sig = lookup();
        assert!(sig.check_args(&[Value::from("x"), Value::S32(1), Value::Bool(true)]).is_ok());

        let err = sig
            .check_args(&[Value::from("x"), Value::S64(1), Value::Bool(true)])
            .unwrap_err();
        assert_eq!(
            err,
            CallError::ArgumentType {
                signature: sig.to_string(),
                index: 1,
                expected: "s32".to_string(),
                actual: "s64".to_string(),
            }
        );

        assert!(matches!(
            sig.check_args(&[Value::from("x")]),
            Err(CallError::ArgumentCount { expected: 3, got: 1, .. })
        ));
    }

    #[test]
    fn variadic_flag_needs_a_trailing_list() {
        let sig = Signature::from_parts(vec![ValueType::String], vec![], true);
        assert!(!sig.is_variadic());
        assert_eq!(sig.variadic_elem(), None);
    }
}
