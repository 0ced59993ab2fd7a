//! Function variables
//!
//! A [`FuncVar`] is a named storage location holding a [`Func`] of a fixed
//! signature. Production code calls through the variable instead of calling
//! a function directly, which is what lets a spy swap the stored function
//! out and back in. Handles are cheap to clone and all refer to the same
//! location; the location is single-threaded.
//!
//! [`TypedVar`] wraps a `FuncVar` with the Rust argument and result types,
//! so call sites stay ordinary Rust:
//!
//! ```
//! use fnspy::TypedVar;
//!
//! let lookup: TypedVar<(String,), Option<u32>> =
//!     TypedVar::new("lookup", |(key,): (String,)| if key == "answer" { Some(42) } else { None });
//!
//! assert_eq!(lookup.call(("answer".to_string(),)), Some(42));
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use fnspy_value::Value;

use crate::error::{CallError, SpyError};
use crate::func::Func;
use crate::signature::Signature;
use crate::typed::{ArgTuple, ReturnTuple};

struct VarCell {
    name: String,
    signature: Signature,
    current: RefCell<Func>,
    substituted: Cell<bool>,
}

/// A shared, named, function-typed storage location.
#[derive(Clone)]
pub struct FuncVar {
    inner: Rc<VarCell>,
}

impl FuncVar {
    /// A variable declared with `func`'s signature and holding `func`.
    pub fn new(name: impl Into<String>, func: Func) -> Self {
        Self {
            inner: Rc::new(VarCell {
                name: name.into(),
                signature: func.signature().clone(),
                current: RefCell::new(func),
                substituted: Cell::new(false),
            }),
        }
    }

    /// A declared but unset variable (holds the nil function).
    pub fn unset(name: impl Into<String>, signature: Signature) -> Self {
        let nil = Func::nil(signature);
        Self::new(name, nil)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The declared signature; fixed for the variable's lifetime.
    pub fn signature(&self) -> &Signature {
        &self.inner.signature
    }

    pub fn is_set(&self) -> bool {
        !self.inner.current.borrow().is_nil()
    }

    /// The function currently stored.
    pub fn get(&self) -> Func {
        self.inner.current.borrow().clone()
    }

    /// Store `func`, which must have exactly the declared signature.
    pub fn set(&self, func: Func) -> Result<(), SpyError> {
        if func.signature() != self.signature() {
            return Err(SpyError::SignatureMismatch {
                target: self.name().to_string(),
                expected: self.signature().to_string(),
                actual: func.signature().to_string(),
            });
        }
        self.store(func);
        Ok(())
    }

    /// Call the stored function with call-site arguments.
    ///
    /// The function is cloned out of the location before it runs, so the
    /// body may itself read, call, or replace the variable.
    pub fn call(&self, args: Vec<Value>) -> Result<Vec<Value>, CallError> {
        self.get().call(args)
    }

    /// Call the stored function with arguments already in declared slots.
    pub fn call_slice(&self, args: &[Value]) -> Result<Vec<Value>, CallError> {
        self.get().call_slice(args)
    }

    /// Whether two handles refer to the same location.
    pub fn same_location(&self, other: &FuncVar) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn store(&self, func: Func) {
        *self.inner.current.borrow_mut() = func;
    }

    pub(crate) fn is_substituted(&self) -> bool {
        self.inner.substituted.get()
    }

    pub(crate) fn set_substituted(&self, substituted: bool) {
        self.inner.substituted.set(substituted);
    }
}

impl AsRef<FuncVar> for FuncVar {
    fn as_ref(&self) -> &FuncVar {
        self
    }
}

impl fmt::Debug for FuncVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncVar")
            .field("name", &self.name())
            .field("signature", &self.signature().to_string())
            .field("set", &self.is_set())
            .field("substituted", &self.is_substituted())
            .finish()
    }
}

// ============================================================================
// TypedVar
// ============================================================================

/// A [`FuncVar`] whose argument and result types are known to Rust.
pub struct TypedVar<A, R> {
    var: FuncVar,
    _types: PhantomData<fn(A) -> R>,
}

impl<A: ArgTuple, R: ReturnTuple> TypedVar<A, R> {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(A) -> R + 'static,
    {
        Self {
            var: FuncVar::new(name, Func::typed(f)),
            _types: PhantomData,
        }
    }

    /// A declared but unset variable.
    pub fn unset(name: impl Into<String>) -> Self {
        let signature = Signature::from_parts(A::param_types(), R::result_types(), A::is_variadic());
        Self {
            var: FuncVar::unset(name, signature),
            _types: PhantomData,
        }
    }

    /// Replace the stored function.
    pub fn set<F>(&self, f: F)
    where
        F: Fn(A) -> R + 'static,
    {
        // Same type parameters, same signature
        self.var.store(Func::typed(f));
    }

    pub fn var(&self) -> &FuncVar {
        &self.var
    }

    /// Call through the variable, returning call failures as errors.
    pub fn try_call(&self, args: A) -> Result<R, CallError> {
        let results = self.var.call_slice(&args.into_values())?;
        Ok(R::from_values(results)?)
    }

    /// Call through the variable.
    ///
    /// # Panics
    ///
    /// Panics when the variable is unset or the stored function fails its
    /// signature checks, the same way calling a nil function would.
    pub fn call(&self, args: A) -> R {
        match self.try_call(args) {
            Ok(results) => results,
            Err(err) => panic!("call through '{}' failed: {}", self.var.name(), err),
        }
    }
}

impl<A, R> Clone for TypedVar<A, R> {
    fn clone(&self) -> Self {
        Self {
            var: self.var.clone(),
            _types: PhantomData,
        }
    }
}

impl<A, R> AsRef<FuncVar> for TypedVar<A, R> {
    fn as_ref(&self) -> &FuncVar {
        &self.var
    }
}

impl<A, R> fmt::Debug for TypedVar<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedVar").field(&self.var).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnspy_value::ValueType;
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn set_rejects_a_different_signature() {
        let var = FuncVar::new("double", Func::typed(|(x,): (i32,)| x * 2));
        let wrong = Func::typed(|(x,): (i64,)| x * 2);

        let err = var.set(wrong).unwrap_err();
        assert_eq!(
            err,
            SpyError::SignatureMismatch {
                target: "double".to_string(),
                expected: "fn(s32) -> s32".to_string(),
                actual: "fn(s64) -> s64".to_string(),
            }
        );
        assert_eq!(var.call(vec![Value::S32(4)]).unwrap(), vec![Value::S32(8)]);
    }

    #[test]
    fn handles_share_one_location() {
        let var = FuncVar::new("flag", Func::typed(|(): ()| false));
        let alias = var.clone();
        alias.set(Func::typed(|(): ()| true)).unwrap();

        assert!(var.same_location(&alias));
        assert_eq!(var.call(vec![]).unwrap(), vec![Value::Bool(true)]);
    }

    #[test]
    fn unset_variable_fails_to_call() {
        let var = FuncVar::unset("missing", Signature::new(vec![], vec![ValueType::Bool]));
        assert!(!var.is_set());
        assert!(matches!(var.call(vec![]), Err(CallError::NilFunction { .. })));
    }

    #[test]
    fn body_may_replace_its_own_variable() {
        let var = FuncVar::unset("once", Signature::new(vec![], vec![ValueType::S32]));
        let handle = var.clone();
        var.set(Func::new(var.signature().clone(), move |_| {
            handle.store(Func::typed(|(): ()| 2i32));
            Ok(vec![Value::S32(1)])
        }))
        .unwrap();

        assert_eq!(var.call(vec![]).unwrap(), vec![Value::S32(1)]);
        assert_eq!(var.call(vec![]).unwrap(), vec![Value::S32(2)]);
    }

    #[test]
    fn typed_call_panics_on_unset() {
        let var: TypedVar<(i32,), i32> = TypedVar::unset("missing");
        let result = panic::catch_unwind(AssertUnwindSafe(|| var.call((1,))));
        assert!(result.is_err());
        assert!(var.try_call((1,)).is_err());
    }
}
