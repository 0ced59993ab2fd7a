//! Function values
//!
//! A [`Func`] pairs a [`Signature`] with a body over dynamic [`Value`]s. It
//! is what a function variable stores, what a spy captures as the original,
//! and what delegate mode forwards to. Every call is checked against the
//! signature on the way in and on the way out.

use std::fmt;
use std::rc::Rc;

use fnspy_value::Value;

use crate::error::CallError;
use crate::signature::Signature;
use crate::typed::{ArgTuple, ReturnTuple};

/// The arguments of one invocation, in declared parameter order.
pub type ArgList = Vec<Value>;

type Body = Rc<dyn Fn(&[Value]) -> Result<Vec<Value>, CallError>>;

/// A typed callable value, possibly nil.
#[derive(Clone)]
pub struct Func {
    signature: Signature,
    body: Option<Body>,
}

impl Func {
    /// A function from a dynamic body.
    ///
    /// The body receives arguments already collapsed and checked against
    /// `signature`; whatever it returns is checked against the declared
    /// result types before reaching the caller.
    pub fn new<F>(signature: Signature, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Vec<Value>, CallError> + 'static,
    {
        Self {
            signature,
            body: Some(Rc::new(body)),
        }
    }

    /// A function from a Rust closure over an argument tuple.
    ///
    /// The signature is derived from the closure's types; a trailing
    /// [`Variadic`](fnspy_value::Variadic) parameter makes it variadic.
    ///
    /// ```
    /// use fnspy::Func;
    ///
    /// let greet = Func::typed(|(name, times): (String, i32)| name.repeat(times as usize));
    /// assert_eq!(greet.signature().to_string(), "fn(string, s32) -> string");
    /// ```
    pub fn typed<A, R, F>(f: F) -> Self
    where
        A: ArgTuple,
        R: ReturnTuple,
        F: Fn(A) -> R + 'static,
    {
        let signature = Signature::from_parts(A::param_types(), R::result_types(), A::is_variadic());
        Self::new(signature, move |args: &[Value]| {
            let args = A::from_values(args.to_vec())?;
            Ok(f(args).into_values())
        })
    }

    /// The nil function of a signature.
    pub fn nil(signature: Signature) -> Self {
        Self {
            signature,
            body: None,
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn is_nil(&self) -> bool {
        self.body.is_none()
    }

    /// Whether both values share one body. Two nil functions are never the
    /// same.
    pub fn same_as(&self, other: &Func) -> bool {
        match (&self.body, &other.body) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Call with call-site arguments; a variadic tail is collapsed first.
    pub fn call(&self, args: Vec<Value>) -> Result<Vec<Value>, CallError> {
        let args = self.signature.collapse(args)?;
        self.call_slice(&args)
    }

    /// Call with arguments already in declared slots.
    pub fn call_slice(&self, args: &[Value]) -> Result<Vec<Value>, CallError> {
        let Some(body) = &self.body else {
            return Err(CallError::NilFunction {
                signature: self.signature.to_string(),
            });
        };

        self.signature.check_args(args)?;
        let results = body(args)?;
        self.signature.check_results(&results)?;
        Ok(results)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func")
            .field("signature", &self.signature.to_string())
            .field("nil", &self.is_nil())
            .finish()
    }
}
