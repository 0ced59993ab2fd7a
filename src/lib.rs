//! fnspy: spies and fakes for function variables
//!
//! Production code calls through a function variable ([`FuncVar`], or its
//! typed form [`TypedVar`]). A test points a [`Spy`] at that variable and,
//! without the production code noticing, can
//!
//! - observe every call and its arguments while keeping the real behavior,
//! - fake the results (zero values or fixed literals),
//! - swap in a different implementation of the same signature,
//!
//! and finally restore the original function.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Spy         - recorder + behavior + restore │
//! │  Substitution- capture / install / restore   │
//! │  FuncVar     - function-typed storage        │
//! │  Func        - signature + dynamic body      │
//! ├──────────────────────────────────────────────┤
//! │  fnspy_value - Value / ValueType             │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use fnspy::{Spy, TypedVar, Value};
//!
//! let lookup: TypedVar<(String, i32, bool), (String, i32)> =
//!     TypedVar::new("lookup", |(_, _, _): (String, i32, bool)| ("orig".to_string(), 7));
//!
//! let spy = Spy::fake(&lookup).unwrap();
//! assert_eq!(lookup.call(("x".to_string(), 1, true)), (String::new(), 0));
//! assert_eq!(
//!     spy.calls(),
//!     vec![vec![Value::from("x"), Value::from(1), Value::from(true)]]
//! );
//!
//! spy.restore();
//! assert_eq!(lookup.call(("y".to_string(), 2, false)), ("orig".to_string(), 7));
//! assert_eq!(spy.call_count(), 1);
//! ```

pub mod error;
pub mod func;
pub mod signature;
pub mod spy;
pub mod substitution;
pub mod typed;
pub mod var;

pub use error::{CallError, SpyError};
pub use fnspy_value::{ConversionError, FromValue, Reflect, Value, ValueType, Variadic};
pub use func::{ArgList, Func};
pub use signature::Signature;
pub use spy::{BehaviorKind, CallList, CallRecorder, Spy};
pub use substitution::Substitution;
pub use typed::{ArgTuple, ReturnTuple};
pub use var::{FuncVar, TypedVar};
