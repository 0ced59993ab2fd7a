//! Spies
//!
//! A [`Spy`] takes over a function variable: every call through the
//! variable is recorded, then answered by the spy's [`BehaviorKind`]. The
//! code calling the variable does not change. [`Spy::restore`] hands the
//! variable back; the recorded history stays readable afterwards.
//!
//! # Construction
//!
//! | Constructor | Behavior |
//! |-------------|----------|
//! | [`Spy::observe`] | call the original, return its results |
//! | [`Spy::fake`] | return the zero value of every result slot |
//! | [`Spy::fake_with_defaults`] | return literals, zero values for `None` slots |
//! | [`Spy::fake_with_returns`] | return exactly the given literals |
//! | [`Spy::fake_with_delegate`] | call a replacement of identical signature |
//!
//! Every check runs before the variable is touched: a constructor either
//! returns a spy with the substitution installed or an error with the
//! variable unchanged.

mod recorder;
mod strategy;

pub use recorder::{CallList, CallRecorder};
pub use strategy::BehaviorKind;

use std::cell::RefCell;
use std::rc::Rc;

use fnspy_value::Value;
use tracing::{debug, trace};

use crate::error::SpyError;
use crate::func::{ArgList, Func};
use crate::signature::Signature;
use crate::substitution::Substitution;
use crate::var::FuncVar;
use strategy::Behavior;

/// Records calls through a function variable and decides their results.
#[derive(Debug)]
pub struct Spy {
    substitution: Substitution,
    recorder: Rc<RefCell<CallRecorder>>,
    behavior: BehaviorKind,
}

impl Spy {
    /// Record calls and pass them through to the original function.
    pub fn observe(target: impl AsRef<FuncVar>) -> Result<Self, SpyError> {
        Self::install(target.as_ref(), |sub| {
            Ok(Behavior::transparent(sub.original().clone()))
        })
    }

    /// Record calls and return zero values for every result.
    pub fn fake(target: impl AsRef<FuncVar>) -> Result<Self, SpyError> {
        Self::fake_with_defaults(target, Vec::new())
    }

    /// Record calls and return `defaults`.
    ///
    /// An empty list means zero values throughout. Otherwise the list needs
    /// one entry per result slot; `None` entries get the slot's zero value.
    pub fn fake_with_defaults(
        target: impl AsRef<FuncVar>,
        defaults: Vec<Option<Value>>,
    ) -> Result<Self, SpyError> {
        Self::install(target.as_ref(), |sub| {
            Behavior::defaults(sub.target_name(), sub.target_signature(), defaults)
        })
    }

    /// Record calls and return exactly `returns`, one per result slot.
    pub fn fake_with_returns(target: impl AsRef<FuncVar>, returns: Vec<Value>) -> Result<Self, SpyError> {
        Self::install(target.as_ref(), |sub| {
            let expected = sub.target_signature().num_out();
            if returns.len() != expected {
                return Err(SpyError::ReturnCountMismatch {
                    target: sub.target_name().to_string(),
                    expected,
                    got: returns.len(),
                });
            }

            let literals = returns.into_iter().map(Some).collect();
            Behavior::defaults(sub.target_name(), sub.target_signature(), literals)
        })
    }

    /// Record calls and forward them to `replacement`.
    ///
    /// `replacement` must be non-nil and have exactly the target's
    /// signature.
    pub fn fake_with_delegate(target: impl AsRef<FuncVar>, replacement: Func) -> Result<Self, SpyError> {
        Self::install(target.as_ref(), |sub| {
            Behavior::delegate(sub.target_name(), sub.target_signature(), replacement)
        })
    }

    fn install<B>(target: &FuncVar, build: B) -> Result<Self, SpyError>
    where
        B: FnOnce(&Substitution) -> Result<Behavior, SpyError>,
    {
        let substitution = Substitution::create(target)?;
        let behavior = build(&substitution)?;
        let kind = behavior.kind();

        let recorder = Rc::new(RefCell::new(CallRecorder::new()));
        let wrapper = interpose(
            substitution.target_name().to_string(),
            substitution.target_signature().clone(),
            Rc::clone(&recorder),
            behavior,
        );
        substitution.install(wrapper)?;

        debug!(
            var = substitution.target_name(),
            signature = %substitution.target_signature(),
            behavior = %kind,
            "spy installed"
        );

        Ok(Self {
            substitution,
            recorder,
            behavior: kind,
        })
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.recorder.borrow().count()
    }

    pub fn called(&self) -> bool {
        self.call_count() > 0
    }

    /// Every recorded call, oldest first. Empty if never called; a call
    /// with no arguments shows up as an empty argument list.
    pub fn calls(&self) -> CallList {
        self.recorder.borrow().calls().to_vec()
    }

    /// Arguments of the call at zero-based `index`.
    pub fn args_for_call(&self, index: usize) -> Result<ArgList, SpyError> {
        let recorder = self.recorder.borrow();
        recorder
            .get(index)
            .cloned()
            .ok_or_else(|| SpyError::CallIndexOutOfRange {
                target: self.target_name().to_string(),
                index,
                count: recorder.count(),
            })
    }

    /// Forget recorded calls. The substitution stays as it is.
    pub fn reset(&self) {
        self.recorder.borrow_mut().clear();
        debug!(var = self.target_name(), "spy history reset");
    }

    /// Put the original function back in the variable.
    ///
    /// Later calls bypass the spy; the history recorded so far is kept.
    pub fn restore(&self) {
        self.substitution.restore();
    }

    /// Whether calls through the variable still reach this spy.
    pub fn is_active(&self) -> bool {
        self.substitution.is_active()
    }

    pub fn behavior(&self) -> BehaviorKind {
        self.behavior
    }

    pub fn target_name(&self) -> &str {
        self.substitution.target_name()
    }

    pub fn signature(&self) -> &Signature {
        self.substitution.target_signature()
    }
}

/// The function installed in the target: record, then dispatch.
///
/// Arguments are recorded before the behavior runs, so a call that fails
/// or panics in the behavior is still in the history.
fn interpose(
    name: String,
    signature: Signature,
    recorder: Rc<RefCell<CallRecorder>>,
    behavior: Behavior,
) -> Func {
    Func::new(signature, move |args: &[Value]| {
        let index = recorder.borrow_mut().record(args.to_vec());
        trace!(var = %name, call = index, "recorded call");
        behavior.dispatch(args)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::var::TypedVar;

    #[test]
    fn wrapper_records_before_dispatch() {
        let var: TypedVar<(i32,), i32> = TypedVar::new("fails", |(x,): (i32,)| x);
        let broken = Func::new(var.var().signature().clone(), |_| Ok(vec![]));
        let spy = Spy::fake_with_delegate(&var, broken).unwrap();

        assert!(var.try_call((3,)).is_err());
        assert_eq!(spy.calls(), vec![vec![Value::S32(3)]]);
    }

    #[test]
    fn failed_construction_leaves_target_alone() {
        let var: TypedVar<(), (String, i32)> =
            TypedVar::new("pair", |(): ()| ("orig".to_string(), 7));
        let before = var.var().get();

        assert!(Spy::fake_with_returns(&var, vec![Value::from("x")]).is_err());
        assert!(Spy::fake_with_defaults(&var, vec![Some(Value::S32(1)), None]).is_err());
        assert!(Spy::fake_with_delegate(&var, Func::typed(|(): ()| 1i32)).is_err());

        assert!(var.var().get().same_as(&before));
        assert!(Spy::observe(&var).is_ok());
    }

    #[test]
    fn spy_reports_its_behavior_and_target() {
        let var: TypedVar<(), bool> = TypedVar::new("ready", |(): ()| true);
        let spy = Spy::fake(&var).unwrap();
        assert_eq!(spy.behavior(), BehaviorKind::Defaults);
        assert_eq!(spy.target_name(), "ready");
        assert_eq!(spy.signature().to_string(), "fn() -> bool");
        assert!(spy.is_active());
    }
}
