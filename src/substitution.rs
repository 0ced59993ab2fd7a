//! Substitution of a function variable's value
//!
//! Captures what a [`FuncVar`] holds, installs a replacement, and puts the
//! original back on [`Substitution::restore`]. Signature-agnostic: it only
//! knows the variable's declared [`Signature`], never the Rust types behind
//! it. At most one substitution is installed on a variable at a time.

use std::cell::Cell;

use tracing::{debug, warn};

use crate::error::SpyError;
use crate::func::Func;
use crate::signature::Signature;
use crate::var::FuncVar;

/// The restoration handle for one function variable.
#[derive(Debug)]
pub struct Substitution {
    target: FuncVar,
    original: Func,
    installed: Cell<bool>,
    restored: Cell<bool>,
}

impl Substitution {
    /// Capture `target`'s current function.
    ///
    /// Fails when the variable is unset or another substitution is
    /// installed on it. Nothing is written to the variable until
    /// [`install`](Self::install).
    pub fn create(target: &FuncVar) -> Result<Self, SpyError> {
        if !target.is_set() {
            return Err(SpyError::InvalidTarget {
                target: target.name().to_string(),
                reason: "function variable is unset".to_string(),
            });
        }
        if target.is_substituted() {
            return Err(SpyError::InvalidTarget {
                target: target.name().to_string(),
                reason: "a substitution is already installed".to_string(),
            });
        }

        let original = target.get();
        debug!(
            var = target.name(),
            signature = %target.signature(),
            "captured original function"
        );

        Ok(Self {
            target: target.clone(),
            original,
            installed: Cell::new(false),
            restored: Cell::new(false),
        })
    }

    /// The function present when the substitution was created.
    pub fn original(&self) -> &Func {
        &self.original
    }

    pub fn target_signature(&self) -> &Signature {
        self.target.signature()
    }

    pub fn target_name(&self) -> &str {
        self.target.name()
    }

    /// Store `replacement` in the variable.
    ///
    /// The replacement must have the variable's declared signature.
    pub fn install(&self, replacement: Func) -> Result<(), SpyError> {
        self.target.set(replacement)?;
        self.target.set_substituted(true);
        self.installed.set(true);
        debug!(var = self.target_name(), "installed substitution");
        Ok(())
    }

    /// Put the original function back.
    ///
    /// Only the first restore after an install writes to the variable;
    /// repeats are ignored so they cannot clobber a later substitution.
    pub fn restore(&self) {
        if !self.installed.get() {
            warn!(var = self.target_name(), "restore without an installed substitution ignored");
            return;
        }
        if self.restored.replace(true) {
            warn!(var = self.target_name(), "substitution already restored");
            return;
        }

        self.target.store(self.original.clone());
        self.target.set_substituted(false);
        debug!(var = self.target_name(), "restored original function");
    }

    /// Whether the substitution is currently installed.
    pub fn is_active(&self) -> bool {
        self.installed.get() && !self.restored.get()
    }
}
