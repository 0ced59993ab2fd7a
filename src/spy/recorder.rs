//! Call history

use crate::func::ArgList;

/// Every recorded invocation, oldest first.
pub type CallList = Vec<ArgList>;

/// Ordered log of the argument lists a spy has seen.
#[derive(Debug, Clone, Default)]
pub struct CallRecorder {
    calls: CallList,
}

impl CallRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one invocation; returns its index.
    pub fn record(&mut self, args: ArgList) -> usize {
        self.calls.push(args);
        self.calls.len() - 1
    }

    pub fn count(&self) -> usize {
        self.calls.len()
    }

    pub fn get(&self, index: usize) -> Option<&ArgList> {
        self.calls.get(index)
    }

    pub fn calls(&self) -> &[ArgList] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}
