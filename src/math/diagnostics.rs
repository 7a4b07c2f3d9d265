//! Contract diagnostics.
//!
//! The fast paths never validate their inputs in a way that changes the
//! result. When a caller breaks a contract the [`DiagnosticHook`] is told
//! about it, and what happens next is a runtime setting: nothing, a log line,
//! or a panic. Debug and release builds run the same code; only the default
//! [`ContractMode`] differs.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What the hook does when a contract is broken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractMode {
    Silent,
    Log,
    Panic,
}

impl Default for ContractMode {
    /// `Panic` with `debug_assertions`, `Log` otherwise.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ContractMode::Panic
        } else {
            ContractMode::Log
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// An arc-table index fell outside `[0, 1024)`. Inputs outside `[-1, 1]`
    /// take the precise path first, so this guards the table read itself.
    ArcIndexOutOfRange,
    /// The tables were initialized a second time.
    DoubleInit,
    /// Shutdown was requested but nothing was initialized.
    ShutdownWithoutInit,
    /// Shutdown was requested while other handles still read the tables.
    ShutdownWhileShared,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContractViolation {
    pub kind: ViolationKind,
    pub message: &'static str,
    /// Offending input, when there is one.
    pub value: Option<f32>,
}

impl ContractViolation {
    pub fn new(kind: ViolationKind, message: &'static str) -> Self {
        Self {
            kind,
            message,
            value: None,
        }
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{:?}: {} (value {})", self.kind, self.message, v),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

pub type ViolationCallback = Arc<dyn Fn(&ContractViolation) + Send + Sync>;

/// Receives every contract violation.
#[derive(Clone, Default)]
pub struct DiagnosticHook {
    mode: ContractMode,
    callback: Option<ViolationCallback>,
}

impl DiagnosticHook {
    pub fn new(mode: ContractMode) -> Self {
        Self {
            mode,
            callback: None,
        }
    }

    /// Registers a callback that runs for every violation, before the mode's
    /// own action.
    pub fn with_callback(
        mut self,
        callback: impl Fn(&ContractViolation) + Send + Sync + 'static,
    ) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    pub fn mode(&self) -> ContractMode {
        self.mode
    }

    /// Reports `violation` to the callback and then acts on the mode.
    #[cold]
    pub fn fire(&self, violation: ContractViolation) {
        if let Some(callback) = &self.callback {
            callback(&violation);
        }
        match self.mode {
            ContractMode::Silent => {}
            ContractMode::Log => warn!("GameMath contract violation: {}", violation),
            ContractMode::Panic => panic!("GameMath contract violation: {}", violation),
        }
    }

    /// Fires `violation` unless `condition` holds.
    #[inline]
    pub fn check(&self, condition: bool, violation: ContractViolation) {
        if !condition {
            self.fire(violation);
        }
    }
}

impl fmt::Debug for DiagnosticHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticHook")
            .field("mode", &self.mode)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_callback_runs_in_every_mode() {
        for mode in [ContractMode::Silent, ContractMode::Log] {
            let hits = Arc::new(AtomicUsize::new(0));
            let counter = hits.clone();
            let hook = DiagnosticHook::new(mode).with_callback(move |v| {
                assert_eq!(v.kind, ViolationKind::DoubleInit);
                counter.fetch_add(1, Ordering::SeqCst);
            });

            hook.fire(ContractViolation::new(ViolationKind::DoubleInit, "again"));
            hook.check(true, ContractViolation::new(ViolationKind::DoubleInit, "fine"));
            assert_eq!(hits.load(Ordering::SeqCst), 1, "mode {:?}", mode);
        }
    }

    #[test]
    #[should_panic(expected = "ArcIndexOutOfRange")]
    fn test_panic_mode_panics() {
        let hook = DiagnosticHook::new(ContractMode::Panic);
        hook.fire(
            ContractViolation::new(ViolationKind::ArcIndexOutOfRange, "bad index")
                .with_value(f32::NAN),
        );
    }

    #[test]
    fn test_display_includes_value() {
        let v =
            ContractViolation::new(ViolationKind::ArcIndexOutOfRange, "bad index").with_value(2.0);
        assert_eq!(v.to_string(), "ArcIndexOutOfRange: bad index (value 2)");
    }
}
