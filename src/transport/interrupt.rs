//! GE-013: Termination signals become a pending flag instead of killing us.
//!
//! While the guard is installed, SIGINT/SIGTERM/SIGQUIT only record which
//! signal arrived. The runner sees the flag, lets the child finish (or kills it
//! after a grace period) and returns `Interrupted`, so scoped directories are
//! dropped before the process exits.

use crate::core::error::{EvalError, EvalResult};
use signal_hook::SigId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Installed signal handlers plus the shared pending-signal slot (0 = none).
#[derive(Debug)]
pub struct Interrupt {
    pending: Arc<AtomicUsize>,
    ids: Vec<SigId>,
}

impl Interrupt {
    /// Trap the platform's termination signals.
    pub fn install() -> EvalResult<Self> {
        Self::install_for(signal_hook::consts::TERM_SIGNALS)
    }

    /// Trap an explicit set of signals.
    pub fn install_for(signals: &[i32]) -> EvalResult<Self> {
        let pending = Arc::new(AtomicUsize::new(0));
        let mut ids = Vec::with_capacity(signals.len());
        for &sig in signals {
            let value = usize::try_from(sig).unwrap_or(0);
            let id = signal_hook::flag::register_usize(sig, Arc::clone(&pending), value)
                .map_err(|e| EvalError::io(format!("cannot trap signal {sig}"), e))?;
            ids.push(id);
        }
        Ok(Self { pending, ids })
    }

    /// Shared slot handed to runners.
    pub fn flag(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.pending)
    }

    pub fn pending(&self) -> Option<i32> {
        pending_signal(&self.pending)
    }
}

impl Drop for Interrupt {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

/// Signal recorded in `slot`, if any.
pub fn pending_signal(slot: &AtomicUsize) -> Option<i32> {
    match slot.load(Ordering::SeqCst) {
        0 => None,
        n => i32::try_from(n).ok(),
    }
}
