use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::time::Instant;

/// Transient "email rejected" indicator shared with the auto-clear timer.
///
/// Every raise bumps a generation so that a clear scheduled by an older
/// failure cannot lower a flag raised by a newer one. A raise also carries its
/// own expiry, so the flag lowers itself on read even when no timer could be
/// armed.
#[derive(Debug, Clone, Default)]
pub struct ErrorFlag {
    state: Arc<Mutex<FlagState>>,
}

#[derive(Debug, Default)]
struct FlagState {
    raised: bool,
    generation: u64,
    expires_at: Option<Instant>,
}

impl FlagState {
    fn expire(&mut self) {
        if self
            .expires_at
            .is_some_and(|deadline| Instant::now() >= deadline)
        {
            self.raised = false;
            self.expires_at = None;
        }
    }
}

impl ErrorFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag for `lifetime` and returns the generation a timer
    /// should clear.
    pub fn raise(&self, lifetime: Duration) -> u64 {
        let mut state = self.lock();
        state.generation = state.generation.wrapping_add(1);
        state.raised = true;
        state.expires_at = Some(Instant::now() + lifetime);
        state.generation
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.raised = false;
        state.expires_at = None;
    }

    pub fn clear_if_current(&self, generation: u64) -> bool {
        let mut state = self.lock();
        state.expire();
        if state.generation != generation || !state.raised {
            return false;
        }
        state.raised = false;
        state.expires_at = None;
        true
    }

    pub fn is_raised(&self) -> bool {
        let mut state = self.lock();
        state.expire();
        state.raised
    }

    fn lock(&self) -> MutexGuard<'_, FlagState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
