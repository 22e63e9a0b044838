//! Cancellable one-shot deadlines backing the transient effects of the flow.

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, trace};

pub const ERROR_FLAG_CLEAR_DELAY: Duration = Duration::from_millis(600);
pub const BURST_TEARDOWN_DELAY: Duration = Duration::from_millis(2200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTimings {
    /// How long the email error stays raised after a failed validation.
    pub error_flag_clear: Duration,
    /// Delay between triggering the burst and destroying its surface.
    pub burst_teardown: Duration,
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            error_flag_clear: ERROR_FLAG_CLEAR_DELAY,
            burst_teardown: BURST_TEARDOWN_DELAY,
        }
    }
}

/// A single deadline slot. Arming aborts whatever was pending before
/// scheduling the new task, so at most one task per slot is ever live.
pub struct TimerSlot {
    name: &'static str,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl TimerSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: Mutex::new(None),
        }
    }

    /// Runs `task` after `delay` unless the slot is re-armed or cancelled first.
    ///
    /// Returns `false` when called outside a Tokio runtime; nothing is scheduled then.
    pub fn arm<F>(&self, delay: Duration, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            debug!(timer = self.name, "no async runtime available; timer not armed");
            return false;
        };

        let mut pending = self.lock();
        if let Some(previous) = pending.take() {
            if !previous.is_finished() {
                trace!(timer = self.name, "replacing pending deadline");
            }
            previous.abort();
        }

        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        }));
        true
    }

    /// Drops the pending task, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.lock().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}
