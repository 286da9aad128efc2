//! Cancellable one-shot debounce timer
//!
//! At most one quiet period is pending per timer. Re-arming replaces the
//! pending one; cancelling or dropping the timer aborts it.
//!
//! Only the quiet period is abortable. Once it elapses the action is spawned
//! as its own task, so a later `arm`/`cancel` never interrupts an action that
//! has already started. Discarding the results of such an action is the
//! caller's job (see the generation token in [`crate::controller`]).

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct DebounceTimer {
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once `delay` passes without another `arm` or `cancel`.
    pub fn arm<F>(&mut self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        }));
    }

    /// Abort the pending quiet period. Returns true if one was still pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
