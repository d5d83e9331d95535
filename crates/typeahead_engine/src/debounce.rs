//! Trailing-edge debouncing on the tokio timer.
//!
//! A [`Debouncer`] owns exactly one timer slot. Every [`Debouncer::trigger`]
//! replaces whatever the slot held, so a burst of triggers closer together
//! than the delay runs the action once, with the last argument.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::EngineError;

type Action<T> = Arc<dyn Fn(T) + Send + Sync>;

#[derive(Default)]
struct Slot {
    /// Bumped on every trigger and cancel; a timer only runs if it still matches.
    generation: u64,
    armed: Option<CancellationToken>,
}

#[derive(Default)]
struct SharedSlot {
    slot: Mutex<Slot>,
}

impl SharedSlot {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn arm(&self) -> (u64, CancellationToken) {
        let mut slot = self.lock();
        if let Some(previous) = slot.armed.take() {
            previous.cancel();
        }
        slot.generation += 1;
        let token = CancellationToken::new();
        slot.armed = Some(token.clone());
        (slot.generation, token)
    }

    fn cancel(&self) -> bool {
        let mut slot = self.lock();
        slot.generation += 1;
        match slot.armed.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Clears the slot if `generation` is still the armed timer.
    fn claim(&self, generation: u64) -> bool {
        let mut slot = self.lock();
        if slot.generation == generation && slot.armed.is_some() {
            slot.armed = None;
            true
        } else {
            false
        }
    }

    fn is_armed(&self) -> bool {
        self.lock().armed.is_some()
    }
}

/// Debounced trigger around an action taking one argument.
pub struct Debouncer<T> {
    delay: Duration,
    action: Action<T>,
    shared: Arc<SharedSlot>,
    runtime: Handle,
}

/// Cancels the pending run of the [`Debouncer`] it came from.
#[derive(Clone)]
pub struct CancelHandle {
    shared: Arc<SharedSlot>,
}

impl CancelHandle {
    /// Drops the pending run, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        self.shared.cancel()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Creates a debouncer on the runtime of the calling context.
    pub fn new<F>(delay: Duration, action: F) -> Result<Self, EngineError>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        Ok(Self::with_handle(runtime, delay, action))
    }

    /// Creates a debouncer whose timers run on `runtime`.
    pub fn with_handle<F>(runtime: Handle, delay: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            action: Arc::new(action),
            shared: Arc::default(),
            runtime,
        }
    }

    /// Quiet period a trigger waits before running the action.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Re-arms the timer; `arg` replaces the argument of any pending run.
    pub fn trigger(&self, arg: T) {
        // Deadline is fixed here, not when the timer task is first polled.
        let deadline = Instant::now() + self.delay;
        let (generation, token) = self.shared.arm();
        let shared = Arc::clone(&self.shared);
        let action = Arc::clone(&self.action);

        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep_until(deadline) => {}
            }
            if shared.claim(generation) {
                action(arg);
            }
        });
    }

    /// Drops the pending run, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        self.shared.cancel()
    }

    pub fn is_pending(&self) -> bool {
        self.shared.is_armed()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.shared.cancel();
    }
}
