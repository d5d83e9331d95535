use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use futures_util::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::watch;
use typeahead_core::{update, CycleId, Effect, Msg, QueryError, SearchState, SearchViewModel};
use typeahead_logging::{typeahead_debug, typeahead_info, typeahead_trace, typeahead_warn};

use crate::{Debouncer, EngineError, QuerySource};

/// Delay between the last query edit and the fetch it triggers.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(400);

/// Error message stored when a query source panics instead of answering.
pub const SOURCE_PANICKED: &str = "query source panicked";

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub delay: Duration,
    /// Query observed when the controller starts.
    pub initial_query: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            initial_query: String::new(),
        }
    }
}

/// Query lifecycle controller: debounces query edits, runs the query source
/// and publishes the resulting [`SearchViewModel`].
///
/// Must be created inside a tokio runtime; timers and fetches run there.
pub struct QueryController {
    inner: Arc<Inner>,
}

struct Inner {
    me: Weak<Inner>,
    state: Mutex<SearchState>,
    view_tx: watch::Sender<SearchViewModel>,
    source: Arc<dyn QuerySource>,
    debouncer: Debouncer<CycleId>,
    runtime: Handle,
}

impl QueryController {
    pub fn new<S>(source: S, settings: ControllerSettings) -> Result<Self, EngineError>
    where
        S: QuerySource + 'static,
    {
        Self::with_shared_source(Arc::new(source), settings)
    }

    pub fn with_shared_source(
        source: Arc<dyn QuerySource>,
        settings: ControllerSettings,
    ) -> Result<Self, EngineError> {
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        let state = SearchState::new();
        let (view_tx, _) = watch::channel(state.view());

        let inner = Arc::new_cyclic(|me: &Weak<Inner>| {
            let timer_target = me.clone();
            let on_elapsed = move |cycle: CycleId| {
                if let Some(inner) = timer_target.upgrade() {
                    inner.dispatch(Msg::DelayElapsed { cycle });
                }
            };
            let debouncer = Debouncer::with_handle(runtime.clone(), settings.delay, on_elapsed);
            Inner {
                me: me.clone(),
                state: Mutex::new(state),
                view_tx,
                source,
                debouncer,
                runtime,
            }
        });

        typeahead_info!(
            "Query controller started delay_ms={}",
            settings.delay.as_millis()
        );
        inner.dispatch(Msg::QueryChanged(settings.initial_query));
        Ok(Self { inner })
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.inner.dispatch(Msg::QueryChanged(query.into()));
    }

    pub fn set_focused(&self, focused: bool) {
        self.inner.dispatch(Msg::FocusChanged(focused));
    }

    /// Receiver that observes every republished view.
    pub fn subscribe(&self) -> watch::Receiver<SearchViewModel> {
        self.inner.view_tx.subscribe()
    }

    pub fn snapshot(&self) -> SearchViewModel {
        self.inner.view_tx.borrow().clone()
    }

    /// Waits until no delay is armed and no fetch is being honored.
    pub async fn wait_settled(&self) -> SearchViewModel {
        let mut rx = self.subscribe();
        if let Ok(view) = rx.wait_for(SearchViewModel::is_settled).await {
            return view.clone();
        }
        // Unreachable while `self` keeps the sender alive.
        self.snapshot()
    }

    /// Cancels the armed delay and stops honoring in-flight results.
    pub fn shutdown(&self) {
        self.inner.dispatch(Msg::Teardown);
    }
}

impl Drop for QueryController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    /// Applies `msg` and runs its effects before releasing the state lock, so
    /// the cancel and re-arm of one edit never interleave with another's.
    fn dispatch(&self, msg: Msg) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Msg::QueryResolved { cycle, .. } = &msg {
            if guard.latest_cycle() != Some(*cycle) {
                typeahead_debug!("Dropping stale result for cycle {}", cycle);
            }
        }

        let state = std::mem::take(&mut *guard);
        let (mut state, effects) = update(state, msg);
        for effect in effects {
            self.run_effect(effect);
        }
        if state.consume_dirty() {
            self.view_tx.send_replace(state.view());
        }
        *guard = state;
    }

    fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::CancelDelay { cycle } => {
                if self.debouncer.cancel() {
                    typeahead_trace!("Cancelled delay for cycle {}", cycle);
                }
            }
            Effect::ArmDelay { cycle } => {
                typeahead_trace!(
                    "Armed cycle {} for {}ms",
                    cycle,
                    self.debouncer.delay().as_millis()
                );
                self.debouncer.trigger(cycle);
            }
            Effect::Fetch { cycle, query } => {
                typeahead_info!("Fetch cycle={} query_len={}", cycle, query.len());
                let source = Arc::clone(&self.source);
                let target = self.me.clone();
                self.runtime.spawn(async move {
                    let result = AssertUnwindSafe(source.query(&query))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|_| Err(QueryError::rejected(SOURCE_PANICKED)));
                    match &result {
                        Ok(items) => {
                            typeahead_debug!("Cycle {} resolved with {} items", cycle, items.len())
                        }
                        Err(err) => typeahead_warn!("Cycle {} failed: {}", cycle, err),
                    }
                    if let Some(inner) = target.upgrade() {
                        inner.dispatch(Msg::QueryResolved { cycle, result });
                    }
                });
            }
        }
    }
}
