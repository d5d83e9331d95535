use std::fmt;

use crate::view_model::SearchViewModel;
use crate::QueryError;

/// Identity of one "query value -> fetch -> result" attempt.
///
/// Allocated in increasing order, so a larger id is always the more recent
/// cycle.
pub type CycleId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(id) => write!(f, "{id}"),
            ItemId::Text(id) => f.write_str(id),
        }
    }
}

/// One match returned by a query source. Only `name` is ever inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub id: ItemId,
    pub name: String,
}

impl ResultItem {
    /// Item with a numeric id, the common case for in-memory sources.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ItemId::Number(id),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    query: String,
    observed: bool,
    focused: bool,
    /// Last allocated cycle id; ids start at 1.
    last_cycle: CycleId,
    /// Cycle whose delay is armed and has not fired yet.
    pending: Option<CycleId>,
    /// Most recently scheduled cycle; the only one whose result is honored.
    latest: Option<CycleId>,
    data: Option<Vec<ResultItem>>,
    loading: bool,
    loaded: bool,
    error: Option<QueryError>,
    dirty: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SearchViewModel {
        SearchViewModel {
            query: self.query.clone(),
            focused: self.focused,
            pending: self.pending.is_some(),
            data: self.data.clone(),
            loading: self.loading,
            loaded: self.loaded,
            error: self.error.clone(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Pending
        } else if self.loading {
            Phase::Loading
        } else if !self.loaded {
            Phase::Idle
        } else if self.error.is_some() {
            Phase::Failed
        } else {
            Phase::Succeeded
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn pending_cycle(&self) -> Option<CycleId> {
        self.pending
    }

    pub fn latest_cycle(&self) -> Option<CycleId> {
        self.latest
    }

    /// Returns whether visible state changed since the previous call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Whether `query` would replace the current value.
    pub(crate) fn is_new_query(&self, query: &str) -> bool {
        !self.observed || self.query != query
    }

    /// Stores the new query and schedules a fresh cycle for it.
    ///
    /// Returns the cycle that was armed before, if any, alongside the new one.
    pub(crate) fn begin_cycle(&mut self, query: String) -> (Option<CycleId>, CycleId) {
        self.last_cycle += 1;
        let cycle = self.last_cycle;
        self.query = query;
        self.observed = true;
        let superseded = self.pending.replace(cycle);
        self.latest = Some(cycle);
        self.dirty = true;
        (superseded, cycle)
    }

    /// Consumes the armed delay if it belongs to `cycle`.
    pub(crate) fn take_pending(&mut self, cycle: CycleId) -> bool {
        if self.pending == Some(cycle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_latest(&self, cycle: CycleId) -> bool {
        self.latest == Some(cycle)
    }

    pub(crate) fn reset_to_idle(&mut self) {
        self.loaded = false;
        self.data = None;
        self.loading = false;
        self.dirty = true;
    }

    pub(crate) fn start_loading(&mut self) {
        self.loaded = false;
        self.loading = true;
        self.data = None;
        self.dirty = true;
    }

    pub(crate) fn settle(&mut self, result: Result<Vec<ResultItem>, QueryError>) {
        match result {
            Ok(items) => {
                self.data = Some(items);
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err);
            }
        }
        self.loading = false;
        self.loaded = true;
        self.dirty = true;
    }

    pub(crate) fn set_focused(&mut self, focused: bool) -> bool {
        if self.focused == focused {
            return false;
        }
        self.focused = focused;
        self.dirty = true;
        true
    }

    /// Forgets every outstanding cycle; returns the one whose delay was still armed.
    pub(crate) fn abandon_cycles(&mut self) -> Option<CycleId> {
        self.latest = None;
        let pending = self.pending.take();
        if pending.is_some() {
            self.dirty = true;
        }
        pending
    }
}
