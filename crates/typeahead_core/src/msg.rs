use crate::{CycleId, QueryError, ResultItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Input collaborator replaced the query string.
    QueryChanged(String),
    /// Input gained or lost focus.
    FocusChanged(bool),
    /// The armed delay for a cycle ran out without being cancelled.
    DelayElapsed { cycle: CycleId },
    /// The query source settled for a cycle.
    QueryResolved {
        cycle: CycleId,
        result: Result<Vec<ResultItem>, QueryError>,
    },
    /// Host is tearing the controller down.
    Teardown,
}
