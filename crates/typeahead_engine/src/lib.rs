//! Typeahead engine: debounced query dispatch and effect execution.
mod debounce;
mod engine;
mod error;
mod fetch;
mod source;

pub use debounce::{CancelHandle, Debouncer};
pub use engine::{ControllerSettings, QueryController, DEFAULT_DELAY, SOURCE_PANICKED};
pub use error::EngineError;
pub use fetch::{HttpQuerySource, HttpSourceSettings};
pub use source::{QuerySource, StaticQuerySource};
pub use typeahead_core::{
    highlight_match, Dropdown, HighlightedText, ItemId, QueryError, ResultItem, ResultRowView,
    SearchViewModel, Segment,
};
