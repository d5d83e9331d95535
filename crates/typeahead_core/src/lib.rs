//! Typeahead core: pure query-lifecycle state machine and view-model helpers.
mod effect;
mod error;
mod highlight;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::QueryError;
pub use highlight::{highlight_match, HighlightedText, Segment};
pub use msg::Msg;
pub use state::{CycleId, ItemId, Phase, ResultItem, SearchState};
pub use update::update;
pub use view_model::{Dropdown, ResultRowView, SearchViewModel};
