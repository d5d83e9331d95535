use crate::highlight::{highlight_match, HighlightedText};
use crate::{ItemId, QueryError, ResultItem};

/// Externally observable state, republished whenever it changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchViewModel {
    pub query: String,
    pub focused: bool,
    /// A delay is armed and nothing has been dispatched for it yet.
    pub pending: bool,
    pub data: Option<Vec<ResultItem>>,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<QueryError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub id: ItemId,
    pub name: HighlightedText,
}

/// What the dropdown under the input should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropdown {
    Hidden,
    Loading,
    Failed(String),
    NoResults,
    Results(Vec<ResultRowView>),
}

impl SearchViewModel {
    /// Nothing is armed and no fetch is outstanding.
    pub fn is_settled(&self) -> bool {
        !self.pending && !self.loading
    }

    pub fn dropdown(&self) -> Dropdown {
        if !self.focused || self.query.is_empty() {
            return Dropdown::Hidden;
        }
        if self.loading {
            return Dropdown::Loading;
        }
        if !self.loaded {
            return Dropdown::Hidden;
        }
        if let Some(err) = &self.error {
            return Dropdown::Failed(err.to_string());
        }
        match &self.data {
            Some(items) if !items.is_empty() => Dropdown::Results(
                items
                    .iter()
                    .map(|item| ResultRowView {
                        id: item.id.clone(),
                        name: highlight_match(&item.name, &self.query),
                    })
                    .collect(),
            ),
            _ => Dropdown::NoResults,
        }
    }
}
