use std::future::Future;
use std::time::Duration;

use typeahead_core::{highlight_match, QueryError, ResultItem};

/// The "fetch by query string" collaborator the controller drives.
#[async_trait::async_trait]
pub trait QuerySource: Send + Sync {
    async fn query(&self, query: &str) -> Result<Vec<ResultItem>, QueryError>;
}

/// Any async closure from the query string to results is a source.
#[async_trait::async_trait]
impl<F, Fut> QuerySource for F
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<ResultItem>, QueryError>> + Send + 'static,
{
    async fn query(&self, query: &str) -> Result<Vec<ResultItem>, QueryError> {
        (self)(query.to_owned()).await
    }
}

/// In-memory source matching names by case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct StaticQuerySource {
    items: Vec<ResultItem>,
    latency: Option<Duration>,
}

impl StaticQuerySource {
    pub fn new(items: Vec<ResultItem>) -> Self {
        Self {
            items,
            latency: None,
        }
    }

    /// Simulates a round trip before every answer.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn matching(&self, query: &str) -> Vec<ResultItem> {
        if query.is_empty() {
            return self.items.clone();
        }
        self.items
            .iter()
            .filter(|item| highlight_match(&item.name, query).has_match())
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl QuerySource for StaticQuerySource {
    async fn query(&self, query: &str) -> Result<Vec<ResultItem>, QueryError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.matching(query))
    }
}
