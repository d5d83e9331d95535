use thiserror::Error;

/// Failure reported by a query source.
///
/// This is the only error the lifecycle ever stores in visible state; it is
/// never re-raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("query timed out")]
    Timeout,
    #[error("response too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
    #[error("could not decode results: {0}")]
    Decode(String),
    #[error("{0}")]
    Rejected(String),
}

impl QueryError {
    /// Source-defined failure carrying only a message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}
