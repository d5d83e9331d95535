use thiserror::Error;

/// Failures setting up engine components. Query failures are
/// [`typeahead_core::QueryError`] and never surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no tokio runtime is available in this context")]
    NoRuntime,
    #[error("invalid query endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("could not build http client: {0}")]
    HttpClient(String),
}
