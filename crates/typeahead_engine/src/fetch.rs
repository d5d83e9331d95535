use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use typeahead_core::{ItemId, QueryError, ResultItem};
use typeahead_logging::typeahead_debug;
use url::Url;

use crate::{EngineError, QuerySource};

#[derive(Debug, Clone)]
pub struct HttpSourceSettings {
    pub endpoint: String,
    pub query_param: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for HttpSourceSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/search".to_string(),
            query_param: "q".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(u64),
    Text(String),
}

/// One element of the JSON array the endpoint answers with.
#[derive(Debug, Deserialize)]
struct WireItem {
    id: WireId,
    name: String,
}

impl From<WireItem> for ResultItem {
    fn from(item: WireItem) -> Self {
        let id = match item.id {
            WireId::Number(id) => ItemId::Number(id),
            WireId::Text(id) => ItemId::Text(id),
        };
        ResultItem { id, name: item.name }
    }
}

/// Queries `GET {endpoint}?{query_param}={query}` and decodes a JSON array of
/// `{ "id": .., "name": .. }` objects.
#[derive(Debug, Clone)]
pub struct HttpQuerySource {
    settings: HttpSourceSettings,
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpQuerySource {
    pub fn new(settings: HttpSourceSettings) -> Result<Self, EngineError> {
        let endpoint =
            Url::parse(&settings.endpoint).map_err(|err| EngineError::InvalidEndpoint {
                endpoint: settings.endpoint.clone(),
                reason: err.to_string(),
            })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(EngineError::InvalidEndpoint {
                endpoint: settings.endpoint.clone(),
                reason: format!("unsupported scheme {}", endpoint.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::HttpClient(err.to_string()))?;

        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(&self.settings.query_param, query);
        url
    }
}

#[async_trait::async_trait]
impl QuerySource for HttpQuerySource {
    async fn query(&self, query: &str) -> Result<Vec<ResultItem>, QueryError> {
        let url = self.request_url(query);
        typeahead_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::HttpStatus(status.as_u16()));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(QueryError::TooLarge { max_bytes });
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(QueryError::TooLarge { max_bytes });
            }
            body.extend_from_slice(&chunk);
        }

        let items: Vec<WireItem> =
            serde_json::from_slice(&body).map_err(|err| QueryError::Decode(err.to_string()))?;
        Ok(items.into_iter().map(ResultItem::from).collect())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> QueryError {
    if err.is_timeout() {
        return QueryError::Timeout;
    }
    QueryError::Network(err.to_string())
}
