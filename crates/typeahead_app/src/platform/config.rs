use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use typeahead_core::ResultItem;
use typeahead_engine::{
    EngineError, HttpQuerySource, HttpSourceSettings, QuerySource, StaticQuerySource,
    DEFAULT_DELAY,
};
use typeahead_logging::typeahead_info;

pub(crate) const CONFIG_FILENAME: &str = "typeahead.ron";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("could not serialize config: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub delay_ms: u64,
    pub source: SourceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            source: SourceConfig::Static(StaticConfig::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) enum SourceConfig {
    Static(StaticConfig),
    Http(HttpConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ItemConfig {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StaticConfig {
    pub latency_ms: u64,
    pub items: Vec<ItemConfig>,
}

impl Default for StaticConfig {
    fn default() -> Self {
        let names = [
            "Apple",
            "Apricot",
            "Banana",
            "Blackberry",
            "Cherry",
            "Grape",
            "Mango",
            "Orange",
            "Peach",
            "Pear",
            "Pineapple",
            "Strawberry",
        ];
        Self {
            latency_ms: 150,
            items: names
                .iter()
                .zip(1..)
                .map(|(name, id)| ItemConfig {
                    id,
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct HttpConfig {
    pub endpoint: String,
    pub query_param: String,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let defaults = HttpSourceSettings::default();
        Self {
            endpoint: defaults.endpoint,
            query_param: defaults.query_param,
            request_timeout_ms: defaults.request_timeout.as_millis() as u64,
            max_bytes: defaults.max_bytes,
        }
    }
}

impl AppConfig {
    pub(crate) fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub(crate) fn build_source(&self) -> Result<Arc<dyn QuerySource>, EngineError> {
        match &self.source {
            SourceConfig::Static(config) => {
                let items = config
                    .items
                    .iter()
                    .map(|item| ResultItem::new(item.id, item.name.clone()))
                    .collect();
                let mut source = StaticQuerySource::new(items);
                if config.latency_ms > 0 {
                    source = source.with_latency(Duration::from_millis(config.latency_ms));
                }
                Ok(Arc::new(source))
            }
            SourceConfig::Http(config) => {
                let settings = HttpSourceSettings {
                    endpoint: config.endpoint.clone(),
                    query_param: config.query_param.clone(),
                    request_timeout: Duration::from_millis(config.request_timeout_ms),
                    max_bytes: config.max_bytes,
                    ..HttpSourceSettings::default()
                };
                Ok(Arc::new(HttpQuerySource::new(settings)?))
            }
        }
    }

    pub(crate) fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new();
        ron::ser::to_string_pretty(self, pretty).map_err(|err| ConfigError::Serialize(err.to_string()))
    }
}

/// Loads the config at `explicit`, or `./typeahead.ron` when none is given.
///
/// Only the implicit file may be absent; defaults are used then.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = explicit.map_or_else(|| PathBuf::from(CONFIG_FILENAME), Path::to_path_buf);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if explicit.is_none() && err.kind() == std::io::ErrorKind::NotFound => {
            typeahead_info!("No config at {:?}, using defaults", path);
            return Ok(AppConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.clone(),
        message: err.to_string(),
    })?;
    typeahead_info!("Loaded config from {:?}", path);
    Ok(config)
}
