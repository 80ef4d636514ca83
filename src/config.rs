use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::logging::Level;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {path:?} not found")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing the TOML file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub api_url: String,
    pub username: String,
    pub password: String,

    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub read_timeout: Duration,

    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub write_timeout: Duration,

    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    #[serde(default = "default_max_response_size")]
    pub max_response_size: usize,

    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub log_level: Level,
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_buffer_size() -> usize {
    4096
}

fn default_max_response_size() -> usize {
    1024 * 1024 // 1 MB
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("sms-log.log"))
}

impl ClientConfig {
    /// Config with the given endpoint and credentials, everything else defaulted.
    pub fn new(
        api_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            username: username.into(),
            password: password.into(),
            read_timeout: default_timeout(),
            write_timeout: default_timeout(),
            buffer_size: default_buffer_size(),
            max_response_size: default_max_response_size(),
            log_file: default_log_file(),
            log_level: Level::default(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            let path = path.to_path_buf();
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound { path, source }
            } else {
                ConfigError::Read { path, source }
            }
        })?;

        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(?path, api_url = %config.api_url, "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ClientConfig>(content)
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}
