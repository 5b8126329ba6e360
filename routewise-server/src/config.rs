//! Server configuration: TOML file with every field defaulted,
//! then overridden by command line flags.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use routewise_core::planner::DEFAULT_MAX_DESTINATIONS;
use routewise_core::routing::optimizer::DEFAULT_EXHAUSTIVE_LIMIT;
use routewise_core::{GraphSource, OptimizerOptions, PlannerOptions};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Prepared road graph document
    pub graph_path: PathBuf,
    /// Load the graph at startup instead of on the first request
    pub preload: bool,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
    pub max_destinations: usize,
    pub exhaustive_limit: usize,
    pub parallel: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            graph_path: PathBuf::from("graph_cache.json"),
            preload: true,
            request_timeout_secs: 30,
            max_concurrent_requests: 64,
            max_destinations: DEFAULT_MAX_DESTINATIONS,
            exhaustive_limit: DEFAULT_EXHAUSTIVE_LIMIT,
            parallel: true,
        }
    }
}

impl ServerConfig {
    /// Reads the config file, or returns the defaults when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".into(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_requests must be positive".into(),
            ));
        }
        if self.max_destinations == 0 {
            return Err(ConfigError::Invalid(
                "max_destinations must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn graph_source(&self) -> GraphSource {
        GraphSource::new(&self.graph_path)
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            self.graph_source(),
            self.planner_options(),
            self.max_concurrent_requests,
        )
    }

    pub fn planner_options(&self) -> PlannerOptions {
        PlannerOptions {
            max_destinations: self.max_destinations,
            optimizer: OptimizerOptions {
                exhaustive_limit: self.exhaustive_limit,
                parallel: self.parallel,
            },
        }
    }
}
