use crate::machine_learning::ModelSource;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub model: ModelConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ModelConfig {
    /// Filesystem path or http(s) URL of the model JSON
    pub source: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

impl Config {
    pub fn timeout_seconds(&self) -> u64 {
        self.model.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn model_source(&self) -> ModelSource {
        ModelSource::from_location(&self.model.source, self.timeout_seconds())
    }

    /// Configured log level, if it names a valid one
    pub fn log_level(&self) -> Option<LevelFilter> {
        let logging = self.logging.as_ref()?;
        match logging.level.parse() {
            Ok(level) => Some(level),
            Err(_) => {
                log::warn!("Unknown log level {:?} in configuration", logging.level);
                None
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                source: "/usr/share/catchthephish/model_rules.json".to_string(),
                timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
            },
            logging: Some(LoggingConfig {
                level: "info".to_string(),
            }),
        }
    }
}
