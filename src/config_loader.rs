use crate::config::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid configuration {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Config> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Use the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("Configuration {} not found, using defaults", path.display());
            Ok(Config::default())
        }
    }

    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(&Config::default())?;
        fs::write(path, yaml)
            .with_context(|| format!("failed to write configuration {}", path.display()))?;
        Ok(())
    }
}
