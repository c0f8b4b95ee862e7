//! JSON config file adapter.
//!
//! Implements [`ConfigPort`] on top of a single JSON file.
//!
//! - Config validation: every field is range-checked before it is written.
//! - Atomic writes: the new file is written next to the old one and renamed
//!   over it, so a crash never leaves a half-written config.

use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::MonitorConfig;
use crate::error::ConfigError;

pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for FileConfigStore {
    fn load(&self) -> Result<MonitorConfig, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ConfigError::NotFound),
            Err(e) => return Err(e.into()),
        };
        let config: MonitorConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        config.validate()?;
        info!("Config loaded from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        info!("Config saved to {}", self.path.display());
        Ok(())
    }
}
