use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;
use crate::language::RANKED_LANGUAGE;
use crate::session::SessionConfig;

/// Preferences remembered between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub duration_secs: u64,
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            language: RANKED_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    /// Apply command-line overrides on top of the stored values.
    pub fn with_overrides(mut self, duration_secs: Option<u64>, language: Option<&str>) -> Self {
        if let Some(secs) = duration_secs {
            self.duration_secs = secs;
        }
        if let Some(lang) = language {
            self.language = lang.to_lowercase();
        }
        self
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.duration_secs, self.language.clone())
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typtea") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typtea_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files yield the defaults.
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
