use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::grading::{FeedbackLanguage, GradingConfig};

/// Settings persisted between runs. Stored as loose strings so an edited
/// or stale config file degrades to defaults instead of failing to load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub difficulty: String,
    pub sensitivity: f64,
    pub feedback_language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            difficulty: "a1".to_string(),
            sensitivity: 0.8,
            feedback_language: "english".to_string(),
        }
    }
}

impl AppConfig {
    /// Project the stored settings into the grader's per-call config.
    /// Unknown feedback languages fall back to English; sensitivity is
    /// clamped into [0, 1].
    pub fn grading_config(&self) -> GradingConfig {
        GradingConfig {
            sensitivity: self.sensitivity.clamp(0.0, 1.0),
            feedback_language: FeedbackLanguage::parse(&self.feedback_language),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> AppConfig;
    fn save(&self, cfg: &AppConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "plume") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("plume_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> AppConfig {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<AppConfig>(&bytes) {
                return cfg;
            }
        }
        AppConfig::default()
    }

    fn save(&self, cfg: &AppConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
