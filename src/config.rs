use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub ai_provider: String,
    pub api_key: Option<String>,
    pub model: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ai_provider: "gemini".to_string(),
            api_key: None,
            model: "gemini-1.5-flash-latest".to_string(),
            max_attempts: default_max_attempts(),
            cache_enabled: true,
        }
    }
}

impl AppConfig {
    /// Get the path to the config file in the platform config dir
    pub fn config_path() -> Result<PathBuf, AppError> {
        let data_dir = dirs::config_dir()
            .ok_or_else(|| AppError::ConfigError("Cannot find config directory".into()))?;
        Ok(data_dir.join("marketmind").join("config.json"))
    }

    /// Load config from disk, or return default if not found.
    ///
    /// `GOOGLE_API_KEY` / `GEMINI_API_KEY` environment variables override
    /// the persisted key so the app can run without a config file at all.
    pub fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str::<AppConfig>(&contents)
                .map_err(|e| AppError::ConfigError(e.to_string()))?
        } else {
            Self::default()
        };

        if let Some(key) = env_api_key() {
            config.api_key = Some(key);
        }

        Ok(config)
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), AppError> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }

    /// Whether the remote capability can be used at all. The pipeline reads
    /// only this boolean; a missing key surfaces as a configuration error
    /// rather than a silent heuristic-only mode.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

fn env_api_key() -> Option<String> {
    std::env::var("GOOGLE_API_KEY")
        .or_else(|_| std::env::var("GEMINI_API_KEY"))
        .ok()
        .filter(|k| !k.trim().is_empty())
}
