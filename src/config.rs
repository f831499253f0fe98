//! Runtime configuration: service credentials and model selection

use crate::paths::get_config_path;
use serde::{Deserialize, Serialize};

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AppConfig {
    /// API key for the generative service; environment variables take
    /// precedence over this field
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
        }
    }
}

/// Loads the configuration file, falling back to defaults when absent
pub fn load_config() -> Result<AppConfig, String> {
    let config_path = get_config_path()?;
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
    } else {
        Ok(AppConfig::default())
    }
}

/// Resolves the API key: `GEMINI_API_KEY`, then `API_KEY`, then the config file
pub fn resolve_api_key(config: &AppConfig) -> Option<String> {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            std::env::var("API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
        })
        .or_else(|| config.api_key.clone())
}
