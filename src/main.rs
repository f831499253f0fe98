//! Hecho por Mi: an interactive guide to safe home canning

// Module declarations
mod catalog;
mod config;
mod error;
mod gemini;
mod models;
mod paths;
mod pdf;
mod prompts;
mod state;
mod ui;

use gemini::GeminiClient;
use log::{error, info};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("[startup] failed to load config, using defaults: {}", e);
            config::AppConfig::default()
        }
    };

    let api_key = config::resolve_api_key(&config);
    if api_key.is_none() {
        error!(
            "[startup] no API key configured; set GEMINI_API_KEY or add api_key to {}",
            paths::get_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string())
        );
    }
    info!("[startup] using model {}", config.model);

    let client = GeminiClient::new(api_key, config.model.clone());
    let mut app = ui::App::new(catalog::categories(), client);
    ui::run(&mut app).await;
}
