// src/config.rs

use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the recommendation backend (without the `/api` prefix).
    pub api_base_url: Url,
    /// Directory holding the persisted client state file.
    pub state_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string())
            .parse::<Url>()
            .expect("API_BASE_URL must be a valid URL");

        let state_dir = env::var("STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".study-compass"));

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            api_base_url,
            state_dir,
            rust_log,
        }
    }
}
