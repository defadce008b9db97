//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

const APP_DIR: &str = "cinegrid";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_language")]
    pub language: String,
    // Trailers are looked up separately; most are only published in English
    #[serde(default = "default_language")]
    pub video_language: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

fn default_language() -> String { "en-US".to_string() }
fn default_debounce_ms() -> u64 { 500 }
fn default_true() -> bool { true }
fn default_log_filter() -> String { "info".to_string() }
fn default_api_base_url() -> String { "https://api.themoviedb.org/3".to_string() }
fn default_image_base_url() -> String { "https://image.tmdb.org/t/p".to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: default_language(),
            video_language: default_language(),
            debounce_ms: default_debounce_ms(),
            dark_mode: true,
            log_filter: default_log_filter(),
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
        }
    }
}

/// Per-user directory holding config, favorites and logs
pub fn app_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    fs::create_dir_all(&path).ok();
    path
}

impl AppConfig {
    fn config_path() -> PathBuf {
        app_dir().join("config.json")
    }

    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::config_path());
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        config
    }

    /// Read a config file. Missing or unreadable files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(config) = serde_json::from_str(&content) {
                    return config;
                }
            }
        }

        Self::default()
    }

    pub fn apply_api_key_override(&mut self, key: Option<String>) {
        if let Some(key) = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            self.api_key = key;
        }
    }

    pub fn save(&self) {
        self.save_to(&Self::config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Ok(content) = serde_json::to_string_pretty(self) {
            if let Err(e) = fs::write(path, content) {
                tracing::warn!("Failed to save config to {}: {}", path.display(), e);
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
