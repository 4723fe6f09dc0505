use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SERVER_URL: &str = "http://localhost:9005/";
const DEFAULT_YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results?search_query={query}";
const DEFAULT_SONG_DB_SEARCH_URL: &str =
    "https://musicbrainz.org/search?type=recording&method=indexed&query={query}";

static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::load);

/// Process-wide configuration, loaded on first access.
pub fn get() -> &'static AppConfig {
    &CONFIG
}

/// Runtime settings for the now-playing client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path the backend is mounted under, relative to the page origin.
    pub base_path: String,
    /// Page location for builds that are not served by a browser.
    pub server_url: String,
    pub fetch_timeout_ms: u32,
    pub reconnect: bool,
    pub reconnect_initial_ms: u32,
    pub reconnect_max_ms: u32,
    pub default_volume_percent: u8,
    pub youtube_search_url: String,
    pub song_db_search_url: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            fetch_timeout_ms: 10_000,
            reconnect: true,
            reconnect_initial_ms: 1_000,
            reconnect_max_ms: 30_000,
            default_volume_percent: 100,
            youtube_search_url: DEFAULT_YOUTUBE_SEARCH_URL.to_string(),
            song_db_search_url: DEFAULT_SONG_DB_SEARCH_URL.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::from_lookup(build_time_var)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `RADIO_*` variables, keeping defaults for anything
    /// missing or unparseable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let number = |key: &str| parse_number(key, var(key));

        if let Some(value) = var("RADIO_BASE_PATH") {
            config.base_path = value;
        }
        if let Some(value) = var("RADIO_SERVER_URL") {
            config.server_url = value;
        }
        if let Some(value) = number("RADIO_FETCH_TIMEOUT_MS") {
            config.fetch_timeout_ms = value.clamp(500, 120_000);
        }
        if let Some(value) = var("RADIO_RECONNECT") {
            match parse_flag(&value) {
                Some(flag) => config.reconnect = flag,
                None => tracing::warn!("ignoring RADIO_RECONNECT={value:?}: expected a boolean"),
            }
        }
        if let Some(value) = number("RADIO_RECONNECT_INITIAL_MS") {
            config.reconnect_initial_ms = value.max(1);
        }
        if let Some(value) = number("RADIO_RECONNECT_MAX_MS") {
            config.reconnect_max_ms = value.max(1);
        }
        if config.reconnect_initial_ms > config.reconnect_max_ms {
            config.reconnect_max_ms = config.reconnect_initial_ms;
        }
        if let Some(value) = number("RADIO_DEFAULT_VOLUME") {
            config.default_volume_percent = value.min(100) as u8;
        }
        if let Some(value) = var("RADIO_YOUTUBE_SEARCH_URL") {
            config.youtube_search_url = value;
        }
        if let Some(value) = var("RADIO_SONG_DB_SEARCH_URL") {
            config.song_db_search_url = value;
        }
        if let Some(value) = var("RADIO_LOG_LEVEL") {
            if tracing::Level::from_str(&value).is_ok() {
                config.log_level = value.to_ascii_lowercase();
            } else {
                tracing::warn!("ignoring RADIO_LOG_LEVEL={value:?}: unknown level");
            }
        }

        config
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.fetch_timeout_ms))
    }

    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(&self.log_level).unwrap_or(tracing::Level::INFO)
    }
}

fn parse_number(key: &str, value: Option<String>) -> Option<u32> {
    let value = value?;
    match value.parse::<u32>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("ignoring {key}={value:?}: not a number");
            None
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Browser builds have no process environment; settings are baked in at compile time.
#[cfg(target_arch = "wasm32")]
fn build_time_var(key: &str) -> Option<String> {
    let value = match key {
        "RADIO_BASE_PATH" => option_env!("RADIO_BASE_PATH"),
        "RADIO_SERVER_URL" => option_env!("RADIO_SERVER_URL"),
        "RADIO_FETCH_TIMEOUT_MS" => option_env!("RADIO_FETCH_TIMEOUT_MS"),
        "RADIO_RECONNECT" => option_env!("RADIO_RECONNECT"),
        "RADIO_RECONNECT_INITIAL_MS" => option_env!("RADIO_RECONNECT_INITIAL_MS"),
        "RADIO_RECONNECT_MAX_MS" => option_env!("RADIO_RECONNECT_MAX_MS"),
        "RADIO_DEFAULT_VOLUME" => option_env!("RADIO_DEFAULT_VOLUME"),
        "RADIO_YOUTUBE_SEARCH_URL" => option_env!("RADIO_YOUTUBE_SEARCH_URL"),
        "RADIO_SONG_DB_SEARCH_URL" => option_env!("RADIO_SONG_DB_SEARCH_URL"),
        "RADIO_LOG_LEVEL" => option_env!("RADIO_LOG_LEVEL"),
        _ => None,
    };
    value.map(str::to_string)
}
