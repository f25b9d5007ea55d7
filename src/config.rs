//! Site configuration, read once from the process environment.
//!
//! Every value has a default. The Gemini key is optional at startup; a
//! missing key only shows up when the first request reaches the model.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::prompts::DEFAULT_LANGUAGE;
use crate::theme::Theme;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub bind_addr: SocketAddr,
    pub language: String,
    pub theme: Theme,
    pub max_upload_bytes: usize,
    pub static_dir: PathBuf,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            language: DEFAULT_LANGUAGE.to_string(),
            theme: Theme::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            static_dir: PathBuf::from("static"),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl SiteConfig {
    /// Load `.env` (if present) and read the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = SiteConfig {
            api_key: get("GEMINI_API_KEY"),
            ..SiteConfig::default()
        };

        if let Some(model) = get("GEMINI_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = get("GEMINI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    field: "BIND_ADDR",
                    value: addr.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(language) = get("RESPONSE_LANGUAGE") {
            config.language = language;
        }
        if let Some(theme) = get("SITE_THEME") {
            config.theme = theme.parse().map_err(|reason| ConfigError::InvalidValue {
                field: "SITE_THEME",
                value: theme.clone(),
                reason,
            })?;
        }
        if let Some(limit) = get("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = limit.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    field: "MAX_UPLOAD_BYTES",
                    value: limit.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(dir) = get("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(level) = get("LOG_LEVEL") {
            config.log_level = level.to_lowercase();
        }
        if let Some(format) = get("LOG_FORMAT") {
            config.log_json = format.eq_ignore_ascii_case("json");
        }

        Ok(config)
    }
}
