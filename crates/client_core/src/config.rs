use std::{fs, path::Path};

use serde::Deserialize;
use tracing::warn;

use crate::filter::DEFAULT_PAGE_SIZE;

pub const DEFAULT_SETTINGS_FILE: &str = "console.toml";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub status_toggle_method: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".into(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            status_toggle_method: "PATCH".into(),
            request_timeout_secs: Some(30),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    page_size: Option<u32>,
    search_debounce_ms: Option<u64>,
    status_toggle_method: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `console.toml` in the working directory, then `LEDGER_*`
/// environment variables.
pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(DEFAULT_SETTINGS_FILE).ok();
    load_settings_from(raw.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_file(path: &Path) -> Settings {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) => {
            warn!(path = %path.display(), "could not read settings file: {err}");
            None
        }
    };
    load_settings_from(raw.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_url {
                    settings.api_url = v;
                }
                if let Some(v) = file_cfg.page_size {
                    settings.page_size = v;
                }
                if let Some(v) = file_cfg.search_debounce_ms {
                    settings.search_debounce_ms = v;
                }
                if let Some(v) = file_cfg.status_toggle_method {
                    settings.status_toggle_method = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = Some(v);
                }
            }
            Err(err) => warn!("ignoring malformed settings file: {err}"),
        }
    }

    if let Some(v) = env("LEDGER_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("LEDGER_PAGE_SIZE").and_then(|v| v.parse().ok()) {
        settings.page_size = v;
    }
    if let Some(v) = env("LEDGER_SEARCH_DEBOUNCE_MS").and_then(|v| v.parse().ok()) {
        settings.search_debounce_ms = v;
    }
    if let Some(v) = env("LEDGER_STATUS_METHOD") {
        settings.status_toggle_method = v;
    }
    if let Some(v) = env("LEDGER_REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        settings.request_timeout_secs = Some(v);
    }

    if settings.page_size == 0 {
        settings.page_size = DEFAULT_PAGE_SIZE;
    }
    settings.status_toggle_method = settings.status_toggle_method.trim().to_ascii_uppercase();

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
