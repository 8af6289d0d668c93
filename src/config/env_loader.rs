use crate::config::model::{DebugConfig, FetcherConfig, ForwarderConfig};
use chrono_tz::Tz;
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_FEED_FILE_PATH: &str = "files/meetup.ics";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set.")]
    Missing(String),
    #[error("Invalid config '{name}'. Expected {expected}, got '{value}'")]
    Invalid {
        name: String,
        expected: &'static str,
        value: String,
    },
}

pub fn load_fetcher_config() -> Result<FetcherConfig, ConfigError> {
    Ok(FetcherConfig {
        feed_url: load_url_config("ICS_FEED_URL")?,
        feed_file_path: load_path_config("FEED_FILE_PATH", DEFAULT_FEED_FILE_PATH),
    })
}

pub fn load_forwarder_config() -> Result<ForwarderConfig, ConfigError> {
    Ok(ForwarderConfig {
        webhook_url: load_url_config("WEBHOOK_URL")?,
        feed_file_path: load_path_config("FEED_FILE_PATH", DEFAULT_FEED_FILE_PATH),
        feed_timezone: load_timezone_config("FEED_TIMEZONE", Tz::UTC)?,
        scrape_event_images: load_bool_config("SCRAPE_EVENT_IMAGES", true)?,
        debug_config: DebugConfig {
            skip_sending: load_bool_config("DEBUG_SKIP_SENDING", false)?,
            event_limit: load_usize_config("DEBUG_EVENT_LIMIT")?,
        },
    })
}

fn load_url_config(name: &str) -> Result<Url, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name.to_string()))?;

    value.parse().map_err(|_| ConfigError::Invalid {
        name: name.to_string(),
        expected: "an absolute URL",
        value,
    })
}

fn load_path_config(name: &str, default: &str) -> PathBuf {
    env::var(name)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn load_timezone_config(name: &str, default: Tz) -> Result<Tz, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            expected: "an IANA timezone name",
            value,
        }),
        Err(_) => Ok(default),
    }
}

fn load_bool_config(name: &str, default: bool) -> Result<bool, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());

    value.parse().map_err(|_| ConfigError::Invalid {
        name: name.to_string(),
        expected: "either 'true' or 'false'",
        value,
    })
}

fn load_usize_config(name: &str) -> Result<Option<usize>, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map(Some).map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            expected: "a positive integer number",
            value,
        }),
        Err(_) => Ok(None),
    }
}
