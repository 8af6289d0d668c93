use chrono_tz::Tz;
use reqwest::Url;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub feed_url: Url,
    pub feed_file_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    pub webhook_url: Url,
    pub feed_file_path: PathBuf,
    /// Applied to floating and all-day times, and to TZIDs that can't be resolved
    pub feed_timezone: Tz,
    pub scrape_event_images: bool,
    pub debug_config: DebugConfig,
}

#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    pub skip_sending: bool,
    pub event_limit: Option<usize>,
}
