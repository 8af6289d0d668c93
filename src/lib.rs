pub mod config;
pub mod events;
pub mod feed;
pub mod http;
pub mod relay;
pub mod scraper;
pub mod tracing;
pub mod webhook;
