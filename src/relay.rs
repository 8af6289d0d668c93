use crate::config::env_loader::ConfigError;
use crate::config::model::{FetcherConfig, ForwarderConfig};
use crate::events::ics::{parse_feed, FeedParseError};
use crate::events::model::Event;
use crate::feed::api::{FeedAPI, FeedError};
use crate::scraper::scrape_event_image;
use crate::webhook::api::{WebhookAPI, WebhookError};
use futures::{stream, StreamExt};
use itertools::Itertools;
use std::error::Error as StdError;
use std::iter;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("Couldn't parse feed")]
    Parse(#[from] FeedParseError),
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

/// Renders the error followed by every underlying cause, e.g. `Error sending events to webhook: ...: Connection refused`
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    iter::successors(Some(err), |&err| err.source()).join(": ")
}

/// Downloads the feed to the local feed file
#[tracing::instrument(skip_all, fields(run_id = %Uuid::new_v4()))]
pub async fn fetch_feed(config: &FetcherConfig) -> Result<(), RelayError> {
    let size = FeedAPI::download(&config.feed_url, &config.feed_file_path).await?;

    info!(
        "Saved {} bytes to '{}'",
        size,
        config.feed_file_path.display()
    );

    Ok(())
}

/**
Parses the local feed file and posts its events to the webhook.
Returns the events that were sent, ordered by start.
*/
#[tracing::instrument(skip_all, fields(run_id = %Uuid::new_v4()))]
pub async fn forward_events(config: &ForwarderConfig) -> Result<Vec<Event>, RelayError> {
    let content = FeedAPI::read(&config.feed_file_path).await?;

    let events = parse_feed(&content, config.feed_timezone)?
        .into_iter()
        .sorted_by_key(|event| event.start)
        .take(config.debug_config.event_limit.unwrap_or(usize::MAX))
        .collect_vec();

    let events = if config.scrape_event_images {
        add_images(events).await
    } else {
        events
    };

    if events.is_empty() {
        warn!("No events found in feed");
    }

    info!("Upcoming events:");
    events.iter().for_each(|event| info!("{} ({})", event.title, event.start));

    if config.debug_config.skip_sending {
        let payload = WebhookAPI::to_json(&events)?;

        info!("Skipping sending. Payload: {}", payload);
    } else {
        WebhookAPI::send_events(&config.webhook_url, &events).await?;
    }

    info!("Forwarded {} event(s)", events.len());

    Ok(events)
}

/// One page at a time
async fn add_images(events: Vec<Event>) -> Vec<Event> {
    stream::iter(events)
        .then(|event| async move {
            let image_url = scrape_event_image(&event.url).await;

            event.with_image(image_url)
        })
        .collect()
        .await
}
