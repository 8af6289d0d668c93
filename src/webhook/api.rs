use super::dto::EventPayload;
use crate::events::model::Event;
use crate::http::HTTP_CLIENT;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Error sending events to webhook")]
    Request(#[source] reqwest::Error),
    #[error("Webhook responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Couldn't serialize events")]
    Serialization(#[source] serde_json::Error),
}

pub struct WebhookAPI;

impl WebhookAPI {
    /// Posts all events as a single JSON array
    #[tracing::instrument(skip_all, fields(url = %url, events = events.len()))]
    pub async fn send_events(url: &Url, events: &[Event]) -> Result<(), WebhookError> {
        info!("Sending events");

        let payload = Self::to_json(events)?;

        let response = HTTP_CLIENT
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(WebhookError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Webhook rejected events: {}", status);

            return Err(WebhookError::Status { status, body });
        }

        info!("Events delivered ({})", status);

        Ok(())
    }

    pub fn to_json(events: &[Event]) -> Result<String, WebhookError> {
        let payload: Vec<EventPayload> = events.iter().map(EventPayload::from).collect();

        serde_json::to_string(&payload).map_err(WebhookError::Serialization)
    }
}
