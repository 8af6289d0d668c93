use crate::events::model::Event;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// One element of the JSON array posted to the webhook
#[derive(Debug, Serialize)]
pub struct EventPayload<'a> {
    pub title: &'a str,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub location: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub host: &'a str,
    pub speaker: &'a str,
    pub category_style: &'static str,
    pub category_name: &'static str,
    pub image: Option<&'a str>,
}

impl<'a> From<&'a Event> for EventPayload<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            title: &event.title,
            start: event.start,
            end: event.end,
            location: &event.location,
            description: &event.description,
            url: &event.url,
            host: &event.details.host,
            speaker: &event.details.speaker,
            category_style: event.details.category.style(),
            category_name: event.details.category.name(),
            image: event.details.image_url.as_deref(),
        }
    }
}
