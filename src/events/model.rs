use super::details::{format_description, get_hosts_and_speakers};
use chrono::{DateTime, FixedOffset};

/// A single calendar entry, ready to be forwarded
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub location: String,
    pub description: String,
    pub url: String,
    pub details: EventDetails,
}

impl Event {
    /// Builds the event from its raw feed fields, deriving the details from the raw description
    pub fn new(
        title: String,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        location: String,
        raw_description: &str,
        url: String,
    ) -> Self {
        let (host, speaker) = get_hosts_and_speakers(raw_description);
        let description = format_description(raw_description);
        let category = Category::from_event(&title, &description);

        Self {
            title,
            start,
            end,
            location,
            description,
            url,
            details: EventDetails {
                host,
                speaker,
                category,
                image_url: None,
            },
        }
    }

    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.details.image_url = image_url;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub host: String,
    pub speaker: String,
    pub category: Category,
    pub image_url: Option<String>,
}

#[derive(strum::IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum Category {
    TechTalk,
    CodingClub,
    WritingClub,
    BookClub,
    CareerClub,
    CareerTalk,
}

impl Category {
    /// First match wins, club tags in the description take precedence over the title
    pub fn from_event(title: &str, description: &str) -> Self {
        let title = title.to_lowercase();
        let description = description.to_lowercase();

        if description.contains("coding club") {
            Category::CodingClub
        } else if description.contains("writing club") {
            Category::WritingClub
        } else if title.contains("book club") {
            Category::BookClub
        } else if title.contains("career club") {
            Category::CareerClub
        } else if description.contains("career talk") {
            Category::CareerTalk
        } else {
            Category::TechTalk
        }
    }

    pub fn style(&self) -> &'static str {
        self.into()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::TechTalk => "Tech Talk",
            Category::CodingClub => "Coding Club",
            Category::WritingClub => "Writing Club",
            Category::BookClub => "Book Club",
            Category::CareerClub => "Career Club",
            Category::CareerTalk => "Career Talk",
        }
    }
}
