//! Feed parsing on top of the icalendar crate's parser.
//!
//! Every `VEVENT` block is parsed on its own, so one broken entry never takes the rest of the
//! feed down with it.

use super::model::Event;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use icalendar::parser::{read_calendar, unfold, Component};
use icalendar::{CalendarDateTime, DatePerhapsTime};
use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, warn};

const CALENDAR_BEGIN: &str = "BEGIN:VCALENDAR";
const EVENT_BEGIN: &str = "BEGIN:VEVENT";
const EVENT_END: &str = "END:VEVENT";

#[derive(Debug, Error)]
pub enum FeedParseError {
    #[error("Feed is not an iCalendar document")]
    NotACalendar,
}

#[derive(Debug, Error)]
enum EntryError {
    #[error("invalid syntax: {0}")]
    Syntax(String),
    #[error("missing {0}")]
    MissingProperty(&'static str),
    #[error("invalid {0} '{1}'")]
    InvalidTime(&'static str, String),
}

/// Parses every well-formed entry of the feed, in feed order.
///
/// Floating and all-day times are read in `default_tz`.
pub fn parse_feed(content: &str, default_tz: Tz) -> Result<Vec<Event>, FeedParseError> {
    let unfolded = unfold(content);

    if !unfolded
        .lines()
        .any(|line| line.trim().eq_ignore_ascii_case(CALENDAR_BEGIN))
    {
        return Err(FeedParseError::NotACalendar);
    }

    let blocks = split_event_blocks(&unfolded);
    debug!("Found {} entries in feed", blocks.len());

    let events = blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| match parse_event_block(block, default_tz) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!("Skipping malformed entry #{}: {}", index + 1, err);
                None
            }
        })
        .collect();

    Ok(events)
}

fn split_event_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in content.lines().map(str::trim_end) {
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case(EVENT_BEGIN) {
            current = Some(vec![line]);
        } else if let Some(block) = current.as_mut() {
            block.push(line);

            if line.eq_ignore_ascii_case(EVENT_END) {
                blocks.extend(current.take());
            }
        }
    }

    blocks
}

fn parse_event_block(block: &[&str], default_tz: Tz) -> Result<Event, EntryError> {
    if let Some(line) = block.iter().find(|line| !line.contains(':')) {
        return Err(EntryError::Syntax(format!("no value in line '{}'", line)));
    }

    let wrapped = [CALENDAR_BEGIN, "VERSION:2.0", "PRODID:-//meetup-relay//EN"]
        .into_iter()
        .map(str::to_string)
        .chain(block.iter().map(|line| normalize_name(line)))
        .chain(["END:VCALENDAR".to_string()])
        .join("\n");

    let calendar = read_calendar(&wrapped).map_err(|err| EntryError::Syntax(err.to_string()))?;
    let vevent = find_vevent(&calendar.components)
        .ok_or_else(|| EntryError::Syntax("no VEVENT component".to_string()))?;

    let title = text_property(vevent, "SUMMARY")
        .filter(|title| !title.trim().is_empty())
        .ok_or(EntryError::MissingProperty("SUMMARY"))?;
    let start = time_property(vevent, "DTSTART", default_tz)?
        .ok_or(EntryError::MissingProperty("DTSTART"))?;
    // RFC 5545: without DTEND the event ends when it starts
    let end = time_property(vevent, "DTEND", default_tz)?.unwrap_or(start);

    let description = text_property(vevent, "DESCRIPTION").unwrap_or_default();

    Ok(Event::new(
        title.trim().to_string(),
        start,
        end,
        text_property(vevent, "LOCATION").unwrap_or_default(),
        &description,
        text_property(vevent, "URL").unwrap_or_default(),
    ))
}

/// Names are case-insensitive, the parser only knows them in uppercase.
/// `BEGIN`/`END` values are component names, so they are uppercased too.
fn normalize_name(line: &str) -> String {
    let name_end = line
        .find(|c: char| c == ':' || c == ';')
        .unwrap_or(line.len());
    let (name, rest) = line.split_at(name_end);
    let name = name.to_ascii_uppercase();

    if name == "BEGIN" || name == "END" {
        format!("{}{}", name, rest.to_ascii_uppercase())
    } else {
        format!("{}{}", name, rest)
    }
}

fn find_vevent<'a>(components: &'a [Component<'a>]) -> Option<&'a Component<'a>> {
    components.iter().find_map(|component| {
        if component.name == "VEVENT" {
            Some(component)
        } else {
            find_vevent(&component.components)
        }
    })
}

fn text_property(vevent: &Component, name: &str) -> Option<String> {
    vevent
        .find_prop(name)
        .map(|prop| unescape_text(prop.val.as_ref()))
}

fn time_property(
    vevent: &Component,
    name: &'static str,
    default_tz: Tz,
) -> Result<Option<DateTime<FixedOffset>>, EntryError> {
    let Some(prop) = vevent.find_prop(name) else {
        return Ok(None);
    };

    DatePerhapsTime::try_from(prop)
        .ok()
        .and_then(|time| to_timestamp(time, default_tz))
        .map(Some)
        .ok_or_else(|| EntryError::InvalidTime(name, prop.val.to_string()))
}

fn to_timestamp(time: DatePerhapsTime, default_tz: Tz) -> Option<DateTime<FixedOffset>> {
    match time {
        DatePerhapsTime::Date(date) => localize(date.and_hms_opt(0, 0, 0)?, default_tz),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(date_time)) => {
            Some(date_time.fixed_offset())
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(date_time)) => {
            localize(date_time, default_tz)
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let tz = tzid.trim_matches('"').parse::<Tz>().unwrap_or_else(|_| {
                warn!("Unknown timezone '{}', using {}", tzid, default_tz);
                default_tz
            });

            localize(date_time, tz)
        }
    }
}

/// Ambiguous local times (DST fall-back) resolve to the earlier instant
fn localize(date_time: NaiveDateTime, tz: Tz) -> Option<DateTime<FixedOffset>> {
    tz.from_local_datetime(&date_time)
        .earliest()
        .map(|date_time| date_time.fixed_offset())
}

fn unescape_text(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }

        match chars.next() {
            Some('n') | Some('N') => unescaped.push('\n'),
            Some(escaped) => unescaped.push(escaped),
            None => {}
        }
    }

    unescaped
}
