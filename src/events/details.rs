use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

const GROUP_NAME: &str = "Women Coding Community";
const ABOUT_GROUP_MARKER: &str = "About Women Coding Community";
const ALLOWED_PUNCTUATION: &str = ".,;:!?'\"-()";

lazy_static! {
    static ref MARKDOWN_LINK: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
    static ref MARKDOWN_EMPHASIS: Regex = Regex::new(r"[*_~`]+").unwrap();
    static ref HOST_LINE: Regex = Regex::new(r"(?i)^\**Host:\**\s*(.+)").unwrap();
    static ref COHOST_LINE: Regex = Regex::new(r"(?i)^\**Co-host:\**\s*(.+)").unwrap();
    static ref SPEAKER_LINE: Regex =
        Regex::new(r"(?i)^\**(?:Guest Presenter|Speaker):\**\s*(.+)").unwrap();
}

/// Collects the people credited in the description as `(host, speaker)`.
///
/// Co-hosts are appended to the hosts with "and", or stand in for them when no host is named.
pub fn get_hosts_and_speakers(description: &str) -> (String, String) {
    let mut hosts = Vec::new();
    let mut cohosts = Vec::new();
    let mut speakers = Vec::new();

    let text = description.replace('\\', "");

    for line in text.lines().map(str::trim) {
        if let Some(name) = capture_name(&HOST_LINE, line) {
            hosts.push(name);
        } else if let Some(name) = capture_name(&COHOST_LINE, line) {
            cohosts.push(name);
        } else if let Some(name) = capture_name(&SPEAKER_LINE, line) {
            speakers.push(name);
        }
    }

    let host = match (hosts.is_empty(), cohosts.is_empty()) {
        (false, false) => format!("{} and {}", hosts.join(", "), cohosts.join(", ")),
        (true, false) => cohosts.join(", "),
        _ => hosts.join(", "),
    };

    (host, speakers.join(", "))
}

fn capture_name(pattern: &Regex, line: &str) -> Option<String> {
    let captures = pattern.captures(line)?;
    let name = clean_name(&captures[1]);

    (!name.is_empty()).then_some(name)
}

fn clean_name(name: &str) -> String {
    let name = MARKDOWN_EMPHASIS.replace_all(name, "");
    let name = MARKDOWN_LINK.replace_all(name.trim(), "$1");

    name.split('|').next().unwrap_or_default().trim().to_string()
}

/// Strips markdown, accents, emojis and any other symbol outside plain text and punctuation
pub fn clean_description(text: &str) -> String {
    let text = MARKDOWN_LINK.replace_all(text, "$1");
    let text = MARKDOWN_EMPHASIS.replace_all(&text, "");

    voca_rs::manipulate::latinise(&text)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(*c))
        .collect()
}

/// Keeps the event's own blurb, dropping the group boilerplate, on a single line
pub fn format_description(description: &str) -> String {
    let cleaned = clean_description(description);
    let blurb = cleaned
        .split(ABOUT_GROUP_MARKER)
        .next()
        .unwrap_or_default()
        .trim();
    let blurb = blurb.strip_prefix(GROUP_NAME).unwrap_or(blurb);

    blurb.split_whitespace().join(" ")
}
