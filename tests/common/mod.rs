#![allow(dead_code)]

use chrono_tz::Tz;
use meetup_relay::config::model::{DebugConfig, ForwarderConfig};
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub const FEED: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Meetup//RemoteApi//EN
BEGIN:VEVENT
UID:event_305000002@meetup.com
SUMMARY:Intro to Rust
DTSTART;TZID=Europe/London:20250715T183000
DTEND;TZID=Europe/London:20250715T200000
LOCATION:Code Node\, London
DESCRIPTION:**Host:** Jane Doe\nSpeaker: Ada Lovelace\n\nAbout Women Coding Community\nWe are a community.
URL:{EVENT_BASE_URL}/events/305000002/
END:VEVENT
BEGIN:VEVENT
UID:event_broken@meetup.com
SUMMARY:Broken entry
DTSTART:tomorrow evening
END:VEVENT
BEGIN:VEVENT
UID:event_305000001@meetup.com
SUMMARY:Book Club: Designing Data-Intensive Applications
DTSTART:20250315T183000Z
DTEND:20250315T200000Z
LOCATION:Online event
DESCRIPTION:Chapters 1 to 3.
URL:{EVENT_BASE_URL}/events/305000001/
END:VEVENT
END:VCALENDAR"#;

pub fn feed_with_event_base_url(event_base_url: &str) -> String {
    FEED.replace("{EVENT_BASE_URL}", event_base_url)
}

/// The feed path lives under a fresh directory that isn't created yet, removed with the guard
pub fn temp_feed_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("files").join("meetup.ics");

    (dir, path)
}

pub async fn write_feed(content: &str) -> (TempDir, PathBuf) {
    let (dir, path) = temp_feed_path();

    tokio::fs::create_dir_all(path.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(&path, content).await.unwrap();

    (dir, path)
}

pub fn forwarder_config(webhook_url: &str, feed_file_path: PathBuf) -> ForwarderConfig {
    ForwarderConfig {
        webhook_url: webhook_url.parse().unwrap(),
        feed_file_path,
        feed_timezone: Tz::UTC,
        scrape_event_images: false,
        debug_config: DebugConfig::default(),
    }
}

/// An address nothing listens on
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{}/webhook", address)
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Request body is not JSON")
    }
}

/// Answers every request with the same canned response and records what it received
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub async fn start(status: u16, content_type: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let response = format!(
            "HTTP/1.1 {} Mock\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                if let Err(err) = handle_connection(stream, &response, &recorded).await {
                    eprintln!("Mock server connection failed: {}", err);
                }
            }
        });

        Self {
            base_url: format!("http://{}", address),
            requests,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle_connection(
    stream: TcpStream,
    response: &str,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> io::Result<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line).await?;

        if read == 0 || line.trim().is_empty() {
            break;
        }

        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).await?;

    recorded.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
        body,
    });

    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
