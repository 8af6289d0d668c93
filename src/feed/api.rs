use crate::http::HTTP_CLIENT;
use reqwest::{StatusCode, Url};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

const CALENDAR_MARKER: &str = "BEGIN:VCALENDAR";
const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Error requesting feed")]
    Request(#[source] reqwest::Error),
    #[error("Feed request failed with status {0}")]
    Status(StatusCode),
    #[error("Feed response is not an iCalendar document")]
    NotACalendar,
    #[error("Error accessing feed file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct FeedAPI;

impl FeedAPI {
    /**
    Downloads the feed into `path`, replacing any previous download.
    Returns the amount of bytes written.
    */
    #[tracing::instrument(skip(url), fields(url = %url))]
    pub async fn download(url: &Url, path: &Path) -> Result<usize, FeedError> {
        info!("Downloading feed");

        let response = HTTP_CLIENT
            .get(url.clone())
            .send()
            .await
            .map_err(FeedError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.bytes().await.map_err(FeedError::Request)?;
        debug!("Received {} bytes", body.len());

        if !Self::is_calendar(&body) {
            return Err(FeedError::NotACalendar);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| FeedError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        fs::write(path, &body).await.map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Feed saved");

        Ok(body.len())
    }

    #[tracing::instrument]
    pub async fn read(path: &Path) -> Result<String, FeedError> {
        fs::read_to_string(path)
            .await
            .map_err(|source| FeedError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    fn is_calendar(body: &[u8]) -> bool {
        let head = &body[..body.len().min(1024)];

        String::from_utf8_lossy(head)
            .trim_start_matches(BYTE_ORDER_MARK)
            .trim_start()
            .to_ascii_uppercase()
            .starts_with(CALENDAR_MARKER)
    }
}
