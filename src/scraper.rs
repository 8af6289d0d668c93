use crate::http::HTTP_CLIENT;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tracing::{debug, warn};

lazy_static! {
    static ref OPEN_GRAPH_IMAGE: Selector =
        Selector::parse(r#"meta[property="og:image"]"#).unwrap();
    static ref IMAGE: Selector = Selector::parse("img[src]").unwrap();
}

/// Finds the banner of an event page. Failures only cost the event its image.
#[tracing::instrument]
pub async fn scrape_event_image(event_url: &str) -> Option<String> {
    if event_url.is_empty() {
        return None;
    }

    let html = match crawl_event_page(event_url).await {
        Ok(html) => html,
        Err(err) => {
            warn!("Couldn't get event page: {}", err);
            return None;
        }
    };

    let image_url = extract_image_url(&html);

    if image_url.is_none() {
        debug!("No image found in event page");
    }

    image_url
}

async fn crawl_event_page(event_url: &str) -> Result<String, reqwest::Error> {
    HTTP_CLIENT
        .get(event_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Prefers the Open Graph image, falling back to the first image in the page
pub fn extract_image_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    document
        .select(&OPEN_GRAPH_IMAGE)
        .find_map(|element| element.value().attr("content"))
        .or_else(|| {
            document
                .select(&IMAGE)
                .find_map(|element| element.value().attr("src"))
        })
        .map(str::to_string)
}
