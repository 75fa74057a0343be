use std::time::Duration;

use feed_rs::parser;
use log::debug;
use reqwest::Client;

use crate::error::FetchError;
use crate::models::{CalendarTime, RawEntry};

/// Retrieves raw feed documents.
///
/// `fetch` is the normal path and rejects non-success responses.
/// `fetch_lenient` is the single fallback attempt and takes whatever body the
/// server sends back.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    async fn fetch_lenient(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpTransport {
    client: Client,
    fallback: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        let fallback = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, fallback })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let bytes = response.bytes().await?;
        debug!("Fetched {} ({} bytes)", url, bytes.len());
        Ok(bytes.to_vec())
    }

    async fn fetch_lenient(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.fallback.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!("Fallback fetch of {} returned {} ({} bytes)", url, status, bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Parse an RSS/Atom document into loosely typed entries, in feed order.
///
/// Entries without a guid get no id, so identity falls back to link then title.
pub fn parse_entries(bytes: &[u8]) -> Result<Vec<RawEntry>, FetchError> {
    let feed = parser::Builder::new()
        .id_generator(|_, _, _| String::new())
        .build()
        .parse(bytes)?;

    Ok(feed
        .entries
        .into_iter()
        .map(|entry| RawEntry {
            id: Some(entry.id).filter(|id| !id.is_empty()),
            link: entry.links.first().map(|l| l.href.clone()),
            title: entry.title.map(|t| t.content),
            summary: entry.summary.map(|t| t.content),
            description: entry.content.and_then(|c| c.body),
            published: entry.published.map(CalendarTime::from),
            updated: entry.updated.map(CalendarTime::from),
        })
        .collect())
}
