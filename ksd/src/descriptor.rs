use crate::episode::{Episode, SubtitleEntry, Token};
use log::debug;
use reqwest::{Client, StatusCode, header};
use std::future::Future;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server responded with HTTP {0}")]
    Status(StatusCode),
    #[error("couldn't parse subtitle descriptor: {0}")]
    Malformed(String),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl FetchError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

/// Exchanges a freshly captured token for the episode's subtitle list.
pub trait DescriptorFetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        episode: &Episode,
        title: &str,
        token: Token,
    ) -> impl Future<Output = Result<Vec<SubtitleEntry>, FetchError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpDescriptorFetcher {
    base_url: Url,
    client: Client,
}

impl HttpDescriptorFetcher {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { base_url, client }
    }
}

impl DescriptorFetcher for HttpDescriptorFetcher {
    /// Single request, not retried. The endpoint rejects requests whose
    /// referer isn't the episode's watch page.
    async fn fetch(
        &self,
        episode: &Episode,
        title: &str,
        token: Token,
    ) -> Result<Vec<SubtitleEntry>, FetchError> {
        let referer = episode.watch_url(&self.base_url, title)?;
        let url = episode.descriptor_url(&self.base_url, &token)?;
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .header(header::REFERER, referer.as_str())
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let text = response.text().await?;
        serde_json::from_str::<Vec<SubtitleEntry>>(&text)
            .map_err(|x| FetchError::Malformed(x.to_string()))
    }
}
