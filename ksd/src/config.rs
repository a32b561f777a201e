use crate::downloader::{Pacing, RetryPolicy};
use anyhow::Result;
use reqwest::{Client, Proxy};
use std::{
    collections::{BTreeSet, HashSet},
    path::PathBuf,
    time::Duration,
};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://kisskh.ovh";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";

/// Settings of a single run.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: Url,
    /// How long to wait for the token once the watch page has settled.
    pub capture_timeout: Duration,
    pub directory: PathBuf,
    /// Episode numbers to process, `None` processes all.
    pub episodes: Option<BTreeSet<u32>>,
    pub headless: bool,
    /// Accepted subtitle language codes, `None` accepts all.
    pub languages: Option<HashSet<String>>,
    pub navigation_timeout: Duration,
    pub pacing: Pacing,
    pub proxy: Option<String>,
    pub retry: RetryPolicy,
    pub user_agent: String,
    /// Maximum number of browsers rendering at the same time.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            capture_timeout: Duration::from_secs(10),
            directory: PathBuf::from("dramas"),
            episodes: None,
            headless: true,
            languages: None,
            navigation_timeout: Duration::from_secs(30),
            pacing: Pacing::default(),
            proxy: None,
            retry: RetryPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            workers: 6,
        }
    }
}

impl Config {
    pub fn client(&self) -> Result<Client> {
        let mut client_builder = Client::builder()
            .user_agent(&self.user_agent)
            .timeout(Duration::from_secs(30));

        if let Some(proxy) = &self.proxy {
            client_builder = client_builder.proxy(Proxy::all(proxy)?);
        }

        Ok(client_builder.build()?)
    }
}
