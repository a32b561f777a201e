use crate::{
    config::{Config, DEFAULT_BASE_URL},
    descriptor::{DescriptorFetcher, HttpDescriptorFetcher},
    episode::Episode,
    token::{ChromeExtractor, TokenExtractor},
};
use anyhow::{Result, anyhow};
use clap::Args;
use log::info;
use std::time::Duration;
use url::Url;

/// Capture the access token and subtitle descriptor of a single episode.
#[derive(Debug, Clone, Args)]
#[clap(long_about = "Capture the access token and subtitle descriptor of a single episode.\n\n\
Launches a browser, renders the episode watch page and waits for the subtitle request.\n\
The captured descriptor is printed in json format, nothing is downloaded.")]
pub struct Capture {
    /// Show id.
    #[arg(required = true)]
    pub show_id: u64,

    /// Episode id.
    #[arg(required = true)]
    pub episode_id: u64,

    /// Episode number.
    #[arg(required = true)]
    pub number: u32,

    /// Show title, only used for building the watch page url.
    #[arg(long, default_value = "a")]
    pub title: String,

    /// Launch browser with a window.
    #[arg(long)]
    pub headful: bool,

    /// Maximum time in seconds to wait for the access token after the page has loaded.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Site root used for watch pages and api requests.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Set http(s) / socks proxy address for browser and requests.
    #[arg(long)]
    pub proxy: Option<String>,
}

impl Capture {
    pub async fn execute(self) -> Result<()> {
        let config = Config {
            base_url: self.base_url.clone(),
            capture_timeout: Duration::from_secs(self.timeout),
            headless: !self.headful,
            proxy: self.proxy.clone(),
            ..Default::default()
        };
        let episode = Episode::new(self.show_id, self.number, self.episode_id);
        let extractor = ChromeExtractor {
            base_url: config.base_url.clone(),
            capture_timeout: config.capture_timeout,
            headless: config.headless,
            navigation_timeout: config.navigation_timeout,
            proxy: config.proxy.clone(),
        };

        let title = self.title.clone();
        let token = tokio::task::spawn_blocking(move || extractor.extract(&episode, &title))
            .await?
            .map_err(|x| anyhow!("no token captured ({}).", x))?;
        info!("Captured token {}", token.as_str());

        let fetcher = HttpDescriptorFetcher::new(config.client()?, config.base_url);
        let entries = fetcher.fetch(&episode, &self.title, token).await?;

        serde_json::to_writer_pretty(std::io::stdout(), &entries)?;
        println!();
        Ok(())
    }
}
