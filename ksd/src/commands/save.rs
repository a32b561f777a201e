use crate::{
    catalog,
    config::{Config, DEFAULT_BASE_URL, DEFAULT_USER_AGENT},
    descriptor::HttpDescriptorFetcher,
    downloader::{Downloader, Pacing, RetryPolicy},
    orchestrator::Orchestrator,
    token::ChromeExtractor,
    utils,
};
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use log::info;
use std::{
    collections::{BTreeSet, HashSet},
    path::PathBuf,
    time::Duration,
};
use url::Url;

/// Download and decrypt subtitles of a range of shows.
#[derive(Debug, Clone, Args)]
#[clap(long_about = "Download and decrypt subtitles of a range of shows.\n\n\
Requires any one of these browser to be installed:\n\
1. chrome - https://www.google.com/chrome\n\
2. chromium - https://www.chromium.org/getting-involved/download-chromium\n\n\
Every episode page is rendered in its own headless browser to capture the subtitle access token. \
Subtitles are then downloaded one by one, decrypted and saved as srt files.")]
pub struct Save {
    /// First show id to process.
    #[arg(required = true)]
    pub start_id: u64,

    /// Last show id to process (inclusive).
    /// By default only start id is processed.
    #[arg(short = 'E', long)]
    pub end_id: Option<u64>,

    /// Directory where subtitles are saved.
    #[arg(short, long, default_value = "dramas")]
    pub directory: PathBuf,

    /// Print captured subtitle descriptors in json format instead of downloading them.
    #[arg(long)]
    pub parse: bool,

    /// Episode numbers to process separated by commas or spaces (eg. "1,2 5").
    /// By default all episodes are processed.
    #[arg(short, long, value_parser = utils::parse_episodes)]
    pub ep: Option<BTreeSet<u32>>,

    /// Language codes of subtitles to keep separated by commas or dots (eg. "en.hi").
    /// By default all subtitles are kept.
    #[arg(short, long)]
    pub langs: Option<String>,

    /// Launch browsers with a window.
    #[arg(long, help_heading = "Browser Options")]
    pub headful: bool,

    /// Maximum time in seconds to wait for a watch page to load.
    #[arg(long, help_heading = "Browser Options", default_value_t = 30)]
    pub navigation_timeout: u64,

    /// Maximum time in seconds to wait for the access token after the page has loaded.
    #[arg(long, help_heading = "Browser Options", default_value_t = 10)]
    pub timeout: u64,

    /// Maximum number of browsers running at the same time.
    #[arg(short, long, help_heading = "Browser Options", default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub threads: u8,

    /// Site root used for watch pages and api requests.
    #[arg(long, help_heading = "Client Options", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Set http(s) / socks proxy address for browsers and requests.
    #[arg(long, help_heading = "Client Options")]
    pub proxy: Option<String>,

    /// Update and set user agent header for requests.
    #[arg(long, help_heading = "Client Options", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Seconds to wait between two subtitle downloads of the same episode.
    #[arg(long, help_heading = "Download Options", default_value_t = 1.0)]
    pub asset_delay: f64,

    /// Seconds to wait between two episodes.
    #[arg(long, help_heading = "Download Options", default_value_t = 2.0)]
    pub episode_delay: f64,

    /// Maximum number of attempts to download an individual subtitle.
    #[arg(long, help_heading = "Download Options", default_value_t = 3)]
    pub retry_count: u8,
}

impl Save {
    fn config(&self) -> Result<Config> {
        let languages = self
            .langs
            .as_deref()
            .map(utils::split_list)
            .filter(|x| !x.is_empty())
            .map(|x| x.into_iter().collect::<HashSet<_>>());

        Ok(Config {
            base_url: self.base_url.clone(),
            capture_timeout: Duration::from_secs(self.timeout),
            directory: self.directory.clone(),
            episodes: self.ep.clone(),
            headless: !self.headful,
            languages,
            navigation_timeout: Duration::from_secs(self.navigation_timeout),
            pacing: Pacing {
                per_asset: Duration::try_from_secs_f64(self.asset_delay)?,
                per_episode: Duration::try_from_secs_f64(self.episode_delay)?,
            },
            proxy: self.proxy.clone(),
            retry: RetryPolicy {
                attempts: self.retry_count.max(1),
                ..Default::default()
            },
            user_agent: self.user_agent.clone(),
            workers: self.threads as usize,
        })
    }

    pub async fn execute(self) -> Result<()> {
        let end_id = self.end_id.unwrap_or(self.start_id);

        if end_id < self.start_id {
            bail!("end id must be greater than or equal to start id.");
        }

        let config = self.config()?;
        let client = config.client()?;
        let shows = catalog::fetch_shows(&client, &config.base_url, self.start_id..=end_id).await;

        if shows.is_empty() {
            bail!("no shows were found in {}..={}.", self.start_id, end_id);
        }

        let extractor = ChromeExtractor {
            base_url: config.base_url.clone(),
            capture_timeout: config.capture_timeout,
            headless: config.headless,
            navigation_timeout: config.navigation_timeout,
            proxy: config.proxy.clone(),
        };
        let fetcher = HttpDescriptorFetcher::new(client.clone(), config.base_url.clone());
        let run = Orchestrator::new(extractor, fetcher, config.workers)
            .run(&shows, config.episodes.as_ref())
            .await;
        let mut summary = run.summary;
        let descriptors = run.into_descriptors();

        if self.parse {
            serde_json::to_writer_pretty(std::io::stdout(), &descriptors)?;
            println!();
            return Ok(());
        }

        let downloader = Downloader {
            client,
            directory: config.directory,
            languages: config.languages,
            pacing: config.pacing,
            retry: config.retry,
        };
        downloader.download_all(&descriptors, &mut summary).await;

        info!("{} {}", "Completed".bold().green(), summary);
        Ok(())
    }
}
