mod fetch;
mod writer;

pub use fetch::{RetryPolicy, fetch_with_retry};
pub use writer::{WrittenSubtitle, episode_dir, extension, write_subtitle};

use crate::{
    episode::{EpisodeSubtitles, SubtitleEntry},
    progress,
    summary::RunSummary,
};
use anyhow::Result;
use kdam::BarExt;
use log::{debug, info, warn};
use reqwest::Client;
use std::{collections::HashSet, path::PathBuf, time::Duration};
use tokio::fs;
use url::Url;

/// Delays between consecutive requests to the subtitle host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Between two subtitles of the same episode.
    pub per_asset: Duration,
    /// Between two episodes.
    pub per_episode: Duration,
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            per_asset: Duration::ZERO,
            per_episode: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            per_asset: Duration::from_secs(1),
            per_episode: Duration::from_secs(2),
        }
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Downloads, decrypts and stores the subtitles listed in descriptors.
pub struct Downloader {
    pub client: Client,
    pub directory: PathBuf,
    /// Accepted language codes, `None` accepts all.
    pub languages: Option<HashSet<String>>,
    pub pacing: Pacing,
    pub retry: RetryPolicy,
}

impl Downloader {
    pub fn new(client: Client, directory: PathBuf) -> Self {
        Self {
            client,
            directory,
            languages: None,
            pacing: Pacing::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn accepts(&self, entry: &SubtitleEntry) -> bool {
        match &self.languages {
            Some(languages) => entry
                .language
                .as_ref()
                .is_some_and(|x| languages.contains(x)),
            None => true,
        }
    }

    /// Process every episode sequentially. Failures are counted in `summary`
    /// and never stop the remaining downloads.
    pub async fn download_all(&self, descriptors: &[EpisodeSubtitles], summary: &mut RunSummary) {
        let mut pb = progress::bar("Downloading", descriptors.len(), " ep");

        for (i, subtitles) in descriptors.iter().enumerate() {
            if i > 0 {
                pause(self.pacing.per_episode).await;
            }

            if let Err(e) = self.download_episode(subtitles, summary).await {
                warn!(
                    "Failed to process {} episode {}: {}",
                    subtitles.title, subtitles.number, e
                );
                summary.write_errors += 1;
            }

            let _ = pb.update(1);
        }
    }

    pub async fn download_episode(
        &self,
        subtitles: &EpisodeSubtitles,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let entries = subtitles
            .entries
            .iter()
            .filter(|x| self.accepts(x))
            .collect::<Vec<_>>();

        if entries.is_empty() {
            info!(
                "No matching subtitles for {} episode {}",
                subtitles.title, subtitles.number
            );
            return Ok(());
        }

        let folder = episode_dir(&self.directory, &subtitles.title, subtitles.number);
        fs::create_dir_all(&folder).await?;

        for (i, entry) in entries.into_iter().enumerate() {
            if i > 0 {
                pause(self.pacing.per_asset).await;
            }

            let url = match Url::parse(&entry.src) {
                Ok(x) => x,
                Err(e) => {
                    warn!("Skipping {} ({}): {}", entry.label, entry.src, e);
                    summary.malformed_responses += 1;
                    continue;
                }
            };

            let data = match fetch_with_retry(&self.client, &url, &self.retry).await {
                Ok(x) => x,
                Err(e) => {
                    warn!("Failed to download {}: {}", entry.label, e);
                    summary.network_errors += 1;
                    continue;
                }
            };

            match write_subtitle(&folder, &entry.label, &extension(url.path()), &data).await {
                Ok(written) => {
                    debug!("Saved {}", written.path.to_string_lossy());
                    summary.assets_written += 1;
                    summary.unrecovered_lines += written.unrecovered;
                }
                Err(e) => {
                    warn!("Failed to save {}: {}", entry.label, e);
                    summary.write_errors += 1;
                }
            }
        }

        Ok(())
    }
}
