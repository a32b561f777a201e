use crate::{
    episode::{Episode, Show},
    progress,
};
use anyhow::{Result, bail};
use kdam::BarExt;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::ops::RangeInclusive;
use url::Url;

#[derive(Deserialize)]
struct DramaResponse {
    id: u64,
    title: String,
    #[serde(default)]
    episodes: Vec<EpisodeResponse>,
}

#[derive(Deserialize)]
struct EpisodeResponse {
    id: u64,
    // listed as 1.0, 2.0, ...
    number: f64,
}

impl DramaResponse {
    fn into_show(self) -> Show {
        let show_id = self.id;

        Show {
            id: self.id,
            title: self.title.trim().to_owned(),
            episodes: self
                .episodes
                .into_iter()
                .map(|x| Episode::new(show_id, x.number as u32, x.id))
                .collect(),
        }
    }
}

/// Look up a show and its episode list.
pub async fn fetch_show(client: &Client, base_url: &Url, show_id: u64) -> Result<Show> {
    let url = base_url.join(&format!("api/DramaList/Drama/{}", show_id))?;
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        bail!("show {} lookup failed (HTTP {})", show_id, status);
    }

    let text = response.text().await?;
    Ok(serde_json::from_str::<DramaResponse>(&text)?.into_show())
}

/// Look up every show in `ids`, skipping the ones which fail.
pub async fn fetch_shows(client: &Client, base_url: &Url, ids: RangeInclusive<u64>) -> Vec<Show> {
    let mut shows = vec![];
    let mut pb = progress::bar("Shows", ids.clone().count(), " show");

    for id in ids {
        match fetch_show(client, base_url, id).await {
            Ok(show) => {
                debug!("Found {} ({} episodes)", show.title, show.episodes.len());
                shows.push(show);
            }
            Err(e) => warn!("Skipping show {}: {}", id, e),
        }

        let _ = pb.update(1);
    }

    shows
}
