use crate::utils;
use serde::{Deserialize, Serialize};
use url::Url;

/// One episode of a show, as listed by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Episode {
    pub show_id: u64,
    pub number: u32,
    pub id: u64,
}

impl Episode {
    pub fn new(show_id: u64, number: u32, id: u64) -> Self {
        Self {
            show_id,
            number,
            id,
        }
    }

    /// Page which has to be rendered for the access token to be requested.
    pub fn watch_url(&self, base_url: &Url, title: &str) -> Result<Url, url::ParseError> {
        let mut url = base_url.join(&format!(
            "Drama/{}/Episode-{}",
            utils::slug(title),
            self.number
        ))?;
        url.query_pairs_mut()
            .append_pair("id", &self.show_id.to_string())
            .append_pair("ep", &self.id.to_string());
        Ok(url)
    }

    /// Path of the subtitle descriptor endpoint for this episode.
    pub fn descriptor_path(&self) -> String {
        format!("/api/Sub/{}", self.id)
    }

    pub fn descriptor_url(&self, base_url: &Url, token: &Token) -> Result<Url, url::ParseError> {
        let mut url = base_url.join(self.descriptor_path().trim_start_matches('/'))?;
        url.query_pairs_mut().append_pair("kkey", token.as_str());
        Ok(url)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Show {
    pub id: u64,
    pub title: String,
    pub episodes: Vec<Episode>,
}

/// Access token captured for exactly one episode.
///
/// Not `Clone`, it is moved into the descriptor request which consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Downloadable subtitle asset listed by the descriptor endpoint.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct SubtitleEntry {
    pub src: String,
    pub label: String,
    #[serde(default, rename = "land")]
    pub language: Option<String>,
}

/// Descriptor of one episode, kept after its task has finished.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EpisodeSubtitles {
    pub title: String,
    pub number: u32,
    pub entries: Vec<SubtitleEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        let base = Url::parse("https://kisskh.ovh").unwrap();
        let url = Episode::new(8341, 3, 170551)
            .watch_url(&base, "Queen of Tears")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://kisskh.ovh/Drama/Queen-of-Tears/Episode-3?id=8341&ep=170551"
        );
    }

    #[test]
    fn test_descriptor_url() {
        let base = Url::parse("https://kisskh.ovh/").unwrap();
        let url = Episode::new(8341, 3, 170551)
            .descriptor_url(&base, &Token::new("A1B2C3"))
            .unwrap();

        assert_eq!(url.as_str(), "https://kisskh.ovh/api/Sub/170551?kkey=A1B2C3");
    }

    #[test]
    fn test_subtitle_entry_wire_names() {
        let entries = serde_json::from_str::<Vec<SubtitleEntry>>(
            r#"[{"src":"https://sub.example/a.txt1","label":"English","land":"en","default":true},
                {"src":"https://sub.example/b.srt","label":"Other"}]"#,
        )
        .unwrap();

        assert_eq!(entries[0].language.as_deref(), Some("en"));
        assert_eq!(entries[1].language, None);
    }
}
