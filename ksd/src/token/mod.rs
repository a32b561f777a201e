//! Access token capture.
//!
//! The token is never part of the watch page itself. It only shows up in the
//! query string of the descriptor request which the page's scripts send once
//! it has been rendered, so extractors observe network responses and pick the
//! token out of the first matching url.

#[cfg(feature = "browser")]
mod chrome;

#[cfg(feature = "browser")]
pub use chrome::ChromeExtractor;

use crate::episode::{Episode, Token};
use std::{
    sync::{
        Mutex, PoisonError,
        mpsc::{self, Receiver, RecvTimeoutError, SyncSender},
    },
    time::Duration,
};
use thiserror::Error;
use url::Url;

/// Reasons no token was captured. Callers treat every variant as "no token".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("no token observed within {0:?}")]
    Timeout(Duration),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("browser error: {0}")]
    Browser(String),
}

/// Blocking token capture for a single episode.
///
/// Implementations must release every resource they acquire before
/// returning, whatever the outcome.
pub trait TokenExtractor: Send + Sync + 'static {
    fn extract(&self, episode: &Episode, title: &str) -> Result<Token, TokenError>;
}

/// A page being rendered whose network responses can be observed.
pub trait PageSession {
    /// Forward the token of `episode_id` to `slot` once a matching response is seen.
    fn observe(&self, episode_id: u64, slot: TokenSlot) -> Result<(), TokenError>;

    /// Load `url` and block until the page has settled.
    fn navigate(&self, url: &Url) -> Result<(), TokenError>;
}

/// Render `url` in `session` and wait at most `timeout` after the page has
/// settled for the token of `episode_id`.
///
/// A token seen before a navigation error is still returned.
pub fn capture<S: PageSession>(
    session: &S,
    episode_id: u64,
    url: &Url,
    timeout: Duration,
) -> Result<Token, TokenError> {
    let (slot, wait) = token_cell();
    session.observe(episode_id, slot)?;

    if let Err(e) = session.navigate(url) {
        return wait.try_take().ok_or(e);
    }

    wait.wait(timeout).ok_or(TokenError::Timeout(timeout))
}

/// Extract the token from a descriptor request url of `episode_id`.
pub fn token_from_url(url: &str, episode_id: u64) -> Option<Token> {
    let url = Url::parse(url).ok()?;

    if !url.path().ends_with(&format!("/api/Sub/{}", episode_id)) {
        return None;
    }

    url.query_pairs()
        .find(|(key, _)| key == "kkey")
        .map(|(_, value)| value.into_owned())
        .filter(|x| !x.is_empty())
        .map(Token::new)
}

/// Create a single assignment cell. The slot half goes to the observer, the
/// wait half stays with the task that owns the episode.
pub fn token_cell() -> (TokenSlot, TokenWait) {
    let (tx, rx) = mpsc::sync_channel(1);
    (
        TokenSlot {
            sender: Mutex::new(Some(tx)),
        },
        TokenWait { receiver: rx },
    )
}

pub struct TokenSlot {
    sender: Mutex<Option<SyncSender<Token>>>,
}

impl TokenSlot {
    /// Store the token. Only the first call has any effect.
    pub fn fulfill(&self, token: Token) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match sender {
            Some(sender) => sender.send(token).is_ok(),
            None => false,
        }
    }
}

pub struct TokenWait {
    receiver: Receiver<Token>,
}

impl TokenWait {
    /// Block until the slot is fulfilled, dropped or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Option<Token> {
        match self.receiver.recv_timeout(timeout) {
            Ok(token) => Some(token),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn try_take(&self) -> Option<Token> {
        self.receiver.try_recv().ok()
    }
}
