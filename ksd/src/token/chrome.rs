use super::{PageSession, TokenError, TokenExtractor, TokenSlot, capture, token_from_url};
use crate::episode::{Episode, Token};
use headless_chrome::{
    Browser, LaunchOptionsBuilder, Tab,
    protocol::cdp::Network::{GetResponseBodyReturnObject, events::ResponseReceivedEventParams},
};
use log::{debug, trace};
use std::{sync::Arc, time::Duration};
use url::Url;

const HANDLER_NAME: &str = "ksd-token";

/// Renders watch pages in headless chrome and observes the descriptor request.
///
/// Every call launches its own browser process with a fresh temporary
/// profile, so no cookies or cache are shared between episodes.
#[derive(Clone, Debug)]
pub struct ChromeExtractor {
    pub base_url: Url,
    pub capture_timeout: Duration,
    pub headless: bool,
    pub navigation_timeout: Duration,
    pub proxy: Option<String>,
}

impl ChromeExtractor {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            capture_timeout: Duration::from_secs(10),
            headless: true,
            navigation_timeout: Duration::from_secs(30),
            proxy: None,
        }
    }
}

impl TokenExtractor for ChromeExtractor {
    fn extract(&self, episode: &Episode, title: &str) -> Result<Token, TokenError> {
        let url = episode
            .watch_url(&self.base_url, title)
            .map_err(|x| TokenError::Navigation(x.to_string()))?;
        let session = RenderSession::open(self)?;
        debug!("Rendering {}", url);

        capture(&session, episode.id, &url, self.capture_timeout)
    }
}

/// A browser process with one tab. Closed when dropped.
struct RenderSession {
    tab: Arc<Tab>,
    _browser: Browser,
}

impl RenderSession {
    fn open(options: &ChromeExtractor) -> Result<Self, TokenError> {
        let launch_options = LaunchOptionsBuilder::default()
            .headless(options.headless)
            .proxy_server(options.proxy.as_deref())
            .idle_browser_timeout(
                options.navigation_timeout + options.capture_timeout + Duration::from_secs(30),
            )
            .build()
            .map_err(|x| TokenError::Browser(x.to_string()))?;
        let browser = Browser::new(launch_options).map_err(|x| TokenError::Browser(x.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|x| TokenError::Browser(x.to_string()))?;
        tab.set_default_timeout(options.navigation_timeout);

        Ok(Self {
            tab,
            _browser: browser,
        })
    }
}

impl PageSession for RenderSession {
    fn observe(&self, episode_id: u64, slot: TokenSlot) -> Result<(), TokenError> {
        self.tab
            .register_response_handling(
                HANDLER_NAME,
                Box::new(
                    move |params: ResponseReceivedEventParams,
                          _: &dyn Fn() -> anyhow::Result<GetResponseBodyReturnObject>| {
                        trace!("Response {}", params.response.url);

                        if let Some(token) = token_from_url(&params.response.url, episode_id) {
                            slot.fulfill(token);
                        }
                    },
                ),
            )
            .map_err(|x| TokenError::Browser(x.to_string()))?;
        Ok(())
    }

    fn navigate(&self, url: &Url) -> Result<(), TokenError> {
        self.tab
            .navigate_to(url.as_str())
            .and_then(|x| x.wait_until_navigated())
            .map_err(|x| TokenError::Navigation(x.to_string()))?;
        Ok(())
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        let _ = self.tab.deregister_response_handling(HANDLER_NAME);
        let _ = self.tab.close(false);
        // browser process is killed when `_browser` drops
    }
}
