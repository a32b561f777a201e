use anyhow::{Result, bail};
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// How often and how patiently a failing asset download is retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u8,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

pub async fn fetch_with_retry(client: &Client, url: &Url, retry: &RetryPolicy) -> Result<Vec<u8>> {
    let attempts = retry.attempts.max(1);

    for attempt in 1..=attempts {
        match client.get(url.clone()).send().await {
            Ok(response) if response.status().is_success() => match response.bytes().await {
                Ok(bytes) => return Ok(bytes.to_vec()),
                Err(e) => debug!("Attempt {}: {}", attempt, describe_error(url, &e)),
            },
            Ok(response) => debug!(
                "Attempt {}: {}",
                attempt,
                describe_status(url, response.status())
            ),
            Err(e) => debug!("Attempt {}: {}", attempt, describe_error(url, &e)),
        }

        if attempt < attempts {
            tokio::time::sleep(retry.delay).await;
        }
    }

    bail!("reached max retries to download {}", url);
}

fn describe_error(url: &Url, error: &reqwest::Error) -> String {
    if error.is_connect() {
        format!("{url} (connection error)")
    } else if error.is_timeout() {
        format!("{url} (timeout)")
    } else if let Some(status) = error.status() {
        describe_status(url, status)
    } else {
        format!("{url} ({error})")
    }
}

fn describe_status(url: &Url, status: StatusCode) -> String {
    match status {
        StatusCode::GATEWAY_TIMEOUT => format!("{url} (gateway timeout)"),
        StatusCode::REQUEST_TIMEOUT => format!("{url} (timeout)"),
        StatusCode::SERVICE_UNAVAILABLE => format!("{url} (service unavailable)"),
        StatusCode::TOO_MANY_REQUESTS => format!("{url} (too many requests)"),
        _ => format!("{url} (HTTP {status})"),
    }
}
