//! Key-hosting endpoint client: implements `KeyFetcher` with `ureq`.
//!
//! `ureq` is blocking, so each fetch runs on `spawn_blocking`. Requests carry
//! explicit connect and read timeouts; a transport failure is retried once,
//! an HTTP status is never retried.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::application::ports::KeyFetcher;
use crate::domain::KeyFetchError;
use crate::domain::keys::keys_url;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

const ATTEMPTS: u32 = 2;

/// Fetches `<base_url>/<user>.keys` over HTTP(S).
pub struct HttpKeyFetcher {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpKeyFetcher {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .user_agent(concat!("firstboot/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            base_url: base_url.into(),
            agent,
        }
    }
}

impl KeyFetcher for HttpKeyFetcher {
    async fn fetch_keys(&self, user: &str) -> Result<String> {
        let url = keys_url(&self.base_url, user);
        let agent = self.agent.clone();
        let user = user.to_string();
        let keys = tokio::task::spawn_blocking(move || fetch_with_retry(&agent, &url, &user))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))??;
        Ok(keys)
    }
}

fn fetch_with_retry(agent: &ureq::Agent, url: &str, user: &str) -> Result<String, KeyFetchError> {
    let mut attempt = 1;
    loop {
        debug!(url, attempt, "fetching public keys");
        match fetch_once(agent, url, user) {
            Err(KeyFetchError::Network(reason)) if attempt < ATTEMPTS => {
                warn!(url, %reason, "key fetch failed, retrying once");
                attempt += 1;
            }
            result => return result,
        }
    }
}

fn fetch_once(agent: &ureq::Agent, url: &str, user: &str) -> Result<String, KeyFetchError> {
    match agent.get(url).call() {
        Ok(resp) => resp
            .into_string()
            .map_err(|e| KeyFetchError::Network(format!("reading response: {e}"))),
        Err(ureq::Error::Status(404, _)) => Err(KeyFetchError::NotFound(user.to_string())),
        Err(ureq::Error::Status(code, _)) => Err(KeyFetchError::Status(code)),
        Err(ureq::Error::Transport(t)) => Err(KeyFetchError::Network(t.to_string())),
    }
}
