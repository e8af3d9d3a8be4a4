// Legacy single-device API client
//
// The predecessor backend ran on the controller itself and exposed one
// implicit device: partial commands go to `POST /api`, colors go to
// `POST /api/color` as an RGB triplet. Both answer 204 with no body.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::client::check_status;
use crate::error::Error;
use crate::models::{CommandBody, LegacyColorBody};
use crate::transport::{self, TransportConfig};

/// HTTP client for the legacy single-device API.
#[derive(Debug, Clone)]
pub struct LegacyClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl LegacyClient {
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: transport::DEFAULT_TIMEOUT,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /api` with a partial command body.
    pub async fn send(&self, body: &CommandBody) -> Result<(), Error> {
        let url = transport::join_segments(&self.base_url, &["api"])?;
        self.post(url, body).await
    }

    /// `POST /api/color` with `{ "color": [r, g, b] }`.
    pub async fn send_color(&self, rgb: [u8; 3]) -> Result<(), Error> {
        let url = transport::join_segments(&self.base_url, &["api", "color"])?;
        self.post(url, &LegacyColorBody { color: rgb }).await
    }

    async fn post(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<(), Error> {
        debug!("POST {} (legacy)", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport::classify(e, self.timeout))?;

        check_status(resp, self.timeout).await.map(drop)
    }
}
