// Registry API HTTP client
//
// Wraps `reqwest::Client` with backend URL construction, status
// classification, and JSON decoding for the multi-device API under
// `/api/candlesticks`. Callers only ever see decoded payloads or a
// classified `Error`.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{
    CandlestickList, CandlestickState, CommandBody, CommandResponse, ErrorDetail, HealthResponse,
};
use crate::transport::{self, TransportConfig};

/// Maximum number of body bytes echoed into error messages.
const BODY_PREVIEW: usize = 200;

/// HTTP client for the candlestick backend's registry API.
#[derive(Debug, Clone)]
pub struct CandlestickClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl CandlestickClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:8000`);
    /// any path prefix it carries is kept.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: transport::DEFAULT_TIMEOUT,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /api/candlesticks`: every device the backend knows about,
    /// connected or recently seen.
    pub async fn list_candlesticks(&self) -> Result<Vec<CandlestickState>, Error> {
        let url = self.endpoint(&["api", "candlesticks"])?;
        let list: CandlestickList = self.get(url).await?;
        Ok(list.candlesticks)
    }

    /// `GET /api/candlesticks/{id}`. Unknown ids yield [`Error::NotFound`].
    pub async fn get_candlestick(&self, id: &str) -> Result<CandlestickState, Error> {
        let url = self.endpoint(&["api", "candlesticks", id])?;
        self.get(url).await
    }

    /// `POST /api/candlesticks/{id}/command`.
    ///
    /// The body is sent as-is. A 404 means the device is unknown or not
    /// connected and surfaces as [`Error::NotFound`].
    pub async fn send_command(&self, id: &str, body: &CommandBody) -> Result<CommandResponse, Error> {
        let url = self.endpoint(&["api", "candlesticks", id, "command"])?;
        self.post(url, body).await
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        let url = self.endpoint(&["api", "health"])?;
        self.get(url).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        transport::join_segments(&self.base_url, segments)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport::classify(e, self.timeout))?;

        self.parse_json(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport::classify(e, self.timeout))?;

        self.parse_json(resp).await
    }

    /// Classify the status, then decode the body as `T`.
    async fn parse_json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let resp = check_status(resp, self.timeout).await?;

        let body = resp
            .text()
            .await
            .map_err(|e| transport::classify(e, self.timeout))?;
        trace!(len = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

/// Map non-success statuses to errors, passing successful responses
/// through untouched. Shared with the legacy client.
pub(crate) async fn check_status(
    resp: reqwest::Response,
    timeout: Duration,
) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let path = resp.url().path().to_owned();
    let body = resp
        .text()
        .await
        .map_err(|e| transport::classify(e, timeout))?;

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(Error::NotFound {
            path,
            detail: detail_message(&body).unwrap_or_else(|| "not found".into()),
        });
    }

    let message = detail_message(&body).unwrap_or_else(|| {
        let text = preview(&body);
        if text.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned()
        } else {
            text.to_owned()
        }
    });

    Err(Error::Http {
        status: status.as_u16(),
        message,
    })
}

/// Pull a human-readable message out of a `{"detail": ...}` body.
fn detail_message(body: &str) -> Option<String> {
    let parsed: ErrorDetail = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(BODY_PREVIEW);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_message_reads_fastapi_errors() {
        assert_eq!(
            detail_message(r#"{"detail":"Candlestick 'a' is not connected"}"#).as_deref(),
            Some("Candlestick 'a' is not connected")
        );
        assert_eq!(detail_message("<html>oops</html>"), None);
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = preview(&body);
        assert!(cut.len() <= BODY_PREVIEW);
        assert!(body.starts_with(cut));
    }
}
