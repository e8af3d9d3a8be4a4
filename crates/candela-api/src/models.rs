// Wire models for the backend HTTP API.
//
// These mirror the JSON exactly as the backend emits it. Values stay
// loosely typed (strings, plain integers) here; `candela-core` converts
// them into validated domain types and rejects schema violations.

use serde::{Deserialize, Serialize};

/// One candlestick as reported by `GET /api/candlesticks[/{id}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandlestickState {
    pub id: String,
    pub connected: bool,
    #[serde(default)]
    pub program: Option<String>,
    /// True while the device is cycling programs on its own.
    #[serde(default)]
    pub random: Option<bool>,
    #[serde(default)]
    pub speed: Option<i64>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// ISO-8601; the backend may omit the UTC offset.
    pub last_seen: String,
}

/// Envelope of `GET /api/candlesticks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandlestickList {
    pub candlesticks: Vec<CandlestickState>,
}

/// Body of `POST /api/candlesticks/{id}/command` and legacy `POST /api`.
///
/// Absent fields are omitted from the JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Success payload of a command request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub message: String,
}

/// Body of legacy `POST /api/color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyColorBody {
    pub color: [u8; 3],
}

/// `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub connected_candlesticks: u32,
}

/// FastAPI-style error body: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: serde_json::Value,
}
