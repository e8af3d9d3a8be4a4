// candela-api: Async Rust client for the candlestick backend (registry + legacy)

pub mod client;
pub mod error;
pub mod legacy;
pub mod models;
pub mod transport;

pub use client::CandlestickClient;
pub use error::Error;
pub use legacy::LegacyClient;
pub use models::{CandlestickList, CandlestickState, CommandBody, CommandResponse, HealthResponse};
pub use transport::{TlsMode, TransportConfig};
