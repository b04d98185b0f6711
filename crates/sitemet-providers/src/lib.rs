//! Weather provider adapters
//!
//! This crate owns the seams to the two upstream data sources: the
//! historical hourly endpoint and the current-conditions endpoint. The
//! engine consumes both through object-safe traits; the HTTP clients here
//! are one implementation, the replay provider another.

pub mod current;
pub mod historical;
pub mod replay;

pub use current::*;
pub use historical::*;
pub use replay::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("upstream returned HTTP {status}")]
    Http { status: u16 },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("transport error: {0}")]
    Transport(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Request parameters for the historical hourly endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRequest {
    pub lat: f64,
    pub lon: f64,
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
    /// IANA name, passed upstream for its own display purposes; bucket
    /// math never uses it.
    pub timezone: String,
    pub units: String,
}

/// Source of raw hourly observations for a coordinate and date range.
#[async_trait::async_trait]
pub trait HistoricalProvider: Send + Sync {
    async fn hourly(&self, request: &HistoricalRequest) -> ProviderResult<Vec<HourlyRecord>>;
}

/// Source of the current-conditions snapshot for a place id.
#[async_trait::async_trait]
pub trait CurrentProvider: Send + Sync {
    async fn current(&self, place_id: &str) -> ProviderResult<CurrentConditions>;
}
