//! Per-query orchestration over the core pipeline
//!
//! One invocation is a pure function of an immutable [`Query`] plus the
//! provider responses: fetch, confirm, normalize, aggregate, bin,
//! summarize. Failures degrade locally to an empty ready view; nothing is
//! raised past this crate's boundary. Generation tokens guard the caller's
//! published state against stale results from superseded invocations.

pub mod generation;
pub mod pipeline;
pub mod query;

pub use generation::*;
pub use pipeline::*;
pub use query::*;

use chrono::NaiveDate;
use sitemet_providers::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("site {site} is missing coordinates or timezone")]
    MissingSiteCoordinates { site: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("no confirmed observations between {start} and {end}")]
    NoDataInRange { start: NaiveDate, end: NaiveDate },
}
