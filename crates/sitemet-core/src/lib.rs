//! Core data pipeline for historical weather aggregation
//!
//! Pure, synchronous transforms over immutable observation batches:
//! confirmation filtering, unit normalization helpers, granularity-adaptive
//! bucket aggregation, wind-rose binning, summary statistics, and the CSV
//! export of the confirmed table. No I/O happens in this crate.

pub mod aggregate;
pub mod confirm;
pub mod export;
pub mod summary;
pub mod types;
pub mod units;
pub mod windrose;

pub use aggregate::*;
pub use confirm::*;
pub use export::*;
pub use summary::*;
pub use types::*;
pub use units::*;
pub use windrose::*;
