//! Confirmation-horizon filtering
//!
//! Providers publish provisional readings for the most recent hours and may
//! revise them later. Keeping only observations older than the horizon makes
//! aggregates reproducible between invocations.

use chrono::{DateTime, Duration, Utc};

use crate::types::RawObservation;

/// Default confirmation horizon.
pub const DEFAULT_CONFIRMATION_HORIZON_HOURS: i64 = 6;

/// Keep the subsequence of observations with `timestamp <= now - horizon`,
/// original order preserved. A zero or negative horizon keeps everything.
pub fn confirmed_only(
    observations: &[RawObservation],
    now: DateTime<Utc>,
    horizon: Duration,
) -> Vec<RawObservation> {
    if horizon <= Duration::zero() {
        return observations.to_vec();
    }

    let cutoff = now - horizon;
    observations
        .iter()
        .filter(|obs| obs.timestamp <= cutoff)
        .cloned()
        .collect()
}
