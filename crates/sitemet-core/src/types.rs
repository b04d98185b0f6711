//! Canonical data types for the weather pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single meteorological reading after provider-field normalization.
///
/// Timestamps are UTC instants; all bucket-boundary math runs on them
/// directly. Site timezones apply to display formatting only (see
/// [`crate::export`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    pub timestamp: DateTime<Utc>,

    /// Missing precipitation is reported as 0.0 at ingestion, never null.
    pub rainfall_mm: f64,

    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,

    /// m/s after normalization (providers report km/h on the wire).
    pub wind_speed_mps: Option<f64>,

    pub wind_direction_deg: Option<f64>,
}

/// One chart-ready time bucket.
///
/// `None` in an average field means the bucket had zero non-null
/// contributors for it, which is distinct from a measured 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPoint {
    /// Display key: full timestamp, `YYYY-MM-DD`, or `YYYY-MM` depending on
    /// granularity. Never used for ordering.
    pub bucket_key: String,

    /// Parsed start of the bucket; the chronological sort key.
    pub bucket_start: DateTime<Utc>,

    pub rainfall_sum: f64,
    pub temperature_avg: Option<f64>,
    pub humidity_avg: Option<f64>,
    pub wind_speed_avg: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn observation_serde_round_trip() {
        let obs = RawObservation {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            rainfall_mm: 1.2,
            temperature_c: Some(18.5),
            humidity_pct: None,
            wind_speed_mps: Some(5.0),
            wind_direction_deg: Some(90.0),
        };

        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("\"rainfallMm\":1.2"));
        assert!(json.contains("\"humidityPct\":null"));

        let back: RawObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }
}
