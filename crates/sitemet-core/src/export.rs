//! CSV export of the confirmed observation table
//!
//! The one place where a site timezone touches timestamps: display
//! formatting. Bucket math upstream stays in UTC.

use chrono_tz::Tz;

use crate::types::RawObservation;

const HEADERS: [&str; 6] = [
    "Date Time",
    "Rainfall (mm)",
    "Temperature (°C)",
    "Humidity (%)",
    "Wind Speed (m/s)",
    "Wind Direction (°)",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

fn cell_2dp(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

fn cell_0dp(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.0}"))
}

/// Render the confirmed table as CSV, one row per observation, newest
/// first (matching the on-screen raw table). Null numerics become the
/// literal `N/A`.
pub fn confirmed_table_csv(
    observations: &[RawObservation],
    timezone: Tz,
) -> Result<String, ExportError> {
    let mut rows: Vec<&RawObservation> = observations.iter().collect();
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for obs in rows {
        let local = obs.timestamp.with_timezone(&timezone);
        writer.write_record(&[
            local.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.2}", obs.rainfall_mm),
            cell_2dp(obs.temperature_c),
            cell_2dp(obs.humidity_pct),
            cell_2dp(obs.wind_speed_mps),
            cell_0dp(obs.wind_direction_deg),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn nulls_render_as_na_and_rows_run_newest_first() {
        let older = RawObservation {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            rainfall_mm: 2.0,
            temperature_c: Some(18.456),
            humidity_pct: None,
            wind_speed_mps: Some(5.0),
            wind_direction_deg: Some(89.6),
        };
        let newer = RawObservation {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap(),
            rainfall_mm: 0.0,
            temperature_c: None,
            humidity_pct: None,
            wind_speed_mps: None,
            wind_direction_deg: None,
        };

        let csv = confirmed_table_csv(&[older, newer], chrono_tz::UTC).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Date Time,Rainfall (mm),Temperature (°C),Humidity (%),Wind Speed (m/s),Wind Direction (°)"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-03-01 11:00:00,0.00,N/A,N/A,N/A,N/A"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-03-01 10:00:00,2.00,18.46,N/A,5.00,90"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn date_time_column_uses_the_site_timezone() {
        let obs = RawObservation {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            rainfall_mm: 0.0,
            temperature_c: None,
            humidity_pct: None,
            wind_speed_mps: None,
            wind_direction_deg: None,
        };

        // Brisbane is UTC+10 with no DST.
        let csv = confirmed_table_csv(&[obs], chrono_tz::Australia::Brisbane).unwrap();
        assert!(csv.contains("2024-03-01 10:00:00"));
    }

    #[test]
    fn empty_table_is_just_the_header() {
        let csv = confirmed_table_csv(&[], chrono_tz::UTC).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
