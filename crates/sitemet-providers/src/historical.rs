//! Meteostat-shaped historical hourly client and wire model

use chrono::NaiveDateTime;
use serde::Deserialize;
use sitemet_core::{units, RawObservation};
use tracing::debug;

use crate::{HistoricalProvider, HistoricalRequest, ProviderError, ProviderResult};

/// Wire envelope of the hourly endpoint.
#[derive(Debug, Deserialize)]
pub struct HourlyResponse {
    pub data: Vec<HourlyRecord>,
}

/// One raw hourly row as the provider ships it. Wind speed is km/h on the
/// wire; everything else is already metric.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyRecord {
    /// Naive local-ish timestamp string; treated as UTC for bucketing.
    pub time: String,
    pub temp: Option<f64>,
    pub rhum: Option<f64>,
    pub wspd: Option<f64>,
    pub wdir: Option<f64>,
    pub prcp: Option<f64>,
}

impl HourlyRecord {
    /// Map wire fields onto the canonical schema: parse the timestamp as
    /// UTC, default missing rainfall to zero, convert km/h to m/s with
    /// null passthrough.
    pub fn normalize(&self) -> ProviderResult<RawObservation> {
        let naive = NaiveDateTime::parse_from_str(&self.time, "%Y-%m-%d %H:%M:%S")
            .map_err(|e| {
                ProviderError::MalformedPayload(format!("bad time {:?}: {e}", self.time))
            })?;

        Ok(RawObservation {
            timestamp: naive.and_utc(),
            rainfall_mm: units::rainfall_or_zero(self.prcp),
            temperature_c: self.temp,
            humidity_pct: self.rhum,
            wind_speed_mps: units::kmh_to_mps(self.wspd),
            wind_direction_deg: self.wdir,
        })
    }
}

/// HTTP client for the Meteostat point/hourly endpoint (RapidAPI hosted).
#[derive(Debug, Clone)]
pub struct MeteostatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_host: String,
}

impl MeteostatClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, api_host: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            api_host: api_host.into(),
        }
    }
}

#[async_trait::async_trait]
impl HistoricalProvider for MeteostatClient {
    async fn hourly(&self, request: &HistoricalRequest) -> ProviderResult<Vec<HourlyRecord>> {
        let url = format!("{}/point/hourly", self.base_url);
        debug!(%url, lat = request.lat, lon = request.lon, "fetching historical hourly data");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", request.lat.to_string()),
                ("lon", request.lon.to_string()),
                ("start", request.start.format("%Y-%m-%d").to_string()),
                ("end", request.end.format("%Y-%m-%d").to_string()),
                ("tz", request.timezone.clone()),
                ("units", request.units.clone()),
            ])
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
            });
        }

        let body: HourlyResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;
        Ok(body.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn wire_row_deserializes_with_nulls() {
        let json = r#"{"time":"2024-03-01 10:00:00","temp":21.3,"rhum":null,"wspd":18.0,"wdir":90,"prcp":null}"#;
        let record: HourlyRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.temp, Some(21.3));
        assert_eq!(record.rhum, None);
        assert_eq!(record.prcp, None);
    }

    #[test]
    fn normalize_treats_time_as_utc_and_converts_wind() {
        let record = HourlyRecord {
            time: "2024-03-01 10:00:00".to_string(),
            temp: Some(21.3),
            rhum: Some(60.0),
            wspd: Some(18.0),
            wdir: Some(90.0),
            prcp: None,
        };

        let obs = record.normalize().unwrap();
        assert_eq!(
            obs.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(obs.wind_speed_mps, Some(5.0));
        assert_eq!(obs.rainfall_mm, 0.0);
    }

    #[test]
    fn normalize_keeps_null_wind_null() {
        let record = HourlyRecord {
            time: "2024-03-01 10:00:00".to_string(),
            temp: None,
            rhum: None,
            wspd: None,
            wdir: None,
            prcp: Some(2.0),
        };

        let obs = record.normalize().unwrap();
        assert_eq!(obs.wind_speed_mps, None);
        assert_eq!(obs.rainfall_mm, 2.0);
    }

    #[test]
    fn unparseable_time_is_a_malformed_payload() {
        let record = HourlyRecord {
            time: "not-a-time".to_string(),
            temp: None,
            rhum: None,
            wspd: None,
            wdir: None,
            prcp: None,
        };

        assert!(matches!(
            record.normalize(),
            Err(ProviderError::MalformedPayload(_))
        ));
    }
}
