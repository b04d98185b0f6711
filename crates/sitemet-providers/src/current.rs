//! Meteosource-shaped current-conditions client

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CurrentProvider, ProviderError, ProviderResult};

/// Render-ready current-conditions snapshot for the summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub summary: String,
    pub precipitation_total: f64,
    pub wind_speed: f64,
    pub wind_angle: f64,
    pub temperature: f64,
    pub cloud_cover: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: CurrentPayload,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    summary: Option<String>,
    temperature: Option<f64>,
    cloud_cover: Option<f64>,
    precipitation: PrecipitationPayload,
    wind: WindPayload,
}

#[derive(Debug, Deserialize)]
struct PrecipitationPayload {
    total: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WindPayload {
    speed: Option<f64>,
    angle: Option<f64>,
}

impl From<CurrentPayload> for CurrentConditions {
    fn from(payload: CurrentPayload) -> Self {
        Self {
            summary: payload.summary.unwrap_or_default(),
            precipitation_total: payload.precipitation.total.unwrap_or_default(),
            wind_speed: payload.wind.speed.unwrap_or_default(),
            wind_angle: payload.wind.angle.unwrap_or_default(),
            temperature: payload.temperature.unwrap_or_default(),
            cloud_cover: payload.cloud_cover.unwrap_or_default(),
        }
    }
}

/// HTTP client for the Meteosource point endpoint.
#[derive(Debug, Clone)]
pub struct MeteosourceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MeteosourceClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait::async_trait]
impl CurrentProvider for MeteosourceClient {
    async fn current(&self, place_id: &str) -> ProviderResult<CurrentConditions> {
        let url = format!("{}/point", self.base_url);
        debug!(%url, place_id, "fetching current conditions");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("sections", "current"),
                ("units", "metric"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
            });
        }

        let body: CurrentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;
        Ok(body.current.into())
    }
}
