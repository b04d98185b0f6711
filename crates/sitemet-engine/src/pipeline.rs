//! The per-query pipeline: fetch, confirm, normalize, aggregate, bin,
//! summarize. Runs in full on every query; nothing is cached between
//! invocations.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use sitemet_core::{
    aggregate, confirmed_only, wind_rose, AggregatedPoint, Granularity, RawObservation,
    SummaryStats, WindRose,
};
use sitemet_providers::{CurrentConditions, CurrentProvider, HistoricalProvider, HistoricalRequest};
use tracing::{debug, warn};

use crate::{EngineError, Query};

/// Lifecycle of one query's result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Loading,
    Ready,
    Error,
}

/// Render-ready historical result for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalView {
    pub status: QueryStatus,
    pub granularity: Granularity,
    pub points: Vec<AggregatedPoint>,
    pub wind_rose: WindRose,
    /// Confirmed observations, newest first: the raw table and CSV source.
    pub raw: Vec<RawObservation>,
    pub rainfall: SummaryStats,
    pub temperature: SummaryStats,
}

impl HistoricalView {
    /// The degraded shape: a well-formed empty result set.
    pub fn empty(status: QueryStatus, granularity: Granularity) -> Self {
        Self {
            status,
            granularity,
            points: Vec::new(),
            wind_rose: wind_rose(&[]),
            raw: Vec::new(),
            rainfall: SummaryStats::of(&[]),
            temperature: SummaryStats::of(&[]),
        }
    }
}

/// Historical view plus the independent current-conditions snapshot,
/// stamped with the invocation's generation token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub generation: u64,
    pub historical: HistoricalView,
    pub current: Option<CurrentConditions>,
}

/// Run the historical pipeline for one query. Errors never escape: they
/// are logged here and degrade to an empty view, `Ready` when the range
/// simply held no confirmed data, `Error` otherwise.
pub async fn run_historical(
    provider: &dyn HistoricalProvider,
    query: &Query,
    horizon: Duration,
) -> HistoricalView {
    let granularity = Granularity::for_span(query.start, query.end);

    match run_historical_inner(provider, query, horizon, granularity).await {
        Ok(view) => view,
        Err(EngineError::NoDataInRange { start, end }) => {
            debug!(site = %query.site.id, %start, %end, "no confirmed observations in range");
            HistoricalView::empty(QueryStatus::Ready, granularity)
        }
        Err(err) => {
            warn!(site = %query.site.id, error = %err, "historical pipeline degraded to empty");
            HistoricalView::empty(QueryStatus::Error, granularity)
        }
    }
}

async fn run_historical_inner(
    provider: &dyn HistoricalProvider,
    query: &Query,
    horizon: Duration,
    granularity: Granularity,
) -> Result<HistoricalView, EngineError> {
    let (lat, lon, tz) = query.site.coordinates()?;

    let request = HistoricalRequest {
        lat,
        lon,
        start: query.start,
        end: query.end,
        timezone: tz.name().to_string(),
        units: "metric".to_string(),
    };

    let records = provider.hourly(&request).await?;
    let mut observations = Vec::with_capacity(records.len());
    for record in &records {
        observations.push(record.normalize()?);
    }

    let confirmed = confirmed_only(&observations, query.now, horizon);
    if confirmed.is_empty() {
        return Err(EngineError::NoDataInRange {
            start: query.start,
            end: query.end,
        });
    }

    Ok(build_view(&confirmed, granularity))
}

/// Pure tail of the pipeline over an already-confirmed batch.
pub fn build_view(confirmed: &[RawObservation], granularity: Granularity) -> HistoricalView {
    let points = aggregate(confirmed, granularity);
    let rose = wind_rose(confirmed);

    // Summary cards read the aggregated series, not the raw one: rainfall
    // over every bucket, temperature over buckets that had data.
    let rainfall_series: Vec<f64> = points.iter().map(|p| p.rainfall_sum).collect();
    let temperature_series: Vec<f64> =
        points.iter().filter_map(|p| p.temperature_avg).collect();

    let mut raw = confirmed.to_vec();
    raw.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    HistoricalView {
        status: QueryStatus::Ready,
        granularity,
        points,
        wind_rose: rose,
        raw,
        rainfall: SummaryStats::of(&rainfall_series),
        temperature: SummaryStats::of(&temperature_series),
    }
}

/// Fetch the current-conditions snapshot; independent of the historical
/// pipeline, so its failure degrades to `None` without touching the rest.
pub async fn run_current(
    provider: &dyn CurrentProvider,
    query: &Query,
) -> Option<CurrentConditions> {
    let place_id = match query.site.place_id.as_deref() {
        Some(id) => id,
        None => {
            debug!(site = %query.site.id, "site has no place id; skipping current conditions");
            return None;
        }
    };

    match provider.current(place_id).await {
        Ok(conditions) => Some(conditions),
        Err(err) => {
            warn!(site = %query.site.id, error = %err, "current conditions unavailable");
            None
        }
    }
}

/// One full invocation: both upstream fetches run concurrently and degrade
/// independently. The caller pairs `token` with a
/// [`crate::GenerationCounter`] to discard stale snapshots.
pub async fn run_query(
    historical: &dyn HistoricalProvider,
    current: &dyn CurrentProvider,
    query: &Query,
    horizon: Duration,
    token: u64,
) -> Snapshot {
    let (historical_view, current_conditions) = tokio::join!(
        run_historical(historical, query, horizon),
        run_current(current, query),
    );

    Snapshot {
        generation: token,
        historical: historical_view,
        current: current_conditions,
    }
}
