//! HTTP surface over the weather engine
//!
//! Thin glue: handlers validate the site, build an immutable query, run
//! the pipeline, and publish the snapshot under a generation token so a
//! slow response can never clobber a newer one.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use axum::{
    extract::{Query as UrlQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::Deserialize;

use sitemet_config::{AppConfig, SiteConfig};
use sitemet_core::export::confirmed_table_csv;
use sitemet_engine::{
    run_historical, run_query, GenerationCounter, Published, Query, Site, Snapshot,
};
use sitemet_providers::{CurrentProvider, HistoricalProvider};

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    queries_total: Counter<u64>,
    config: AppConfig,
    historical: Arc<dyn HistoricalProvider>,
    current: Arc<dyn CurrentProvider>,
    generations: GenerationCounter,
    latest: Published<Snapshot>,
}

impl AppState {
    /// Most recently published snapshot, if any query has completed.
    pub fn latest_snapshot(&self) -> Option<Snapshot> {
        self.latest.get()
    }
}

pub fn build_app(
    config: AppConfig,
    historical: Arc<dyn HistoricalProvider>,
    current: Arc<dyn CurrentProvider>,
) -> (Router, Arc<AppState>) {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter()
        .with_registry(registry.clone())
        .build()
        .expect("prom exporter");
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("sitemet-api");

    let requests_total = meter
        .u64_counter("sitemet_requests_total")
        .with_description("Total HTTP requests served")
        .init();
    let queries_total = meter
        .u64_counter("sitemet_queries_total")
        .with_description("Total pipeline invocations")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        queries_total,
        config,
        historical,
        current,
        generations: GenerationCounter::new(),
        latest: Published::new(),
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/sites", get(sites))
        .route("/api/v1/current", get(current_conditions))
        .route("/api/v1/historical", get(historical_view))
        .route("/api/v1/historical.csv", get(historical_csv))
        .with_state(Arc::clone(&state));

    (router, state)
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

fn site_from_config(cfg: &SiteConfig) -> Site {
    Site {
        id: cfg.id.clone(),
        name: cfg.name.clone(),
        latitude: cfg.latitude,
        longitude: cfg.longitude,
        timezone: cfg
            .timezone
            .as_deref()
            .and_then(|name| name.parse().ok()),
        place_id: cfg.place_id.clone(),
    }
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.requests_total.add(1, &[]);
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

async fn sites(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.requests_total.add(1, &[]);
    Json(state.config.sites.clone())
}

#[derive(Debug, Deserialize)]
struct SiteParams {
    site: String,
}

async fn current_conditions(
    State(state): State<Arc<AppState>>,
    UrlQuery(params): UrlQuery<SiteParams>,
) -> Response {
    state.requests_total.add(1, &[]);

    let Some(cfg) = state.config.site(&params.site) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let site = site_from_config(cfg);

    let Some(place_id) = site.place_id.as_deref() else {
        return StatusCode::NO_CONTENT.into_response();
    };

    match state.current.current(place_id).await {
        Ok(conditions) => (StatusCode::OK, Json(conditions)).into_response(),
        Err(err) => {
            tracing::warn!(site = %site.id, error = %err, "current conditions unavailable");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoricalParams {
    site: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl HistoricalParams {
    fn to_query(&self, cfg: &SiteConfig) -> Query {
        Query {
            site: site_from_config(cfg),
            start: self.start,
            end: self.end,
            now: Utc::now(),
        }
    }
}

async fn historical_view(
    State(state): State<Arc<AppState>>,
    UrlQuery(params): UrlQuery<HistoricalParams>,
) -> Response {
    state.requests_total.add(1, &[]);

    let Some(cfg) = state.config.site(&params.site) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let query = params.to_query(cfg);
    let horizon = state.config.confirmation_horizon();

    let token = state.generations.issue();
    state.queries_total.add(1, &[]);

    let snapshot = run_query(
        state.historical.as_ref(),
        state.current.as_ref(),
        &query,
        horizon,
        token,
    )
    .await;

    // A request superseded mid-flight still gets its own response; only
    // the shared latest-snapshot cell refuses stale generations.
    state.latest.offer(&state.generations, token, snapshot.clone());

    (StatusCode::OK, Json(snapshot)).into_response()
}

async fn historical_csv(
    State(state): State<Arc<AppState>>,
    UrlQuery(params): UrlQuery<HistoricalParams>,
) -> Response {
    state.requests_total.add(1, &[]);

    let Some(cfg) = state.config.site(&params.site) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let query = params.to_query(cfg);
    let horizon = state.config.confirmation_horizon();

    state.queries_total.add(1, &[]);
    let view = run_historical(state.historical.as_ref(), &query, horizon).await;

    match confirmed_table_csv(&view.raw, query.site.display_timezone()) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(site = %query.site.id, error = %err, "CSV export failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
