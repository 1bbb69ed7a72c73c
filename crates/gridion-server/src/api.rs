// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! The JSON API the dashboard frontend polls.

use askama::Template;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use gridion_core::AggregationSchema;
use gridion_core::geo::map_features;
use gridion_core::metrics::BoundaryAssessment;
use gridion_core::neso::resources;
use gridion_core::series::{CountryDetail, boundary_assessments, build_series, country_detail};
use gridion_core::store::RecordStore;
use gridion_core::{datasets, schemas};
use gridion_types::{DataError, SeriesResponse, SettlementRecord, WindowSpec};

use crate::state::AppState;
use crate::story::{PlayerPosition, STORY_STEPS};

#[derive(Debug)]
pub struct ApiError(DataError);

impl From<DataError> for ApiError {
    fn from(e: DataError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            DataError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            DataError::Fetch(_) | DataError::Parse(_) => StatusCode::BAD_GATEWAY,
            DataError::InvalidPeriod(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        warn!("api request failed: {}", self.0);
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    #[serde(default)]
    window: Option<String>,
}

impl WindowQuery {
    /// `?window=day|yesterday|week|all`, defaulting to the rolling day.
    fn spec(&self) -> WindowSpec {
        match self.window.as_deref() {
            Some("yesterday") => WindowSpec::PreviousDay,
            Some("week") => WindowSpec::WEEK,
            Some("all") => WindowSpec::All,
            Some(_) | None => WindowSpec::DAY,
        }
    }
}

fn series(
    state: &AppState,
    query: &WindowQuery,
    schema: &AggregationSchema,
) -> Json<SeriesResponse> {
    let snapshot = state.hub.snapshot();
    Json(build_series(
        snapshot.records(),
        schema,
        query.spec(),
        Utc::now(),
    ))
}

pub async fn demand(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Json<SeriesResponse> {
    series(&state, &query, &schemas::demand())
}

pub async fn extra_load(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Json<SeriesResponse> {
    series(&state, &query, &schemas::extra_load())
}

pub async fn country_flows(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Json<SeriesResponse> {
    series(&state, &query, &schemas::country_flows())
}

pub async fn cable_flows(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Json<SeriesResponse> {
    series(&state, &query, &schemas::cable_flows())
}

pub async fn embedded_generation(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Json<SeriesResponse> {
    series(&state, &query, &schemas::embedded_generation())
}

pub async fn grid_balance(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Json<SeriesResponse> {
    series(&state, &query, &schemas::grid_balance())
}

pub async fn constraints(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Json<Vec<BoundaryAssessment>> {
    let snapshot = state.hub.snapshot();
    Json(boundary_assessments(
        snapshot.records(),
        query.spec(),
        Utc::now(),
        &state.config.risk.thresholds,
        &state.config.risk.trend,
    ))
}

pub async fn country_flow_detail(State(state): State<AppState>) -> Json<Vec<CountryDetail>> {
    let snapshot = state.hub.snapshot();
    Json(country_detail(snapshot.records(), Utc::now()))
}

pub async fn map_feature_collection(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.hub.snapshot();
    Json(map_features(snapshot.records(), Utc::now()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub version: &'static str,
    pub records: usize,
    pub rejected_rows: usize,
    pub fetched_at: Option<chrono::DateTime<Utc>>,
    pub first_interval: Option<String>,
    pub last_interval: Option<String>,
    pub last_error: Option<String>,
}

fn interval_label(key: (chrono::NaiveDate, u32)) -> String {
    format!("{} p{}", key.0, key.1)
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot: std::sync::Arc<RecordStore> = state.hub.snapshot();
    let keys = snapshot.records().iter().map(SettlementRecord::interval_key);
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        records: snapshot.records().len(),
        rejected_rows: snapshot.rejected_rows(),
        fetched_at: snapshot.fetched_at(),
        first_interval: keys.clone().min().map(interval_label),
        last_interval: keys.max().map(interval_label),
        last_error: state.hub.last_error(),
    })
}

pub async fn negative_prices(
    State(state): State<AppState>,
) -> Result<Json<datasets::NegativePriceSummary>, ApiError> {
    let csv_text = state
        .client
        .fetch_text(&state.config.datasets.negative_prices_url)
        .await?;
    let summary =
        datasets::negative_price_summary(&csv_text, state.config.datasets.negative_price_year)?;
    Ok(Json(summary))
}

pub async fn wind_comparison(
    State(state): State<AppState>,
) -> Result<Json<datasets::WindCapacityComparison>, ApiError> {
    let geojson = state
        .client
        .fetch_text(&state.config.datasets.repd_geojson_url)
        .await?;
    Ok(Json(datasets::wind_capacity_comparison(&geojson)?))
}

pub async fn constraint_spend(
    State(state): State<AppState>,
) -> Result<Json<datasets::SpendSummary>, ApiError> {
    let rows = state
        .client
        .datastore_search(
            resources::CONSTRAINT_SPEND,
            state.config.datasets.spend_row_limit,
        )
        .await?;
    Ok(Json(datasets::constraint_spend_summary(&rows, Utc::now())))
}

pub async fn story_steps() -> Json<&'static [crate::story::StoryStep]> {
    Json(&STORY_STEPS)
}

pub async fn story_position(State(state): State<AppState>) -> Json<PlayerPosition> {
    let now = Utc::now();
    let mut player = state.player.write();
    player.settle(now);
    Json(player.position(now))
}

pub async fn story_start(State(state): State<AppState>) -> Json<PlayerPosition> {
    let now = Utc::now();
    let mut player = state.player.write();
    player.settle(now);
    player.start(now);
    Json(player.position(now))
}

pub async fn story_stop(State(state): State<AppState>) -> Json<PlayerPosition> {
    let now = Utc::now();
    let mut player = state.player.write();
    player.stop(now);
    Json(player.position(now))
}

#[derive(Debug, Deserialize)]
pub struct SeekQuery {
    step: usize,
}

pub async fn story_seek(
    State(state): State<AppState>,
    Query(query): Query<SeekQuery>,
) -> Json<PlayerPosition> {
    let now = Utc::now();
    let mut player = state.player.write();
    player.seek(query.step);
    Json(player.position(now))
}

#[derive(Debug, Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub version: &'static str,
}

pub async fn dashboard_page() -> impl IntoResponse {
    render(DashboardTemplate {
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Template)]
#[template(path = "story.html")]
pub struct StoryTemplate {
    pub map_token: String,
    pub step_count: usize,
}

pub async fn story_page(State(state): State<AppState>) -> impl IntoResponse {
    render(StoryTemplate {
        map_token: state.config.map.access_token.clone(),
        step_count: STORY_STEPS.len(),
    })
}

fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => axum::response::Html(html).into_response(),
        Err(e) => {
            warn!("template render failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
