use crate::errors::AppError;
use crate::models::{
    BookingInsightsView, CountryInsightsView, OverviewView, Payload, Period, PeriodBreakdownView,
    TypeMetricsView, UserType,
};
use crate::state::AppState;
use crate::storage::persist_snapshot;
use crate::transform;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub fetched_at: String,
    pub overview: OverviewView,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = current_payload(&state).await;
    let overview = transform::overview(&snapshot);
    Html(render_index(state.config.environment.label(), &overview))
}

/// Pulls a fresh snapshot from the metrics API, persists it, and swaps it in.
/// A failed persist keeps the fetched snapshot; the file is a convenience.
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    let payload = state.client.fetch_payload().await?;
    if let Err(err) = persist_snapshot(&state.config.snapshot_path, &payload).await {
        warn!("failed to persist snapshot: {err}");
    }

    let overview = transform::overview(&payload);
    *state.payload.lock().await = Some(payload);
    info!("metrics snapshot refreshed");

    Ok(Json(RefreshResponse {
        fetched_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        overview,
    }))
}

pub async fn get_overview(State(state): State<AppState>) -> Json<OverviewView> {
    Json(transform::overview(&current_payload(&state).await))
}

pub async fn get_period(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> Result<Json<PeriodBreakdownView>, AppError> {
    let period: Period = period
        .parse()
        .map_err(|()| AppError::bad_request("unknown period, expected 24h, 7d or 30d"))?;
    Ok(Json(transform::period_breakdown(
        &current_payload(&state).await,
        period,
    )))
}

pub async fn get_type(
    State(state): State<AppState>,
    Path(user_type): Path<String>,
) -> Result<Json<TypeMetricsView>, AppError> {
    let user_type: UserType = user_type
        .parse()
        .map_err(|()| AppError::bad_request("unknown user type, expected customer, artist or business"))?;
    Ok(Json(transform::type_metrics(
        &current_payload(&state).await,
        user_type,
    )))
}

pub async fn get_countries(State(state): State<AppState>) -> Json<CountryInsightsView> {
    Json(transform::country_insights(&current_payload(&state).await))
}

pub async fn get_bookings(State(state): State<AppState>) -> Json<BookingInsightsView> {
    Json(transform::booking_insights(&current_payload(&state).await))
}

/// The views are total over an empty payload, so "no snapshot yet" renders
/// as zeros instead of an error.
async fn current_payload(state: &AppState) -> Payload {
    state.payload.lock().await.clone().unwrap_or_default()
}
