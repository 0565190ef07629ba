use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/refresh", post(handlers::refresh))
        .route("/api/overview", get(handlers::get_overview))
        .route("/api/periods/:period", get(handlers::get_period))
        .route("/api/types/:user_type", get(handlers::get_type))
        .route("/api/countries", get(handlers::get_countries))
        .route("/api/bookings", get(handlers::get_bookings))
        .with_state(state)
}
