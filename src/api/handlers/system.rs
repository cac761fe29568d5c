use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::api::{state::AppState, types::STATUS_TEXT};
use crate::domain::FeedKind;
use crate::services::HealthStatus;

/// GET / -- static status text
pub async fn status_text() -> &'static str {
    STATUS_TEXT
}

/// GET /healthz -- is the process alive?
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// GET /api/health -- per-feed health from poller activity
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.health.get_health(&state.feeds).await;
    let status_code = match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

/// GET /metrics -- Prometheus text exposition
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = String::from(
        "# HELP taixiu_uptime_seconds Uptime in seconds\n# TYPE taixiu_uptime_seconds counter\n",
    );
    body.push_str(&format!("taixiu_uptime_seconds {}\n", state.uptime_seconds()));
    body.push_str(
        "# HELP taixiu_fetches_ok_total Successful upstream fetches\n\
         # TYPE taixiu_fetches_ok_total counter\n\
         # HELP taixiu_fetches_failed_total Failed upstream fetches\n\
         # TYPE taixiu_fetches_failed_total counter\n\
         # HELP taixiu_rounds_accepted_total Rounds accepted into history\n\
         # TYPE taixiu_rounds_accepted_total counter\n\
         # HELP taixiu_candidates_rejected_total Duplicate or partial candidates\n\
         # TYPE taixiu_candidates_rejected_total counter\n",
    );

    for kind in FeedKind::ALL {
        let stats = state.feeds.get(kind).stats().snapshot().await;
        body.push_str(&stats.prometheus(kind));
    }

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}
