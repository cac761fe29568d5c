use axum::{extract::State, Json};

use crate::api::{state::AppState, types::*};
use crate::domain::FeedKind;
use crate::prediction::predict;

async fn latest_for(state: &AppState, kind: FeedKind) -> LatestResponse {
    let snapshot = state.feeds.get(kind).snapshot().await;
    let prediction = predict(&snapshot.outcomes());
    LatestResponse::new(snapshot.latest.as_ref(), &prediction)
}

/// GET /api/taixiu -- latest standard-feed round and next-round prediction
pub async fn get_latest_standard(State(state): State<AppState>) -> Json<LatestResponse> {
    Json(latest_for(&state, FeedKind::Standard).await)
}

/// GET /api/taixiumd5 -- latest MD5-feed round and next-round prediction
pub async fn get_latest_md5(State(state): State<AppState>) -> Json<LatestResponse> {
    Json(latest_for(&state, FeedKind::Md5).await)
}

/// GET /api/history -- both histories, read under both feed locks
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let joint = state.feeds.joint_history().await;
    Json(HistoryResponse {
        taixiu: joint.standard,
        taixiumd5: joint.md5,
    })
}
