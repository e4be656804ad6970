use axum::{Json, extract::State};
use std::sync::Arc;

use super::types::StatsDto;
use super::{ApiError, AppState};

/// GET /api/stats (public)
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsDto>, ApiError> {
    let stats = state.store().get_stats().await?;
    Ok(Json(StatsDto::from(stats)))
}
