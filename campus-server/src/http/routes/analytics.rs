//! Usage analytics endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{AnalyticsRepo, ResourceUsage, DEFAULT_TOP_LIMIT};
use crate::http::error::ApiError;
use crate::http::server::AppState;

const MAX_TOP_LIMIT: u32 = 100;

/// Booking count for one resource
#[derive(Serialize, Deserialize)]
pub struct UsageResponse {
    pub resource_id: i64,
    pub name: String,
    pub total_bookings: i64,
}

impl From<ResourceUsage> for UsageResponse {
    fn from(u: ResourceUsage) -> Self {
        Self {
            resource_id: u.resource_id,
            name: u.name,
            total_bookings: u.total_bookings,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct TopParams {
    pub limit: Option<u32>,
}

impl TopParams {
    fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT)
    }
}

/// GET /api/analytics/usage
async fn usage(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UsageResponse>>, ApiError> {
    let rows = AnalyticsRepo::new(&state.pool).usage().await?;
    Ok(Json(rows.into_iter().map(UsageResponse::from).collect()))
}

/// GET /api/analytics/top-rooms?limit=
async fn top_rooms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopParams>,
) -> Result<Json<Vec<UsageResponse>>, ApiError> {
    let rows = AnalyticsRepo::new(&state.pool).top(params.limit()).await?;
    Ok(Json(rows.into_iter().map(UsageResponse::from).collect()))
}

/// Analytics routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/analytics/usage", get(usage))
        .route("/api/analytics/top-rooms", get(top_rooms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_limit_defaults_and_clamps() {
        assert_eq!(TopParams::default().limit(), DEFAULT_TOP_LIMIT);
        assert_eq!(TopParams { limit: Some(0) }.limit(), 1);
        assert_eq!(TopParams { limit: Some(5) }.limit(), 5);
        assert_eq!(TopParams { limit: Some(10_000) }.limit(), MAX_TOP_LIMIT);
    }
}
