//! Per-user views

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::repos::{BookingRepo, UserBooking, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidId};
use crate::http::server::AppState;

/// One booking with the booked resource's name and type
#[derive(Serialize, Deserialize)]
pub struct UserBookingResponse {
    pub booking_id: i64,
    pub resource_id: i64,
    pub resource_name: String,
    pub resource_type: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}

impl From<UserBooking> for UserBookingResponse {
    fn from(b: UserBooking) -> Self {
        Self {
            booking_id: b.booking_id,
            resource_id: b.resource_id,
            resource_name: b.resource_name,
            resource_type: b.resource_type,
            date: b.date,
            start_time: b.start_time,
            end_time: b.end_time,
            status: b.status,
        }
    }
}

/// GET /api/users/{id}/bookings - only the caller's own
async fn user_bookings(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    auth: AuthUser,
) -> Result<Json<Vec<UserBookingResponse>>, ApiError> {
    if id != auth.user_id {
        return Err(ApiError::forbidden("cannot list another user's bookings"));
    }

    // A valid token can outlive its account
    UserRepo::new(&state.pool).get(id).await?;

    let rows = BookingRepo::new(&state.pool).list_for_user(id).await?;
    Ok(Json(rows.into_iter().map(UserBookingResponse::from).collect()))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/users/{id}/bookings", get(user_bookings))
}
