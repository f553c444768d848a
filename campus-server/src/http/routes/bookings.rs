//! Booking endpoints
//!
//! Bookings belong to the user who made them; every read or status change
//! on a single booking checks ownership first.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::repos::{Booking, BookingRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidId};
use crate::http::server::AppState;
use crate::models::{BookingStatus, TimeSlot, ValidationError};

/// Create booking request
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub resource_id: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
}

/// Booking response
#[derive(Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: i64,
    pub user_id: i64,
    pub resource_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            booking_id: b.booking_id,
            user_id: b.user_id,
            resource_id: b.resource_id,
            date: b.date,
            start_time: b.start_time,
            end_time: b.end_time,
            status: b.status,
            created_at: b.created_at,
        }
    }
}

/// POST /api/bookings - reserve a slot
async fn create_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    if req.resource_id <= 0 {
        return Err(ValidationError::InvalidFormat {
            field: "resource_id",
            reason: "must be a positive integer",
        }
        .into());
    }

    let slot = TimeSlot::parse(&req.date, &req.start_time, &req.end_time)?;
    if slot.starts_before(Utc::now().naive_utc()) {
        return Err(ValidationError::InvalidTimeRange {
            reason: "booking cannot start in the past",
        }
        .into());
    }

    let booking = BookingRepo::new(&state.pool)
        .create(auth.user_id, req.resource_id, &slot)
        .await?;

    tracing::info!(
        booking_id = booking.booking_id,
        resource_id = booking.resource_id,
        user_id = auth.user_id,
        date = %booking.date,
        start = %booking.start_time,
        end = %booking.end_time,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// Load a booking and make sure the caller owns it.
async fn owned_booking(state: &AppState, auth: AuthUser, id: i64) -> Result<Booking, ApiError> {
    let booking = BookingRepo::new(&state.pool).get(id).await?;
    if booking.user_id != auth.user_id {
        tracing::info!(booking_id = id, user_id = auth.user_id, "Booking access denied");
        return Err(ApiError::forbidden("booking belongs to another user"));
    }
    Ok(booking)
}

/// GET /api/bookings/{id}
async fn get_booking(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    auth: AuthUser,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = owned_booking(&state, auth, id).await?;
    Ok(Json(BookingResponse::from(booking)))
}

async fn move_booking(
    state: &AppState,
    auth: AuthUser,
    id: i64,
    to: BookingStatus,
) -> Result<Booking, ApiError> {
    let current = owned_booking(state, auth, id).await?;
    let booking = BookingRepo::new(&state.pool)
        .transition(id, current.status(), to)
        .await?;

    tracing::info!(
        booking_id = id,
        user_id = auth.user_id,
        status = to.as_str(),
        "Booking status changed"
    );
    Ok(booking)
}

/// PUT /api/bookings/{id}/cancel
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    auth: AuthUser,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = move_booking(&state, auth, id, BookingStatus::Cancelled).await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// PUT /api/bookings/{id}/complete
async fn complete_booking(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    auth: AuthUser,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = move_booking(&state, auth, id, BookingStatus::Completed).await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// Booking routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/{id}", get(get_booking))
        .route("/api/bookings/{id}/cancel", put(cancel_booking))
        .route("/api/bookings/{id}/complete", put(complete_booking))
}
