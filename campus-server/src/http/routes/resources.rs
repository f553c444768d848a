//! Resource endpoints
//!
//! CRUD over rooms/halls/equipment plus search, filter, sort and the
//! per-day availability view.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{
    BookingRepo, NewResource, Resource, ResourceBookingRow, ResourcePatch, ResourceRepo,
};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidId};
use crate::http::server::AppState;
use crate::models::{
    default_close, default_open, free_windows, image_url, parse_date, parse_time, BookingStatus,
    Capacity, ResourceKind, ResourceName, ResourceSort, ResourceStatus, Window, DATE_FORMAT,
    TIME_FORMAT,
};

/// Create resource request
#[derive(Deserialize)]
pub struct CreateResourceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: i64,
    pub image_url: Option<String>,
}

/// Partial update request; omitted fields are left alone and a blank
/// `image_url` removes the image
#[derive(Deserialize, Default)]
pub struct UpdateResourceRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub capacity: Option<i64>,
    pub image_url: Option<String>,
}

impl UpdateResourceRequest {
    fn into_patch(self) -> Result<ResourcePatch, ApiError> {
        Ok(ResourcePatch {
            name: self.name.as_deref().map(ResourceName::new).transpose()?,
            kind: self.kind.as_deref().map(ResourceKind::new).transpose()?,
            capacity: self.capacity.map(Capacity::new).transpose()?,
            image_url: self
                .image_url
                .as_deref()
                .map(|s| image_url(Some(s)))
                .transpose()?,
        })
    }
}

/// Resource response
#[derive(Serialize, Deserialize)]
pub struct ResourceResponse {
    pub resource_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: i64,
    pub image_url: Option<String>,
    pub status: String,
}

impl From<Resource> for ResourceResponse {
    fn from(r: Resource) -> Self {
        Self {
            resource_id: r.resource_id,
            name: r.name,
            kind: r.kind,
            capacity: r.capacity,
            image_url: r.image_url,
            status: r.status,
        }
    }
}

/// Resource joined with one booking (filter/sort views)
#[derive(Serialize, Deserialize)]
pub struct ResourceBookingResponse {
    pub resource_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: i64,
    pub image_url: Option<String>,
    pub booking_id: Option<i64>,
    pub booking_status: Option<String>,
    pub date: Option<String>,
}

impl From<ResourceBookingRow> for ResourceBookingResponse {
    fn from(r: ResourceBookingRow) -> Self {
        Self {
            resource_id: r.resource_id,
            name: r.name,
            kind: r.kind,
            capacity: r.capacity,
            image_url: r.image_url,
            booking_id: r.booking_id,
            booking_status: r.booking_status,
            date: r.booking_date,
        }
    }
}

/// Outcome of a cancel/delete
#[derive(Serialize, Deserialize)]
pub struct ResourceActionResponse {
    pub resource_id: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_bookings: Option<u64>,
}

#[derive(Deserialize, Default)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct FilterParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Booking status
    pub status: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct SortParams {
    pub by: Option<String>,
}

#[derive(Deserialize)]
pub struct AvailabilityParams {
    pub date: String,
    pub open: Option<String>,
    pub close: Option<String>,
}

/// Time interval in `HH:MM`
#[derive(Serialize, Deserialize)]
pub struct WindowResponse {
    pub start_time: String,
    pub end_time: String,
    pub minutes: i64,
}

impl From<Window> for WindowResponse {
    fn from(w: Window) -> Self {
        Self {
            start_time: w.start.format(TIME_FORMAT).to_string(),
            end_time: w.end.format(TIME_FORMAT).to_string(),
            minutes: w.minutes(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct BookedWindowResponse {
    pub booking_id: i64,
    pub start_time: String,
    pub end_time: String,
}

/// One resource's day: what is taken and what is left
#[derive(Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub resource_id: i64,
    pub date: String,
    pub status: String,
    pub open: String,
    pub close: String,
    pub booked: Vec<BookedWindowResponse>,
    pub free: Vec<WindowResponse>,
}

/// GET /api/resources - all resources
async fn list_resources(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    let rows = ResourceRepo::new(&state.pool).list().await?;
    Ok(Json(rows.into_iter().map(ResourceResponse::from).collect()))
}

/// POST /api/resources - create a resource
async fn create_resource(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateResourceRequest>,
) -> Result<(StatusCode, Json<ResourceResponse>), ApiError> {
    let new = NewResource {
        name: ResourceName::new(&req.name)?,
        kind: ResourceKind::new(&req.kind)?,
        capacity: Capacity::new(req.capacity)?,
        image_url: image_url(req.image_url.as_deref())?,
    };

    let resource = ResourceRepo::new(&state.pool).create(new).await?;
    tracing::info!(
        resource_id = resource.resource_id,
        user_id = auth.user_id,
        "Resource created"
    );

    Ok((StatusCode::CREATED, Json(ResourceResponse::from(resource))))
}

/// GET /api/resources/{id}
async fn get_resource(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<ResourceResponse>, ApiError> {
    let resource = ResourceRepo::new(&state.pool).get(id).await?;
    Ok(Json(ResourceResponse::from(resource)))
}

/// PUT /api/resources/{id}/update - partial update
async fn update_resource(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    auth: AuthUser,
    Json(req): Json<UpdateResourceRequest>,
) -> Result<Json<ResourceResponse>, ApiError> {
    let patch = req.into_patch()?;
    let repo = ResourceRepo::new(&state.pool);

    let resource = if patch.is_empty() {
        repo.get(id).await?
    } else {
        repo.update(id, patch).await?
    };
    tracing::info!(resource_id = id, user_id = auth.user_id, "Resource updated");

    Ok(Json(ResourceResponse::from(resource)))
}

/// PUT /api/resources/{id}/cancel - take out of service, cancel open bookings
async fn cancel_resource(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    auth: AuthUser,
) -> Result<Json<ResourceActionResponse>, ApiError> {
    let cancelled = ResourceRepo::new(&state.pool).cancel(id).await?;
    tracing::info!(
        resource_id = id,
        user_id = auth.user_id,
        cancelled_bookings = cancelled,
        "Resource cancelled"
    );

    Ok(Json(ResourceActionResponse {
        resource_id: id,
        message: format!("Resource {} cancelled successfully", id),
        cancelled_bookings: Some(cancelled),
    }))
}

/// PUT /api/resources/{id}/restore - make bookable again
async fn restore_resource(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    auth: AuthUser,
) -> Result<Json<ResourceResponse>, ApiError> {
    let resource = ResourceRepo::new(&state.pool).restore(id).await?;
    tracing::info!(resource_id = id, user_id = auth.user_id, "Resource restored");
    Ok(Json(ResourceResponse::from(resource)))
}

/// DELETE /api/resources/{id} - remove resource and its bookings
async fn delete_resource(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    auth: AuthUser,
) -> Result<Json<ResourceActionResponse>, ApiError> {
    ResourceRepo::new(&state.pool).delete(id).await?;
    tracing::info!(resource_id = id, user_id = auth.user_id, "Resource deleted");

    Ok(Json(ResourceActionResponse {
        resource_id: id,
        message: format!("Resource {} deleted successfully", id),
        cancelled_bookings: None,
    }))
}

/// GET /api/resources/search?query=
async fn search_resources(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    let query = params.query.unwrap_or_default();
    let rows = ResourceRepo::new(&state.pool).search(&query).await?;
    Ok(Json(rows.into_iter().map(ResourceResponse::from).collect()))
}

/// GET /api/resources/filter?type=&status=
async fn filter_resources(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<ResourceBookingResponse>>, ApiError> {
    let kind = non_blank(params.kind.as_deref())
        .map(ResourceKind::new)
        .transpose()?;
    let status = non_blank(params.status.as_deref())
        .map(str::parse::<BookingStatus>)
        .transpose()?;

    let rows = ResourceRepo::new(&state.pool)
        .filter(kind.as_ref(), status)
        .await?;
    Ok(Json(rows.into_iter().map(ResourceBookingResponse::from).collect()))
}

/// GET /api/resources/sort?by=date|name|capacity
async fn sort_resources(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SortParams>,
) -> Result<Json<Vec<ResourceBookingResponse>>, ApiError> {
    let by = non_blank(params.by.as_deref())
        .map(str::parse::<ResourceSort>)
        .transpose()?;

    let rows = ResourceRepo::new(&state.pool).sorted(by).await?;
    Ok(Json(rows.into_iter().map(ResourceBookingResponse::from).collect()))
}

/// GET /api/resources/{id}/availability?date=&open=&close=
async fn resource_availability(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let date = parse_date(&params.date)?;
    let open = match non_blank(params.open.as_deref()) {
        Some(s) => parse_time(s, "open")?,
        None => default_open(),
    };
    let close = match non_blank(params.close.as_deref()) {
        Some(s) => parse_time(s, "close")?,
        None => default_close(),
    };

    let resource = ResourceRepo::new(&state.pool).get(id).await?;
    let slots = BookingRepo::new(&state.pool).booked_slots(id, date).await?;

    let booked: Vec<Window> = slots
        .iter()
        .map(|s| -> Result<Window, ApiError> {
            Ok(Window::new(
                parse_time(&s.start_time, "start_time")?,
                parse_time(&s.end_time, "end_time")?,
            ))
        })
        .collect::<Result<_, _>>()?;

    let bookable = resource
        .status
        .parse::<ResourceStatus>()
        .map(|s| s.is_bookable())
        .unwrap_or(false);
    let free = if bookable {
        free_windows(&booked, open, close)?
    } else {
        // Still validate the requested hours
        free_windows(&[], open, close)?;
        Vec::new()
    };

    Ok(Json(AvailabilityResponse {
        resource_id: id,
        date: date.format(DATE_FORMAT).to_string(),
        status: resource.status,
        open: open.format(TIME_FORMAT).to_string(),
        close: close.format(TIME_FORMAT).to_string(),
        booked: slots
            .into_iter()
            .map(|s| BookedWindowResponse {
                booking_id: s.booking_id,
                start_time: s.start_time,
                end_time: s.end_time,
            })
            .collect(),
        free: free.into_iter().map(WindowResponse::from).collect(),
    }))
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Resource routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/resources", get(list_resources).post(create_resource))
        // Creation path kept from the original API
        .route("/api/resources/book", post(create_resource))
        .route("/api/resources/search", get(search_resources))
        .route("/api/resources/filter", get(filter_resources))
        .route("/api/resources/sort", get(sort_resources))
        .route("/api/resources/{id}", get(get_resource).delete(delete_resource))
        .route("/api/resources/{id}/update", put(update_resource))
        .route("/api/resources/{id}/cancel", put(cancel_resource))
        .route("/api/resources/{id}/restore", put(restore_resource))
        .route("/api/resources/{id}/availability", get(resource_availability))
}
