//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uses JOINs for list operations (no N+1)
//! - Relies on constraints and conditional statements (no check-then-insert)
//! - Uses transactions for multi-table writes

pub mod users;
pub mod resources;
pub mod bookings;
pub mod analytics;

pub use users::{User, UserRepo, UserWithHash};
pub use resources::{NewResource, Resource, ResourceBookingRow, ResourcePatch, ResourceRepo};
pub use bookings::{BookedSlot, Booking, BookingRepo, UserBooking};
pub use analytics::{AnalyticsRepo, ResourceUsage, DEFAULT_TOP_LIMIT};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {reason}")]
    Conflict { reason: String },

    #[error("seed data rejected: {0}")]
    Seed(String),
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub(crate) fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }
}
