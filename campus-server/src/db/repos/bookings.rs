//! Booking repository
//!
//! Booking creation is one conditional `INSERT ... SELECT`: the row is only
//! written when the resource exists, is available, and no `booked` booking
//! of the same resource overlaps the requested `[start, end)` on that date.
//! SQLite holds its write lock for the whole statement, so two requests
//! racing for overlapping slots cannot both succeed.

use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::models::{BookingStatus, ResourceStatus, TimeSlot, DATE_FORMAT};

/// Booking record from database
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub booking_id: i64,
    pub user_id: i64,
    pub resource_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub created_at: String,
}

impl Booking {
    /// Parsed status; unknown values (never written by this crate) read as booked.
    pub fn status(&self) -> BookingStatus {
        self.status.parse().unwrap_or_default()
    }
}

/// Booking joined with its resource, for a user's booking list
#[derive(Debug, Clone, FromRow)]
pub struct UserBooking {
    pub booking_id: i64,
    pub resource_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub resource_name: String,
    pub resource_type: String,
}

/// An occupied interval of a resource on one day
#[derive(Debug, Clone, FromRow)]
pub struct BookedSlot {
    pub booking_id: i64,
    pub start_time: String,
    pub end_time: String,
}

const BOOKING_COLUMNS: &str =
    "booking_id, user_id, resource_id, date, start_time, end_time, status, created_at";

/// Booking repository
pub struct BookingRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookingRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Reserve `slot` of a resource for a user.
    ///
    /// # Errors
    /// - `NotFound` if the resource does not exist
    /// - `Conflict` if the resource is cancelled or the slot overlaps an
    ///   existing booking
    pub async fn create(
        &self,
        user_id: i64,
        resource_id: i64,
        slot: &TimeSlot,
    ) -> Result<Booking, DbError> {
        let date = slot.date_key();
        let start = slot.start_key();
        let end = slot.end_key();

        let sql = format!(
            r#"
            INSERT INTO bookings (user_id, resource_id, date, start_time, end_time, status)
            SELECT ?1, r.resource_id, ?3, ?4, ?5, ?6
            FROM resources r
            WHERE r.resource_id = ?2
              AND r.status = ?7
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.resource_id = ?2
                    AND b.date = ?3
                    AND b.status = ?6
                    AND b.start_time < ?5
                    AND b.end_time > ?4
              )
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );

        let inserted = sqlx::query_as::<_, Booking>(&sql)
            .bind(user_id)
            .bind(resource_id)
            .bind(date.as_str())
            .bind(start.as_str())
            .bind(end.as_str())
            .bind(BookingStatus::Booked.as_str())
            .bind(ResourceStatus::Available.as_str())
            .fetch_optional(self.pool)
            .await?;

        match inserted {
            Some(booking) => {
                tracing::debug!(
                    booking_id = booking.booking_id,
                    resource_id,
                    user_id,
                    date = %date,
                    start = %start,
                    end = %end,
                    "Booking created"
                );
                Ok(booking)
            }
            None => Err(self.explain_refusal(resource_id, slot).await?),
        }
    }

    /// Work out why a conditional insert wrote nothing.
    async fn explain_refusal(&self, resource_id: i64, slot: &TimeSlot) -> Result<DbError, DbError> {
        let status: Option<(String,)> =
            sqlx::query_as("SELECT status FROM resources WHERE resource_id = ?1")
                .bind(resource_id)
                .fetch_optional(self.pool)
                .await?;

        let Some((status,)) = status else {
            return Ok(DbError::not_found("resource", resource_id));
        };

        if status != ResourceStatus::Available.as_str() {
            return Ok(DbError::conflict(format!(
                "resource {} is not available for booking",
                resource_id
            )));
        }

        let clash: Option<(i64, String, String)> = sqlx::query_as(
            r#"
            SELECT booking_id, start_time, end_time FROM bookings
            WHERE resource_id = ?1 AND date = ?2 AND status = ?3
              AND start_time < ?5 AND end_time > ?4
            ORDER BY start_time
            LIMIT 1
            "#,
        )
        .bind(resource_id)
        .bind(slot.date_key())
        .bind(BookingStatus::Booked.as_str())
        .bind(slot.start_key())
        .bind(slot.end_key())
        .fetch_optional(self.pool)
        .await?;

        Ok(match clash {
            Some((id, start, end)) => DbError::conflict(format!(
                "requested slot overlaps booking {} ({}-{})",
                id, start, end
            )),
            // The clashing booking went away between the two statements
            None => DbError::conflict("requested slot is no longer available"),
        })
    }

    pub async fn get(&self, id: i64) -> Result<Booking, DbError> {
        let sql = format!("SELECT {} FROM bookings WHERE booking_id = ?1", BOOKING_COLUMNS);
        sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("booking", id))
    }

    /// Move a booking from `from` to `to`.
    ///
    /// The UPDATE is guarded by the current status, so concurrent
    /// transitions of the same booking cannot both apply.
    pub async fn transition(
        &self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Booking, DbError> {
        if !from.can_transition_to(to) {
            return Err(DbError::conflict(format!(
                "cannot move booking from {} to {}",
                from.as_str(),
                to.as_str()
            )));
        }

        let sql = format!(
            "UPDATE bookings SET status = ?3 WHERE booking_id = ?1 AND status = ?2 RETURNING {}",
            BOOKING_COLUMNS
        );
        let updated = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(self.pool)
            .await?;

        match updated {
            Some(booking) => Ok(booking),
            None => {
                let current = self.get(id).await?;
                Err(DbError::conflict(format!(
                    "booking {} is already {}",
                    id, current.status
                )))
            }
        }
    }

    /// Occupied intervals of one resource on one day, by start time.
    pub async fn booked_slots(
        &self,
        resource_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BookedSlot>, DbError> {
        let rows = sqlx::query_as::<_, BookedSlot>(
            r#"
            SELECT booking_id, start_time, end_time
            FROM bookings
            WHERE resource_id = ?1 AND date = ?2 AND status = ?3
            ORDER BY start_time
            "#,
        )
        .bind(resource_id)
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(BookingStatus::Booked.as_str())
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// A user's bookings with resource name and type (single JOIN).
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<UserBooking>, DbError> {
        let rows = sqlx::query_as::<_, UserBooking>(
            r#"
            SELECT
                b.booking_id,
                b.resource_id,
                b.date,
                b.start_time,
                b.end_time,
                b.status,
                r.name AS resource_name,
                r.type AS resource_type
            FROM bookings b
            INNER JOIN resources r ON b.resource_id = r.resource_id
            WHERE b.user_id = ?1
            ORDER BY b.date, b.start_time, b.booking_id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
