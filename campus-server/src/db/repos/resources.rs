//! Resource repository
//!
//! Handles resource CRUD plus the joined resource/booking queries:
//! - cancel/delete: transaction covering the resource and its bookings
//! - filter/sort: single LEFT JOIN, one row per (resource, booking)

use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::models::{
    BookingStatus, Capacity, ResourceKind, ResourceName, ResourceSort, ResourceStatus,
};

/// Resource record from database
#[derive(Debug, Clone, FromRow)]
pub struct Resource {
    pub resource_id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub capacity: i64,
    pub image_url: Option<String>,
    pub status: String,
}

/// Resource joined with at most one of its bookings
#[derive(Debug, Clone, FromRow)]
pub struct ResourceBookingRow {
    pub resource_id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub capacity: i64,
    pub image_url: Option<String>,
    pub booking_id: Option<i64>,
    pub booking_status: Option<String>,
    pub booking_date: Option<String>,
}

/// Validated input for a new resource
#[derive(Debug, Clone)]
pub struct NewResource {
    pub name: ResourceName,
    pub kind: ResourceKind,
    pub capacity: Capacity,
    pub image_url: Option<String>,
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct ResourcePatch {
    pub name: Option<ResourceName>,
    pub kind: Option<ResourceKind>,
    pub capacity: Option<Capacity>,
    /// `Some(None)` clears the image
    pub image_url: Option<Option<String>>,
}

impl ResourcePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.kind.is_none()
            && self.capacity.is_none()
            && self.image_url.is_none()
    }
}

const RESOURCE_COLUMNS: &str = "resource_id, name, type, capacity, image_url, status";

const JOINED_SELECT: &str = r#"
    SELECT
        r.resource_id,
        r.name,
        r.type,
        r.capacity,
        r.image_url,
        b.booking_id,
        b.status AS booking_status,
        b.date AS booking_date
    FROM resources r
    LEFT JOIN bookings b ON b.resource_id = r.resource_id
"#;

/// Resource repository
pub struct ResourceRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ResourceRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All resources in id order.
    pub async fn list(&self) -> Result<Vec<Resource>, DbError> {
        let sql = format!("SELECT {} FROM resources ORDER BY resource_id", RESOURCE_COLUMNS);
        let rows = sqlx::query_as::<_, Resource>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> Result<Resource, DbError> {
        let sql = format!("SELECT {} FROM resources WHERE resource_id = ?1", RESOURCE_COLUMNS);
        sqlx::query_as::<_, Resource>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("resource", id))
    }

    pub async fn create(&self, new: NewResource) -> Result<Resource, DbError> {
        let sql = format!(
            "INSERT INTO resources (name, type, capacity, image_url) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
            RESOURCE_COLUMNS
        );
        let resource = sqlx::query_as::<_, Resource>(&sql)
            .bind(new.name.as_str())
            .bind(new.kind.as_str())
            .bind(new.capacity.get())
            .bind(new.image_url)
            .fetch_one(self.pool)
            .await?;
        Ok(resource)
    }

    /// Apply a partial update in one statement.
    pub async fn update(&self, id: i64, patch: ResourcePatch) -> Result<Resource, DbError> {
        let sql = format!(
            r#"
            UPDATE resources SET
                name = COALESCE(?2, name),
                type = COALESCE(?3, type),
                capacity = COALESCE(?4, capacity),
                image_url = CASE WHEN ?5 THEN ?6 ELSE image_url END
            WHERE resource_id = ?1
            RETURNING {}
            "#,
            RESOURCE_COLUMNS
        );
        sqlx::query_as::<_, Resource>(&sql)
            .bind(id)
            .bind(patch.name.as_ref().map(ResourceName::as_str))
            .bind(patch.kind.as_ref().map(ResourceKind::as_str))
            .bind(patch.capacity.map(Capacity::get))
            .bind(patch.image_url.is_some())
            .bind(patch.image_url.flatten())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("resource", id))
    }

    /// Take a resource out of service and cancel its open bookings.
    ///
    /// Returns the number of bookings that were cancelled.
    pub async fn cancel(&self, id: i64) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE resources SET status = ?2 WHERE resource_id = ?1")
            .bind(id)
            .bind(ResourceStatus::Cancelled.as_str())
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(DbError::not_found("resource", id));
        }

        let cancelled = sqlx::query(
            "UPDATE bookings SET status = ?2 WHERE resource_id = ?1 AND status = ?3",
        )
        .bind(id)
        .bind(BookingStatus::Cancelled.as_str())
        .bind(BookingStatus::Booked.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(cancelled.rows_affected())
    }

    /// Make a cancelled resource bookable again. Its old bookings stay cancelled.
    pub async fn restore(&self, id: i64) -> Result<Resource, DbError> {
        let sql = format!(
            "UPDATE resources SET status = ?2 WHERE resource_id = ?1 RETURNING {}",
            RESOURCE_COLUMNS
        );
        sqlx::query_as::<_, Resource>(&sql)
            .bind(id)
            .bind(ResourceStatus::Available.as_str())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("resource", id))
    }

    /// Delete a resource together with its bookings.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM bookings WHERE resource_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM resources WHERE resource_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            // dropping tx rolls back
            return Err(DbError::not_found("resource", id));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Case-insensitive substring match on name, type or image URL.
    pub async fn search(&self, query: &str) -> Result<Vec<Resource>, DbError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM resources
            WHERE name LIKE ?1 ESCAPE '\'
               OR type LIKE ?1 ESCAPE '\'
               OR image_url LIKE ?1 ESCAPE '\'
            ORDER BY resource_id
            "#,
            RESOURCE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Resource>(&sql)
            .bind(like_pattern(query))
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Resources joined with their bookings, optionally narrowed by
    /// resource type and booking status.
    pub async fn filter(
        &self,
        kind: Option<&ResourceKind>,
        booking_status: Option<BookingStatus>,
    ) -> Result<Vec<ResourceBookingRow>, DbError> {
        let sql = format!(
            r#"
            {}
            WHERE (?1 IS NULL OR r.type = ?1)
              AND (?2 IS NULL OR b.status = ?2)
            ORDER BY r.resource_id, b.booking_id
            "#,
            JOINED_SELECT
        );
        let rows = sqlx::query_as::<_, ResourceBookingRow>(&sql)
            .bind(kind.map(ResourceKind::as_str))
            .bind(booking_status.map(|s| s.as_str()))
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Resources joined with their bookings in the requested order.
    pub async fn sorted(&self, by: Option<ResourceSort>) -> Result<Vec<ResourceBookingRow>, DbError> {
        let order = match by {
            None => "r.resource_id, b.booking_id",
            Some(ResourceSort::Date) => {
                "b.date IS NULL, b.date, b.start_time, r.resource_id, b.booking_id"
            }
            Some(ResourceSort::Name) => "r.name COLLATE NOCASE, r.resource_id, b.booking_id",
            Some(ResourceSort::Capacity) => "r.capacity DESC, r.resource_id, b.booking_id",
        };
        let sql = format!("{} ORDER BY {}", JOINED_SELECT, order);

        let rows = sqlx::query_as::<_, ResourceBookingRow>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }
}

/// Wrap user text in `%...%`, escaping LIKE wildcards.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
