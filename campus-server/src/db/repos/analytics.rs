//! Usage analytics over resources and bookings

use sqlx::{FromRow, SqlitePool};

use super::DbError;

/// Default number of entries in the top list
pub const DEFAULT_TOP_LIMIT: u32 = 10;

/// Booking count for one resource
#[derive(Debug, Clone, FromRow)]
pub struct ResourceUsage {
    pub resource_id: i64,
    pub name: String,
    pub total_bookings: i64,
}

/// Analytics repository
pub struct AnalyticsRepo<'a> {
    pool: &'a SqlitePool,
}

// Cancelled bookings never happened; booked and completed ones count.
const USAGE_SELECT: &str = r#"
    SELECT
        r.resource_id,
        r.name,
        COUNT(b.booking_id) AS total_bookings
    FROM resources r
    LEFT JOIN bookings b
        ON b.resource_id = r.resource_id AND b.status != 'cancelled'
    GROUP BY r.resource_id, r.name
"#;

impl<'a> AnalyticsRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Booking totals for every resource, unbooked ones included, by id.
    pub async fn usage(&self) -> Result<Vec<ResourceUsage>, DbError> {
        let sql = format!("{} ORDER BY r.resource_id", USAGE_SELECT);
        let rows = sqlx::query_as::<_, ResourceUsage>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Most booked resources first; ties broken by id.
    pub async fn top(&self, limit: u32) -> Result<Vec<ResourceUsage>, DbError> {
        let sql = format!(
            "{} ORDER BY total_bookings DESC, r.resource_id LIMIT ?1",
            USAGE_SELECT
        );
        let rows = sqlx::query_as::<_, ResourceUsage>(&sql)
            .bind(limit as i64)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support::{self, insert_resource, insert_user};
    use crate::db::BookingRepo;
    use crate::models::{BookingStatus, TimeSlot};

    async fn book(pool: &SqlitePool, user: i64, resource: i64, start: &str, end: &str) -> i64 {
        let slot = TimeSlot::parse("2030-05-01", start, end).unwrap();
        BookingRepo::new(pool)
            .create(user, resource, &slot)
            .await
            .unwrap()
            .booking_id
    }

    #[tokio::test]
    async fn usage_counts_active_bookings() {
        let pool = test_support::pool().await;
        let user = insert_user(&pool, "a@example.com").await;
        let room = insert_resource(&pool, "Room A", "Room", 10).await;
        let hall = insert_resource(&pool, "Hall", "Hall", 100).await;
        let idle = insert_resource(&pool, "Projector", "Equipment", 1).await;

        book(&pool, user, room, "09:00", "10:00").await;
        book(&pool, user, room, "10:00", "11:00").await;
        let cancelled = book(&pool, user, hall, "09:00", "10:00").await;
        book(&pool, user, hall, "11:00", "12:00").await;
        BookingRepo::new(&pool)
            .transition(cancelled, BookingStatus::Booked, BookingStatus::Cancelled)
            .await
            .unwrap();

        let usage = AnalyticsRepo::new(&pool).usage().await.unwrap();
        let counts: Vec<(i64, i64)> = usage.iter().map(|u| (u.resource_id, u.total_bookings)).collect();
        assert_eq!(counts, vec![(room, 2), (hall, 1), (idle, 0)]);
    }

    #[tokio::test]
    async fn top_orders_and_limits() {
        let pool = test_support::pool().await;
        let user = insert_user(&pool, "a@example.com").await;
        let a = insert_resource(&pool, "A", "Room", 10).await;
        let b = insert_resource(&pool, "B", "Room", 10).await;
        let c = insert_resource(&pool, "C", "Room", 10).await;

        book(&pool, user, b, "09:00", "10:00").await;
        book(&pool, user, b, "10:00", "11:00").await;
        book(&pool, user, c, "09:00", "10:00").await;

        let repo = AnalyticsRepo::new(&pool);
        let top: Vec<i64> = repo.top(DEFAULT_TOP_LIMIT).await.unwrap().iter().map(|u| u.resource_id).collect();
        assert_eq!(top, vec![b, c, a]);

        let top1 = repo.top(1).await.unwrap();
        assert_eq!(top1.len(), 1);
        assert_eq!(top1[0].name, "B");
    }
}
