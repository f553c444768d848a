//! Demo data: two users and three resources

use sqlx::SqlitePool;

use super::DbError;
use crate::auth::hash_password;
use crate::models::Password;

const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("John Doe", "john@example.com", "password123"),
    ("Jane Smith", "jane@example.com", "mypassword"),
];

const DEMO_RESOURCES: &[(&str, &str, i64)] = &[
    ("Conference Room A", "Room", 20),
    ("Auditorium", "Hall", 200),
    ("Projector", "Equipment", 1),
];

/// Rows actually inserted by a seed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub resources: u64,
}

/// Insert demo data. Safe to re-run: existing emails and resource names
/// are left untouched.
pub async fn run(pool: &SqlitePool) -> Result<SeedReport, DbError> {
    let mut report = SeedReport::default();
    let mut tx = pool.begin().await?;

    for &(name, email, password) in DEMO_USERS {
        let password = Password::new(password).map_err(|e| DbError::Seed(e.to_string()))?;
        let hash = hash_password(&password).map_err(|e| DbError::Seed(e.to_string()))?;

        let result = sqlx::query("INSERT OR IGNORE INTO users (name, email, password) VALUES (?1, ?2, ?3)")
            .bind(name)
            .bind(email)
            .bind(hash)
            .execute(&mut *tx)
            .await?;
        report.users += result.rows_affected();
    }

    for &(name, kind, capacity) in DEMO_RESOURCES {
        let result = sqlx::query(
            r#"
            INSERT INTO resources (name, type, capacity, image_url)
            SELECT ?1, ?2, ?3, NULL
            WHERE NOT EXISTS (SELECT 1 FROM resources WHERE name = ?1)
            "#,
        )
        .bind(name)
        .bind(kind)
        .bind(capacity)
        .execute(&mut *tx)
        .await?;
        report.resources += result.rows_affected();
    }

    tx.commit().await?;

    tracing::info!(
        users = report.users,
        resources = report.resources,
        "Seed data inserted"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::db::{create_memory_pool, migrations, ResourceRepo, UserRepo};
    use crate::models::Email;

    #[tokio::test]
    async fn seed_is_idempotent() {
        let pool = create_memory_pool().await.unwrap();
        migrations::run(&pool).await.unwrap();

        let first = run(&pool).await.unwrap();
        assert_eq!(first, SeedReport { users: 2, resources: 3 });

        let second = run(&pool).await.unwrap();
        assert_eq!(second, SeedReport::default());
    }

    #[tokio::test]
    async fn seeded_resources_have_no_image() {
        let pool = create_memory_pool().await.unwrap();
        migrations::run(&pool).await.unwrap();
        run(&pool).await.unwrap();

        let resources = ResourceRepo::new(&pool).list().await.unwrap();
        assert_eq!(resources.len(), 3);
        assert!(resources.iter().all(|r| r.image_url.is_none()));
    }

    #[tokio::test]
    async fn seeded_passwords_are_hashed() {
        let pool = create_memory_pool().await.unwrap();
        migrations::run(&pool).await.unwrap();
        run(&pool).await.unwrap();

        let email = Email::new("john@example.com").unwrap();
        let user = UserRepo::new(&pool)
            .find_by_email(&email)
            .await
            .unwrap()
            .expect("seeded user");

        assert_ne!(user.password, "password123");
        assert!(verify_password("password123", &user.password).unwrap());
    }
}
