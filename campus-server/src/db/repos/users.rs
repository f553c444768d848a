//! User repository
//!
//! Email uniqueness is enforced by the UNIQUE constraint; a duplicate
//! signup surfaces as `DbError::Conflict`.

use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::models::{Email, UserName};

/// User record without credentials
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// User record including the stored password hash (login only)
#[derive(Debug, Clone, FromRow)]
pub struct UserWithHash {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user. Duplicate email → `Conflict`.
    pub async fn create(
        &self,
        name: &UserName,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, DbError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, email
            "#,
        )
        .bind(name.as_str())
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DbError::conflict("user already exists"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user with their password hash for login.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<UserWithHash>, DbError> {
        let user = sqlx::query_as::<_, UserWithHash>(
            "SELECT id, name, email, password FROM users WHERE email = ?1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User, DbError> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("user", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support;

    #[tokio::test]
    async fn create_and_find() {
        let pool = test_support::pool().await;
        let repo = UserRepo::new(&pool);

        let name = UserName::new("Jane Smith").unwrap();
        let email = Email::new("jane@example.com").unwrap();
        let user = repo.create(&name, &email, "$hash").await.unwrap();

        assert_eq!(user.name, "Jane Smith");
        assert_eq!(user.email, "jane@example.com");

        let found = repo.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password, "$hash");

        assert_eq!(repo.get(user.id).await.unwrap().email, "jane@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let pool = test_support::pool().await;
        let repo = UserRepo::new(&pool);

        let name = UserName::new("Jane").unwrap();
        let email = Email::new("jane@example.com").unwrap();
        repo.create(&name, &email, "h1").await.unwrap();

        // Email is normalised before it reaches the repo
        let again = Email::new("JANE@example.com").unwrap();
        let err = repo.create(&name, &again, "h2").await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
    }

    #[tokio::test]
    async fn missing_user() {
        let pool = test_support::pool().await;
        let repo = UserRepo::new(&pool);

        let email = Email::new("nobody@example.com").unwrap();
        assert!(repo.find_by_email(&email).await.unwrap().is_none());
        assert!(matches!(repo.get(99).await, Err(DbError::NotFound { .. })));
    }
}
