/// Credential store: persisted user records
use crate::{
    db::models::UserRow,
    error::{ApiError, ApiResult},
};
use chrono::Utc;
use sqlx::SqlitePool;

const SELECT_USER_BY_ID: &str = "SELECT id, email, password_hash, full_name, phone, role, is_active, created_at
     FROM users WHERE id = ?1";

const SELECT_USER_BY_EMAIL: &str = "SELECT id, email, password_hash, full_name, phone, role, is_active, created_at
     FROM users WHERE email = ?1";

/// Fields of a user about to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// Typed access to the `users` table
#[derive(Debug, Clone)]
pub struct UserStore {
    db: SqlitePool,
}

impl UserStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Find a user by id
    pub async fn find_by_id(&self, user_id: i64) -> ApiResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(SELECT_USER_BY_ID)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// Find a user by exact email
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(SELECT_USER_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// Insert a user and return its id.
    ///
    /// A duplicate email surfaces as `Conflict`.
    pub async fn insert(&self, user: &NewUser) -> ApiResult<i64> {
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, full_name, phone, role, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, 'user', 1, ?5)",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(Utc::now())
        .execute(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                ApiError::Conflict("Email already registered".to_string())
            }
            other => ApiError::Database(other),
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrite full name and phone. Returns false if no such user exists.
    pub async fn update_contact_details(
        &self,
        user_id: i64,
        full_name: Option<&str>,
        phone: Option<&str>,
    ) -> ApiResult<bool> {
        let result = sqlx::query("UPDATE users SET full_name = ?1, phone = ?2 WHERE id = ?3")
            .bind(full_name)
            .bind(phone)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
