use sqlx::{
    sqlite::{SqlitePool, SqlitePoolOptions},
    SqliteConnection,
};

use crate::{
    error::AppError,
    models::user::{NewUser, ProfileUpdate, User},
};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, updated_at";

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Create the `users` table if it does not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password_hash TEXT NOT NULL,
            first_name TEXT,
            last_name TEXT,
            updated_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// User table access. Every call runs on a connection the caller checked out
/// for the current request.
pub struct UserRepo;

impl UserRepo {
    pub async fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(user)
    }

    /// Insert a user. A duplicate email surfaces as `AppError::Conflict`
    /// through the unique constraint.
    pub async fn create(
        conn: &mut SqliteConnection,
        new_user: &NewUser,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(chrono::Utc::now().naive_utc())
        .fetch_one(&mut *conn)
        .await?;
        Ok(user)
    }

    /// Apply the supplied profile fields and bump `updated_at`.
    pub async fn update(
        conn: &mut SqliteConnection,
        email: &str,
        fields: &ProfileUpdate,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET first_name = COALESCE(?, first_name), \
             last_name = COALESCE(?, last_name), updated_at = ? \
             WHERE email = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(chrono::Utc::now().naive_utc())
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // One long-lived connection: each sqlite memory connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
