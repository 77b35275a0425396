//! Account flows: register, login, and the authenticated profile operations.
//!
//! Each operation takes the request's own store connection, so nothing here
//! holds state between calls beyond the read-only token keys.

use std::sync::OnceLock;

use sqlx::SqliteConnection;

use crate::{
    auth::{hash_password, verify_password, TokenKeys},
    error::AppError,
    models::user::{LoginPayload, NewUser, ProfileUpdate, RegisterPayload, User},
    store::UserRepo,
};

pub const DEMO_EMAIL: &str = "test@example.com";
const DEMO_PASSWORD: &str = "password";

pub async fn register(
    conn: &mut SqliteConnection,
    payload: RegisterPayload,
) -> Result<User, AppError> {
    validate_email(&payload.email)?;
    require_non_blank("password", &payload.password)?;
    validate_optional_name("first_name", payload.first_name.as_deref())?;
    validate_optional_name("last_name", payload.last_name.as_deref())?;

    if UserRepo::find_by_email(conn, &payload.email).await?.is_some() {
        tracing::debug!(email = %payload.email, "Registration rejected: email taken");
        return Err(AppError::Conflict);
    }

    let new_user = NewUser {
        password_hash: hash_password(&payload.password)?,
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };
    let user = UserRepo::create(conn, &new_user).await?;
    tracing::info!(user_id = user.id, email = %user.email, "User registered");
    Ok(user)
}

/// Check credentials and issue an access token. Unknown email and wrong
/// password give the same error, and both run one argon2 pass.
pub async fn login(
    conn: &mut SqliteConnection,
    tokens: &TokenKeys,
    payload: LoginPayload,
) -> Result<String, AppError> {
    validate_email(&payload.email)?;
    require_non_blank("password", &payload.password)?;

    let user = UserRepo::find_by_email(conn, &payload.email).await?;
    if !password_matches(&payload.password, user.as_ref())? {
        tracing::debug!(
            email = %payload.email,
            known = user.is_some(),
            "Login failed"
        );
        return Err(AppError::Unauthorized);
    }

    match user {
        Some(user) => tokens.issue(&user.email),
        None => Err(AppError::Unauthorized),
    }
}

/// Verify against the user's hash, or against a throwaway hash when there is
/// no user so the missing-account path costs the same.
fn password_matches(password: &str, user: Option<&User>) -> Result<bool, AppError> {
    match user {
        Some(user) => verify_password(password, &user.password_hash),
        None => {
            verify_password(password, dummy_hash()?)?;
            Ok(false)
        }
    }
}

fn dummy_hash() -> Result<&'static str, AppError> {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash.as_str());
    }
    let hash = hash_password("not-a-real-account")?;
    Ok(DUMMY_HASH.get_or_init(|| hash).as_str())
}

/// Resolve a verified token subject to its user record.
pub async fn current_user(conn: &mut SqliteConnection, subject: &str) -> Result<User, AppError> {
    UserRepo::find_by_email(conn, subject)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn update_profile(
    conn: &mut SqliteConnection,
    subject: &str,
    fields: ProfileUpdate,
) -> Result<User, AppError> {
    validate_optional_name("first_name", fields.first_name.as_deref())?;
    validate_optional_name("last_name", fields.last_name.as_deref())?;
    UserRepo::update(conn, subject, &fields).await
}

/// Insert the demo account if it is not there yet.
pub async fn seed_demo_user(conn: &mut SqliteConnection) -> Result<(), AppError> {
    if UserRepo::find_by_email(conn, DEMO_EMAIL).await?.is_some() {
        return Ok(());
    }
    let new_user = NewUser {
        email: DEMO_EMAIL.to_string(),
        password_hash: hash_password(DEMO_PASSWORD)?,
        first_name: Some("Test".to_string()),
        last_name: Some("User".to_string()),
    };
    UserRepo::create(conn, &new_user).await?;
    tracing::info!(email = DEMO_EMAIL, "Seeded demo user");
    Ok(())
}

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "{field} cannot be empty or whitespace"
        )));
    }
    Ok(())
}

fn validate_optional_name(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(v) => require_non_blank(field, v),
        None => Ok(()),
    }
}

fn validate_email(email: &str) -> Result<(), AppError> {
    require_non_blank("email", email)?;
    let invalid = || AppError::Validation("email is not a valid address".to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}
