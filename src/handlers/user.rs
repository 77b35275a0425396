use axum::{extract::State, Json};

use crate::{
    auth::AuthUser,
    error::AppError,
    models::user::{ProfileUpdate, UserResponse},
    service, AppState,
};

use super::AppJson;

pub async fn me(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let user = service::current_user(&mut conn, &email).await?;
    Ok(Json(user.into()))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    AppJson(fields): AppJson<ProfileUpdate>,
) -> Result<Json<UserResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let user = service::update_profile(&mut conn, &email, fields).await?;
    Ok(Json(user.into()))
}
