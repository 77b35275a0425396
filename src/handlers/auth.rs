use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppError,
    models::user::{LoginPayload, RegisterPayload, TokenResponse, UserResponse},
    service, AppState,
};

use super::AppJson;

pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterPayload>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let mut conn = state.db.acquire().await?;
    let user = service::register(&mut conn, payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginPayload>,
) -> Result<Json<TokenResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let token = service::login(&mut conn, &state.tokens, payload).await?;
    Ok(Json(TokenResponse::bearer(token)))
}
