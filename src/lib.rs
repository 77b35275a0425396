pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod rest;
pub mod service;
pub mod store;

use std::sync::Arc;

use sqlx::sqlite::SqlitePool;

use crate::auth::TokenKeys;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(db: SqlitePool, jwt_secret: &str) -> Self {
        Self {
            db,
            tokens: Arc::new(TokenKeys::from_secret(jwt_secret.as_bytes())),
        }
    }
}
