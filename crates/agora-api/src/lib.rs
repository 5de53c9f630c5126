pub mod admin;
pub mod convert;
pub mod data;
pub mod error;
pub mod extract;
pub mod reports;
pub mod topics;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tracing::error;

use agora_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// All `/api` routes. Static files and the frontend catch-all are layered on
/// by the server binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/reports", get(reports::list_reports).post(reports::create_report))
        .route("/api/admin/ban", post(admin::ban_user))
        .route("/api/categories", get(topics::list_categories))
        .route("/api/topics", get(topics::list_topics).post(topics::create_topic))
        .route("/api/data", get(data::get_snapshot))
        .with_state(state)
}

/// Run a store call off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })?
}
