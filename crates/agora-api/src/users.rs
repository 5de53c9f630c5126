use axum::{Json, extract::State};
use tracing::info;
use uuid::Uuid;

use agora_types::api::CreateUserRequest;
use agora_types::models::User;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::{AppState, blocking, convert};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let rows = blocking(&state, |db| Ok(db.list_users()?)).await?;
    Ok(Json(rows.into_iter().map(convert::user).collect()))
}

/// Username-only registration. A taken username comes back from the store as
/// a typed conflict; there is no separate lookup beforehand.
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let username = req.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username is required".into()));
    }

    let user_id = Uuid::new_v4().to_string();
    let row = blocking(&state, move |db| {
        Ok(db.create_user(&user_id, &username, req.avatar.as_deref())?)
    })
    .await?;

    info!("Registered user {} ({})", row.username, row.id);
    Ok(Json(convert::user(row)))
}
