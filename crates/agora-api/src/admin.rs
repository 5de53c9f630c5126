use axum::{Json, extract::State};
use tracing::warn;

use agora_types::api::{BanRequest, BanResponse};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::{AppState, blocking, convert};

pub async fn ban_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BanRequest>,
) -> Result<Json<BanResponse>, ApiError> {
    let row = blocking(&state, move |db| Ok(db.ban_user(&req.user_id)?))
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    warn!("User {} ({}) banned", row.username, row.id);
    Ok(Json(BanResponse {
        message: "User banned successfully".into(),
        user: convert::user(row),
    }))
}
