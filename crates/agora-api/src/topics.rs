use axum::{Json, extract::State};
use tracing::info;
use uuid::Uuid;

use agora_db::models::NewTopic;
use agora_types::api::CreateTopicRequest;
use agora_types::models::{Category, Topic};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::{AppState, blocking, convert};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let rows = blocking(&state, |db| Ok(db.list_categories()?)).await?;
    Ok(Json(rows.into_iter().map(convert::category).collect()))
}

pub async fn list_topics(State(state): State<AppState>) -> Result<Json<Vec<Topic>>, ApiError> {
    let rows = blocking(&state, |db| Ok(db.list_topics()?)).await?;
    Ok(Json(rows.into_iter().map(convert::topic).collect()))
}

/// Category and author ids are stored without checking they exist.
pub async fn create_topic(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTopicRequest>,
) -> Result<Json<Topic>, ApiError> {
    if req.title.trim().is_empty() || req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Title and content are required".into()));
    }

    let topic_id = Uuid::new_v4().to_string();
    let new = NewTopic {
        title: req.title,
        content: req.content,
        category_id: req.category_id.map(|id| id.to_string()),
        author_id: req.author_id.map(|id| id.to_string()),
    };

    let row = blocking(&state, move |db| Ok(db.create_topic(&topic_id, &new)?)).await?;

    info!("Topic {} created in category {:?}", row.id, row.category_id);
    Ok(Json(convert::topic(row)))
}
