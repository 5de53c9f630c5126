use axum::{Json, extract::State};
use tracing::debug;

use agora_types::api::Snapshot;

use crate::error::ApiError;
use crate::{AppState, blocking, convert};

/// GET /api/data: all four collections in one response.
///
/// The reads run side by side on the blocking pool. If any of them fails the
/// whole request fails; a snapshot is never served with a collection missing.
pub async fn get_snapshot(State(state): State<AppState>) -> Result<Json<Snapshot>, ApiError> {
    let (users, categories, topics, reports) = tokio::try_join!(
        blocking(&state, |db| Ok(db.list_users()?)),
        blocking(&state, |db| Ok(db.list_categories()?)),
        blocking(&state, |db| Ok(db.list_topics()?)),
        blocking(&state, |db| Ok(db.list_reports()?)),
    )?;

    debug!(
        "Snapshot: {} users, {} categories, {} topics, {} reports",
        users.len(),
        categories.len(),
        topics.len(),
        reports.len()
    );

    Ok(Json(Snapshot {
        users: users.into_iter().map(convert::user).collect(),
        categories: categories.into_iter().map(convert::category).collect(),
        topics: topics.into_iter().map(convert::topic).collect(),
        reports: reports.into_iter().map(convert::report).collect(),
    }))
}
