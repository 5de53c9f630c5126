use axum::{Json, extract::State};
use tracing::info;
use uuid::Uuid;

use agora_db::models::NewReport;
use agora_types::api::CreateReportRequest;
use agora_types::models::Report;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::{AppState, blocking, convert};

pub async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<Report>>, ApiError> {
    let rows = blocking(&state, |db| Ok(db.list_reports()?)).await?;
    Ok(Json(rows.into_iter().map(convert::report).collect()))
}

/// Referenced posts and users are taken as given.
pub async fn create_report(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateReportRequest>,
) -> Result<Json<Report>, ApiError> {
    let report_id = Uuid::new_v4().to_string();
    let new = NewReport {
        post_id: req.post_id,
        reason: req.reason,
        author_id: req.author_id,
        user_id: req.user_id,
        status: req.status,
    };

    let row = blocking(&state, move |db| Ok(db.create_report(&report_id, &new)?)).await?;

    info!("Report {} filed against post {:?}", row.id, row.post_id);
    Ok(Json(convert::report(row)))
}
