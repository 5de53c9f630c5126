use axum::extract::FromRequest;

use crate::error::ApiError;

/// `Json` extractor whose rejections come back as `{error}` bodies.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
