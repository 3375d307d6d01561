use axum::{
    extract::{Json, Query, State},
    http::Uri,
    response::IntoResponse,
};

use app_api::AnalyticsRequest;
use insights_app::AppError;

use crate::{errors::HttpError, state::HttpState};

pub async fn analytics(
    State(state): State<HttpState>,
    Query(req): Query<AnalyticsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let cancel = state.shutdown.child_token();
    let response = app_api::analytics(&state.context, req, cancel).await?;
    Ok(Json(response))
}

pub async fn health(State(state): State<HttpState>) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::health(&state.context)?;
    Ok(Json(response))
}

pub async fn not_found(uri: Uri) -> HttpError {
    AppError::NotFound(format!("no route for {}", uri.path())).into()
}
