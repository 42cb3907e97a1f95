use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use engine::SubmissionOutcome;
use storage::dto::submission::SubmissionRequest;

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/scores",
    request_body = SubmissionRequest,
    responses(
        (status = 201, description = "Score recorded and scope re-ranked", body = SubmissionOutcome),
        (status = 400, description = "Invalid submission"),
        (status = 409, description = "Conflicting teammate score")
    ),
    tag = "scores"
)]
pub async fn submit_score(
    State(state): State<AppState>,
    Json(request): Json<SubmissionRequest>,
) -> Result<Response, WebError> {
    let outcome = state.submissions.submit(request).await?;
    Ok((StatusCode::CREATED, Json(outcome)).into_response())
}
