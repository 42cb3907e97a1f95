use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};

use storage::dto::ranking::{RankedScoreResponse, ScopeQuery};

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/rankings",
    params(ScopeQuery),
    responses(
        (status = 200, description = "Ranked scores for the scope, in rank order", body = [RankedScoreResponse]),
        (status = 400, description = "Invalid scope parameters")
    ),
    tag = "rankings"
)]
pub async fn get_ranking(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Result<Response, WebError> {
    let heat = query.heat().map_err(WebError::BadRequest)?;

    let scores = state
        .submissions
        .ranked_scope(query.event_id, query.modality_id, heat)
        .await?;

    let entries: Vec<RankedScoreResponse> = scores.into_iter().map(Into::into).collect();
    Ok(Json(entries).into_response())
}
