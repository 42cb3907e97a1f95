use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use storage::dto::heat::{CreateHeatRequest, HeatListQuery};
use storage::models::Heat;

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/heats",
    request_body = CreateHeatRequest,
    responses(
        (status = 201, description = "Regular heat created", body = Heat)
    ),
    tag = "heats"
)]
pub async fn create_regular_heat(
    State(state): State<AppState>,
    Json(request): Json<CreateHeatRequest>,
) -> Result<Response, WebError> {
    let heat = state
        .heats
        .create_regular_heat(request.event_id, request.modality_id)
        .await?;
    Ok((StatusCode::CREATED, Json(heat)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/heats/final",
    request_body = CreateHeatRequest,
    responses(
        (status = 201, description = "Final heat created", body = Heat),
        (status = 409, description = "No regular heat yet, or a final already exists")
    ),
    tag = "heats"
)]
pub async fn create_final_heat(
    State(state): State<AppState>,
    Json(request): Json<CreateHeatRequest>,
) -> Result<Response, WebError> {
    let heat = state
        .heats
        .create_final_heat(request.event_id, request.modality_id)
        .await?;
    Ok((StatusCode::CREATED, Json(heat)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/heats",
    params(HeatListQuery),
    responses(
        (status = 200, description = "Heats for the modality and event", body = [Heat])
    ),
    tag = "heats"
)]
pub async fn list_heats(
    State(state): State<AppState>,
    Query(query): Query<HeatListQuery>,
) -> Result<Response, WebError> {
    let heats = state
        .heats
        .list_heats(query.event_id, query.modality_id)
        .await?;
    Ok(Json(heats).into_response())
}
