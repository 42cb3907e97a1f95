use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateHeatRequest {
    pub event_id: Uuid,
    pub modality_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HeatListQuery {
    pub event_id: Uuid,
    pub modality_id: Uuid,
}
