use axum::{Router, routing::post};

use crate::state::AppState;

use super::handlers::{create_final_heat, create_regular_heat, list_heats};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_regular_heat).get(list_heats))
        .route("/final", post(create_final_heat))
}
