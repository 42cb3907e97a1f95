use axum::{Router, routing::post};

use crate::state::AppState;

use super::handlers::submit_score;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(submit_score))
}
