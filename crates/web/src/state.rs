use std::sync::Arc;

use engine::{HeatManager, SubmissionService};

#[derive(Clone)]
pub struct AppState {
    pub submissions: Arc<SubmissionService>,
    pub heats: Arc<HeatManager>,
}
