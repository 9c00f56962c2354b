//! Shared handler state

use crate::orchestrator::ReportOrchestrator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ReportOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<ReportOrchestrator>) -> Self {
        Self { orchestrator }
    }
}
