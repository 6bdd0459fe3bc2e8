use std::sync::Arc;

use crate::files::FileStore;
use crate::oracle::{AnalysisOracle, ExtractionOracle};
use crate::orchestrator::ActiveRuns;
use crate::store::EntityStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub files: Arc<dyn FileStore>,
    pub extraction: Arc<dyn ExtractionOracle>,
    pub analysis: Arc<dyn AnalysisOracle>,
    /// Jobs with an analysis run in flight.
    pub active_runs: ActiveRuns,
}
