use std::sync::Arc;

use crate::config::Config;
use crate::screening::orchestrator::Orchestrator;
use crate::screening::report::ReportExporter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owns the single session and the analysis client.
    pub orchestrator: Orchestrator,
    /// Pluggable report format. Default: JsonReportExporter.
    pub exporter: Arc<dyn ReportExporter>,
}
