// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::application::sample_log::SampleLog;
use crate::application::watchdog_service::WatchdogService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: ChartService,
    pub watchdog_service: WatchdogService,
    pub sample_log: Arc<dyn SampleLog>,
}
