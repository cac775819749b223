use crate::config::settings::AppConfig;
use crate::modules::video::service::JobOrchestrator;
use crate::modules::video::workspace::TempWorkspace;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub workspace: TempWorkspace,
    pub orchestrator: JobOrchestrator,
}

impl AppState {
    pub fn new(config: AppConfig, workspace: TempWorkspace, orchestrator: JobOrchestrator) -> Self {
        Self {
            config,
            workspace,
            orchestrator,
        }
    }
}
