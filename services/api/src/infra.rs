use chrono::NaiveDate;
use job_board::config::{AppConfig, WorkflowConfig};
use job_board::workflows::moderation::{InMemoryBoard, ModerationService};
use job_board::workflows::notifications::NotificationCenter;
use job_board::workflows::operations::OperationsService;
use job_board::workflows::reports::ReportService;
use job_board::workflows::session::{AuthService, FileSessionStore};
use job_board::workflows::settings::SettingsService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Every workflow service, sharing one seeded board and one notification center.
#[derive(Clone)]
pub(crate) struct BoardServices {
    pub(crate) board: Arc<InMemoryBoard>,
    pub(crate) notifications: Arc<NotificationCenter>,
    pub(crate) moderation: Arc<ModerationService<InMemoryBoard, NotificationCenter>>,
    pub(crate) auth: Arc<AuthService<FileSessionStore>>,
    pub(crate) settings: Arc<SettingsService<NotificationCenter>>,
    pub(crate) operations: Arc<OperationsService<InMemoryBoard, NotificationCenter>>,
    pub(crate) reports: Arc<ReportService<InMemoryBoard, NotificationCenter>>,
}

impl BoardServices {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self::new(config.workflow.clone(), config.session.path.clone())
    }

    pub(crate) fn new(workflow: WorkflowConfig, session_path: PathBuf) -> Self {
        let board = Arc::new(InMemoryBoard::seeded());
        let notifications = Arc::new(NotificationCenter::seeded());

        Self {
            moderation: Arc::new(ModerationService::new(
                board.clone(),
                notifications.clone(),
                workflow.clone(),
            )),
            auth: Arc::new(AuthService::new(
                Arc::new(FileSessionStore::new(session_path)),
                workflow.clone(),
            )),
            settings: Arc::new(SettingsService::new(notifications.clone())),
            operations: Arc::new(OperationsService::new(
                board.clone(),
                notifications.clone(),
                workflow,
            )),
            reports: Arc::new(ReportService::new(board.clone(), notifications.clone())),
            board,
            notifications,
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
