//! Admin and recruiter operations that only simulate work: system maintenance tasks,
//! bulk e-mail, and job posting.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::WorkflowConfig;
use crate::workflows::moderation::domain::{Job, JobStatus, User};
use crate::workflows::moderation::store::{BoardStore, EntityStore, StoreError};
use crate::workflows::notifications::{
    Notification, NotificationDraft, NotificationPublisher, NotifyError,
};

/// Company recorded on postings submitted without one.
pub const DEFAULT_COMPANY: &str = "TechCorp Inc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemTask {
    ExportData,
    BackupDatabase,
    ClearCache,
    RestartServer,
    HealthCheck,
}

impl SystemTask {
    pub const ALL: [SystemTask; 5] = [
        Self::ExportData,
        Self::BackupDatabase,
        Self::ClearCache,
        Self::RestartServer,
        Self::HealthCheck,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExportData => "export-data",
            Self::BackupDatabase => "backup-database",
            Self::ClearCache => "clear-cache",
            Self::RestartServer => "restart-server",
            Self::HealthCheck => "health-check",
        }
    }

    /// Unscaled time the task pretends to take.
    pub const fn duration(self) -> Duration {
        match self {
            Self::ExportData => Duration::from_secs(3),
            Self::BackupDatabase => Duration::from_secs(5),
            Self::ClearCache => Duration::from_secs(2),
            Self::RestartServer => Duration::from_secs(4),
            Self::HealthCheck => Duration::from_secs(3),
        }
    }

    fn started(self) -> NotificationDraft {
        let (title, message) = match self {
            Self::ExportData => (
                "Data Export Started",
                "Exporting all system data. This may take a few minutes.",
            ),
            Self::BackupDatabase => (
                "Database Backup Started",
                "Creating database backup. You'll be notified when complete.",
            ),
            Self::ClearCache => ("Clearing Cache", "System cache is being cleared."),
            Self::RestartServer => (
                "Server Restart Initiated",
                "Server is restarting. This may take a few minutes.",
            ),
            Self::HealthCheck => (
                "System Health Check Started",
                "Running comprehensive system diagnostics...",
            ),
        };
        NotificationDraft::info(title, message)
    }

    fn completed(self) -> NotificationDraft {
        let (title, message) = match self {
            Self::ExportData => (
                "Export Complete",
                "Data export has been completed. Download link sent to your email.",
            ),
            Self::BackupDatabase => (
                "Backup Complete",
                "Database backup has been created successfully.",
            ),
            Self::ClearCache => (
                "Cache Cleared",
                "System cache has been cleared successfully.",
            ),
            Self::RestartServer => ("Server Restarted", "Server has been restarted successfully."),
            Self::HealthCheck => (
                "System Health: Excellent",
                "All systems are running optimally. No issues detected.",
            ),
        };
        NotificationDraft::success(title, message)
    }
}

impl fmt::Display for SystemTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub task: SystemTask,
    pub started: Notification,
    pub completed: Notification,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmailDraft {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailReceipt {
    pub subject: String,
    pub recipients: usize,
    pub notification: Notification,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobPostingForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
}

impl JobPostingForm {
    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("department", &self.department),
            ("location", &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Trimmed optional form value; blanks count as absent.
fn filled(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingField(Vec<&'static str>),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl OperationError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }
}

pub struct OperationsService<S, N> {
    store: Arc<S>,
    notifications: Arc<N>,
    config: WorkflowConfig,
}

impl<S, N> OperationsService<S, N>
where
    S: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(store: Arc<S>, notifications: Arc<N>, config: WorkflowConfig) -> Self {
        Self {
            store,
            notifications,
            config,
        }
    }

    /// Announces the task, waits its scaled duration, then announces completion.
    /// Simulated tasks never fail on their own.
    pub async fn run(&self, task: SystemTask) -> Result<TaskReport, OperationError> {
        let started = self.notifications.publish(task.started())?;
        info!(%task, "system task started");

        tokio::time::sleep(self.config.scaled(task.duration())).await;

        let completed = self.notifications.publish(task.completed())?;
        info!(%task, "system task completed");
        Ok(TaskReport {
            task,
            started,
            completed,
        })
    }

    pub fn send_bulk_email(&self, draft: EmailDraft) -> Result<EmailReceipt, OperationError> {
        let missing: Vec<_> = [("subject", &draft.subject), ("message", &draft.message)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            self.notifications.publish(NotificationDraft::error(
                "Error",
                "Please fill in both subject and message fields.",
            ))?;
            warn!(?missing, "bulk email refused");
            return Err(OperationError::MissingField(missing));
        }

        let recipients = EntityStore::<User>::list(self.store.as_ref())?.len();
        let notification = self.notifications.publish(NotificationDraft::success(
            "Bulk Email Sent",
            format!("Email \"{}\" sent to all users successfully.", draft.subject),
        ))?;
        info!(subject = %draft.subject, recipients, "bulk email sent");

        Ok(EmailReceipt {
            subject: draft.subject,
            recipients,
            notification,
        })
    }

    pub fn post_job(&self, form: JobPostingForm) -> Result<Job, OperationError> {
        let missing = form.missing_fields();
        if !missing.is_empty() {
            self.notifications.publish(NotificationDraft::error(
                "Error",
                "Please fill in all required fields.",
            ))?;
            return Err(OperationError::MissingField(missing));
        }

        let job = EntityStore::<Job>::insert_with(self.store.as_ref(), |id| Job {
            id,
            title: form.title.trim().to_string(),
            company: filled(form.company.as_deref())
                .unwrap_or_else(|| DEFAULT_COMPANY.to_string()),
            department: form.department.trim().to_string(),
            location: form.location.trim().to_string(),
            applications: 0,
            posted_date: Utc::now().date_naive(),
            status: JobStatus::Active,
            employment_type: filled(form.employment_type.as_deref()),
            salary: filled(form.salary.as_deref()),
            description: filled(form.description.as_deref()),
            requirements: filled(form.requirements.as_deref()),
        })?;

        self.notifications.publish(NotificationDraft::success(
            "Job Posted Successfully",
            format!("{} has been posted and is now live.", job.title),
        ))?;
        info!(id = %job.id, title = %job.title, "job posted");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::moderation::domain::JobId;
    use crate::workflows::moderation::InMemoryBoard;
    use crate::workflows::notifications::{NotificationCenter, NotificationKind};

    fn service() -> (
        OperationsService<InMemoryBoard, NotificationCenter>,
        Arc<InMemoryBoard>,
        Arc<NotificationCenter>,
    ) {
        let board = Arc::new(InMemoryBoard::seeded());
        let center = Arc::new(NotificationCenter::new());
        let service = OperationsService::new(board.clone(), center.clone(), WorkflowConfig::instant());
        (service, board, center)
    }

    #[tokio::test]
    async fn every_task_announces_start_and_completion() {
        let (service, _, center) = service();

        for task in SystemTask::ALL {
            let report = service.run(task).await.expect("task runs");
            assert_eq!(report.task, task);
            assert_eq!(report.started.kind, NotificationKind::Info);
            assert_eq!(report.completed.kind, NotificationKind::Success);
        }

        assert_eq!(center.list().expect("list").len(), SystemTask::ALL.len() * 2);
        assert_eq!(
            center.latest().expect("latest").expect("notification").title,
            "System Health: Excellent"
        );
    }

    #[tokio::test]
    async fn task_waits_its_scaled_duration() {
        let board = Arc::new(InMemoryBoard::seeded());
        let center = Arc::new(NotificationCenter::new());
        let config = WorkflowConfig {
            simulated_delay_percent: 1,
            ..WorkflowConfig::default()
        };
        let service = OperationsService::new(board, center, config);

        let started = std::time::Instant::now();
        service.run(SystemTask::BackupDatabase).await.expect("task runs");

        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn blank_email_fields_are_refused() {
        let (service, _, center) = service();

        let result = service.send_bulk_email(EmailDraft {
            subject: "Platform maintenance".to_string(),
            message: "  ".to_string(),
        });

        match result {
            Err(OperationError::MissingField(fields)) => assert_eq!(fields, ["message"]),
            other => panic!("expected missing field, got {other:?}"),
        }
        let latest = center.latest().expect("latest").expect("notification");
        assert_eq!(latest.message, "Please fill in both subject and message fields.");
        assert_eq!(latest.kind, NotificationKind::Error);
    }

    #[test]
    fn bulk_email_reaches_every_user() {
        let (service, _, _) = service();

        let receipt = service
            .send_bulk_email(EmailDraft {
                subject: "Spring hiring fair".to_string(),
                message: "Join us on campus next week.".to_string(),
            })
            .expect("email sent");

        assert_eq!(receipt.recipients, 3);
        assert_eq!(
            receipt.notification.message,
            "Email \"Spring hiring fair\" sent to all users successfully."
        );
    }

    #[test]
    fn posted_job_is_active_with_no_applications() {
        let (service, board, _) = service();

        let job = service
            .post_job(JobPostingForm {
                title: "Product Designer".to_string(),
                department: "Design".to_string(),
                location: "Austin, TX".to_string(),
                salary: Some("$90k".to_string()),
                ..JobPostingForm::default()
            })
            .expect("job posted");

        assert_eq!(job.id, JobId(4));
        assert_eq!(job.status, JobStatus::Active);
        assert_eq!(job.applications, 0);
        assert_eq!(job.company, DEFAULT_COMPANY);
        assert_eq!(job.salary.as_deref(), Some("$90k"));
        assert_eq!(job.description, None);
        let stored = EntityStore::<Job>::list(board.as_ref()).expect("list");
        assert_eq!(stored.last(), Some(&job));
    }

    #[test]
    fn optional_posting_details_are_trimmed_and_kept() {
        let (service, board, _) = service();

        let job = service
            .post_job(JobPostingForm {
                title: "Support Lead".to_string(),
                department: "Customer Success".to_string(),
                location: "Remote".to_string(),
                company: Some("  ".to_string()),
                employment_type: Some(" full-time ".to_string()),
                description: Some("Own the support queue.".to_string()),
                requirements: Some(String::new()),
                ..JobPostingForm::default()
            })
            .expect("job posted");

        assert_eq!(job.company, DEFAULT_COMPANY);
        let stored = EntityStore::<Job>::fetch(board.as_ref(), job.id)
            .expect("fetch")
            .expect("job stored");
        assert_eq!(stored.employment_type.as_deref(), Some("full-time"));
        assert_eq!(stored.description.as_deref(), Some("Own the support queue."));
        assert_eq!(stored.requirements, None);
    }

    #[test]
    fn concurrent_postings_get_distinct_ids() {
        let (service, board, _) = service();

        std::thread::scope(|scope| {
            for worker in 0..6 {
                let service = &service;
                scope.spawn(move || {
                    for round in 0..10 {
                        service
                            .post_job(JobPostingForm {
                                title: format!("Role {worker}-{round}"),
                                department: "Engineering".to_string(),
                                location: "Remote".to_string(),
                                ..JobPostingForm::default()
                            })
                            .expect("posting never conflicts");
                    }
                });
            }
        });

        let mut ids: Vec<_> = EntityStore::<Job>::list(board.as_ref())
            .expect("list")
            .into_iter()
            .map(|job| job.id.0)
            .collect();
        assert_eq!(ids.len(), 3 + 60);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3 + 60);
    }

    #[test]
    fn job_posting_requires_title_department_and_location() {
        let (service, board, _) = service();

        match service.post_job(JobPostingForm {
            title: "Analyst".to_string(),
            ..JobPostingForm::default()
        }) {
            Err(OperationError::MissingField(fields)) => {
                assert_eq!(fields, ["department", "location"])
            }
            other => panic!("expected missing field, got {other:?}"),
        }
        assert_eq!(EntityStore::<Job>::list(board.as_ref()).expect("list").len(), 3);
    }
}
