use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::moderation::{StoreError, WorkflowError};
use crate::workflows::notifications::NotifyError;
use crate::workflows::operations::OperationError;
use crate::workflows::reports::ReportError;
use crate::workflows::session::SessionError;
use crate::workflows::settings::SettingsError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Workflow(WorkflowError),
    Session(SessionError),
    Settings(SettingsError),
    Operation(OperationError),
    Report(ReportError),
    Notify(NotifyError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Workflow(err) if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Workflow(WorkflowError::NotFound(_))
            | AppError::Workflow(WorkflowError::Store(StoreError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Workflow(WorkflowError::Store(StoreError::Conflict))
            | AppError::Operation(OperationError::Store(StoreError::Conflict)) => StatusCode::CONFLICT,
            AppError::Operation(err) if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Settings(SettingsError::UnknownKey(_))
            | AppError::Notify(NotifyError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Workflow(_)
            | AppError::Session(_)
            | AppError::Settings(_)
            | AppError::Operation(_)
            | AppError::Report(_)
            | AppError::Notify(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Workflow(err) => write!(f, "{}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
            AppError::Settings(err) => write!(f, "{}", err),
            AppError::Operation(err) => write!(f, "{}", err),
            AppError::Report(err) => write!(f, "report error: {}", err),
            AppError::Notify(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Workflow(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Settings(err) => Some(err),
            AppError::Operation(err) => Some(err),
            AppError::Report(err) => Some(err),
            AppError::Notify(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<WorkflowError> for AppError {
    fn from(value: WorkflowError) -> Self {
        Self::Workflow(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Workflow(WorkflowError::Store(value))
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<SettingsError> for AppError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}

impl From<OperationError> for AppError {
    fn from(value: OperationError) -> Self {
        Self::Operation(value)
    }
}

impl From<ReportError> for AppError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

impl From<NotifyError> for AppError {
    fn from(value: NotifyError) -> Self {
        Self::Notify(value)
    }
}
