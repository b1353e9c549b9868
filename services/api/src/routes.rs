use crate::infra::{AppState, BoardServices};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use job_board::error::AppError;
use job_board::workflows::moderation::{moderation_router, Job};
use job_board::workflows::notifications::notification_router;
use job_board::workflows::operations::{
    EmailDraft, EmailReceipt, JobPostingForm, SystemTask, TaskReport,
};
use job_board::workflows::reports::{ReportKind, ReportRange};
use job_board::workflows::session::{LoginRequest, RegistrationRequest, SessionUser};
use job_board::workflows::settings::{PlatformSettings, SettingKey};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub(crate) struct SettingUpdate {
    pub(crate) enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    pub(crate) range: ReportRange,
    #[serde(default)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn with_board_routes(services: BoardServices) -> Router {
    let admin = Router::new()
        .route("/api/v1/settings", get(settings_endpoint))
        .route("/api/v1/settings/save", post(save_settings_endpoint))
        .route("/api/v1/settings/:key", axum::routing::put(set_setting_endpoint))
        .route("/api/v1/settings/:key/toggle", post(toggle_setting_endpoint))
        .route("/api/v1/session", get(session_endpoint))
        .route("/api/v1/session/login", post(login_endpoint))
        .route("/api/v1/session/register", post(register_endpoint))
        .route("/api/v1/session/logout", post(logout_endpoint))
        .route("/api/v1/system/tasks/:task", post(system_task_endpoint))
        .route("/api/v1/system/email", post(bulk_email_endpoint))
        .route("/api/v1/jobs", post(post_job_endpoint))
        .route("/api/v1/reports/:kind", get(report_endpoint))
        .with_state(services.clone());

    moderation_router(services.moderation.clone())
        .merge(notification_router(services.notifications.clone()))
        .merge(admin)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn settings_endpoint(
    State(services): State<BoardServices>,
) -> Result<Json<PlatformSettings>, AppError> {
    Ok(Json(services.settings.snapshot()?))
}

pub(crate) async fn set_setting_endpoint(
    State(services): State<BoardServices>,
    Path(key): Path<String>,
    Json(update): Json<SettingUpdate>,
) -> Result<Json<PlatformSettings>, AppError> {
    let key: SettingKey = key.parse()?;
    Ok(Json(services.settings.set(key, update.enabled)?))
}

pub(crate) async fn toggle_setting_endpoint(
    State(services): State<BoardServices>,
    Path(key): Path<String>,
) -> Result<Json<PlatformSettings>, AppError> {
    let key: SettingKey = key.parse()?;
    Ok(Json(services.settings.toggle(key)?))
}

pub(crate) async fn save_settings_endpoint(
    State(services): State<BoardServices>,
) -> Result<Json<PlatformSettings>, AppError> {
    Ok(Json(services.settings.save()?))
}

pub(crate) async fn session_endpoint(
    State(services): State<BoardServices>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = services.auth.current()?;
    Ok(Json(json!({ "user": user })))
}

pub(crate) async fn login_endpoint(
    State(services): State<BoardServices>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionUser>, AppError> {
    Ok(Json(services.auth.login(request).await?))
}

pub(crate) async fn register_endpoint(
    State(services): State<BoardServices>,
    Json(request): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<SessionUser>), AppError> {
    let user = services.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub(crate) async fn logout_endpoint(
    State(services): State<BoardServices>,
) -> Result<StatusCode, AppError> {
    services.auth.logout()?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn system_task_endpoint(
    State(services): State<BoardServices>,
    Path(task): Path<SystemTask>,
) -> Result<Json<TaskReport>, AppError> {
    Ok(Json(services.operations.run(task).await?))
}

pub(crate) async fn bulk_email_endpoint(
    State(services): State<BoardServices>,
    Json(draft): Json<EmailDraft>,
) -> Result<Json<EmailReceipt>, AppError> {
    Ok(Json(services.operations.send_bulk_email(draft)?))
}

pub(crate) async fn post_job_endpoint(
    State(services): State<BoardServices>,
    Json(form): Json<JobPostingForm>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job = services.operations.post_job(form)?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub(crate) async fn report_endpoint(
    State(services): State<BoardServices>,
    Path(kind): Path<ReportKind>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let as_of = query.as_of.unwrap_or_else(|| Local::now().date_naive());
    let report = services.reports.generate(kind, query.range, as_of)?;
    let disposition = format!("attachment; filename=\"{}\"", report.file_name());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.csv,
    )
        .into_response())
}
