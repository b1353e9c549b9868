use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::workflows::notifications::NotificationPublisher;

use super::action::ModerationAction;
use super::domain::{Candidate, CandidateId, EntityId, Job, User};
use super::entity::Moderated;
use super::filter::EntityFilter;
use super::service::{InterviewSlot, ModerationService, WorkflowError};
use super::store::{BoardStore, EntityStore};

/// Body of a transition request.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionRequest {
    pub action: ModerationAction,
    #[serde(default)]
    pub justification: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RatingRequest {
    pub(crate) rating: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotesRequest {
    pub(crate) notes: String,
}

/// Router builder exposing listing, detail, and transition endpoints for every entity kind.
pub fn moderation_router<S, N>(service: Arc<ModerationService<S, N>>) -> Router
where
    S: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/users", get(list_handler::<S, N, User>))
        .route("/api/v1/users/:id", get(detail_handler::<S, N, User>))
        .route(
            "/api/v1/users/:id/transitions",
            post(transition_handler::<S, N, User>),
        )
        .route("/api/v1/jobs", get(list_handler::<S, N, Job>))
        .route("/api/v1/jobs/:id", get(detail_handler::<S, N, Job>))
        .route(
            "/api/v1/jobs/:id/transitions",
            post(transition_handler::<S, N, Job>),
        )
        .route("/api/v1/candidates", get(list_handler::<S, N, Candidate>))
        .route("/api/v1/candidates/:id", get(detail_handler::<S, N, Candidate>))
        .route(
            "/api/v1/candidates/:id/transitions",
            post(transition_handler::<S, N, Candidate>),
        )
        .route(
            "/api/v1/candidates/:id/documents",
            get(documents_handler::<S, N>),
        )
        .route("/api/v1/candidates/:id/rating", post(rating_handler::<S, N>))
        .route("/api/v1/candidates/:id/notes", post(notes_handler::<S, N>))
        .route(
            "/api/v1/candidates/:id/interview",
            post(interview_handler::<S, N>),
        )
        .with_state(service)
}

/// Maps workflow failures onto the shared `{ "error": .. }` response.
pub fn workflow_error_response(error: WorkflowError) -> Response {
    AppError::from(error).into_response()
}

pub(crate) async fn list_handler<S, N, E>(
    State(service): State<Arc<ModerationService<S, N>>>,
    Query(filter): Query<EntityFilter<E::Status>>,
) -> Response
where
    S: BoardStore + EntityStore<E> + 'static,
    N: NotificationPublisher + 'static,
    E: Moderated,
{
    match service.list::<E>(&filter) {
        Ok(entities) => (StatusCode::OK, axum::Json(entities)).into_response(),
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn detail_handler<S, N, E>(
    State(service): State<Arc<ModerationService<S, N>>>,
    Path(id): Path<u64>,
) -> Response
where
    S: BoardStore + EntityStore<E> + 'static,
    N: NotificationPublisher + 'static,
    E: Moderated,
{
    match service.get::<E>(E::Id::from_raw(id)) {
        Ok(entity) => {
            let actions = E::available_actions(entity.status());
            let payload = json!({
                "entity": entity,
                "available_actions": actions,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn transition_handler<S, N, E>(
    State(service): State<Arc<ModerationService<S, N>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    S: BoardStore + EntityStore<E> + 'static,
    N: NotificationPublisher + 'static,
    E: Moderated,
{
    let outcome = service.transition::<E>(
        E::Id::from_raw(id),
        request.action,
        request.justification.as_deref(),
    );

    match outcome {
        Ok(outcome) => {
            let refresh = outcome.redirect.as_ref().and_then(|redirect| {
                HeaderValue::from_str(&format!(
                    "{}; url={}",
                    redirect.delay_secs(),
                    redirect.location
                ))
                .ok()
            });
            let mut response = (StatusCode::OK, axum::Json(outcome)).into_response();
            if let Some(value) = refresh {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static("refresh"), value);
            }
            response
        }
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn documents_handler<S, N>(
    State(service): State<Arc<ModerationService<S, N>>>,
    Path(id): Path<u64>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    match service.candidate_documents(CandidateId(id)) {
        Ok(documents) => (StatusCode::OK, axum::Json(documents)).into_response(),
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn rating_handler<S, N>(
    State(service): State<Arc<ModerationService<S, N>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<RatingRequest>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    match service.rate_candidate(CandidateId(id), request.rating) {
        Ok(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn notes_handler<S, N>(
    State(service): State<Arc<ModerationService<S, N>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<NotesRequest>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    match service.save_candidate_notes(CandidateId(id), &request.notes) {
        Ok(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        Err(error) => workflow_error_response(error),
    }
}

pub(crate) async fn interview_handler<S, N>(
    State(service): State<Arc<ModerationService<S, N>>>,
    Path(id): Path<u64>,
    axum::Json(slot): axum::Json<InterviewSlot>,
) -> Response
where
    S: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    match service.schedule_interview(CandidateId(id), slot) {
        Ok(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        Err(error) => workflow_error_response(error),
    }
}
