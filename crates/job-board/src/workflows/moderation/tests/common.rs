use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::config::WorkflowConfig;
use crate::workflows::moderation::domain::{Candidate, Job, User};
use crate::workflows::moderation::store::{EntityStore, InMemoryBoard, StoreError};
use crate::workflows::moderation::ModerationService;
use crate::workflows::notifications::{
    Notification, NotificationCenter, NotificationDraft, NotificationPublisher, NotifyError,
};

pub(super) type BoardService = ModerationService<InMemoryBoard, NotificationCenter>;

pub(super) fn build_service() -> (BoardService, Arc<InMemoryBoard>, Arc<NotificationCenter>) {
    build_service_with(WorkflowConfig::instant())
}

pub(super) fn strict_service() -> (BoardService, Arc<InMemoryBoard>, Arc<NotificationCenter>) {
    build_service_with(WorkflowConfig {
        strict_transitions: true,
        ..WorkflowConfig::instant()
    })
}

pub(super) fn build_service_with(
    config: WorkflowConfig,
) -> (BoardService, Arc<InMemoryBoard>, Arc<NotificationCenter>) {
    let board = Arc::new(InMemoryBoard::seeded());
    let center = Arc::new(NotificationCenter::new());
    let service = ModerationService::new(board.clone(), center.clone(), config);
    (service, board, center)
}

pub(super) fn users(board: &InMemoryBoard) -> Vec<User> {
    EntityStore::<User>::list(board).expect("list users")
}

pub(super) fn jobs(board: &InMemoryBoard) -> Vec<Job> {
    EntityStore::<Job>::list(board).expect("list jobs")
}

pub(super) fn candidates(board: &InMemoryBoard) -> Vec<Candidate> {
    EntityStore::<Candidate>::list(board).expect("list candidates")
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) async fn assert_error_response(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    let body = json_body(response).await;
    assert!(body.get("error").is_some(), "expected error payload, got {body}");
    body
}

/// Publisher that refuses every notification.
pub(super) struct OfflinePublisher;

impl NotificationPublisher for OfflinePublisher {
    fn publish(&self, _draft: NotificationDraft) -> Result<Notification, NotifyError> {
        Err(NotifyError::Unavailable("publisher offline".to_string()))
    }
}

/// Board whose every collection fails.
pub(super) struct UnavailableBoard;

macro_rules! unavailable_store {
    ($entity:ty) => {
        impl EntityStore<$entity> for UnavailableBoard {
            fn insert(&self, _entity: $entity) -> Result<$entity, StoreError> {
                Err(StoreError::Unavailable("database offline".to_string()))
            }

            fn insert_with(
                &self,
                _build: impl FnOnce(<$entity as crate::workflows::moderation::Moderated>::Id) -> $entity,
            ) -> Result<$entity, StoreError> {
                Err(StoreError::Unavailable("database offline".to_string()))
            }

            fn modify<R>(
                &self,
                _id: <$entity as crate::workflows::moderation::Moderated>::Id,
                _apply: impl FnOnce(&mut $entity) -> R,
            ) -> Result<R, StoreError> {
                Err(StoreError::Unavailable("database offline".to_string()))
            }

            fn fetch(
                &self,
                _id: <$entity as crate::workflows::moderation::Moderated>::Id,
            ) -> Result<Option<$entity>, StoreError> {
                Err(StoreError::Unavailable("database offline".to_string()))
            }

            fn remove_if(
                &self,
                _id: <$entity as crate::workflows::moderation::Moderated>::Id,
                _allow: impl FnOnce(&$entity) -> bool,
            ) -> Result<Option<$entity>, StoreError> {
                Err(StoreError::Unavailable("database offline".to_string()))
            }

            fn list(&self) -> Result<Vec<$entity>, StoreError> {
                Err(StoreError::Unavailable("database offline".to_string()))
            }
        }
    };
}

unavailable_store!(User);
unavailable_store!(Job);
unavailable_store!(Candidate);
