//! Status workflow for users, job postings, and candidates.
//!
//! Every entity kind shares one transition path: an action is validated against its
//! justification rule, applied to the store, and announced through the notification
//! publisher. Dashboards drive it through [`ModerationDialog`] or the HTTP router.

pub mod action;
pub mod dialog;
pub mod domain;
pub mod entity;
pub mod filter;
pub mod router;
pub mod seed;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use action::{Justification, ModerationAction};
pub use dialog::{DialogError, DialogState, ModerationDialog};
pub use domain::{
    Candidate, CandidateDocument, CandidateId, CandidateStatus, DocumentKind, EntityId,
    EntityKind, EntityRef, Job, JobId, JobStatus, User, UserId, UserRole, UserStatus,
};
pub use entity::Moderated;
pub use filter::EntityFilter;
pub use router::{moderation_router, workflow_error_response, TransitionRequest};
pub use service::{
    DocumentView, InterviewFormat, InterviewSlot, ModerationService, Redirect,
    TransitionOutcome, WorkflowError, ADMIN_DASHBOARD_PATH,
};
pub use store::{BoardStore, EntityStore, InMemoryBoard, MemoryStore, StoreError};
