use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::WorkflowConfig;
use crate::workflows::notifications::{
    Notification, NotificationDraft, NotificationPublisher, NotifyError,
};

use super::action::{Justification, ModerationAction};
use super::domain::{
    Candidate, CandidateId, CandidateStatus, DocumentKind, EntityKind, EntityRef, Job, User,
};
use super::entity::Moderated;
use super::filter::EntityFilter;
use super::store::{BoardStore, EntityStore, StoreError};

/// Where the admin client is sent once a deleted user's page no longer exists.
pub const ADMIN_DASHBOARD_PATH: &str = "/dashboard/admin";

/// Delayed navigation the client should perform after an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub location: String,
    pub after_ms: u64,
}

impl Redirect {
    /// Whole seconds for a `Refresh` header, rounded up so the client never leaves early.
    pub fn delay_secs(&self) -> u64 {
        self.after_ms.div_ceil(1000)
    }
}

/// Result of one applied transition.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    pub entity: EntityRef,
    pub name: String,
    pub action: ModerationAction,
    pub previous_status: &'static str,
    /// `None` once the entity has been deleted.
    pub current_status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<Justification>,
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewFormat {
    Video,
    Phone,
    OnSite,
}

impl InterviewFormat {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Video => "video call",
            Self::Phone => "phone call",
            Self::OnSite => "on-site",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSlot {
    pub starts_at: NaiveDateTime,
    pub format: InterviewFormat,
}

/// Attachment metadata handed to download links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentView {
    pub file_name: String,
    pub kind: DocumentKind,
    pub content_type: String,
}

/// Service applying status transitions to the board collections and reporting every
/// outcome through the notification publisher.
pub struct ModerationService<S, N> {
    store: Arc<S>,
    notifications: Arc<N>,
    config: WorkflowConfig,
}

impl<S, N> ModerationService<S, N>
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

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Apply `action` to whichever entity `target` names.
    pub fn transition_ref(
        &self,
        target: EntityRef,
        action: ModerationAction,
        justification: Option<&str>,
    ) -> Result<TransitionOutcome, WorkflowError> {
        match target {
            EntityRef::User(id) => self.transition::<User>(id, action, justification),
            EntityRef::Job(id) => self.transition::<Job>(id, action, justification),
            EntityRef::Candidate(id) => self.transition::<Candidate>(id, action, justification),
        }
    }

    /// Validate, apply, and announce a single status change.
    ///
    /// The justification is checked before the store is touched, so a blank reason never
    /// mutates anything. Re-applying the current status is accepted and changes nothing.
    pub fn transition<E>(
        &self,
        id: E::Id,
        action: ModerationAction,
        justification: Option<&str>,
    ) -> Result<TransitionOutcome, WorkflowError>
    where
        E: Moderated,
        S: EntityStore<E>,
    {
        if !E::supports(action) {
            return Err(WorkflowError::UnsupportedAction {
                action,
                kind: E::KIND,
            });
        }

        let justification = Justification::parse(justification);
        if action.requires_justification() && justification.is_none() {
            self.notifications.publish(NotificationDraft::error(
                "Error",
                format!("Please provide a reason for {}.", action.reason_noun()),
            ))?;
            warn!(kind = ?E::KIND, %id, %action, "transition refused without justification");
            return Err(WorkflowError::JustificationRequired { action });
        }
        let justification = justification.filter(|_| action.requires_justification());

        let strict = self.config.strict_transitions;
        let target = E::target_status(action);
        let store = self.store.as_ref();
        let (name, previous, current) = match target {
            Some(status) => EntityStore::<E>::modify(store, id, |entity| {
                let previous = entity.status();
                check_offered::<E>(strict, previous, action, target)?;
                entity.set_status(status);
                Ok::<_, WorkflowError>((
                    entity.display_name().to_string(),
                    previous,
                    Some(E::status_label(status)),
                ))
            })
            .map_err(located::<E>(id))??,
            None => {
                let mut refused = None;
                let removed = EntityStore::<E>::remove_if(store, id, |entity| {
                    match check_offered::<E>(strict, entity.status(), action, target) {
                        Ok(()) => true,
                        Err(err) => {
                            refused = Some(err);
                            false
                        }
                    }
                })
                .map_err(located::<E>(id))?;
                match (removed, refused) {
                    (Some(entity), _) => (entity.display_name().to_string(), entity.status(), None),
                    (None, Some(err)) => return Err(err),
                    (None, None) => return Err(WorkflowError::NotFound(E::entity_ref(id))),
                }
            }
        };

        let notification = self
            .notifications
            .publish(transition_notice::<E>(&name, action, justification.as_ref()))?;

        let redirect = (action == ModerationAction::Delete && E::KIND == EntityKind::User).then(|| {
            Redirect {
                location: ADMIN_DASHBOARD_PATH.to_string(),
                after_ms: self.config.redirect_delay.as_millis() as u64,
            }
        });

        info!(
            kind = ?E::KIND,
            %id,
            %action,
            from = E::status_label(previous),
            to = current.unwrap_or("deleted"),
            "transition applied"
        );

        Ok(TransitionOutcome {
            entity: E::entity_ref(id),
            name,
            action,
            previous_status: E::status_label(previous),
            current_status: current,
            justification,
            notification,
            redirect,
        })
    }

    pub fn list<E>(&self, filter: &EntityFilter<E::Status>) -> Result<Vec<E>, WorkflowError>
    where
        E: Moderated,
        S: EntityStore<E>,
    {
        let entities = EntityStore::<E>::list(self.store.as_ref())?;
        Ok(filter.apply(entities))
    }

    pub fn get<E>(&self, id: E::Id) -> Result<E, WorkflowError>
    where
        E: Moderated,
        S: EntityStore<E>,
    {
        EntityStore::<E>::fetch(self.store.as_ref(), id)?
            .ok_or(WorkflowError::NotFound(E::entity_ref(id)))
    }

    /// Actions the dashboards offer for the entity in its current status.
    pub fn available_actions<E>(&self, id: E::Id) -> Result<&'static [ModerationAction], WorkflowError>
    where
        E: Moderated,
        S: EntityStore<E>,
    {
        let entity = self.get::<E>(id)?;
        Ok(E::available_actions(entity.status()))
    }

    pub fn rate_candidate(&self, id: CandidateId, rating: u8) -> Result<Candidate, WorkflowError> {
        if !(1..=5).contains(&rating) {
            return Err(WorkflowError::InvalidRating(rating));
        }

        let candidate = self.update_candidate(id, |candidate| candidate.rating = Some(rating))?;

        self.notifications.publish(NotificationDraft::success(
            "Rating Updated",
            format!("Candidate rated {rating} out of 5 stars."),
        ))?;
        info!(%id, rating, "candidate rated");
        Ok(candidate)
    }

    pub fn save_candidate_notes(&self, id: CandidateId, notes: &str) -> Result<Candidate, WorkflowError> {
        let candidate = self.update_candidate(id, |candidate| candidate.notes = notes.to_string())?;

        self.notifications.publish(NotificationDraft::success(
            "Notes Saved",
            format!("Your notes about {} have been saved.", candidate.name),
        ))?;
        Ok(candidate)
    }

    /// Books an interview and moves the candidate into the interview stage.
    pub fn schedule_interview(
        &self,
        id: CandidateId,
        slot: InterviewSlot,
    ) -> Result<Candidate, WorkflowError> {
        let candidate = self.update_candidate(id, |candidate| {
            candidate.status = CandidateStatus::Interview
        })?;

        self.notifications.publish(NotificationDraft::success(
            "Interview Scheduled",
            format!(
                "Interview with {} scheduled for {} ({}).",
                candidate.name,
                slot.starts_at.format("%b %-d, %Y %H:%M"),
                slot.format.label()
            ),
        ))?;
        info!(%id, starts_at = %slot.starts_at, "interview scheduled");
        Ok(candidate)
    }

    /// Edits the stored candidate in place and returns the result.
    fn update_candidate(
        &self,
        id: CandidateId,
        edit: impl FnOnce(&mut Candidate),
    ) -> Result<Candidate, WorkflowError> {
        EntityStore::<Candidate>::modify(self.store.as_ref(), id, |candidate| {
            edit(candidate);
            candidate.clone()
        })
        .map_err(located::<Candidate>(id))
    }

    pub fn candidate_documents(&self, id: CandidateId) -> Result<Vec<DocumentView>, WorkflowError> {
        let candidate = self.get::<Candidate>(id)?;
        Ok(candidate
            .documents
            .into_iter()
            .map(|document| DocumentView {
                content_type: mime_guess::from_path(&document.file_name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string(),
                file_name: document.file_name,
                kind: document.kind,
            })
            .collect())
    }
}

/// Strict mode refuses actions the current status does not offer, except re-applying it.
fn check_offered<E: Moderated>(
    strict: bool,
    previous: E::Status,
    action: ModerationAction,
    target: Option<E::Status>,
) -> Result<(), WorkflowError> {
    if strict && target != Some(previous) && !E::available_actions(previous).contains(&action) {
        return Err(WorkflowError::ActionUnavailable {
            action,
            status: E::status_label(previous),
        });
    }
    Ok(())
}

fn located<E: Moderated>(id: E::Id) -> impl FnOnce(StoreError) -> WorkflowError {
    move |err| match err {
        StoreError::NotFound => WorkflowError::NotFound(E::entity_ref(id)),
        other => WorkflowError::Store(other),
    }
}

fn transition_notice<E: Moderated>(
    name: &str,
    action: ModerationAction,
    justification: Option<&Justification>,
) -> NotificationDraft {
    let title = format!("{} {}", E::KIND.label(), action.past_tense());
    let mut message = match action {
        ModerationAction::Delete => format!("{name} has been permanently deleted."),
        ModerationAction::Interview => format!("{name} has been moved to the interview stage."),
        other => format!("{name} has been {}.", other.past_tense().to_lowercase()),
    };
    if let Some(reason) = justification {
        message.push_str(&format!(" Reason: {}", reason.as_str()));
    }
    NotificationDraft::new(action.notification_kind(), title, message)
}

/// Error raised by the moderation service.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("please provide a reason for {}", .action.reason_noun())]
    JustificationRequired { action: ModerationAction },
    #[error("{action} does not apply to a {}", .kind.label().to_lowercase())]
    UnsupportedAction {
        action: ModerationAction,
        kind: EntityKind,
    },
    #[error("{action} is not available while the status is {status}")]
    ActionUnavailable {
        action: ModerationAction,
        status: &'static str,
    },
    #[error("{0} not found")]
    NotFound(EntityRef),
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl WorkflowError {
    /// Input problems the caller can fix, as opposed to infrastructure failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::JustificationRequired { .. }
                | Self::UnsupportedAction { .. }
                | Self::ActionUnavailable { .. }
                | Self::InvalidRating(_)
        )
    }
}
