use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::action::ModerationAction;
use super::domain::{
    Candidate, CandidateId, CandidateStatus, EntityId, EntityKind, EntityRef, Job, JobId,
    JobStatus, User, UserId, UserStatus,
};

/// Shared surface of every record that carries a moderated status.
pub trait Moderated: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    type Id: EntityId;
    type Status: Copy + Eq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> Self::Id;
    fn display_name(&self) -> &str;
    fn status(&self) -> Self::Status;
    fn set_status(&mut self, status: Self::Status);
    fn status_label(status: Self::Status) -> &'static str;

    /// Status an action moves this kind to; `None` when the action does not apply.
    /// Deletion never has a target status.
    fn target_status(action: ModerationAction) -> Option<Self::Status>;

    /// Actions offered from a status, the same set the dashboards expose as buttons.
    fn available_actions(status: Self::Status) -> &'static [ModerationAction];

    /// Case-insensitive substring match; `needle` is already lowercased.
    fn matches(&self, needle: &str) -> bool;

    fn entity_ref(id: Self::Id) -> EntityRef;

    fn supports(action: ModerationAction) -> bool {
        action == ModerationAction::Delete || Self::target_status(action).is_some()
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Moderated for User {
    type Id = UserId;
    type Status = UserStatus;

    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> UserId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> UserStatus {
        self.status
    }

    fn set_status(&mut self, status: UserStatus) {
        self.status = status;
    }

    fn status_label(status: UserStatus) -> &'static str {
        status.label()
    }

    fn target_status(action: ModerationAction) -> Option<UserStatus> {
        match action {
            ModerationAction::Approve => Some(UserStatus::Approved),
            ModerationAction::Reject => Some(UserStatus::Rejected),
            ModerationAction::Suspend => Some(UserStatus::Suspended),
            ModerationAction::Reactivate => Some(UserStatus::Active),
            ModerationAction::Ban => Some(UserStatus::Banned),
            _ => None,
        }
    }

    fn available_actions(status: UserStatus) -> &'static [ModerationAction] {
        use ModerationAction::*;
        match status {
            UserStatus::Pending => &[Approve, Reject],
            UserStatus::Active | UserStatus::Approved => &[Suspend, Ban, Delete],
            UserStatus::Suspended => &[Reactivate, Ban, Delete],
            UserStatus::Rejected => &[Approve, Delete],
            UserStatus::Banned => &[Delete],
        }
    }

    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || contains(&self.email, needle)
            || contains(&self.company, needle)
    }

    fn entity_ref(id: UserId) -> EntityRef {
        EntityRef::User(id)
    }
}

impl Moderated for Job {
    type Id = JobId;
    type Status = JobStatus;

    const KIND: EntityKind = EntityKind::Job;

    fn id(&self) -> JobId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn status(&self) -> JobStatus {
        self.status
    }

    fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }

    fn status_label(status: JobStatus) -> &'static str {
        status.label()
    }

    fn target_status(action: ModerationAction) -> Option<JobStatus> {
        match action {
            ModerationAction::Approve | ModerationAction::Reactivate => Some(JobStatus::Active),
            ModerationAction::Reject => Some(JobStatus::Rejected),
            ModerationAction::Close => Some(JobStatus::Closed),
            _ => None,
        }
    }

    fn available_actions(status: JobStatus) -> &'static [ModerationAction] {
        use ModerationAction::*;
        match status {
            JobStatus::Active => &[Close, Reject, Delete],
            JobStatus::Closed => &[Reactivate, Delete],
            JobStatus::Rejected => &[Approve, Delete],
        }
    }

    fn matches(&self, needle: &str) -> bool {
        contains(&self.title, needle) || contains(&self.company, needle)
    }

    fn entity_ref(id: JobId) -> EntityRef {
        EntityRef::Job(id)
    }
}

impl Moderated for Candidate {
    type Id = CandidateId;
    type Status = CandidateStatus;

    const KIND: EntityKind = EntityKind::Candidate;

    fn id(&self) -> CandidateId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> CandidateStatus {
        self.status
    }

    fn set_status(&mut self, status: CandidateStatus) {
        self.status = status;
    }

    fn status_label(status: CandidateStatus) -> &'static str {
        status.label()
    }

    fn target_status(action: ModerationAction) -> Option<CandidateStatus> {
        match action {
            ModerationAction::Approve => Some(CandidateStatus::Approved),
            ModerationAction::Reject => Some(CandidateStatus::Rejected),
            ModerationAction::Review => Some(CandidateStatus::Reviewed),
            ModerationAction::Interview => Some(CandidateStatus::Interview),
            _ => None,
        }
    }

    fn available_actions(status: CandidateStatus) -> &'static [ModerationAction] {
        use ModerationAction::*;
        match status {
            CandidateStatus::New => &[Review, Interview, Approve, Reject, Delete],
            CandidateStatus::Reviewed => &[Interview, Approve, Reject, Delete],
            CandidateStatus::Interview => &[Approve, Reject, Delete],
            CandidateStatus::Approved | CandidateStatus::Rejected => &[Delete],
        }
    }

    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
            || contains(&self.email, needle)
            || contains(&self.university, needle)
    }

    fn entity_ref(id: CandidateId) -> EntityRef {
        EntityRef::Candidate(id)
    }
}
