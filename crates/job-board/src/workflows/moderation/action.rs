use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::notifications::NotificationKind;

/// Moderation and pipeline actions an admin or recruiter can take on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Approve,
    Reject,
    Suspend,
    Reactivate,
    Ban,
    Delete,
    Close,
    Review,
    Interview,
}

impl ModerationAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Suspend => "suspend",
            Self::Reactivate => "reactivate",
            Self::Ban => "ban",
            Self::Delete => "delete",
            Self::Close => "close",
            Self::Review => "review",
            Self::Interview => "interview",
        }
    }

    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Approve => "Approved",
            Self::Reject => "Rejected",
            Self::Suspend => "Suspended",
            Self::Reactivate => "Reactivated",
            Self::Ban => "Banned",
            Self::Delete => "Deleted",
            Self::Close => "Closed",
            Self::Review => "Reviewed",
            Self::Interview => "Moved to Interview",
        }
    }

    /// Negative actions must carry a written reason.
    pub const fn requires_justification(self) -> bool {
        matches!(self, Self::Reject | Self::Suspend | Self::Delete)
    }

    /// Noun used in the "please provide a reason for ..." prompt.
    pub const fn reason_noun(self) -> &'static str {
        match self {
            Self::Reject => "rejection",
            Self::Suspend => "suspension",
            Self::Delete => "deletion",
            _ => "this action",
        }
    }

    pub(crate) const fn notification_kind(self) -> NotificationKind {
        match self {
            Self::Approve | Self::Reactivate | Self::Review | Self::Interview => {
                NotificationKind::Success
            }
            Self::Suspend | Self::Close => NotificationKind::Warning,
            Self::Reject | Self::Ban | Self::Delete => NotificationKind::Error,
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trimmed, non-empty free-text reason collected alongside an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Justification(String);

impl Justification {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
