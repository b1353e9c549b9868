use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw numeric identity shared by every entity id wrapper.
pub trait EntityId:
    Copy + Eq + std::hash::Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    fn raw(self) -> u64;
    fn from_raw(raw: u64) -> Self;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl EntityId for $name {
            fn raw(self) -> u64 {
                self.0
            }

            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered platform account.
    UserId
);
entity_id!(
    /// Identifier of a job posting.
    JobId
);
entity_id!(
    /// Identifier of a candidate application.
    CandidateId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Recruiter,
    Admin,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Recruiter => "Recruiter",
            Self::Admin => "Admin",
        }
    }
}

/// Account standing as seen by administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Pending,
    Active,
    Approved,
    Rejected,
    Suspended,
    Banned,
}

impl UserStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Suspended => "Suspended",
            Self::Banned => "Banned",
        }
    }

    /// `Active` and `Approved` grant the same platform access.
    pub const fn is_in_good_standing(self) -> bool {
        matches!(self, Self::Active | Self::Approved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Active,
    Closed,
    Rejected,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Closed => "Closed",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    New,
    Reviewed,
    Interview,
    Approved,
    Rejected,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Reviewed => "Reviewed",
            Self::Interview => "Interview",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub company: String,
    pub registered_date: NaiveDate,
    pub status: UserStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub department: String,
    pub location: String,
    pub applications: u32,
    pub posted_date: NaiveDate,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
    Transcript,
    Other,
}

/// File attached to an application; only the name is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub file_name: String,
    pub kind: DocumentKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    pub university: String,
    pub position: String,
    pub skills: Vec<String>,
    pub applied_date: NaiveDate,
    pub status: CandidateStatus,
    pub rating: Option<u8>,
    pub notes: String,
    pub documents: Vec<CandidateDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Job,
    Candidate,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Job => "Job",
            Self::Candidate => "Candidate",
        }
    }
}

/// Names exactly one entity of any kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    User(UserId),
    Job(JobId),
    Candidate(CandidateId),
}

impl EntityRef {
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::User(_) => EntityKind::User,
            Self::Job(_) => EntityKind::Job,
            Self::Candidate(_) => EntityKind::Candidate,
        }
    }

    pub const fn raw_id(self) -> u64 {
        match self {
            Self::User(id) => id.0,
            Self::Job(id) => id.0,
            Self::Candidate(id) => id.0,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind().label().to_lowercase(), self.raw_id())
    }
}
