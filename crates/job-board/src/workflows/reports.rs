//! CSV exports over the board collections.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::workflows::moderation::domain::{Candidate, Job, JobStatus, User};
use crate::workflows::moderation::store::{BoardStore, EntityStore, StoreError};
use crate::workflows::notifications::{
    Notification, NotificationDraft, NotificationPublisher, NotifyError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Users,
    Jobs,
    #[serde(alias = "applications")]
    Candidates,
    Companies,
    /// Record counts per collection and status.
    System,
}

impl ReportKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Jobs => "Jobs",
            Self::Candidates => "Applications",
            Self::Companies => "Companies",
            Self::System => "System",
        }
    }

    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Jobs => "jobs",
            Self::Candidates => "applications",
            Self::Companies => "companies",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Window of record dates a report covers, counted back from the day it is generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportRange {
    #[serde(rename = "last-7-days")]
    Last7Days,
    #[default]
    #[serde(rename = "last-30-days")]
    Last30Days,
    #[serde(rename = "last-90-days")]
    Last90Days,
    #[serde(rename = "last-year")]
    LastYear,
    #[serde(rename = "all-time")]
    AllTime,
}

impl ReportRange {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 Days",
            Self::Last30Days => "Last 30 Days",
            Self::Last90Days => "Last 90 Days",
            Self::LastYear => "Last Year",
            Self::AllTime => "All Time",
        }
    }

    fn days(self) -> Option<i64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::LastYear => Some(365),
            Self::AllTime => None,
        }
    }

    pub fn contains(self, date: NaiveDate, as_of: NaiveDate) -> bool {
        match self.days() {
            Some(days) => date <= as_of && date > as_of - Duration::days(days),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    pub kind: ReportKind,
    pub range: ReportRange,
    pub as_of: NaiveDate,
    pub rows: usize,
    #[serde(skip)]
    pub csv: String,
    pub notification: Notification,
}

impl GeneratedReport {
    pub fn file_name(&self) -> String {
        format!("{}-report-{}.csv", self.kind.file_stem(), self.as_of)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),
    #[error("report output was not valid utf-8")]
    Encoding,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

#[derive(Serialize)]
struct UserRow<'a> {
    id: u64,
    name: &'a str,
    email: &'a str,
    role: &'a str,
    company: &'a str,
    registered: NaiveDate,
    status: &'a str,
}

#[derive(Serialize)]
struct JobRow<'a> {
    id: u64,
    title: &'a str,
    company: &'a str,
    department: &'a str,
    location: &'a str,
    applications: u32,
    posted: NaiveDate,
    status: &'a str,
}

#[derive(Serialize)]
struct CandidateRow<'a> {
    id: u64,
    name: &'a str,
    email: &'a str,
    university: &'a str,
    position: &'a str,
    skills: String,
    applied: NaiveDate,
    status: &'a str,
    rating: Option<u8>,
}

#[derive(Serialize)]
struct CompanyRow<'a> {
    company: &'a str,
    jobs: usize,
    active_jobs: usize,
    applications: u32,
}

const USER_HEADERS: [&str; 7] = [
    "ID",
    "Name",
    "Email",
    "Role",
    "Company",
    "Registered",
    "Status",
];
const JOB_HEADERS: [&str; 8] = [
    "ID",
    "Title",
    "Company",
    "Department",
    "Location",
    "Applications",
    "Posted",
    "Status",
];
const CANDIDATE_HEADERS: [&str; 9] = [
    "ID",
    "Name",
    "Email",
    "University",
    "Position",
    "Skills",
    "Applied",
    "Status",
    "Rating",
];
const COMPANY_HEADERS: [&str; 4] = ["Company", "Jobs", "Active Jobs", "Applications"];
const SYSTEM_HEADERS: [&str; 3] = ["Collection", "Status", "Count"];

/// Header row is written up front so an empty report still names its columns.
fn csv_writer(headers: &[&str]) -> Result<csv::Writer<Vec<u8>>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    Ok(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ReportError> {
    let bytes = writer
        .into_inner()
        .map_err(|error| ReportError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| ReportError::Encoding)
}

fn users_csv(users: &[User]) -> Result<String, ReportError> {
    let mut writer = csv_writer(&USER_HEADERS)?;
    for user in users {
        writer.serialize(UserRow {
            id: user.id.0,
            name: &user.name,
            email: &user.email,
            role: user.role.label(),
            company: &user.company,
            registered: user.registered_date,
            status: user.status.label(),
        })?;
    }
    finish(writer)
}

fn jobs_csv(jobs: &[Job]) -> Result<String, ReportError> {
    let mut writer = csv_writer(&JOB_HEADERS)?;
    for job in jobs {
        writer.serialize(JobRow {
            id: job.id.0,
            title: &job.title,
            company: &job.company,
            department: &job.department,
            location: &job.location,
            applications: job.applications,
            posted: job.posted_date,
            status: job.status.label(),
        })?;
    }
    finish(writer)
}

fn candidates_csv(candidates: &[Candidate]) -> Result<String, ReportError> {
    let mut writer = csv_writer(&CANDIDATE_HEADERS)?;
    for candidate in candidates {
        writer.serialize(CandidateRow {
            id: candidate.id.0,
            name: &candidate.name,
            email: &candidate.email,
            university: &candidate.university,
            position: &candidate.position,
            skills: candidate.skills.join("; "),
            applied: candidate.applied_date,
            status: candidate.status.label(),
            rating: candidate.rating,
        })?;
    }
    finish(writer)
}

/// One row per company with postings in range, alphabetical.
fn companies_csv(jobs: &[Job]) -> Result<(String, usize), ReportError> {
    let mut totals: BTreeMap<&str, (usize, usize, u32)> = BTreeMap::new();
    for job in jobs {
        let entry = totals.entry(job.company.as_str()).or_default();
        entry.0 += 1;
        if job.status == JobStatus::Active {
            entry.1 += 1;
        }
        entry.2 += job.applications;
    }

    let mut writer = csv_writer(&COMPANY_HEADERS)?;
    for (company, (jobs, active_jobs, applications)) in &totals {
        writer.serialize(CompanyRow {
            company,
            jobs: *jobs,
            active_jobs: *active_jobs,
            applications: *applications,
        })?;
    }
    Ok((finish(writer)?, totals.len()))
}

/// Status tallies grouped by collection; statuses sort alphabetically within each.
fn system_csv(
    users: &[User],
    jobs: &[Job],
    candidates: &[Candidate],
) -> Result<(String, usize), ReportError> {
    fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> BTreeMap<&'a str, usize> {
        let mut counts = BTreeMap::new();
        for label in labels {
            *counts.entry(label).or_default() += 1;
        }
        counts
    }

    let collections = [
        ("Users", tally(users.iter().map(|user| user.status.label()))),
        ("Jobs", tally(jobs.iter().map(|job| job.status.label()))),
        (
            "Candidates",
            tally(candidates.iter().map(|candidate| candidate.status.label())),
        ),
    ];

    let mut writer = csv_writer(&SYSTEM_HEADERS)?;
    let mut rows = 0;
    for (collection, counts) in &collections {
        for (status, count) in counts {
            writer.write_record([*collection, *status, count.to_string().as_str()])?;
            rows += 1;
        }
    }
    Ok((finish(writer)?, rows))
}

pub struct ReportService<S, N> {
    store: Arc<S>,
    notifications: Arc<N>,
}

impl<S, N> ReportService<S, N>
where
    S: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(store: Arc<S>, notifications: Arc<N>) -> Self {
        Self {
            store,
            notifications,
        }
    }

    pub fn generate(
        &self,
        kind: ReportKind,
        range: ReportRange,
        as_of: NaiveDate,
    ) -> Result<GeneratedReport, ReportError> {
        let store = self.store.as_ref();
        let (csv, rows) = match kind {
            ReportKind::Users => {
                let users = users_in_range(store, range, as_of)?;
                (users_csv(&users)?, users.len())
            }
            ReportKind::Jobs => {
                let jobs = jobs_in_range(store, range, as_of)?;
                (jobs_csv(&jobs)?, jobs.len())
            }
            ReportKind::Candidates => {
                let candidates = candidates_in_range(store, range, as_of)?;
                (candidates_csv(&candidates)?, candidates.len())
            }
            ReportKind::Companies => companies_csv(&jobs_in_range(store, range, as_of)?)?,
            ReportKind::System => system_csv(
                &users_in_range(store, range, as_of)?,
                &jobs_in_range(store, range, as_of)?,
                &candidates_in_range(store, range, as_of)?,
            )?,
        };

        let notification = self.notifications.publish(NotificationDraft::success(
            "Report Generated",
            format!(
                "{} report for {} has been generated and is ready for download.",
                kind.label(),
                range.label().to_lowercase()
            ),
        ))?;
        info!(%kind, rows, "report generated");

        Ok(GeneratedReport {
            kind,
            range,
            as_of,
            rows,
            csv,
            notification,
        })
    }
}

fn users_in_range<S: BoardStore>(
    store: &S,
    range: ReportRange,
    as_of: NaiveDate,
) -> Result<Vec<User>, ReportError> {
    Ok(EntityStore::<User>::list(store)?
        .into_iter()
        .filter(|user| range.contains(user.registered_date, as_of))
        .collect())
}

fn candidates_in_range<S: BoardStore>(
    store: &S,
    range: ReportRange,
    as_of: NaiveDate,
) -> Result<Vec<Candidate>, ReportError> {
    Ok(EntityStore::<Candidate>::list(store)?
        .into_iter()
        .filter(|candidate| range.contains(candidate.applied_date, as_of))
        .collect())
}

fn jobs_in_range<S: BoardStore>(
    store: &S,
    range: ReportRange,
    as_of: NaiveDate,
) -> Result<Vec<Job>, ReportError> {
    Ok(EntityStore::<Job>::list(store)?
        .into_iter()
        .filter(|job| range.contains(job.posted_date, as_of))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::moderation::InMemoryBoard;
    use crate::workflows::notifications::NotificationCenter;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date")
    }

    fn service() -> (
        ReportService<InMemoryBoard, NotificationCenter>,
        Arc<NotificationCenter>,
    ) {
        let center = Arc::new(NotificationCenter::new());
        let service = ReportService::new(Arc::new(InMemoryBoard::seeded()), center.clone());
        (service, center)
    }

    #[test]
    fn users_report_has_header_and_one_row_per_user() {
        let (service, center) = service();

        let report = service
            .generate(ReportKind::Users, ReportRange::AllTime, as_of())
            .expect("report");

        let lines: Vec<_> = report.csv.lines().collect();
        assert_eq!(lines[0], "ID,Name,Email,Role,Company,Registered,Status");
        assert_eq!(
            lines[1],
            "1,Sarah Wilson,sarah@techcorp.com,Recruiter,TechCorp Inc,2024-01-20,Pending"
        );
        assert_eq!(report.rows, 3);
        assert_eq!(lines.len(), 4);
        assert_eq!(report.file_name(), "users-report-2024-01-31.csv");

        let latest = center.latest().expect("latest").expect("notification");
        assert_eq!(latest.title, "Report Generated");
        assert_eq!(
            latest.message,
            "Users report for all time has been generated and is ready for download."
        );
    }

    #[test]
    fn range_limits_rows_by_record_date() {
        let (service, _) = service();

        let report = service
            .generate(
                ReportKind::Jobs,
                ReportRange::Last7Days,
                NaiveDate::from_ymd_opt(2024, 1, 21).expect("valid"),
            )
            .expect("report");

        // Jobs posted on Jan 20 and Jan 18 fall inside the window; Jan 10 does not.
        assert_eq!(report.rows, 2);
        assert!(!report.csv.contains("Marketing Associate"));
    }

    #[test]
    fn candidate_skills_are_joined_in_one_field() {
        let (service, _) = service();

        let report = service
            .generate(ReportKind::Candidates, ReportRange::Last30Days, as_of())
            .expect("report");

        let carol = report
            .csv
            .lines()
            .find(|line| line.starts_with("3,"))
            .expect("carol row");
        assert_eq!(
            carol,
            "3,Carol Davis,carol.davis@harvard.edu,Harvard,Marketing Associate,\
             Digital Marketing; SEO; Analytics,2024-01-14,Interview,"
        );
        assert!(report.csv.contains(",Reviewed,4"));
    }

    #[test]
    fn companies_report_aggregates_postings() {
        let (service, _) = service();

        let report = service
            .generate(ReportKind::Companies, ReportRange::AllTime, as_of())
            .expect("report");

        let lines: Vec<_> = report.csv.lines().collect();
        assert_eq!(
            lines,
            [
                "Company,Jobs,Active Jobs,Applications",
                "DataCorp,1,0,32",
                "TechCorp Inc,2,2,73",
            ]
        );
        assert_eq!(report.rows, 2);
    }

    #[test]
    fn system_report_counts_records_by_status() {
        let (service, center) = service();

        let report = service
            .generate(ReportKind::System, ReportRange::AllTime, as_of())
            .expect("report");

        let lines: Vec<_> = report.csv.lines().collect();
        assert_eq!(
            lines,
            [
                "Collection,Status,Count",
                "Users,Active,1",
                "Users,Pending,1",
                "Users,Suspended,1",
                "Jobs,Active,2",
                "Jobs,Closed,1",
                "Candidates,Interview,1",
                "Candidates,New,1",
                "Candidates,Reviewed,1",
            ]
        );
        assert_eq!(report.rows, 8);
        assert_eq!(report.file_name(), "system-report-2024-01-31.csv");
        assert!(center
            .latest()
            .expect("latest")
            .expect("notification")
            .message
            .starts_with("System report for all time"));
    }

    #[test]
    fn empty_range_still_writes_header() {
        let (service, _) = service();

        let report = service
            .generate(
                ReportKind::Users,
                ReportRange::Last7Days,
                NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid"),
            )
            .expect("report");

        assert_eq!(report.rows, 0);
        assert_eq!(report.csv, "ID,Name,Email,Role,Company,Registered,Status\n");
    }

    #[test]
    fn applications_alias_selects_candidates() {
        let kind: ReportKind = serde_json::from_str("\"applications\"").expect("alias");
        assert_eq!(kind, ReportKind::Candidates);
        let range: ReportRange = serde_json::from_str("\"last-90-days\"").expect("range");
        assert_eq!(range, ReportRange::Last90Days);
    }
}
