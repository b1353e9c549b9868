use crate::infra::{parse_date, BoardServices};
use chrono::{Local, NaiveDate};
use clap::error::ErrorKind;
use clap::{Args, ValueEnum};
use job_board::config::{AppConfig, WorkflowConfig};
use job_board::error::AppError;
use job_board::workflows::moderation::{
    Candidate, CandidateId, DialogError, EntityFilter, EntityRef, EntityStore, InMemoryBoard,
    InterviewFormat, InterviewSlot, Job, JobId, ModerationAction, ModerationDialog,
    ModerationService, Moderated, TransitionOutcome, User, UserId, UserStatus,
};
use job_board::workflows::notifications::NotificationCenter;
use job_board::workflows::operations::SystemTask;
use job_board::workflows::reports::{ReportKind, ReportRange};
use job_board::workflows::settings::SettingKey;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

type BoardModeration = ModerationService<InMemoryBoard, NotificationCenter>;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Refuse transitions the current status does not offer
    #[arg(long)]
    pub(crate) strict: bool,
    /// Keep the simulated delays of system tasks instead of running them instantly
    #[arg(long)]
    pub(crate) realtime: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BoardKind {
    Users,
    Jobs,
    Candidates,
}

#[derive(Args, Debug)]
pub(crate) struct BoardListArgs {
    /// Collection to list
    #[arg(long, value_enum, default_value = "users")]
    pub(crate) kind: BoardKind,
    /// Case-insensitive search term
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Exact status, e.g. pending, closed, interview
    #[arg(long)]
    pub(crate) status: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct BoardReportArgs {
    /// users, jobs, applications, companies, or system
    #[arg(long, value_parser = parse_value::<ReportKind>)]
    pub(crate) kind: ReportKind,
    /// last-7-days, last-30-days, last-90-days, last-year, or all-time
    #[arg(long, value_parser = parse_value::<ReportRange>, default_value = "all-time")]
    pub(crate) range: ReportRange,
    /// Reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Write the CSV here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

/// Parses a CLI value through the same serde names the HTTP API accepts.
fn parse_value<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_lowercase()))
        .map_err(|_| format!("unrecognised value '{raw}'"))
}

fn offline_services(workflow: WorkflowConfig) -> Result<BoardServices, AppError> {
    let config = AppConfig::load()?;
    Ok(BoardServices::new(workflow, config.session.path))
}

fn filter_for<E: Moderated>(search: Option<String>, status: Option<&str>) -> EntityFilter<E::Status> {
    let status = status.map(|raw| {
        parse_value::<E::Status>(raw).unwrap_or_else(|message| {
            clap::Error::raw(
                ErrorKind::InvalidValue,
                format!("{message} for {} status\n", E::KIND.label().to_lowercase()),
            )
            .exit()
        })
    });
    EntityFilter { search, status }
}

pub(crate) fn run_board_list(args: BoardListArgs) -> Result<(), AppError> {
    let BoardListArgs {
        kind,
        search,
        status,
    } = args;
    let services = offline_services(WorkflowConfig::instant())?;
    let moderation = services.moderation.as_ref();

    match kind {
        BoardKind::Users => {
            let users = moderation.list::<User>(&filter_for::<User>(search, status.as_deref()))?;
            println!("{} user(s)", users.len());
            for user in users {
                println!(
                    "  #{:<3} {:<16} {:<24} {:<10} {:<14} {}",
                    user.id,
                    user.name,
                    user.email,
                    user.role.label(),
                    user.company,
                    user.status.label()
                );
            }
        }
        BoardKind::Jobs => {
            let jobs = moderation.list::<Job>(&filter_for::<Job>(search, status.as_deref()))?;
            println!("{} job(s)", jobs.len());
            for job in jobs {
                println!(
                    "  #{:<3} {:<22} {:<14} {:<18} {:>4} applications  {}",
                    job.id,
                    job.title,
                    job.company,
                    job.location,
                    job.applications,
                    job.status.label()
                );
            }
        }
        BoardKind::Candidates => {
            let candidates = moderation
                .list::<Candidate>(&filter_for::<Candidate>(search, status.as_deref()))?;
            println!("{} candidate(s)", candidates.len());
            for candidate in candidates {
                println!(
                    "  #{:<3} {:<14} {:<10} {:<26} {:<10} {}",
                    candidate.id,
                    candidate.name,
                    candidate.university,
                    candidate.position,
                    candidate.status.label(),
                    candidate.skills.join(", ")
                );
            }
        }
    }

    Ok(())
}

pub(crate) fn run_board_report(args: BoardReportArgs) -> Result<(), AppError> {
    let BoardReportArgs {
        kind,
        range,
        as_of,
        output,
    } = args;
    let services = offline_services(WorkflowConfig::instant())?;
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());

    let report = services.reports.generate(kind, range, as_of)?;
    match output {
        Some(path) => {
            std::fs::write(&path, report.csv.as_bytes())?;
            println!(
                "Wrote {} row(s) of the {} report to {}",
                report.rows,
                kind,
                path.display()
            );
        }
        None => print!("{}", report.csv),
    }
    Ok(())
}

fn print_outcome(outcome: &TransitionOutcome) {
    println!(
        "  {} {}: {} -> {}",
        outcome.entity,
        outcome.name,
        outcome.previous_status,
        outcome.current_status.unwrap_or("deleted")
    );
    println!(
        "    [{}] {}",
        outcome.notification.title, outcome.notification.message
    );
    if let Some(redirect) = &outcome.redirect {
        println!(
            "    redirecting to {} in {} ms",
            redirect.location, redirect.after_ms
        );
    }
}

/// Opens a dialog for one action, submits `reasons` in order until one is accepted.
fn confirm(
    moderation: &BoardModeration,
    target: EntityRef,
    action: ModerationAction,
    reasons: &[&str],
) -> Result<(), AppError> {
    let mut dialog = ModerationDialog::new();
    if let Err(err) = dialog.open(target, action) {
        println!("  dialog refused: {err}");
        return Ok(());
    }

    let attempts = if reasons.is_empty() { &[""][..] } else { reasons };
    for reason in attempts {
        dialog.edit(*reason);
        match dialog.submit(moderation) {
            Ok(outcome) => {
                print_outcome(&outcome);
                return Ok(());
            }
            Err(DialogError::Workflow(err)) if err.is_validation() => {
                println!("  {action} {target} refused: {err} (dialog still open)");
            }
            Err(DialogError::Workflow(err)) => return Err(err.into()),
            Err(err) => {
                println!("  dialog error: {err}");
                return Ok(());
            }
        }
    }

    dialog.cancel();
    println!("  dialog cancelled");
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { strict, realtime } = args;
    let mut workflow = if realtime {
        WorkflowConfig::default()
    } else {
        WorkflowConfig::instant()
    };
    workflow.strict_transitions = strict;

    let services = offline_services(workflow)?;
    let moderation = services.moderation.as_ref();

    println!("Job board moderation demo");
    let pending = moderation
        .list::<User>(&EntityFilter::default().with_status(UserStatus::Pending))?;
    println!("\nPending registrations: {}", pending.len());
    for user in &pending {
        println!("  {} <{}> from {}", user.name, user.email, user.company);
    }

    println!("\nUser moderation");
    confirm(moderation, EntityRef::User(UserId(1)), ModerationAction::Approve, &[])?;
    confirm(
        moderation,
        EntityRef::User(UserId(3)),
        ModerationAction::Delete,
        &["", "Fraudulent company details"],
    )?;

    println!("\nJob moderation");
    confirm(
        moderation,
        EntityRef::Job(JobId(3)),
        ModerationAction::Reject,
        &["  ", "Salary information missing"],
    )?;
    confirm(moderation, EntityRef::Job(JobId(2)), ModerationAction::Reactivate, &[])?;

    println!("\nCandidate pipeline");
    confirm(
        moderation,
        EntityRef::Candidate(CandidateId(1)),
        ModerationAction::Review,
        &[],
    )?;
    let slot = NaiveDate::from_ymd_opt(2024, 2, 1)
        .and_then(|date| date.and_hms_opt(10, 0, 0))
        .map(|starts_at| InterviewSlot {
            starts_at,
            format: InterviewFormat::Video,
        });
    if let Some(slot) = slot {
        let candidate = moderation.schedule_interview(CandidateId(1), slot)?;
        println!("  {} is now {}", candidate.name, candidate.status.label());
    }
    let rated = moderation.rate_candidate(CandidateId(1), 5)?;
    println!("  {} rated {}/5", rated.name, rated.rating.unwrap_or_default());
    confirm(
        moderation,
        EntityRef::Candidate(CandidateId(1)),
        ModerationAction::Approve,
        &[],
    )?;

    let board = services.board.as_ref();
    println!(
        "\nBoard now holds {} users, {} jobs, {} candidates",
        EntityStore::<User>::list(board)?.len(),
        EntityStore::<Job>::list(board)?.len(),
        EntityStore::<Candidate>::list(board)?.len()
    );

    println!("\nPlatform");
    let settings = services.settings.toggle(SettingKey::MaintenanceMode)?;
    println!("  maintenance mode: {}", settings.maintenance_mode);
    let report = services.operations.run(SystemTask::HealthCheck).await?;
    println!("  {}: {}", report.task, report.completed.title);
    let today = Local::now().date_naive();
    let users_report = services
        .reports
        .generate(ReportKind::Users, ReportRange::AllTime, today)?;
    println!(
        "  {} ready with {} row(s)",
        users_report.file_name(),
        users_report.rows
    );

    let notifications = services.notifications.list()?;
    println!(
        "\nNotifications ({} unread, newest first)",
        services.notifications.unread_count()?
    );
    for notification in notifications {
        println!(
            "  #{:<2} {:?} {}: {}",
            notification.id, notification.kind, notification.title, notification.message
        );
    }

    Ok(())
}
