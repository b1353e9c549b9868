use super::common::*;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::WorkflowConfig;
use crate::workflows::moderation::domain::{
    Candidate, CandidateId, CandidateStatus, EntityKind, EntityRef, Job, JobId, JobStatus, User,
    UserId, UserStatus,
};
use crate::workflows::moderation::store::StoreError;
use crate::workflows::moderation::{
    EntityFilter, InterviewFormat, InterviewSlot, ModerationAction, ModerationService,
    WorkflowError, ADMIN_DASHBOARD_PATH,
};
use crate::workflows::notifications::{NotificationCenter, NotificationKind, NotifyError};

#[test]
fn approve_moves_pending_user_and_announces_it() {
    let (service, board, center) = build_service();

    let outcome = service
        .transition::<User>(UserId(1), ModerationAction::Approve, None)
        .expect("approve succeeds");

    assert_eq!(outcome.previous_status, "Pending");
    assert_eq!(outcome.current_status, Some("Approved"));
    assert!(outcome.justification.is_none());
    assert!(outcome.redirect.is_none());

    let stored = users(&board);
    assert_eq!(stored[0].status, UserStatus::Approved);
    assert!(stored[0].status.is_in_good_standing());

    let latest = center.latest().expect("latest").expect("notification");
    assert_eq!(latest.title, "User Approved");
    assert_eq!(latest.message, "Sarah Wilson has been approved.");
    assert_eq!(latest.kind, NotificationKind::Success);
}

#[test]
fn blank_justification_leaves_status_untouched() {
    let (service, board, center) = build_service();
    let before = jobs(&board);

    for reason in [None, Some(""), Some("   \n\t")] {
        match service.transition::<Job>(JobId(1), ModerationAction::Reject, reason) {
            Err(WorkflowError::JustificationRequired { action }) => {
                assert_eq!(action, ModerationAction::Reject)
            }
            other => panic!("expected justification error, got {other:?}"),
        }
    }

    assert_eq!(jobs(&board), before);
    let latest = center.latest().expect("latest").expect("notification");
    assert_eq!(latest.title, "Error");
    assert_eq!(latest.message, "Please provide a reason for rejection.");
    assert_eq!(latest.kind, NotificationKind::Error);
    assert_eq!(center.list().expect("list").len(), 3);
}

#[test]
fn justification_is_trimmed_and_appended_to_the_notice() {
    let (service, board, center) = build_service();

    let outcome = service
        .transition::<User>(
            UserId(2),
            ModerationAction::Suspend,
            Some("  Repeated spam applications  "),
        )
        .expect("suspend succeeds");

    assert_eq!(
        outcome.justification.as_ref().map(|reason| reason.as_str()),
        Some("Repeated spam applications")
    );
    assert_eq!(users(&board)[1].status, UserStatus::Suspended);

    let latest = center.latest().expect("latest").expect("notification");
    assert_eq!(latest.title, "User Suspended");
    assert_eq!(
        latest.message,
        "John Smith has been suspended. Reason: Repeated spam applications"
    );
    assert_eq!(latest.kind, NotificationKind::Warning);
}

#[test]
fn reapplying_current_status_is_idempotent() {
    let (service, board, center) = build_service();

    for _ in 0..2 {
        let outcome = service
            .transition::<Candidate>(CandidateId(1), ModerationAction::Approve, None)
            .expect("approve succeeds");
        assert_eq!(outcome.current_status, Some("Approved"));
    }

    let stored = candidates(&board);
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].status, CandidateStatus::Approved);
    assert_eq!(center.list().expect("list").len(), 2);
}

#[test]
fn delete_removes_exactly_one_user_and_redirects() {
    let (service, board, center) = build_service();
    let before = users(&board);

    let outcome = service
        .transition::<User>(UserId(2), ModerationAction::Delete, Some("Duplicate account"))
        .expect("delete succeeds");

    assert_eq!(outcome.current_status, None);
    let redirect = outcome.redirect.expect("user deletion redirects");
    assert_eq!(redirect.location, ADMIN_DASHBOARD_PATH);
    assert_eq!(redirect.after_ms, 2000);

    let after = users(&board);
    let expected: Vec<_> = before.into_iter().filter(|user| user.id != UserId(2)).collect();
    assert_eq!(after, expected);

    let latest = center.latest().expect("latest").expect("notification");
    assert_eq!(latest.title, "User Deleted");
    assert_eq!(
        latest.message,
        "John Smith has been permanently deleted. Reason: Duplicate account"
    );
}

#[test]
fn deleting_a_job_does_not_redirect() {
    let (service, board, _) = build_service();

    let outcome = service
        .transition::<Job>(JobId(3), ModerationAction::Delete, Some("Filled offline"))
        .expect("delete succeeds");

    assert!(outcome.redirect.is_none());
    assert_eq!(jobs(&board).len(), 2);
}

#[test]
fn unsupported_action_is_refused_before_justification() {
    let (service, board, center) = build_service();

    match service.transition::<Job>(JobId(1), ModerationAction::Ban, None) {
        Err(WorkflowError::UnsupportedAction { action, kind }) => {
            assert_eq!(action, ModerationAction::Ban);
            assert_eq!(kind, EntityKind::Job);
        }
        other => panic!("expected unsupported action, got {other:?}"),
    }

    assert_eq!(jobs(&board)[0].status, JobStatus::Active);
    assert!(center.list().expect("list").is_empty());
}

#[test]
fn missing_entity_is_not_found() {
    let (service, _, _) = build_service();

    match service.transition::<Candidate>(CandidateId(99), ModerationAction::Review, None) {
        Err(WorkflowError::NotFound(EntityRef::Candidate(CandidateId(99)))) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn permissive_mode_allows_any_supported_action() {
    let (service, board, _) = build_service();

    service
        .transition::<User>(UserId(3), ModerationAction::Approve, None)
        .expect("permissive approve");

    assert_eq!(users(&board)[2].status, UserStatus::Approved);
}

#[test]
fn strict_mode_refuses_actions_the_status_does_not_offer() {
    let (service, board, _) = strict_service();

    match service.transition::<Job>(JobId(2), ModerationAction::Reject, Some("Spam")) {
        Err(WorkflowError::ActionUnavailable { action, status }) => {
            assert_eq!(action, ModerationAction::Reject);
            assert_eq!(status, "Closed");
        }
        other => panic!("expected unavailable action, got {other:?}"),
    }
    assert_eq!(jobs(&board)[1].status, JobStatus::Closed);

    service
        .transition::<Job>(JobId(2), ModerationAction::Close, None)
        .expect("re-closing a closed job is idempotent");
    service
        .transition::<Job>(JobId(2), ModerationAction::Reactivate, None)
        .expect("reactivate is offered for closed jobs");
    assert_eq!(jobs(&board)[1].status, JobStatus::Active);
}

#[test]
fn list_applies_search_and_status_filter() {
    let (service, _, _) = build_service();

    let techcorp = service
        .list::<Job>(&EntityFilter::search("techcorp"))
        .expect("list jobs");
    let titles: Vec<_> = techcorp.iter().map(|job| job.title.as_str()).collect();
    assert_eq!(titles, ["Software Engineer", "Marketing Associate"]);

    let closed = service
        .list::<Job>(&EntityFilter::default().with_status(JobStatus::Closed))
        .expect("list jobs");
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].id, JobId(2));

    let by_university = service
        .list::<Candidate>(&EntityFilter::search("harvard"))
        .expect("list candidates");
    assert_eq!(by_university.len(), 1);
    assert_eq!(by_university[0].name, "Carol Davis");

    let by_skill = service
        .list::<Candidate>(&EntityFilter::search("seo"))
        .expect("list candidates");
    assert!(by_skill.is_empty());
}

#[test]
fn available_actions_follow_current_status() {
    let (service, _, _) = build_service();

    assert_eq!(
        service.available_actions::<User>(UserId(1)).expect("actions"),
        &[ModerationAction::Approve, ModerationAction::Reject]
    );
    assert_eq!(
        service.available_actions::<Candidate>(CandidateId(3)).expect("actions"),
        &[
            ModerationAction::Approve,
            ModerationAction::Reject,
            ModerationAction::Delete
        ]
    );
}

#[test]
fn rating_outside_range_is_rejected() {
    let (service, board, _) = build_service();

    for rating in [0, 6] {
        assert!(matches!(
            service.rate_candidate(CandidateId(1), rating),
            Err(WorkflowError::InvalidRating(value)) if value == rating
        ));
    }
    assert_eq!(candidates(&board)[0].rating, None);

    let rated = service.rate_candidate(CandidateId(1), 5).expect("valid rating");
    assert_eq!(rated.rating, Some(5));
    assert_eq!(candidates(&board)[0].rating, Some(5));
}

#[test]
fn notes_are_saved_on_the_candidate() {
    let (service, board, center) = build_service();

    service
        .save_candidate_notes(CandidateId(2), "Strong AWS background")
        .expect("notes saved");

    assert_eq!(candidates(&board)[1].notes, "Strong AWS background");
    let latest = center.latest().expect("latest").expect("notification");
    assert_eq!(latest.title, "Notes Saved");
}

#[test]
fn scheduling_an_interview_moves_candidate_to_interview() {
    let (service, board, center) = build_service();
    let slot = InterviewSlot {
        starts_at: NaiveDate::from_ymd_opt(2024, 2, 1)
            .and_then(|date| date.and_hms_opt(10, 30, 0))
            .expect("valid slot"),
        format: InterviewFormat::Video,
    };

    let candidate = service
        .schedule_interview(CandidateId(1), slot)
        .expect("interview scheduled");

    assert_eq!(candidate.status, CandidateStatus::Interview);
    assert_eq!(candidates(&board)[0].status, CandidateStatus::Interview);
    let latest = center.latest().expect("latest").expect("notification");
    assert_eq!(
        latest.message,
        "Interview with Alice Johnson scheduled for Feb 1, 2024 10:30 (video call)."
    );
}

#[test]
fn documents_carry_guessed_content_type() {
    let (service, _, _) = build_service();

    let documents = service
        .candidate_documents(CandidateId(2))
        .expect("documents");

    let names: Vec<_> = documents.iter().map(|doc| doc.file_name.as_str()).collect();
    assert_eq!(names, ["bob_resume.pdf", "bob_cover.pdf"]);
    assert!(documents
        .iter()
        .all(|doc| doc.content_type == "application/pdf"));
}

#[test]
fn store_failures_propagate() {
    let service = ModerationService::new(
        Arc::new(UnavailableBoard),
        Arc::new(NotificationCenter::new()),
        WorkflowConfig::instant(),
    );

    match service.transition::<User>(UserId(1), ModerationAction::Approve, None) {
        Err(WorkflowError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected store failure, got {other:?}"),
    }
}

#[test]
fn publisher_failures_propagate() {
    let board = Arc::new(crate::workflows::moderation::InMemoryBoard::seeded());
    let service = ModerationService::new(
        board,
        Arc::new(OfflinePublisher),
        WorkflowConfig::instant(),
    );

    match service.transition::<Job>(JobId(1), ModerationAction::Close, None) {
        Err(WorkflowError::Notify(NotifyError::Unavailable(_))) => {}
        other => panic!("expected notify failure, got {other:?}"),
    }
}

#[test]
fn concurrent_rating_and_review_both_stick() {
    let (service, board, _) = build_service();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..100 {
                service.rate_candidate(CandidateId(1), 5).expect("rate");
            }
        });
        scope.spawn(|| {
            for _ in 0..100 {
                service
                    .transition::<Candidate>(CandidateId(1), ModerationAction::Review, None)
                    .expect("review");
            }
        });
    });

    let alice = candidates(&board)
        .into_iter()
        .find(|candidate| candidate.id == CandidateId(1))
        .expect("candidate present");
    assert_eq!(alice.rating, Some(5));
    assert_eq!(alice.status, CandidateStatus::Reviewed);
}

#[test]
fn strict_delete_refusal_keeps_the_record() {
    let (service, board, center) = strict_service();

    let err = service
        .transition::<User>(UserId(1), ModerationAction::Delete, Some("Duplicate"))
        .expect_err("pending users cannot be deleted");
    assert!(matches!(err, WorkflowError::ActionUnavailable { .. }));
    assert_eq!(err.to_string(), "delete is not available while the status is Pending");
    assert_eq!(users(&board).len(), 3);
    assert!(center.list().expect("list").is_empty());
}
