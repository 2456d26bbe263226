use std::sync::Arc;

use super::common::*;
use crate::workflows::submissions::domain::{
    CheckSeverity, CheckStatus, CoreDataStatus, Decision, EnrichmentStatus, ExtractionStatus,
    RankStatus, SubmissionId, WorkbenchKind, WorkflowStage, WorkflowState,
};
use crate::workflows::submissions::memory::{FailingDispatcher, InMemorySubmissionRepository};
use crate::workflows::submissions::service::{SubmissionWorkflowService, WorkflowError};

#[test]
fn intake_with_complete_fields_starts_pending_at_extraction() {
    let (service, _) = memory_service();
    let submission = service
        .intake(property_intake("SUB-2023-001"))
        .expect("intake succeeds");

    assert_eq!(
        submission.state,
        WorkflowState::Extraction(ExtractionStatus::Pending)
    );
    assert_eq!(submission.stage(), WorkflowStage::Extraction);
}

#[test]
fn intake_with_blank_fields_records_missing_data_items() {
    let (service, _) = memory_service();
    let submission = service
        .intake(incomplete_intake("SUB-2023-002"))
        .expect("intake succeeds");

    assert_eq!(
        submission.state,
        WorkflowState::Extraction(ExtractionStatus::NeedsInfo)
    );

    let detail = service.detail(&submission.id).expect("detail loads");
    let fields: Vec<_> = detail
        .missing_data
        .iter()
        .map(|item| item.field.as_str())
        .collect();
    assert_eq!(fields, vec!["broker", "lineOfBusiness"]);
    assert!(detail
        .missing_data
        .iter()
        .all(|item| item.severity == CheckSeverity::High));
}

#[test]
fn duplicate_finding_marks_submission_duplicate() {
    let (service, _) = memory_service();
    let original = service
        .intake(property_intake("SUB-2023-007"))
        .expect("original intake");
    let id = intake_at_core_data(&service, "SUB-2023-008");

    let updated = service
        .record_dedupe_finding(&id, duplicate_of(&original.id, 92))
        .expect("finding records");

    assert_eq!(
        updated.state,
        WorkflowState::CoreData(CoreDataStatus::Duplicate)
    );
    let detail = service.detail(&id).expect("detail loads");
    let duplicate = detail.duplicate_of.expect("duplicate info attached");
    assert_eq!(duplicate.match_confidence, 92);
}

#[test]
fn match_confidence_above_100_is_rejected_and_nothing_recorded() {
    let (service, _) = memory_service();
    let original = service
        .intake(property_intake("SUB-2023-007"))
        .expect("original intake");
    let id = intake_at_core_data(&service, "SUB-2023-009");

    match service.record_dedupe_finding(&id, duplicate_of(&original.id, 101)) {
        Err(WorkflowError::MatchConfidenceOutOfRange(101)) => {}
        other => panic!("expected out-of-range error, got {other:?}"),
    }

    let submission = service.submission(&id).expect("submission loads");
    assert_eq!(
        submission.state,
        WorkflowState::CoreData(CoreDataStatus::Processing)
    );
}

#[test]
fn compliance_checks_drive_enrichment_status() {
    let (service, _) = memory_service();
    let id = intake_at_enrichment(&service, "SUB-2023-010");

    for name in ["Sanctions screen", "KYC verification", "Financial standing"] {
        service
            .record_compliance_check(&id, name.to_string(), CheckStatus::Passed, None)
            .expect("check records");
    }
    let submission = service
        .record_compliance_check(&id, "Regulatory filing".to_string(), CheckStatus::Passed, None)
        .expect("check records");

    assert_eq!(
        submission.state,
        WorkflowState::Enrichment(EnrichmentStatus::Compliant)
    );
    let detail = service.detail(&id).expect("detail loads");
    assert_eq!(detail.compliance_progress, 100);
}

#[test]
fn guideline_scores_resolve_rank_and_attach_a_draft() {
    let (service, _) = memory_service();
    let id = rank_with_scores(&service, "SUB-2023-013", &[90, 85, 80, 85]);

    let submission = service.submission(&id).expect("submission loads");
    assert_eq!(submission.state, WorkflowState::Rank(RankStatus::Proceed));

    let detail = service.detail(&id).expect("detail loads");
    assert_eq!(detail.overall_score, Some(85));
    let draft = detail.draft.expect("draft attached once ranked");
    assert!(draft.contains("proceeding with the quotation"));
    assert!(draft.contains("SUB-2023-013"));
}

#[test]
fn override_advances_exactly_one_stage() {
    let (service, _) = memory_service();
    let submission = service
        .intake(property_intake("SUB-2023-003"))
        .expect("intake succeeds");

    let advanced = service
        .override_and_process(&submission.id)
        .expect("advance succeeds");
    assert_eq!(
        advanced.state,
        WorkflowState::CoreData(CoreDataStatus::Processing)
    );

    let advanced = service
        .override_and_process(&submission.id)
        .expect("advance succeeds");
    assert_eq!(
        advanced.state,
        WorkflowState::Enrichment(EnrichmentStatus::Processing)
    );

    let advanced = service
        .override_and_process(&submission.id)
        .expect("advance succeeds");
    assert_eq!(advanced.state, WorkflowState::Rank(RankStatus::Evaluating));
}

#[test]
fn override_at_the_final_stage_is_an_invalid_state_error() {
    let (service, _) = memory_service();
    let id = intake_at_rank(&service, "SUB-2023-004");

    match service.override_and_process(&id) {
        Err(WorkflowError::InvalidState { action, stage }) => {
            assert_eq!(action, "override-and-process");
            assert_eq!(stage, "rank");
        }
        other => panic!("expected invalid state, got {other:?}"),
    }

    let submission = service.submission(&id).expect("submission loads");
    assert_eq!(submission.state, WorkflowState::Rank(RankStatus::Evaluating));
}

#[test]
fn workbench_outside_rank_fails_and_leaves_state_unchanged() {
    let (service, _) = memory_service();
    let submission = service
        .intake(property_intake("SUB-2023-005"))
        .expect("intake succeeds");

    match service.send_to_workbench(&submission.id, WorkbenchKind::Survey) {
        Err(WorkflowError::InvalidState { action, stage }) => {
            assert_eq!(action, "send-to-workbench");
            assert_eq!(stage, "extraction");
        }
        other => panic!("expected invalid state, got {other:?}"),
    }

    let stored = service.submission(&submission.id).expect("submission loads");
    assert_eq!(stored.state, submission.state);
}

#[test]
fn workbench_at_rank_sets_survey_or_proceed() {
    let (service, _) = memory_service();
    let id = intake_at_rank(&service, "SUB-2023-014");

    let surveyed = service
        .send_to_workbench(&id, WorkbenchKind::Survey)
        .expect("survey handoff succeeds");
    assert_eq!(surveyed.state, WorkflowState::Rank(RankStatus::Survey));

    let quoted = service
        .send_to_workbench(&id, WorkbenchKind::Quote)
        .expect("quote handoff succeeds");
    assert_eq!(quoted.state, WorkflowState::Rank(RankStatus::Proceed));
}

#[test]
fn approve_and_send_dispatches_the_draft() {
    let (service, dispatcher) = memory_service();
    let id = rank_with_scores(&service, "SUB-2023-015", &[90, 85, 80, 85]);

    let approved = service.approve_and_send(&id).expect("approval succeeds");
    assert_eq!(
        approved.state,
        WorkflowState::Decided {
            stage: WorkflowStage::Rank,
            outcome: Decision::Approved,
        }
    );

    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, id);
    assert!(sent[0].1.contains("SUB-2023-015"));
}

#[test]
fn approval_commits_even_when_dispatch_fails() {
    let repository = Arc::new(InMemorySubmissionRepository::default());
    let service = SubmissionWorkflowService::new(repository, Arc::new(FailingDispatcher));
    let id = rank_with_scores_on(&service, "SUB-2023-016");

    match service.approve_and_send(&id) {
        Err(WorkflowError::Dispatch(_)) => {}
        other => panic!("expected dispatch failure, got {other:?}"),
    }

    let stored = service.submission(&id).expect("submission loads");
    assert!(stored.state.is_decided(), "approval must stay committed");
    assert_eq!(stored.status_label(), "approved");
}

fn rank_with_scores_on(
    service: &SubmissionWorkflowService<InMemorySubmissionRepository, FailingDispatcher>,
    reference: &str,
) -> SubmissionId {
    let submission = service
        .intake(property_intake(reference))
        .expect("intake succeeds");
    for _ in 0..3 {
        service
            .override_and_process(&submission.id)
            .expect("advance succeeds");
    }
    for factor in GUIDELINE_FACTORS {
        service
            .record_guideline_check(&submission.id, factor.to_string(), CheckStatus::Passed, 85, None)
            .expect("guideline factor records");
    }
    submission.id
}

#[test]
fn reject_is_terminal_and_keeps_the_stage_for_audit() {
    let (service, _) = memory_service();
    let id = intake_at_enrichment(&service, "SUB-2023-017");

    let rejected = service.reject(&id).expect("rejection succeeds");
    assert_eq!(
        rejected.state,
        WorkflowState::Decided {
            stage: WorkflowStage::Enrichment,
            outcome: Decision::Rejected,
        }
    );

    match service.override_and_process(&id) {
        Err(WorkflowError::InvalidState { .. }) => {}
        other => panic!("expected invalid state after sign-off, got {other:?}"),
    }
}

#[test]
fn feedback_overwrites_rather_than_duplicating() {
    let (service, _) = memory_service();
    let submission = service
        .intake(property_intake("SUB-2023-006"))
        .expect("intake succeeds");

    service
        .provide_feedback(&submission.id, true)
        .expect("feedback records");
    service
        .provide_feedback(&submission.id, true)
        .expect("feedback records again");

    let detail = service.detail(&submission.id).expect("detail loads");
    assert_eq!(detail.feedback_positive, Some(true));

    service
        .provide_feedback(&submission.id, false)
        .expect("feedback overwrites");
    let detail = service.detail(&submission.id).expect("detail loads");
    assert_eq!(detail.feedback_positive, Some(false));

    let stored = service.submission(&submission.id).expect("submission loads");
    assert_eq!(stored.state, submission.state, "feedback never moves state");
}

#[test]
fn unknown_ids_surface_not_found() {
    let (service, _) = memory_service();
    let missing = SubmissionId("sub-999999".to_string());

    match service.approve_and_send(&missing) {
        Err(WorkflowError::NotFound(id)) => assert_eq!(id, missing),
        other => panic!("expected not found, got {other:?}"),
    }
    match service.provide_feedback(&missing, true) {
        Err(WorkflowError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn check_recording_outside_its_stage_is_invalid() {
    let (service, _) = memory_service();
    let id = intake_at_rank(&service, "SUB-2023-018");

    match service.record_missing_data(
        &id,
        "claimsHistory".to_string(),
        "Claims history not supplied".to_string(),
        CheckSeverity::Medium,
    ) {
        Err(WorkflowError::InvalidState { action, stage }) => {
            assert_eq!(action, "record-missing-data");
            assert_eq!(stage, "rank");
        }
        other => panic!("expected invalid state, got {other:?}"),
    }
}

#[test]
fn recent_honors_the_default_limit() {
    let (service, _) = memory_service();
    for day in 1..=12 {
        let mut intake = property_intake(&format!("SUB-2023-{day:03}"));
        intake.submission_date = date(2025, 4, day);
        service.intake(intake).expect("intake succeeds");
    }

    let recent = service.recent(None).expect("recent loads");
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].submission_date, date(2025, 4, 12));
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].submission_date >= pair[1].submission_date));
}
