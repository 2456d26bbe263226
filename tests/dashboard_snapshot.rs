use std::sync::Arc;

use chrono::NaiveDate;
use insureflow::workflows::submissions::{
    CheckStatus, InMemorySubmissionRepository, RecordingDispatcher, SubmissionIntake,
    SubmissionWorkflowService,
};

type MemoryService = SubmissionWorkflowService<InMemorySubmissionRepository, RecordingDispatcher>;

fn memory_service() -> MemoryService {
    SubmissionWorkflowService::new(
        Arc::new(InMemorySubmissionRepository::default()),
        Arc::new(RecordingDispatcher::default()),
    )
}

fn intake(reference: &str, client: &str, day: u32) -> SubmissionIntake {
    SubmissionIntake {
        reference: reference.to_string(),
        client: client.to_string(),
        broker: "Prime Insurance Brokers".to_string(),
        submission_date: NaiveDate::from_ymd_opt(2025, 4, day).expect("valid date"),
        line_of_business: "Property".to_string(),
        premium: None,
        location: None,
        property_type: None,
        coverage_amount: None,
    }
}

#[test]
fn an_empty_store_yields_zero_stats_and_a_complete_distribution() {
    let service = memory_service();
    let snapshot = service.dashboard().expect("snapshot builds");

    assert_eq!(snapshot.stats.total_submissions, 0);
    assert_eq!(snapshot.distribution.len(), 4);
    assert!(snapshot.distribution.iter().all(|entry| entry.value == 0));
    assert!(snapshot.pending_actions.is_empty());
    assert!(snapshot.recent.is_empty());
}

#[test]
fn distribution_covers_all_stages_and_sums_to_the_total() {
    let service = memory_service();

    // One submission left at each stage.
    service
        .intake(intake("SUB-2023-001", "GreenTech Solutions Ltd.", 24))
        .expect("intake");

    let core = service
        .intake(intake("SUB-2023-002", "Coffee Haven Ltd.", 23))
        .expect("intake");
    service.override_and_process(&core.id).expect("advance");

    let enrich = service
        .intake(intake("SUB-2023-003", "Parsian Evin Hotel Ltd.", 22))
        .expect("intake");
    service.override_and_process(&enrich.id).expect("advance");
    service.override_and_process(&enrich.id).expect("advance");

    let rank = service
        .intake(intake("SUB-2023-004", "TechStart Inc.", 21))
        .expect("intake");
    for _ in 0..3 {
        service.override_and_process(&rank.id).expect("advance");
    }

    let snapshot = service.dashboard().expect("snapshot builds");
    let values: Vec<_> = snapshot
        .distribution
        .iter()
        .map(|entry| entry.value)
        .collect();
    assert_eq!(values, vec![1, 1, 1, 1]);
    let total: usize = values.iter().sum();
    assert_eq!(total, snapshot.stats.total_submissions);
}

#[test]
fn mutations_are_reflected_on_the_next_snapshot() {
    let service = memory_service();
    let submission = service
        .intake(intake("SUB-2023-005", "Global Logistics", 20))
        .expect("intake");
    service
        .override_and_process(&submission.id)
        .expect("advance");
    service
        .override_and_process(&submission.id)
        .expect("advance");

    let before = service.dashboard().expect("snapshot builds");
    assert_eq!(before.stats.in_progress_submissions, 1);
    assert_eq!(before.stats.compliant_submissions, 0);

    for name in ["Sanctions screen", "KYC verification"] {
        service
            .record_compliance_check(&submission.id, name.to_string(), CheckStatus::Passed, None)
            .expect("compliance check records");
    }

    let after = service.dashboard().expect("snapshot builds");
    assert_eq!(after.stats.in_progress_submissions, 0);
    assert_eq!(after.stats.compliant_submissions, 1);
}

#[test]
fn recent_submissions_come_back_newest_first() {
    let service = memory_service();
    for day in [3, 1, 2] {
        service
            .intake(intake(
                &format!("SUB-2023-{day:03}"),
                "Retail Solutions",
                day,
            ))
            .expect("intake");
    }

    let snapshot = service.dashboard().expect("snapshot builds");
    let references: Vec<_> = snapshot
        .recent
        .iter()
        .map(|view| view.reference.as_str())
        .collect();
    assert_eq!(references, vec!["SUB-2023-003", "SUB-2023-002", "SUB-2023-001"]);
}
