use std::sync::Arc;

use chrono::NaiveDate;

use crate::workflows::submissions::domain::{
    CheckStatus, DedupeFinding, DuplicateInfo, SubmissionId, SubmissionIntake,
};
use crate::workflows::submissions::memory::{InMemorySubmissionRepository, RecordingDispatcher};
use crate::workflows::submissions::service::SubmissionWorkflowService;

pub(crate) type MemoryService =
    SubmissionWorkflowService<InMemorySubmissionRepository, RecordingDispatcher>;

pub(crate) const GUIDELINE_FACTORS: [&str; 4] = [
    "Underwriting Guidelines",
    "Limits & Deductibles",
    "Pricing Factors",
    "Hazard Classification",
];

pub(crate) fn memory_service() -> (MemoryService, RecordingDispatcher) {
    let repository = Arc::new(InMemorySubmissionRepository::default());
    let dispatcher = RecordingDispatcher::default();
    let service = SubmissionWorkflowService::new(repository, Arc::new(dispatcher.clone()));
    (service, dispatcher)
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub(crate) fn property_intake(reference: &str) -> SubmissionIntake {
    SubmissionIntake {
        reference: reference.to_string(),
        client: "GreenTech Solutions Ltd.".to_string(),
        broker: "ABC Insurance Brokers".to_string(),
        submission_date: date(2025, 4, 24),
        line_of_business: "Property".to_string(),
        premium: Some(45_000),
        location: Some("55 Tech Drive, London, EC1A 1BB".to_string()),
        property_type: Some("Commercial Office Building".to_string()),
        coverage_amount: Some("£2,000,000".to_string()),
    }
}

pub(crate) fn incomplete_intake(reference: &str) -> SubmissionIntake {
    SubmissionIntake {
        broker: String::new(),
        line_of_business: String::new(),
        ..property_intake(reference)
    }
}

pub(crate) fn duplicate_of(original: &SubmissionId, confidence: u8) -> DedupeFinding {
    DedupeFinding::Duplicate(DuplicateInfo {
        original_submission_id: original.clone(),
        reference: "SUB-2023-007".to_string(),
        client: "Global Manufacturing".to_string(),
        broker: "Industrial Insurance".to_string(),
        submission_date: date(2025, 4, 20),
        match_confidence: confidence,
    })
}

pub(crate) fn intake_at_core_data(service: &MemoryService, reference: &str) -> SubmissionId {
    let submission = service
        .intake(property_intake(reference))
        .expect("intake succeeds");
    service
        .override_and_process(&submission.id)
        .expect("advance to core-data");
    submission.id
}

pub(crate) fn intake_at_enrichment(service: &MemoryService, reference: &str) -> SubmissionId {
    let id = intake_at_core_data(service, reference);
    service
        .override_and_process(&id)
        .expect("advance to enrichment");
    id
}

pub(crate) fn intake_at_rank(service: &MemoryService, reference: &str) -> SubmissionId {
    let id = intake_at_enrichment(service, reference);
    service.override_and_process(&id).expect("advance to rank");
    id
}

pub(crate) fn rank_with_scores(
    service: &MemoryService,
    reference: &str,
    scores: &[u8],
) -> SubmissionId {
    let id = intake_at_rank(service, reference);
    for (factor, score) in GUIDELINE_FACTORS.iter().cycle().zip(scores) {
        service
            .record_guideline_check(
                &id,
                factor.to_string(),
                CheckStatus::Passed,
                *score,
                None,
            )
            .expect("guideline factor records");
    }
    id
}
