use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

use insureflow::workflows::submissions::{
    CheckSeverity, CheckStatus, CommunicationDispatcher, DedupeFinding, DispatchError,
    DuplicateInfo, SubmissionId, SubmissionIntake, SubmissionRepository,
    SubmissionWorkflowService, WorkflowError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stand-in for the real communication collaborator: acknowledges every
/// dispatch and leaves a log line behind.
#[derive(Default, Clone)]
pub(crate) struct LoggingDispatcher;

impl CommunicationDispatcher for LoggingDispatcher {
    fn dispatch(&self, id: &SubmissionId, body: &str) -> Result<(), DispatchError> {
        info!(submission = %id, bytes = body.len(), "communication dispatched");
        Ok(())
    }
}

fn demo_date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, day).expect("valid demo date")
}

fn demo_intake(
    reference: &str,
    client: &str,
    broker: &str,
    day: u32,
    line_of_business: &str,
) -> SubmissionIntake {
    SubmissionIntake {
        reference: reference.to_string(),
        client: client.to_string(),
        broker: broker.to_string(),
        submission_date: demo_date(day),
        line_of_business: line_of_business.to_string(),
        premium: None,
        location: None,
        property_type: None,
        coverage_amount: None,
    }
}

/// Seed the store with a dataset covering every stage and status the
/// dashboard renders: blocked extractions, duplicate and unique core-data
/// outcomes, a half-finished and a failed compliance run, and ranked
/// submissions signed off both ways.
pub(crate) fn seed_demo_submissions<R, D>(
    service: &SubmissionWorkflowService<R, D>,
) -> Result<(), WorkflowError>
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    // Blocked at extraction.
    let greentech = service.intake(demo_intake(
        "SUB-2023-001",
        "GreenTech Solutions Ltd.",
        "ABC Insurance Brokers",
        24,
        "Property",
    ))?;
    service.record_missing_data(
        &greentech.id,
        "businessDescription".to_string(),
        "Business description was not extracted from the submission".to_string(),
        CheckSeverity::High,
    )?;
    service.record_missing_data(
        &greentech.id,
        "claimsHistory".to_string(),
        "Five-year claims history is required for property risks".to_string(),
        CheckSeverity::Medium,
    )?;

    service.record_missing_data(
        &service
            .intake(demo_intake(
                "SUB-2023-006",
                "Healthcare Solutions",
                "Medical Insurance Group",
                21,
                "Medical Malpractice",
            ))?
            .id,
        "medicalAccreditation".to_string(),
        "Clinic accreditation certificate missing".to_string(),
        CheckSeverity::High,
    )?;

    // Core-data outcomes.
    let coffee = service.intake(demo_intake(
        "SUB-2023-002",
        "Coffee Haven Ltd.",
        "XYZ Insurance Services",
        24,
        "Commercial",
    ))?;
    service.override_and_process(&coffee.id)?;

    let manufacturing = service.intake(demo_intake(
        "SUB-2023-007",
        "Global Manufacturing",
        "Industrial Insurance",
        20,
        "Property",
    ))?;
    service.override_and_process(&manufacturing.id)?;
    service.record_dedupe_finding(
        &manufacturing.id,
        DedupeFinding::Duplicate(DuplicateInfo {
            original_submission_id: greentech.id.clone(),
            reference: greentech.reference.clone(),
            client: greentech.client.clone(),
            broker: greentech.broker.clone(),
            submission_date: greentech.submission_date,
            match_confidence: 92,
        }),
    )?;

    let retail = service.intake(demo_intake(
        "SUB-2023-009",
        "Retail Solutions",
        "Commercial Insurance",
        18,
        "Liability",
    ))?;
    service.override_and_process(&retail.id)?;
    service.record_dedupe_finding(&retail.id, DedupeFinding::Unique)?;

    // Enrichment: one half-finished run, one failed run.
    let hotel = service.intake(demo_intake(
        "SUB-2023-003",
        "Parsian Evin Hotel Ltd.",
        "Prime Insurance Brokers",
        24,
        "Hospitality",
    ))?;
    service.override_and_process(&hotel.id)?;
    service.override_and_process(&hotel.id)?;
    for (name, status) in [
        ("Sanctions screen", CheckStatus::Passed),
        ("KYC verification", CheckStatus::Passed),
        ("Financial standing", CheckStatus::Pending),
        ("Regulatory filing", CheckStatus::Pending),
    ] {
        service.record_compliance_check(&hotel.id, name.to_string(), status, None)?;
    }

    let shipping = service.intake(demo_intake(
        "SUB-2023-010",
        "Global Shipping",
        "Marine Insurance",
        17,
        "Marine",
    ))?;
    service.override_and_process(&shipping.id)?;
    service.override_and_process(&shipping.id)?;
    service.record_compliance_check(
        &shipping.id,
        "Sanctions screen".to_string(),
        CheckStatus::Failed,
        Some("Port call history includes a sanctioned terminal".to_string()),
    )?;

    // Ranked and signed off.
    let mut techstart = demo_intake(
        "SUB-2023-004",
        "TechStart Inc.",
        "Digital Insurance",
        23,
        "Cyber",
    );
    techstart.premium = Some(25_000);
    let techstart = service.intake(techstart)?;
    for _ in 0..3 {
        service.override_and_process(&techstart.id)?;
    }
    for (name, score) in [
        ("Underwriting Guidelines", 90),
        ("Limits & Deductibles", 85),
        ("Pricing Factors", 80),
        ("Hazard Classification", 85),
    ] {
        service.record_guideline_check(
            &techstart.id,
            name.to_string(),
            CheckStatus::Passed,
            score,
            None,
        )?;
    }
    service.approve_and_send(&techstart.id)?;
    service.provide_feedback(&techstart.id, true)?;

    let logistics = service.intake(demo_intake(
        "SUB-2023-005",
        "Global Logistics",
        "Marine Insurance",
        22,
        "Marine",
    ))?;
    for _ in 0..3 {
        service.override_and_process(&logistics.id)?;
    }
    for (name, score) in [
        ("Underwriting Guidelines", 40),
        ("Limits & Deductibles", 30),
        ("Pricing Factors", 35),
        ("Hazard Classification", 35),
    ] {
        service.record_guideline_check(
            &logistics.id,
            name.to_string(),
            CheckStatus::Passed,
            score,
            None,
        )?;
    }
    service.reject(&logistics.id)?;

    Ok(())
}
