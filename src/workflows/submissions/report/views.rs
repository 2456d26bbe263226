use chrono::NaiveDate;
use serde::Serialize;

use super::super::domain::{
    ComplianceCheck, DuplicateInfo, GuidelineCheck, MissingDataItem, PendingAction, Submission,
    SubmissionId,
};
use super::summary::{DistributionEntry, SummaryStats};

/// Sanitized list-row representation of a submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub id: SubmissionId,
    pub reference: String,
    pub client: String,
    pub broker: String,
    pub submission_date: NaiveDate,
    pub line_of_business: String,
    pub stage: &'static str,
    pub stage_label: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_amount: Option<String>,
}

impl Submission {
    pub fn to_view(&self) -> SubmissionView {
        SubmissionView {
            id: self.id.clone(),
            reference: self.reference.clone(),
            client: self.client.clone(),
            broker: self.broker.clone(),
            submission_date: self.submission_date,
            line_of_business: self.line_of_business.clone(),
            stage: self.stage().slug(),
            stage_label: self.stage().label(),
            status: self.status_label(),
            premium: self.premium,
            location: self.location.clone(),
            property_type: self.property_type.clone(),
            coverage_amount: self.coverage_amount.clone(),
        }
    }
}

/// Full detail view: the submission plus every check recorded against it and
/// the derived stage figures.
#[derive(Debug, Serialize)]
pub struct SubmissionDetailView {
    pub submission: SubmissionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,
    pub missing_data: Vec<MissingDataItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<DuplicateInfo>,
    pub compliance_checks: Vec<ComplianceCheck>,
    pub compliance_progress: u8,
    pub guideline_checks: Vec<GuidelineCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_positive: Option<bool>,
}

/// Everything the dashboard front page needs in one response.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot {
    pub stats: SummaryStats,
    pub distribution: Vec<DistributionEntry>,
    pub pending_actions: Vec<PendingAction>,
    pub recent: Vec<SubmissionView>,
}
