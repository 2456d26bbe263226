use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for intaken submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four fixed pipeline phases a submission passes through in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStage {
    Extraction,
    CoreData,
    Enrichment,
    Rank,
}

impl WorkflowStage {
    pub const fn ordered() -> [Self; 4] {
        [Self::Extraction, Self::CoreData, Self::Enrichment, Self::Rank]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Extraction => "Missing Data Check",
            Self::CoreData => "Data Duplication Check",
            Self::Enrichment => "Compliance Check",
            Self::Rank => "Guideline Check",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::CoreData => "core-data",
            Self::Enrichment => "enrichment",
            Self::Rank => "rank",
        }
    }

    /// Fixed per-stage color used by the distribution chart.
    pub const fn display_color(self) -> &'static str {
        match self {
            Self::Extraction => "#3ABFF8",
            Self::CoreData => "#FBBF24",
            Self::Enrichment => "#6366F1",
            Self::Rank => "#10B981",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Extraction => 0,
            Self::CoreData => 1,
            Self::Enrichment => 2,
            Self::Rank => 3,
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "extraction" => Some(Self::Extraction),
            "core-data" => Some(Self::CoreData),
            "enrichment" => Some(Self::Enrichment),
            "rank" => Some(Self::Rank),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStatus {
    NeedsInfo,
    Pending,
    Processing,
}

impl ExtractionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeedsInfo => "needs-info",
            Self::Pending => "pending",
            Self::Processing => "processing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoreDataStatus {
    Duplicate,
    Unique,
    Processing,
}

impl CoreDataStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Duplicate => "duplicate",
            Self::Unique => "unique",
            Self::Processing => "processing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrichmentStatus {
    Compliant,
    NonCompliant,
    Processing,
}

impl EnrichmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non-compliant",
            Self::Processing => "processing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankStatus {
    Proceed,
    Survey,
    Reject,
    Evaluating,
}

impl RankStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Proceed => "proceed",
            Self::Survey => "survey",
            Self::Reject => "reject",
            Self::Evaluating => "evaluating",
        }
    }
}

/// Ultimate terminal outcome assigned after human sign-off, at any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Workflow position of a submission: each stage carries its own status set,
/// so a status valid for one stage cannot be paired with another. `Decided`
/// keeps the stage the sign-off happened at for audit history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Extraction(ExtractionStatus),
    CoreData(CoreDataStatus),
    Enrichment(EnrichmentStatus),
    Rank(RankStatus),
    Decided {
        stage: WorkflowStage,
        outcome: Decision,
    },
}

impl WorkflowState {
    pub const fn stage(&self) -> WorkflowStage {
        match self {
            Self::Extraction(_) => WorkflowStage::Extraction,
            Self::CoreData(_) => WorkflowStage::CoreData,
            Self::Enrichment(_) => WorkflowStage::Enrichment,
            Self::Rank(_) => WorkflowStage::Rank,
            Self::Decided { stage, .. } => *stage,
        }
    }

    pub const fn status_label(&self) -> &'static str {
        match self {
            Self::Extraction(status) => status.label(),
            Self::CoreData(status) => status.label(),
            Self::Enrichment(status) => status.label(),
            Self::Rank(status) => status.label(),
            Self::Decided { outcome, .. } => outcome.label(),
        }
    }

    pub const fn is_decided(&self) -> bool {
        matches!(self, Self::Decided { .. })
    }

    /// Terminal states for the automated pipeline. A decided submission is
    /// always terminal; within `rank`, `proceed` and `reject` are.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Rank(RankStatus::Proceed) | Self::Rank(RankStatus::Reject) | Self::Decided { .. }
        )
    }

    /// The state entered by an explicit one-step stage advance, or `None`
    /// when no forward step exists (final stage or already decided).
    pub const fn advanced(&self) -> Option<WorkflowState> {
        match self {
            Self::Extraction(_) => Some(Self::CoreData(CoreDataStatus::Processing)),
            Self::CoreData(_) => Some(Self::Enrichment(EnrichmentStatus::Processing)),
            Self::Enrichment(_) => Some(Self::Rank(RankStatus::Evaluating)),
            Self::Rank(_) | Self::Decided { .. } => None,
        }
    }
}

/// The central entity: one insurance submission moving through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: SubmissionId,
    pub reference: String,
    pub client: String,
    pub broker: String,
    pub submission_date: NaiveDate,
    pub line_of_business: String,
    pub state: WorkflowState,
    pub premium: Option<u32>,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub coverage_amount: Option<String>,
    /// Generated communication text dispatched on approval.
    pub draft: Option<String>,
}

impl Submission {
    pub const fn stage(&self) -> WorkflowStage {
        self.state.stage()
    }

    pub const fn status_label(&self) -> &'static str {
        self.state.status_label()
    }
}

/// Intake payload for a new submission. Descriptive fields the pipeline
/// cannot proceed without are checked at intake time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionIntake {
    pub reference: String,
    pub client: String,
    pub broker: String,
    pub submission_date: NaiveDate,
    pub line_of_business: String,
    #[serde(default)]
    pub premium: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub coverage_amount: Option<String>,
}

impl SubmissionIntake {
    /// Required fields that are blank, with the description recorded against
    /// the submission as a missing-data item.
    pub(crate) fn missing_required_fields(&self) -> Vec<(&'static str, &'static str)> {
        let mut missing = Vec::new();
        if self.reference.trim().is_empty() {
            missing.push(("reference", "Submission reference code was not supplied"));
        }
        if self.client.trim().is_empty() {
            missing.push(("client", "Client name was not supplied"));
        }
        if self.broker.trim().is_empty() {
            missing.push(("broker", "Broker name was not supplied"));
        }
        if self.line_of_business.trim().is_empty() {
            missing.push(("lineOfBusiness", "Line of business was not supplied"));
        }
        missing
    }
}

/// Severity attached to a missing-data finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckSeverity {
    High,
    Medium,
    Low,
}

impl CheckSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Outcome of a single named check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed,
    Pending,
}

impl CheckStatus {
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

/// A field the extraction stage could not populate; blocks the submission
/// until an operator supplies the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingDataItem {
    pub id: String,
    pub submission_id: SubmissionId,
    pub field: String,
    pub description: String,
    pub severity: CheckSeverity,
}

/// Match against an earlier submission recorded by the duplication scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateInfo {
    pub original_submission_id: SubmissionId,
    pub reference: String,
    pub client: String,
    pub broker: String,
    pub submission_date: NaiveDate,
    /// Similarity percentage, 0-100.
    pub match_confidence: u8,
}

/// Result of the core-data duplication scan. Absence of a finding means the
/// scan has not completed, which is distinct from `Unique`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DedupeFinding {
    Duplicate(DuplicateInfo),
    Unique,
}

/// A named compliance finding recorded during enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub id: String,
    pub submission_id: SubmissionId,
    pub name: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A guideline evaluation factor recorded at the rank stage. Each factor is
/// scored 0-100 once its status resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineCheck {
    pub id: String,
    pub submission_id: SubmissionId,
    pub name: String,
    pub status: CheckStatus,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Priority ordering for operator-facing tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    High,
    Medium,
    Low,
}

impl ActionPriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

/// Operator task derived from submissions stuck on human input. Never stored,
/// always recomputed from the current submission set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingAction {
    pub title: &'static str,
    pub description: String,
    pub priority: ActionPriority,
    pub stage: &'static str,
}

/// Destination when handing a ranked submission to the workbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkbenchKind {
    Survey,
    Quote,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_ordering_is_fixed_and_forward_only() {
        let mut state = WorkflowState::Extraction(ExtractionStatus::Pending);
        let mut visited = vec![state.stage()];
        while let Some(next) = state.advanced() {
            assert!(next.stage().index() == state.stage().index() + 1);
            state = next;
            visited.push(state.stage());
        }
        assert_eq!(visited, WorkflowStage::ordered());
        assert!(state.advanced().is_none());
    }

    #[test]
    fn decided_states_keep_their_stage_and_refuse_advances() {
        let state = WorkflowState::Decided {
            stage: WorkflowStage::CoreData,
            outcome: Decision::Approved,
        };
        assert_eq!(state.stage(), WorkflowStage::CoreData);
        assert_eq!(state.status_label(), "approved");
        assert!(state.is_terminal());
        assert!(state.advanced().is_none());
    }

    #[test]
    fn stage_slugs_round_trip() {
        for stage in WorkflowStage::ordered() {
            assert_eq!(WorkflowStage::from_slug(stage.slug()), Some(stage));
        }
        assert_eq!(WorkflowStage::from_slug("triage"), None);
    }
}
