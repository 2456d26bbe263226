//! Insurance submission workflow: the four-stage pipeline (missing-data,
//! duplication, compliance, guideline checks), its status model, the action
//! gateway, and the dashboard aggregation derived from it.

pub mod domain;
pub mod drafts;
pub mod memory;
pub mod progression;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ActionPriority, CheckSeverity, CheckStatus, ComplianceCheck, CoreDataStatus, Decision,
    DedupeFinding, DuplicateInfo, EnrichmentStatus, ExtractionStatus, GuidelineCheck,
    MissingDataItem, PendingAction, RankStatus, Submission, SubmissionId, SubmissionIntake,
    WorkbenchKind, WorkflowStage, WorkflowState,
};
pub use memory::{FailingDispatcher, InMemorySubmissionRepository, RecordingDispatcher};
pub use report::{
    pending_actions, summary_stats, workflow_distribution, DashboardSnapshot, DistributionEntry,
    SubmissionDetailView, SubmissionView, SummaryStats,
};
pub use repository::{
    CommunicationDispatcher, DispatchError, RepositoryError, SubmissionRepository,
};
pub use router::submission_router;
pub use service::{SubmissionWorkflowService, WorkflowError, DEFAULT_RECENT_LIMIT};
