use serde::Serialize;

use super::super::domain::{
    ActionPriority, CoreDataStatus, Decision, EnrichmentStatus, ExtractionStatus, PendingAction,
    RankStatus, Submission, WorkflowStage, WorkflowState,
};

/// Named counters shown on the dashboard summary cards. Each is the count of
/// submissions satisfying one (stage, status) predicate; the set is not a
/// partition of the total.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total_submissions: usize,
    pub missing_information: usize,
    pub completed_extractions: usize,
    pub rejected_submissions: usize,
    pub duplicate_submissions: usize,
    pub unique_submissions: usize,
    pub processing_submissions: usize,
    pub non_compliant_submissions: usize,
    pub compliant_submissions: usize,
    pub in_progress_submissions: usize,
    pub proceed_to_quote: usize,
    pub survey_recommended: usize,
    pub rejected: usize,
}

/// One slice of the workflow distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub name: &'static str,
    pub value: usize,
    pub color: &'static str,
}

/// Single pass over the submission set. An empty set yields all-zero
/// counters rather than an error.
pub fn summary_stats(submissions: &[Submission]) -> SummaryStats {
    let mut stats = SummaryStats::default();

    for submission in submissions {
        stats.total_submissions += 1;
        match &submission.state {
            WorkflowState::Extraction(ExtractionStatus::NeedsInfo) => {
                stats.missing_information += 1;
            }
            WorkflowState::Extraction(ExtractionStatus::Pending) => {
                stats.completed_extractions += 1;
            }
            WorkflowState::Extraction(ExtractionStatus::Processing) => {
                stats.completed_extractions += 1;
                stats.processing_submissions += 1;
            }
            WorkflowState::CoreData(CoreDataStatus::Duplicate) => {
                stats.duplicate_submissions += 1;
            }
            WorkflowState::CoreData(CoreDataStatus::Unique) => {
                stats.unique_submissions += 1;
            }
            WorkflowState::CoreData(CoreDataStatus::Processing) => {
                stats.processing_submissions += 1;
            }
            WorkflowState::Enrichment(EnrichmentStatus::Compliant) => {
                stats.compliant_submissions += 1;
            }
            WorkflowState::Enrichment(EnrichmentStatus::NonCompliant) => {
                stats.non_compliant_submissions += 1;
            }
            WorkflowState::Enrichment(EnrichmentStatus::Processing) => {
                stats.processing_submissions += 1;
                stats.in_progress_submissions += 1;
            }
            WorkflowState::Rank(RankStatus::Proceed) => {
                stats.proceed_to_quote += 1;
            }
            WorkflowState::Rank(RankStatus::Survey) => {
                stats.survey_recommended += 1;
            }
            WorkflowState::Rank(RankStatus::Reject) => {
                stats.rejected += 1;
            }
            WorkflowState::Rank(RankStatus::Evaluating) => {}
            WorkflowState::Decided {
                outcome: Decision::Rejected,
                ..
            } => {
                stats.rejected_submissions += 1;
            }
            WorkflowState::Decided {
                outcome: Decision::Approved,
                ..
            } => {}
        }
    }

    stats
}

/// One entry per stage in pipeline order, present even at zero; values sum
/// to the submission count. Decided submissions count at the stage they were
/// signed off at.
pub fn workflow_distribution(submissions: &[Submission]) -> Vec<DistributionEntry> {
    let mut counts = [0usize; 4];
    for submission in submissions {
        counts[submission.stage().index()] += 1;
    }

    WorkflowStage::ordered()
        .into_iter()
        .map(|stage| DistributionEntry {
            name: stage.label(),
            value: counts[stage.index()],
            color: stage.display_color(),
        })
        .collect()
}

/// Operator tasks derived from submissions waiting on human input, ordered
/// high priority first.
pub fn pending_actions(submissions: &[Submission]) -> Vec<PendingAction> {
    let mut actions = Vec::new();

    for submission in submissions {
        let action = match &submission.state {
            WorkflowState::Extraction(ExtractionStatus::NeedsInfo) => Some(PendingAction {
                title: "Review Missing Information",
                description: format!(
                    "{} submission is missing required information",
                    submission.client
                ),
                priority: ActionPriority::High,
                stage: WorkflowStage::Extraction.label(),
            }),
            WorkflowState::CoreData(CoreDataStatus::Duplicate) => Some(PendingAction {
                title: "Resolve Duplicate Match",
                description: format!(
                    "{} submission was flagged as a possible duplicate",
                    submission.client
                ),
                priority: ActionPriority::High,
                stage: WorkflowStage::CoreData.label(),
            }),
            WorkflowState::Enrichment(EnrichmentStatus::NonCompliant) => Some(PendingAction {
                title: "Verify Compliance Check",
                description: format!(
                    "Manual review required for {} compliance check",
                    submission.client
                ),
                priority: ActionPriority::Medium,
                stage: WorkflowStage::Enrichment.label(),
            }),
            WorkflowState::Rank(RankStatus::Survey) => Some(PendingAction {
                title: "Schedule Risk Survey",
                description: format!(
                    "Survey recommended for {} before quotation",
                    submission.client
                ),
                priority: ActionPriority::Medium,
                stage: WorkflowStage::Rank.label(),
            }),
            WorkflowState::Rank(RankStatus::Proceed) => Some(PendingAction {
                title: "Approve Quotation",
                description: format!("Final approval needed for {} quotation", submission.client),
                priority: ActionPriority::Low,
                stage: WorkflowStage::Rank.label(),
            }),
            _ => None,
        };

        if let Some(action) = action {
            actions.push(action);
        }
    }

    actions.sort_by_key(|action| action.priority.rank());
    actions
}
