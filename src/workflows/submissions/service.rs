use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::warn;

use super::domain::{
    CheckSeverity, CheckStatus, ComplianceCheck, Decision, DedupeFinding, ExtractionStatus,
    GuidelineCheck, MissingDataItem, RankStatus, Submission, SubmissionId, SubmissionIntake,
    WorkbenchKind, WorkflowStage, WorkflowState,
};
use super::drafts;
use super::progression;
use super::report::{
    pending_actions, summary_stats, workflow_distribution, DashboardSnapshot, SubmissionDetailView,
};
use super::repository::{
    CommunicationDispatcher, DispatchError, RepositoryError, SubmissionRepository,
};

/// Default page size for the recent-submissions read.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CHECK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

fn next_check_id() -> String {
    let id = CHECK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("chk-{id:06}")
}

/// The mutation surface of the workflow: intake, check recording with status
/// recomputation, stage advances, sign-off, and the dashboard reads.
/// Every operation is one read-modify-write against a single submission.
pub struct SubmissionWorkflowService<R, D> {
    repository: Arc<R>,
    dispatcher: Arc<D>,
}

impl<R, D> SubmissionWorkflowService<R, D>
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    pub fn new(repository: Arc<R>, dispatcher: Arc<D>) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Intake a new submission. It starts at extraction, pending when the
    /// required fields are present, otherwise needs-info with one recorded
    /// missing-data item per absent field.
    pub fn intake(&self, intake: SubmissionIntake) -> Result<Submission, WorkflowError> {
        let missing = intake.missing_required_fields();
        let state = if missing.is_empty() {
            WorkflowState::Extraction(ExtractionStatus::Pending)
        } else {
            WorkflowState::Extraction(ExtractionStatus::NeedsInfo)
        };

        let submission = Submission {
            id: next_submission_id(),
            reference: intake.reference,
            client: intake.client,
            broker: intake.broker,
            submission_date: intake.submission_date,
            line_of_business: intake.line_of_business,
            state,
            premium: intake.premium,
            location: intake.location,
            property_type: intake.property_type,
            coverage_amount: intake.coverage_amount,
            draft: None,
        };

        let stored = self.repository.insert(submission)?;
        for (field, description) in missing {
            self.repository.append_missing_data(MissingDataItem {
                id: next_check_id(),
                submission_id: stored.id.clone(),
                field: field.to_string(),
                description: description.to_string(),
                severity: CheckSeverity::High,
            })?;
        }

        Ok(stored)
    }

    pub fn submission(&self, id: &SubmissionId) -> Result<Submission, WorkflowError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| WorkflowError::NotFound(id.clone()))
    }

    pub fn all(&self) -> Result<Vec<Submission>, WorkflowError> {
        Ok(self.repository.all()?)
    }

    pub fn by_stage(&self, stage: WorkflowStage) -> Result<Vec<Submission>, WorkflowError> {
        Ok(self.repository.by_stage(stage)?)
    }

    /// Most recent submissions by submission date, newest first.
    pub fn recent(&self, limit: Option<NonZeroUsize>) -> Result<Vec<Submission>, WorkflowError> {
        let limit = limit.map(NonZeroUsize::get).unwrap_or(DEFAULT_RECENT_LIMIT);
        Ok(self.repository.recent(limit)?)
    }

    /// Record a missing-data item found by the extraction scan and recompute
    /// the extraction status.
    pub fn record_missing_data(
        &self,
        id: &SubmissionId,
        field: String,
        description: String,
        severity: CheckSeverity,
    ) -> Result<Submission, WorkflowError> {
        let mut submission = self.require_stage(id, WorkflowStage::Extraction, "record-missing-data")?;

        self.repository.append_missing_data(MissingDataItem {
            id: next_check_id(),
            submission_id: submission.id.clone(),
            field,
            description,
            severity,
        })?;

        let items = self.repository.missing_data(id)?;
        submission.state = WorkflowState::Extraction(progression::evaluate_extraction(&items));
        self.repository.update(submission.clone())?;
        Ok(submission)
    }

    /// Record the outcome of the duplication scan and recompute the
    /// core-data status.
    pub fn record_dedupe_finding(
        &self,
        id: &SubmissionId,
        finding: DedupeFinding,
    ) -> Result<Submission, WorkflowError> {
        let mut submission = self.require_stage(id, WorkflowStage::CoreData, "record-dedupe-finding")?;

        if let DedupeFinding::Duplicate(info) = &finding {
            if info.match_confidence > 100 {
                return Err(WorkflowError::MatchConfidenceOutOfRange(
                    info.match_confidence,
                ));
            }
        }

        submission.state =
            WorkflowState::CoreData(progression::evaluate_core_data(Some(&finding)));
        self.repository.set_dedupe_finding(id, finding)?;
        self.repository.update(submission.clone())?;
        Ok(submission)
    }

    /// Record one compliance check and recompute the enrichment status.
    pub fn record_compliance_check(
        &self,
        id: &SubmissionId,
        name: String,
        status: CheckStatus,
        details: Option<String>,
    ) -> Result<Submission, WorkflowError> {
        let mut submission =
            self.require_stage(id, WorkflowStage::Enrichment, "record-compliance-check")?;

        self.repository.append_compliance_check(ComplianceCheck {
            id: next_check_id(),
            submission_id: submission.id.clone(),
            name,
            status,
            details,
        })?;

        let checks = self.repository.compliance_checks(id)?;
        let evaluation = progression::evaluate_enrichment(&checks);
        submission.state = WorkflowState::Enrichment(evaluation.status);
        self.repository.update(submission.clone())?;
        Ok(submission)
    }

    /// Record one guideline factor and recompute the rank status. The first
    /// time the rank resolves, a communication draft is attached.
    pub fn record_guideline_check(
        &self,
        id: &SubmissionId,
        name: String,
        status: CheckStatus,
        score: u8,
        details: Option<String>,
    ) -> Result<Submission, WorkflowError> {
        if score > 100 {
            return Err(WorkflowError::ScoreOutOfRange(score));
        }

        let mut submission =
            self.require_stage(id, WorkflowStage::Rank, "record-guideline-check")?;

        self.repository.append_guideline_check(GuidelineCheck {
            id: next_check_id(),
            submission_id: submission.id.clone(),
            name,
            status,
            score,
            details,
        })?;

        let checks = self.repository.guideline_checks(id)?;
        let evaluation = progression::evaluate_rank(&checks);
        submission.state = WorkflowState::Rank(evaluation.status);
        if submission.draft.is_none() {
            submission.draft = drafts::draft_for(&submission, evaluation.status);
        }
        self.repository.update(submission.clone())?;
        Ok(submission)
    }

    /// Sign off the submission and dispatch its communication draft. The
    /// approval commits before the dispatch; a dispatch failure is logged and
    /// surfaced without rolling the approval back.
    pub fn approve_and_send(&self, id: &SubmissionId) -> Result<Submission, WorkflowError> {
        let mut submission = self.submission(id)?;
        submission.state = WorkflowState::Decided {
            stage: submission.stage(),
            outcome: Decision::Approved,
        };
        self.repository.update(submission.clone())?;

        match &submission.draft {
            Some(body) => {
                if let Err(err) = self.dispatcher.dispatch(id, body) {
                    warn!(submission = %id, error = %err, "communication dispatch failed after approval");
                    return Err(WorkflowError::Dispatch(err));
                }
            }
            None => {
                warn!(submission = %id, "no communication draft recorded; nothing dispatched");
            }
        }

        Ok(submission)
    }

    /// Terminal rejection after human sign-off. Retained for audit at the
    /// stage it was reached.
    pub fn reject(&self, id: &SubmissionId) -> Result<Submission, WorkflowError> {
        let mut submission = self.submission(id)?;
        submission.state = WorkflowState::Decided {
            stage: submission.stage(),
            outcome: Decision::Rejected,
        };
        self.repository.update(submission.clone())?;
        Ok(submission)
    }

    /// Operator override: advance exactly one stage. Invalid at the final
    /// stage and after sign-off.
    pub fn override_and_process(&self, id: &SubmissionId) -> Result<Submission, WorkflowError> {
        let mut submission = self.submission(id)?;
        submission.state =
            submission
                .state
                .advanced()
                .ok_or_else(|| WorkflowError::InvalidState {
                    action: "override-and-process",
                    stage: submission.stage().slug(),
                })?;
        self.repository.update(submission.clone())?;
        Ok(submission)
    }

    /// Hand a ranked submission to the workbench for a survey or a quote.
    pub fn send_to_workbench(
        &self,
        id: &SubmissionId,
        kind: WorkbenchKind,
    ) -> Result<Submission, WorkflowError> {
        let mut submission = self.submission(id)?;
        match submission.state {
            WorkflowState::Rank(_) => {
                let status = match kind {
                    WorkbenchKind::Survey => RankStatus::Survey,
                    WorkbenchKind::Quote => RankStatus::Proceed,
                };
                submission.state = WorkflowState::Rank(status);
                self.repository.update(submission.clone())?;
                Ok(submission)
            }
            _ => Err(WorkflowError::InvalidState {
                action: "send-to-workbench",
                stage: submission.stage().slug(),
            }),
        }
    }

    /// Record the operator's verdict on the communication draft. Recording
    /// again overwrites; stage and status are untouched.
    pub fn provide_feedback(&self, id: &SubmissionId, positive: bool) -> Result<(), WorkflowError> {
        let submission = self.submission(id)?;
        self.repository.set_feedback(&submission.id, positive)?;
        Ok(())
    }

    /// Full detail for one submission: every recorded check plus the derived
    /// stage figures.
    pub fn detail(&self, id: &SubmissionId) -> Result<SubmissionDetailView, WorkflowError> {
        let submission = self.submission(id)?;
        let missing_data = self.repository.missing_data(id)?;
        let duplicate_of = match self.repository.dedupe_finding(id)? {
            Some(DedupeFinding::Duplicate(info)) => Some(info),
            _ => None,
        };
        let compliance_checks = self.repository.compliance_checks(id)?;
        let compliance_progress = progression::evaluate_enrichment(&compliance_checks).progress;
        let guideline_checks = self.repository.guideline_checks(id)?;
        let overall_score = progression::evaluate_rank(&guideline_checks).overall_score;
        let feedback_positive = self.repository.feedback(id)?;

        Ok(SubmissionDetailView {
            submission: submission.to_view(),
            draft: submission.draft.clone(),
            missing_data,
            duplicate_of,
            compliance_checks,
            compliance_progress,
            guideline_checks,
            overall_score,
            feedback_positive,
        })
    }

    /// Dashboard snapshot, recomputed from the current submission set.
    pub fn dashboard(&self) -> Result<DashboardSnapshot, WorkflowError> {
        let submissions = self.repository.all()?;
        Ok(DashboardSnapshot {
            stats: summary_stats(&submissions),
            distribution: workflow_distribution(&submissions),
            pending_actions: pending_actions(&submissions),
            recent: submissions
                .iter()
                .take(DEFAULT_RECENT_LIMIT)
                .map(Submission::to_view)
                .collect(),
        })
    }

    fn require_stage(
        &self,
        id: &SubmissionId,
        stage: WorkflowStage,
        action: &'static str,
    ) -> Result<Submission, WorkflowError> {
        let submission = self.submission(id)?;
        if submission.state.is_decided() || submission.stage() != stage {
            return Err(WorkflowError::InvalidState {
                action,
                stage: submission.stage().slug(),
            });
        }
        Ok(submission)
    }
}

/// Error raised by the workflow service. NotFound and InvalidState are
/// recoverable caller errors; Dispatch covers upstream communication
/// failures that leave already-committed state in place.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("submission {0} not found")]
    NotFound(SubmissionId),
    #[error("{action} is not permitted while the submission is at the {stage} stage")]
    InvalidState {
        action: &'static str,
        stage: &'static str,
    },
    #[error("match confidence {0} exceeds the 0-100 range")]
    MatchConfidenceOutOfRange(u8),
    #[error("factor score {0} exceeds the 0-100 range")]
    ScoreOutOfRange(u8),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
