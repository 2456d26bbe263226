use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{
    ComplianceCheck, DedupeFinding, GuidelineCheck, MissingDataItem, Submission, SubmissionId,
    WorkflowStage,
};
use super::repository::{
    CommunicationDispatcher, DispatchError, RepositoryError, SubmissionRepository,
};

#[derive(Default)]
struct Store {
    submissions: HashMap<SubmissionId, Submission>,
    missing_data: HashMap<SubmissionId, Vec<MissingDataItem>>,
    dedupe_findings: HashMap<SubmissionId, DedupeFinding>,
    compliance_checks: HashMap<SubmissionId, Vec<ComplianceCheck>>,
    guideline_checks: HashMap<SubmissionId, Vec<GuidelineCheck>>,
    feedback: HashMap<SubmissionId, bool>,
}

/// Mutex-guarded map store backing the service in tests, demos, and the
/// default server wiring. A database-backed repository slots in behind the
/// same trait.
#[derive(Default, Clone)]
pub struct InMemorySubmissionRepository {
    store: Arc<Mutex<Store>>,
}

fn sorted_by_date_desc(mut submissions: Vec<Submission>) -> Vec<Submission> {
    submissions.sort_by(|a, b| {
        b.submission_date
            .cmp(&a.submission_date)
            .then_with(|| a.reference.cmp(&b.reference))
    });
    submissions
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, submission: Submission) -> Result<Submission, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        if guard.submissions.contains_key(&submission.id) {
            return Err(RepositoryError::Conflict);
        }
        guard
            .submissions
            .insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    fn update(&self, submission: Submission) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        if guard.submissions.contains_key(&submission.id) {
            guard.submissions.insert(submission.id.clone(), submission);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.submissions.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<Submission>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(sorted_by_date_desc(
            guard.submissions.values().cloned().collect(),
        ))
    }

    fn by_stage(&self, stage: WorkflowStage) -> Result<Vec<Submission>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(sorted_by_date_desc(
            guard
                .submissions
                .values()
                .filter(|submission| submission.stage() == stage)
                .cloned()
                .collect(),
        ))
    }

    fn recent(&self, limit: usize) -> Result<Vec<Submission>, RepositoryError> {
        let mut submissions = self.all()?;
        submissions.truncate(limit);
        Ok(submissions)
    }

    fn append_missing_data(&self, item: MissingDataItem) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        guard
            .missing_data
            .entry(item.submission_id.clone())
            .or_default()
            .push(item);
        Ok(())
    }

    fn missing_data(&self, id: &SubmissionId) -> Result<Vec<MissingDataItem>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.missing_data.get(id).cloned().unwrap_or_default())
    }

    fn set_dedupe_finding(
        &self,
        id: &SubmissionId,
        finding: DedupeFinding,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        guard.dedupe_findings.insert(id.clone(), finding);
        Ok(())
    }

    fn dedupe_finding(&self, id: &SubmissionId) -> Result<Option<DedupeFinding>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.dedupe_findings.get(id).cloned())
    }

    fn append_compliance_check(&self, check: ComplianceCheck) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        guard
            .compliance_checks
            .entry(check.submission_id.clone())
            .or_default()
            .push(check);
        Ok(())
    }

    fn compliance_checks(
        &self,
        id: &SubmissionId,
    ) -> Result<Vec<ComplianceCheck>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.compliance_checks.get(id).cloned().unwrap_or_default())
    }

    fn append_guideline_check(&self, check: GuidelineCheck) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        guard
            .guideline_checks
            .entry(check.submission_id.clone())
            .or_default()
            .push(check);
        Ok(())
    }

    fn guideline_checks(
        &self,
        id: &SubmissionId,
    ) -> Result<Vec<GuidelineCheck>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.guideline_checks.get(id).cloned().unwrap_or_default())
    }

    fn set_feedback(&self, id: &SubmissionId, positive: bool) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        guard.feedback.insert(id.clone(), positive);
        Ok(())
    }

    fn feedback(&self, id: &SubmissionId) -> Result<Option<bool>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.feedback.get(id).copied())
    }
}

/// Dispatcher that records every send so routes and tests can assert the
/// integration boundary.
#[derive(Default, Clone)]
pub struct RecordingDispatcher {
    sent: Arc<Mutex<Vec<(SubmissionId, String)>>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<(SubmissionId, String)> {
        self.sent.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl CommunicationDispatcher for RecordingDispatcher {
    fn dispatch(&self, id: &SubmissionId, body: &str) -> Result<(), DispatchError> {
        let mut guard = self.sent.lock().expect("dispatcher mutex poisoned");
        guard.push((id.clone(), body.to_string()));
        Ok(())
    }
}

/// Dispatcher that always fails, for exercising upstream-failure paths.
#[derive(Default, Clone)]
pub struct FailingDispatcher;

impl CommunicationDispatcher for FailingDispatcher {
    fn dispatch(&self, _id: &SubmissionId, _body: &str) -> Result<(), DispatchError> {
        Err(DispatchError::Transport("smtp relay offline".to_string()))
    }
}
