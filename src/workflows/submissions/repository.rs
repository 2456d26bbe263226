use super::domain::{
    ComplianceCheck, DedupeFinding, GuidelineCheck, MissingDataItem, Submission, SubmissionId,
    WorkflowStage,
};

/// Storage abstraction so the service module can be exercised in isolation.
/// Reads never mutate; list reads come back submission-date descending.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, submission: Submission) -> Result<Submission, RepositoryError>;
    fn update(&self, submission: Submission) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<Submission>, RepositoryError>;
    fn all(&self) -> Result<Vec<Submission>, RepositoryError>;
    fn by_stage(&self, stage: WorkflowStage) -> Result<Vec<Submission>, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<Submission>, RepositoryError>;

    /// Checks are append-only; a stage re-run records new checks rather than
    /// mutating old ones.
    fn append_missing_data(&self, item: MissingDataItem) -> Result<(), RepositoryError>;
    fn missing_data(&self, id: &SubmissionId) -> Result<Vec<MissingDataItem>, RepositoryError>;

    /// At most one dedupe finding per submission; re-recording replaces it.
    fn set_dedupe_finding(
        &self,
        id: &SubmissionId,
        finding: DedupeFinding,
    ) -> Result<(), RepositoryError>;
    fn dedupe_finding(&self, id: &SubmissionId) -> Result<Option<DedupeFinding>, RepositoryError>;

    fn append_compliance_check(&self, check: ComplianceCheck) -> Result<(), RepositoryError>;
    fn compliance_checks(
        &self,
        id: &SubmissionId,
    ) -> Result<Vec<ComplianceCheck>, RepositoryError>;

    fn append_guideline_check(&self, check: GuidelineCheck) -> Result<(), RepositoryError>;
    fn guideline_checks(&self, id: &SubmissionId)
        -> Result<Vec<GuidelineCheck>, RepositoryError>;

    /// One feedback signal per submission; recording again overwrites.
    fn set_feedback(&self, id: &SubmissionId, positive: bool) -> Result<(), RepositoryError>;
    fn feedback(&self, id: &SubmissionId) -> Result<Option<bool>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("submission already exists")]
    Conflict,
    #[error("submission not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound communication hook (e-mail or workbench transport adapters).
pub trait CommunicationDispatcher: Send + Sync {
    fn dispatch(&self, id: &SubmissionId, body: &str) -> Result<(), DispatchError>;
}

/// Communication dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("communication transport unavailable: {0}")]
    Transport(String),
}
