use super::domain::{
    CheckStatus, ComplianceCheck, CoreDataStatus, DedupeFinding, EnrichmentStatus,
    ExtractionStatus, GuidelineCheck, MissingDataItem, RankStatus,
};

/// Mean factor score at or above which a ranked submission proceeds to quote.
pub const PROCEED_THRESHOLD: u8 = 75;
/// Mean factor score at or above which a survey is recommended instead.
pub const SURVEY_THRESHOLD: u8 = 50;

/// Extraction is blocked while any missing-data item is on file. With no
/// items recorded the extraction scan has not reported yet.
pub fn evaluate_extraction(items: &[MissingDataItem]) -> ExtractionStatus {
    if items.is_empty() {
        ExtractionStatus::Processing
    } else {
        ExtractionStatus::NeedsInfo
    }
}

/// Core-data status follows the recorded dedupe finding; no finding means the
/// scan is still running, never unique-by-default.
pub fn evaluate_core_data(finding: Option<&DedupeFinding>) -> CoreDataStatus {
    match finding {
        Some(DedupeFinding::Duplicate(_)) => CoreDataStatus::Duplicate,
        Some(DedupeFinding::Unique) => CoreDataStatus::Unique,
        None => CoreDataStatus::Processing,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentEvaluation {
    pub status: EnrichmentStatus,
    /// Share of checks resolved, 0-100.
    pub progress: u8,
}

/// Any failed compliance check fails the whole stage; all passed means
/// compliant; anything still pending leaves the stage processing.
pub fn evaluate_enrichment(checks: &[ComplianceCheck]) -> EnrichmentEvaluation {
    if checks.is_empty() {
        return EnrichmentEvaluation {
            status: EnrichmentStatus::Processing,
            progress: 0,
        };
    }

    let resolved = checks
        .iter()
        .filter(|check| check.status.is_resolved())
        .count();
    let progress = (resolved * 100 / checks.len()) as u8;

    let status = if checks.iter().any(|check| check.status == CheckStatus::Failed) {
        EnrichmentStatus::NonCompliant
    } else if resolved == checks.len() {
        EnrichmentStatus::Compliant
    } else {
        EnrichmentStatus::Processing
    };

    EnrichmentEvaluation { status, progress }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankEvaluation {
    pub status: RankStatus,
    /// Mean of the per-factor scores once every factor has resolved.
    pub overall_score: Option<u8>,
}

/// Rank is derived from the mean of the guideline factor scores. Until every
/// factor resolves (and with zero factors recorded) the stage is evaluating.
pub fn evaluate_rank(checks: &[GuidelineCheck]) -> RankEvaluation {
    if checks.is_empty() || checks.iter().any(|check| !check.status.is_resolved()) {
        return RankEvaluation {
            status: RankStatus::Evaluating,
            overall_score: None,
        };
    }

    let total: u32 = checks.iter().map(|check| u32::from(check.score)).sum();
    let mean = (total / checks.len() as u32) as u8;

    let status = if mean >= PROCEED_THRESHOLD {
        RankStatus::Proceed
    } else if mean >= SURVEY_THRESHOLD {
        RankStatus::Survey
    } else {
        RankStatus::Reject
    };

    RankEvaluation {
        status,
        overall_score: Some(mean),
    }
}
