//! Dashboard-level aggregation. Everything here is a pure function of the
//! current submission set and is recomputed on demand, so a mutation can
//! never leave a stale figure behind.

mod summary;
pub mod views;

pub use summary::{
    pending_actions, summary_stats, workflow_distribution, DistributionEntry, SummaryStats,
};
pub use views::{DashboardSnapshot, SubmissionDetailView, SubmissionView};
