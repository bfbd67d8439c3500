use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CaseId, CaseSnapshot};
use super::suggestions::RuleId;
use super::timeline::TimelineEntry;

/// Case-data supplier. Persistence lives outside this crate; the service only reads
/// snapshots and appends timeline entries through this port.
pub trait CaseRepository: Send + Sync {
    fn fetch(&self, id: CaseId) -> Result<Option<CaseSnapshot>, RepositoryError>;
    fn append_event(&self, id: CaseId, entry: TimelineEntry) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("case not found")]
    NotFound,
    #[error("case repository unavailable: {0}")]
    Unavailable(String),
}

/// Operator reaction to a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackVerdict {
    Accepted,
    Helpful,
    NotHelpful,
}

/// Feedback payload forwarded to whatever tracks suggestion quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionFeedback {
    pub case_id: CaseId,
    pub suggestion_id: RuleId,
    pub verdict: FeedbackVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Outbound hook for operator feedback (analytics, audit trail adapters).
pub trait FeedbackPublisher: Send + Sync {
    fn publish(&self, feedback: SuggestionFeedback) -> Result<(), FeedbackError>;
}

/// Feedback dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("feedback transport unavailable: {0}")]
    Transport(String),
}
