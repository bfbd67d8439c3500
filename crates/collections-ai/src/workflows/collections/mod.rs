//! Collection-case assistant: derives facts from a case snapshot, runs the suggestion
//! rules, and exposes the results to operators through the service and router.

pub mod domain;
pub mod facts;
pub mod format;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;
pub mod suggestions;
pub mod template;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use domain::{CaseId, CaseSnapshot, CaseStatus, TimelineEvent, TimelineEventType};
pub use facts::CaseFacts;
pub use repository::{
    CaseRepository, FeedbackError, FeedbackPublisher, FeedbackVerdict, RepositoryError,
    SuggestionFeedback,
};
pub use router::case_assistant_router;
pub use service::{CaseAssistantService, CaseServiceError};
pub use session::{EvaluationState, EvaluationTicket, SuggestionBatch, SuggestionSessions};
pub use suggestions::{
    EngineConfig, MessageTone, Priority, RuleId, Suggestion, SuggestionEngine, SuggestionKind,
};
pub use template::{render, MessageTokens};
pub use timeline::{entry_for_applied, ContactChannel, TimelineEntry};
