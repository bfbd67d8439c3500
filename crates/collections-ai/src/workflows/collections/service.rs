use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::CaseId;
use super::repository::{
    CaseRepository, FeedbackError, FeedbackPublisher, FeedbackVerdict, RepositoryError,
    SuggestionFeedback,
};
use super::session::{EvaluationState, SuggestionBatch, SuggestionSessions};
use super::suggestions::{EngineConfig, RuleId, SuggestionEngine};
use super::timeline::{entry_for_applied, TimelineEntry};

/// Service composing the case repository, suggestion engine and trigger sessions.
pub struct CaseAssistantService<R, F> {
    repository: Arc<R>,
    feedback: Arc<F>,
    engine: Arc<SuggestionEngine>,
    sessions: SuggestionSessions,
}

impl<R, F> CaseAssistantService<R, F>
where
    R: CaseRepository + 'static,
    F: FeedbackPublisher + 'static,
{
    pub fn new(repository: Arc<R>, feedback: Arc<F>, config: EngineConfig) -> Self {
        Self {
            repository,
            feedback,
            engine: Arc::new(SuggestionEngine::new(config)),
            sessions: SuggestionSessions::default(),
        }
    }

    pub fn engine(&self) -> &SuggestionEngine {
        &self.engine
    }

    /// Trigger a fresh evaluation for a stored case.
    ///
    /// Fails with [`CaseServiceError::Superseded`] when another trigger for the same case
    /// arrived before this one finished.
    pub fn refresh(
        &self,
        case_id: CaseId,
        now: DateTime<Utc>,
    ) -> Result<SuggestionBatch, CaseServiceError> {
        let ticket = self.sessions.begin(case_id);

        let snapshot = match self.repository.fetch(case_id) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                self.sessions.abandon(ticket);
                return Err(CaseServiceError::CaseNotFound(case_id));
            }
            Err(err) => {
                self.sessions.abandon(ticket);
                return Err(err.into());
            }
        };

        let suggestions = self.engine.evaluate(&snapshot, now);
        self.sessions
            .complete(ticket, now, suggestions)
            .ok_or_else(|| {
                warn!(%case_id, generation = ticket.generation, "discarded superseded evaluation");
                CaseServiceError::Superseded {
                    case_id,
                    generation: ticket.generation,
                }
            })
    }

    pub fn state(&self, case_id: CaseId) -> EvaluationState {
        self.sessions.state(case_id)
    }

    /// Apply a suggestion: re-evaluate the case, map the suggestion to its timeline entry
    /// and append it.
    pub fn apply(
        &self,
        case_id: CaseId,
        suggestion_id: RuleId,
        now: DateTime<Utc>,
    ) -> Result<TimelineEntry, CaseServiceError> {
        let batch = self.refresh(case_id, now)?;
        let suggestion = batch
            .suggestions
            .iter()
            .find(|suggestion| suggestion.id == suggestion_id)
            .ok_or(CaseServiceError::SuggestionNotFound {
                case_id,
                suggestion_id,
            })?;

        let entry = entry_for_applied(suggestion, now).ok_or(CaseServiceError::NotApplicable {
            suggestion_id,
        })?;

        self.repository.append_event(case_id, entry.clone())?;
        info!(%case_id, %suggestion_id, event_type = ?entry.event_type, "applied suggestion");
        Ok(entry)
    }

    /// Forward operator feedback on a suggestion.
    pub fn record_feedback(
        &self,
        case_id: CaseId,
        suggestion_id: RuleId,
        verdict: FeedbackVerdict,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<SuggestionFeedback, CaseServiceError> {
        let feedback = SuggestionFeedback {
            case_id,
            suggestion_id,
            verdict,
            comment: comment.filter(|text| !text.trim().is_empty()),
            recorded_at: now,
        };

        self.feedback.publish(feedback.clone())?;
        info!(%case_id, %suggestion_id, ?verdict, "recorded suggestion feedback");
        Ok(feedback)
    }
}

/// Error raised by the case assistant service.
#[derive(Debug, thiserror::Error)]
pub enum CaseServiceError {
    #[error("case {0} not found")]
    CaseNotFound(CaseId),
    #[error("suggestion {suggestion_id} is not currently offered for case {case_id}")]
    SuggestionNotFound {
        case_id: CaseId,
        suggestion_id: RuleId,
    },
    #[error("suggestion {suggestion_id} has no timeline action to apply")]
    NotApplicable { suggestion_id: RuleId },
    #[error("evaluation {generation} for case {case_id} was superseded by a newer trigger")]
    Superseded { case_id: CaseId, generation: u64 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
}
