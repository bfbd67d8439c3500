//! Trigger discipline around evaluations: `Idle -> Evaluating -> Ready`.
//!
//! Every trigger bumps a per-case generation. A result is only accepted when it belongs
//! to the newest generation, so a slow evaluation can never overwrite a newer one.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::CaseId;
use super::suggestions::Suggestion;

/// Handle for one in-flight evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationTicket {
    pub case_id: CaseId,
    pub generation: u64,
}

/// Suggestions delivered for the newest trigger of a case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionBatch {
    pub case_id: CaseId,
    pub generation: u64,
    pub evaluated_at: DateTime<Utc>,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationState {
    Idle,
    Evaluating { generation: u64 },
    Ready(SuggestionBatch),
}

#[derive(Debug, Default)]
struct CaseSlot {
    latest_generation: u64,
    in_flight: bool,
    ready: Option<SuggestionBatch>,
}

/// Per-case evaluation state shared by request handlers.
#[derive(Debug, Default)]
pub struct SuggestionSessions {
    slots: Mutex<HashMap<CaseId, CaseSlot>>,
}

impl SuggestionSessions {
    /// Register a new trigger. Any evaluation still in flight for the case becomes stale.
    pub fn begin(&self, case_id: CaseId) -> EvaluationTicket {
        let mut slots = self.lock();
        let slot = slots.entry(case_id).or_default();
        slot.latest_generation += 1;
        slot.in_flight = true;

        EvaluationTicket {
            case_id,
            generation: slot.latest_generation,
        }
    }

    /// Deliver a result. Returns the stored batch, or `None` when a newer trigger exists and
    /// the result was discarded.
    pub fn complete(
        &self,
        ticket: EvaluationTicket,
        evaluated_at: DateTime<Utc>,
        suggestions: Vec<Suggestion>,
    ) -> Option<SuggestionBatch> {
        let mut slots = self.lock();
        let slot = slots.get_mut(&ticket.case_id)?;
        if slot.latest_generation != ticket.generation {
            return None;
        }

        let batch = SuggestionBatch {
            case_id: ticket.case_id,
            generation: ticket.generation,
            evaluated_at,
            suggestions,
        };
        slot.in_flight = false;
        slot.ready = Some(batch.clone());
        Some(batch)
    }

    /// Abandon an evaluation that failed before producing a result.
    pub fn abandon(&self, ticket: EvaluationTicket) {
        let mut slots = self.lock();
        if let Some(slot) = slots.get_mut(&ticket.case_id) {
            if slot.latest_generation == ticket.generation {
                slot.in_flight = false;
            }
        }
    }

    pub fn state(&self, case_id: CaseId) -> EvaluationState {
        let slots = self.lock();
        match slots.get(&case_id) {
            None => EvaluationState::Idle,
            Some(slot) if slot.in_flight => EvaluationState::Evaluating {
                generation: slot.latest_generation,
            },
            Some(CaseSlot {
                ready: Some(batch), ..
            }) => EvaluationState::Ready(batch.clone()),
            Some(_) => EvaluationState::Idle,
        }
    }

    /// Last accepted batch, if any.
    pub fn latest(&self, case_id: CaseId) -> Option<SuggestionBatch> {
        self.lock()
            .get(&case_id)
            .and_then(|slot| slot.ready.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CaseId, CaseSlot>> {
        // Slot updates never panic mid-way, so a poisoned map is still consistent.
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
