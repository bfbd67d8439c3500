use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::workflows::collections::domain::{
    CaseId, CaseSnapshot, CaseStatus, TimelineEvent, TimelineEventType,
};
use crate::workflows::collections::repository::{
    CaseRepository, FeedbackError, FeedbackPublisher, RepositoryError, SuggestionFeedback,
};
use crate::workflows::collections::suggestions::{EngineConfig, RuleId, Suggestion};
use crate::workflows::collections::timeline::TimelineEntry;
use crate::workflows::collections::CaseAssistantService;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 13, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Consented, mid-risk case with a contact five days ago and two overdue installments.
pub(super) fn snapshot() -> CaseSnapshot {
    CaseSnapshot {
        id: CaseId(1001),
        case_number: "COB-2026-1001".to_string(),
        customer_name: "Carla Mendes Rocha".to_string(),
        customer_phone: Some("+55 11 98888-0000".to_string()),
        customer_email: Some("carla@example.com".to_string()),
        total_debt: Some(Decimal::new(480_000, 2)),
        days_overdue: Some(20),
        status: CaseStatus::InContact,
        risk_score: Some(45),
        has_consent: Some(true),
        contract_type: Some("Cartão de crédito".to_string()),
        installments_overdue: 2,
        total_installments: 10,
        last_contact_at: Some(now() - Duration::days(5)),
        timeline: vec![TimelineEvent {
            event_type: TimelineEventType::Contact,
            title: "Ligação sem resposta".to_string(),
            created_at: now() - Duration::days(5),
        }],
    }
}

pub(super) fn promise_event(age: Duration) -> TimelineEvent {
    TimelineEvent {
        event_type: TimelineEventType::Note,
        title: "Promessa de pagamento para sexta".to_string(),
        created_at: now() - age,
    }
}

pub(super) fn find(suggestions: &[Suggestion], id: RuleId) -> Option<&Suggestion> {
    suggestions.iter().find(|suggestion| suggestion.id == id)
}

pub(super) fn ids(suggestions: &[Suggestion]) -> Vec<RuleId> {
    suggestions.iter().map(|suggestion| suggestion.id).collect()
}

pub(super) fn build_service() -> (
    CaseAssistantService<MemoryRepository, MemoryFeedback>,
    Arc<MemoryRepository>,
    Arc<MemoryFeedback>,
) {
    let repository = Arc::new(MemoryRepository::with_cases([snapshot()]));
    let feedback = Arc::new(MemoryFeedback::default());
    let service =
        CaseAssistantService::new(repository.clone(), feedback.clone(), EngineConfig::default());
    (service, repository, feedback)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    cases: Arc<Mutex<HashMap<CaseId, CaseSnapshot>>>,
    appended: Arc<Mutex<Vec<(CaseId, TimelineEntry)>>>,
}

impl MemoryRepository {
    pub(super) fn with_cases(cases: impl IntoIterator<Item = CaseSnapshot>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.cases.lock().expect("cases mutex poisoned");
            for case in cases {
                guard.insert(case.id, case);
            }
        }
        repository
    }

    pub(super) fn replace(&self, case: CaseSnapshot) {
        self.cases
            .lock()
            .expect("cases mutex poisoned")
            .insert(case.id, case);
    }

    pub(super) fn appended(&self) -> Vec<(CaseId, TimelineEntry)> {
        self.appended
            .lock()
            .expect("timeline mutex poisoned")
            .clone()
    }
}

impl CaseRepository for MemoryRepository {
    fn fetch(&self, id: CaseId) -> Result<Option<CaseSnapshot>, RepositoryError> {
        let guard = self.cases.lock().expect("cases mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn append_event(&self, id: CaseId, entry: TimelineEntry) -> Result<(), RepositoryError> {
        let mut cases = self.cases.lock().expect("cases mutex poisoned");
        let case = cases.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        case.timeline.push(entry.as_event());
        self.appended
            .lock()
            .expect("timeline mutex poisoned")
            .push((id, entry));
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl CaseRepository for UnavailableRepository {
    fn fetch(&self, _id: CaseId) -> Result<Option<CaseSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_event(&self, _id: CaseId, _entry: TimelineEntry) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryFeedback {
    events: Arc<Mutex<Vec<SuggestionFeedback>>>,
}

impl MemoryFeedback {
    pub(super) fn events(&self) -> Vec<SuggestionFeedback> {
        self.events.lock().expect("feedback mutex poisoned").clone()
    }
}

impl FeedbackPublisher for MemoryFeedback {
    fn publish(&self, feedback: SuggestionFeedback) -> Result<(), FeedbackError> {
        self.events
            .lock()
            .expect("feedback mutex poisoned")
            .push(feedback);
        Ok(())
    }
}
