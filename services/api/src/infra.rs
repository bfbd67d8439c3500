use chrono::{DateTime, NaiveDate, Utc};
use collections_ai::workflows::collections::{
    CaseId, CaseRepository, CaseSnapshot, FeedbackError, FeedbackPublisher, RepositoryError,
    SuggestionFeedback, TimelineEntry, TimelineEventType,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crate::demo::sample_cases;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCaseRepository {
    cases: Arc<Mutex<HashMap<CaseId, CaseSnapshot>>>,
}

impl InMemoryCaseRepository {
    /// Repository preloaded with the demo cases, timed relative to `now`.
    pub(crate) fn seeded(now: DateTime<Utc>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.cases.lock().expect("repository mutex poisoned");
            for case in sample_cases(now) {
                guard.insert(case.id, case);
            }
        }
        repository
    }
}

impl CaseRepository for InMemoryCaseRepository {
    fn fetch(&self, id: CaseId) -> Result<Option<CaseSnapshot>, RepositoryError> {
        let guard = self.cases.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn append_event(&self, id: CaseId, entry: TimelineEntry) -> Result<(), RepositoryError> {
        let mut guard = self.cases.lock().expect("repository mutex poisoned");
        let case = guard.get_mut(&id).ok_or(RepositoryError::NotFound)?;

        if entry.event_type == TimelineEventType::Contact {
            case.last_contact_at = Some(entry.created_at);
        }
        case.timeline.push(entry.as_event());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFeedbackPublisher {
    events: Arc<Mutex<Vec<SuggestionFeedback>>>,
}

impl FeedbackPublisher for InMemoryFeedbackPublisher {
    fn publish(&self, feedback: SuggestionFeedback) -> Result<(), FeedbackError> {
        let mut guard = self.events.lock().expect("feedback mutex poisoned");
        guard.push(feedback);
        Ok(())
    }
}

#[cfg(test)]
impl InMemoryFeedbackPublisher {
    pub(crate) fn events(&self) -> Vec<SuggestionFeedback> {
        self.events.lock().expect("feedback mutex poisoned").clone()
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(moment) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(moment.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|moment| moment.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use collections_ai::workflows::collections::ContactChannel;

    #[test]
    fn parses_rfc3339_and_plain_dates() {
        let expected = Utc
            .with_ymd_and_hms(2026, 5, 4, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(parse_timestamp("2026-05-04T09:00:00-03:00"), Ok(expected));
        assert_eq!(
            parse_timestamp(" 2026-05-04 "),
            Ok(expected - chrono::Duration::hours(12))
        );
        assert!(parse_timestamp("04/05/2026").is_err());
    }

    #[test]
    fn contact_entries_refresh_last_contact() {
        let now = Utc
            .with_ymd_and_hms(2026, 5, 4, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let repository = InMemoryCaseRepository::seeded(now);
        let case_id = sample_cases(now)[0].id;

        repository
            .append_event(
                case_id,
                TimelineEntry {
                    event_type: TimelineEventType::Contact,
                    title: "Mensagem enviada".to_string(),
                    description: "Olá".to_string(),
                    channel: Some(ContactChannel::Whatsapp),
                    created_at: now,
                },
            )
            .expect("append succeeds");

        let stored = repository
            .fetch(case_id)
            .expect("fetch succeeds")
            .expect("case present");
        assert_eq!(stored.last_contact_at, Some(now));
        assert_eq!(stored.timeline.last().map(|event| event.created_at), Some(now));
    }
}
