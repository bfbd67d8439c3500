use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{TimelineEvent, TimelineEventType};
use super::suggestions::{RuleId, Suggestion, SuggestionKind};

pub const ESCALATION_TITLE: &str = "Escalado para Supervisor";

/// Channel an outbound contact went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactChannel {
    Whatsapp,
    Email,
    Phone,
}

/// Timeline append produced when an operator applies a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub event_type: TimelineEventType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ContactChannel>,
    pub created_at: DateTime<Utc>,
}

impl TimelineEntry {
    /// Compact form as it appears on a case snapshot's timeline.
    pub fn as_event(&self) -> TimelineEvent {
        TimelineEvent {
            event_type: self.event_type,
            title: self.title.clone(),
            created_at: self.created_at,
        }
    }
}

/// Map an applied suggestion onto the case-timeline append it implies.
///
/// Returns `None` for suggestions that carry nothing to record (insights, the consent
/// warning, messages without a drafted template).
pub fn entry_for_applied(suggestion: &Suggestion, now: DateTime<Utc>) -> Option<TimelineEntry> {
    let (event_type, title, description, channel) = match suggestion.kind {
        SuggestionKind::Message => {
            let template = suggestion.template.as_ref()?;
            (
                TimelineEventType::Contact,
                suggestion.title.clone(),
                template.clone(),
                Some(ContactChannel::Whatsapp),
            )
        }
        SuggestionKind::Deal | SuggestionKind::Action => (
            TimelineEventType::Action,
            suggestion.title.clone(),
            suggestion.description.clone(),
            None,
        ),
        SuggestionKind::Warning if suggestion.id == RuleId::RiskWarning => (
            TimelineEventType::Status,
            ESCALATION_TITLE.to_string(),
            suggestion.reasoning.clone(),
            None,
        ),
        SuggestionKind::Warning | SuggestionKind::Insight => return None,
    };

    Some(TimelineEntry {
        event_type,
        title,
        description,
        channel,
        created_at: now,
    })
}
