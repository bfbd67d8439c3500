use chrono::{DateTime, Duration, Utc};

use super::domain::{CaseSnapshot, TimelineEvent};

/// Reported when a case has never been contacted.
pub const NO_CONTACT_SENTINEL_DAYS: i64 = 999;

/// Title keyword marking a payment promise on the timeline (matched case-insensitively).
pub const PROMISE_MARKER: &str = "promessa";

pub const RECENT_CONTACT_DAYS: i64 = 3;
pub const RECENT_EVENT_WINDOW_DAYS: i64 = 7;
pub const HIGH_RISK_THRESHOLD: i64 = 70;

const SECONDS_PER_DAY: i64 = 86_400;

/// Facts derived once per evaluation and shared by every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseFacts {
    pub now: DateTime<Utc>,
    pub days_since_last_contact: i64,
    pub contact_recorded: bool,
    pub has_recent_contact: bool,
    pub recent_events: Vec<TimelineEvent>,
    pub has_recent_promise: bool,
    pub is_high_risk: bool,
}

impl CaseFacts {
    pub fn derive(snapshot: &CaseSnapshot, now: DateTime<Utc>) -> Self {
        let days_since_last_contact = snapshot
            .last_contact_at
            .map(|contacted| whole_days_between(contacted, now))
            .unwrap_or(NO_CONTACT_SENTINEL_DAYS);

        let window = Duration::days(RECENT_EVENT_WINDOW_DAYS);
        let recent_events: Vec<TimelineEvent> = snapshot
            .timeline
            .iter()
            .filter(|event| now - event.created_at < window)
            .cloned()
            .collect();

        let has_recent_promise = recent_events
            .iter()
            .any(|event| event.title.to_lowercase().contains(PROMISE_MARKER));

        let is_high_risk = snapshot
            .sanitized_risk_score()
            .map(|score| score >= HIGH_RISK_THRESHOLD)
            .unwrap_or(false);

        Self {
            now,
            days_since_last_contact,
            contact_recorded: snapshot.last_contact_at.is_some(),
            has_recent_contact: days_since_last_contact < RECENT_CONTACT_DAYS,
            recent_events,
            has_recent_promise,
            is_high_risk,
        }
    }
}

/// Floor of the elapsed time in whole days; negative when `from` lies after `to`.
fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}
