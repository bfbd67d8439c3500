mod config;
pub mod discount;
mod ranking;
mod rules;

pub use config::{EngineConfig, DEFAULT_MAX_SUGGESTIONS};
pub use discount::{discount_tier, discounted_amount, DiscountOffer};
pub use rules::MessageTone;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::CaseSnapshot;
use super::facts::CaseFacts;

/// Stateless engine turning a case snapshot into ranked operator suggestions.
#[derive(Debug, Clone, Default)]
pub struct SuggestionEngine {
    config: EngineConfig,
}

impl SuggestionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every rule against the snapshot and return the ranked, capped list.
    ///
    /// Identical `(snapshot, now)` inputs always yield identical output.
    pub fn evaluate(&self, snapshot: &CaseSnapshot, now: DateTime<Utc>) -> Vec<Suggestion> {
        let facts = CaseFacts::derive(snapshot, now);
        let fired = rules::evaluate_all(snapshot, &facts);
        let fired_count = fired.len();
        let ranked = ranking::rank(fired, self.config.max_suggestions);

        debug!(
            case_id = %snapshot.id,
            fired = fired_count,
            returned = ranked.len(),
            "evaluated case suggestions"
        );

        ranked
    }
}

/// Stable identifier of the rule that produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    ContactTiming,
    DealSuggestion,
    RiskWarning,
    ConsentRequired,
    MessageTemplate,
    ChannelInsight,
    FollowUp,
    InstallmentInsight,
}

impl RuleId {
    /// Rule emission order, which is also the ranking tie-break order.
    pub const ALL: [RuleId; 8] = [
        RuleId::ContactTiming,
        RuleId::DealSuggestion,
        RuleId::RiskWarning,
        RuleId::ConsentRequired,
        RuleId::MessageTemplate,
        RuleId::ChannelInsight,
        RuleId::FollowUp,
        RuleId::InstallmentInsight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::ContactTiming => "contact-timing",
            RuleId::DealSuggestion => "deal-suggestion",
            RuleId::RiskWarning => "risk-warning",
            RuleId::ConsentRequired => "consent-required",
            RuleId::MessageTemplate => "message-template",
            RuleId::ChannelInsight => "channel-insight",
            RuleId::FollowUp => "follow-up",
            RuleId::InstallmentInsight => "installment-insight",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_str() == raw.trim())
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Message,
    Action,
    Warning,
    Insight,
    Deal,
}

/// Coarse urgency bucket; declaration order is the ranking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// One ranked recommendation for the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: RuleId,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Fixed heuristic score in `0.0..=1.0`.
    pub confidence: f64,
}
