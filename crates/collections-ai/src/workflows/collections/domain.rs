use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for collection cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(pub u64);

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage of a collection case as reported by the case supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    New,
    InContact,
    Negotiating,
    PromiseToPay,
    Agreement,
    Paid,
    Legal,
    Closed,
    #[serde(other)]
    Unknown,
}

impl CaseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CaseStatus::New => "Novo",
            CaseStatus::InContact => "Em contato",
            CaseStatus::Negotiating => "Em negociação",
            CaseStatus::PromiseToPay => "Promessa de pagamento",
            CaseStatus::Agreement => "Acordo firmado",
            CaseStatus::Paid => "Pago",
            CaseStatus::Legal => "Jurídico",
            CaseStatus::Closed => "Encerrado",
            CaseStatus::Unknown => "Desconhecido",
        }
    }
}

/// Category of an entry on a case timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventType {
    Contact,
    Action,
    Status,
    Payment,
    Note,
    #[serde(other)]
    Other,
}

/// Immutable record of something that happened on a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub event_type: TimelineEventType,
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Read-only view of a case handed to the suggestion engine.
///
/// Fields may be absent or `null` in payloads from the case supplier. Fields a rule keys
/// its firing condition on stay `Option`, so a missing value keeps that rule silent
/// instead of being filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSnapshot {
    pub id: CaseId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub case_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub total_debt: Option<Decimal>,
    #[serde(default)]
    pub days_overdue: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CaseStatus,
    #[serde(default)]
    pub risk_score: Option<i64>,
    /// LGPD contact authorization. `None` when the supplier did not report it.
    #[serde(default)]
    pub has_consent: Option<bool>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub installments_overdue: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_installments: u32,
    #[serde(default)]
    pub last_contact_at: Option<DateTime<Utc>>,
    /// Insertion order is chronological order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeline: Vec<TimelineEvent>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl CaseSnapshot {
    /// Debt with negative values clamped to zero.
    pub fn sanitized_debt(&self) -> Option<Decimal> {
        self.total_debt.map(|debt| debt.max(Decimal::ZERO))
    }

    pub fn sanitized_days_overdue(&self) -> Option<i64> {
        self.days_overdue.map(|days| days.max(0))
    }

    pub fn sanitized_risk_score(&self) -> Option<i64> {
        self.risk_score.map(|score| score.clamp(0, 100))
    }

    /// First whitespace-delimited word of the customer name.
    pub fn first_name(&self) -> &str {
        self.customer_name.split_whitespace().next().unwrap_or("")
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(self.customer_phone.as_deref())
    }

    pub fn email(&self) -> Option<&str> {
        non_blank(self.customer_email.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
