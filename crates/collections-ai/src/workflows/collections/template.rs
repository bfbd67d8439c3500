//! Positional `{{1}}`..`{{5}}` message templates.
//!
//! The suggestion engine and the outbound WhatsApp composer both render through
//! [`render`], so the token contract is defined exactly once.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::CaseSnapshot;
use super::format::{format_brl, format_date};
use super::suggestions::discount::discounted_amount;

pub const TOKEN_COUNT: usize = 5;

/// Discount quoted by message previews, independent of the case's discount tier.
pub const PREVIEW_DISCOUNT_PERCENT: u32 = 15;

/// Days ahead of `now` used for the payment deadline token.
pub const DEADLINE_OFFSET_DAYS: i64 = 7;

/// Token values bound to `{{1}}`..`{{5}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTokens {
    values: [String; TOKEN_COUNT],
}

impl MessageTokens {
    /// Build tokens from positional values; extra values are ignored, missing ones are empty.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = Self::default();
        for (slot, value) in tokens.values.iter_mut().zip(values) {
            *slot = value.into();
        }
        tokens
    }

    /// Standard binding for a case:
    /// first name, total debt, days overdue, 15% discounted total, deadline date.
    pub fn for_case(snapshot: &CaseSnapshot, now: DateTime<Utc>) -> Self {
        let debt = snapshot.sanitized_debt().unwrap_or(Decimal::ZERO);
        let discounted = discounted_amount(debt, PREVIEW_DISCOUNT_PERCENT);

        Self::from_values([
            snapshot.first_name().to_string(),
            format_brl(debt),
            snapshot.sanitized_days_overdue().unwrap_or(0).to_string(),
            format_brl(discounted),
            format_date(payment_deadline(now)),
        ])
    }

    /// Value for a 1-based position.
    pub fn get(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.values.get(index))
            .map(String::as_str)
    }
}

/// Deadline quoted in messages, [`DEADLINE_OFFSET_DAYS`] after `now`. Saturates at `now`
/// when the offset would leave the representable date range.
pub fn payment_deadline(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(DEADLINE_OFFSET_DAYS))
        .unwrap_or(now)
}

/// Substitute `{{n}}` placeholders in a single pass. Placeholders outside `1..=5` are left
/// untouched and substituted values are never rescanned.
pub fn render(template: &str, tokens: &MessageTokens) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        rendered.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match placeholder_position(candidate).and_then(|position| tokens.get(position)) {
            Some(value) => {
                rendered.push_str(value);
                rest = &candidate[PLACEHOLDER_LEN..];
            }
            None => {
                rendered.push('{');
                rest = &candidate[1..];
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

const PLACEHOLDER_LEN: usize = "{{1}}".len();

fn placeholder_position(candidate: &str) -> Option<usize> {
    let bytes = candidate.as_bytes();
    if bytes.len() < PLACEHOLDER_LEN || &bytes[3..PLACEHOLDER_LEN] != b"}}" {
        return None;
    }
    match bytes[2] {
        digit @ b'1'..=b'5' => Some(usize::from(digit - b'0')),
        _ => None,
    }
}
