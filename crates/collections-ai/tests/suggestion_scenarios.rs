//! End-to-end scenarios for the suggestion engine through its public API.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use collections_ai::workflows::collections::suggestions::{discount_tier, discounted_amount};
use collections_ai::workflows::collections::{
    CaseSnapshot, Priority, RuleId, Suggestion, SuggestionEngine,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn case(overrides: serde_json::Value) -> CaseSnapshot {
    let mut base = json!({
        "id": 501,
        "case_number": "COB-501",
        "customer_name": "Roberto Lima",
        "customer_phone": "+55 21 97777-1234",
        "customer_email": "roberto@example.com",
        "total_debt": "10000.00",
        "days_overdue": 10,
        "status": "in_contact",
        "risk_score": 40,
        "has_consent": true,
        "installments_overdue": 1,
        "total_installments": 12,
        "last_contact_at": null,
        "timeline": []
    });
    if let (Some(base), Some(overrides)) = (base.as_object_mut(), overrides.as_object()) {
        for (key, value) in overrides {
            base.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(base).expect("scenario snapshot parses")
}

fn find(suggestions: &[Suggestion], id: RuleId) -> Option<&Suggestion> {
    suggestions.iter().find(|suggestion| suggestion.id == id)
}

#[test]
fn scenario_a_long_overdue_case_gets_quarter_discount() {
    let snapshot = case(json!({ "days_overdue": 95, "total_debt": "10000.00" }));

    assert_eq!(snapshot.days_overdue.and_then(discount_tier), Some(25));
    assert_eq!(
        discounted_amount(Decimal::new(1_000_000, 2), 25),
        Decimal::new(750_000, 2)
    );

    let suggestions = SuggestionEngine::default().evaluate(&snapshot, now());
    let deal = find(&suggestions, RuleId::DealSuggestion).expect("deal suggested");
    assert!(deal.title.contains("25%"));
    assert!(deal.description.contains("R$ 7.500,00"));
    assert!(deal
        .template
        .as_deref()
        .is_some_and(|template| template.contains("R$ 7.500,00")));
}

#[test]
fn scenario_b_missing_consent_leads_with_compliance_warning() {
    let snapshot = case(json!({ "has_consent": false, "installments_overdue": 5 }));

    let suggestions = SuggestionEngine::default().evaluate(&snapshot, now());
    let position = suggestions
        .iter()
        .position(|suggestion| suggestion.id == RuleId::ConsentRequired)
        .expect("consent warning present");
    let consent = &suggestions[position];

    assert_eq!(consent.confidence, 1.0);
    assert_eq!(consent.priority, Priority::High);
    assert!(suggestions[..position]
        .iter()
        .all(|suggestion| suggestion.priority == Priority::High));
    assert!(find(&suggestions, RuleId::InstallmentInsight).is_some());
}

#[test]
fn scenario_c_high_risk_score_raises_warning() {
    let snapshot = case(json!({ "risk_score": 85 }));

    let suggestions = SuggestionEngine::default().evaluate(&snapshot, now());
    let warning = find(&suggestions, RuleId::RiskWarning).expect("risk warning present");
    assert_eq!(warning.priority, Priority::High);
}

#[test]
fn scenario_d_recent_contact_suppresses_contact_timing() {
    let snapshot = case(json!({ "last_contact_at": now() - Duration::days(1) }));

    let suggestions = SuggestionEngine::default().evaluate(&snapshot, now());
    assert!(find(&suggestions, RuleId::ContactTiming).is_none());
    assert!(find(&suggestions, RuleId::MessageTemplate).is_none());
}

#[test]
fn scenario_e_early_delay_drafts_friendly_message() {
    let snapshot = case(json!({ "days_overdue": 10, "last_contact_at": null }));

    let suggestions = SuggestionEngine::default().evaluate(&snapshot, now());
    let message = find(&suggestions, RuleId::MessageTemplate).expect("message drafted");
    assert!(message.title.contains("amigável"));
    assert_eq!(message.priority, Priority::Medium);
    let template = message.template.as_deref().expect("template rendered");
    assert!(template.starts_with("Olá Roberto"));
    assert!(template.contains("23/10/2026"));
}

#[test]
fn scenario_e_holds_without_reported_debt() {
    let snapshot: CaseSnapshot = serde_json::from_value(json!({
        "id": 1,
        "customer_name": "Roberto Lima",
        "days_overdue": 10,
        "has_consent": true,
        "last_contact_at": null
    }))
    .expect("snapshot parses");

    let suggestions = SuggestionEngine::default().evaluate(&snapshot, now());
    let message = find(&suggestions, RuleId::MessageTemplate).expect("message drafted");
    assert!(message.title.contains("amigável"));
    assert_eq!(message.priority, Priority::Medium);
    let template = message.template.as_deref().expect("template rendered");
    assert!(template.contains("R$ 0,00"));
    assert!(find(&suggestions, RuleId::DealSuggestion).is_none());
}

#[test]
fn repeated_evaluation_is_byte_identical() {
    let snapshot = case(json!({
        "days_overdue": 70,
        "risk_score": 75,
        "installments_overdue": 4,
        "timeline": [
            { "event_type": "note", "title": "Promessa de pagamento", "created_at": now() - Duration::days(9) }
        ]
    }));
    let engine = SuggestionEngine::default();

    let first = serde_json::to_vec(&engine.evaluate(&snapshot, now())).expect("serializes");
    let second = serde_json::to_vec(&engine.evaluate(&snapshot, now())).expect("serializes");
    assert_eq!(first, second);
}

#[test]
fn malformed_fields_never_panic() {
    let snapshot = case(json!({
        "total_debt": null,
        "days_overdue": -12,
        "risk_score": null,
        "customer_name": "",
        "customer_phone": null,
        "status": "archived_by_bot"
    }));

    let suggestions = SuggestionEngine::default().evaluate(&snapshot, now());
    assert!(suggestions.len() <= 5);
    assert!(find(&suggestions, RuleId::DealSuggestion).is_none());
    assert!(find(&suggestions, RuleId::RiskWarning).is_none());
    assert!(find(&suggestions, RuleId::ChannelInsight).is_none());
}

#[test]
fn explicit_nulls_evaluate_like_missing_fields() {
    let snapshot = case(json!({
        "case_number": null,
        "customer_name": null,
        "days_overdue": null,
        "status": null,
        "has_consent": null,
        "installments_overdue": null,
        "total_installments": null,
        "timeline": null
    }));

    let suggestions = SuggestionEngine::default().evaluate(&snapshot, now());
    assert!(suggestions.is_empty());
}

#[test]
fn unreported_consent_raises_no_consent_warning() {
    let snapshot: CaseSnapshot =
        serde_json::from_value(json!({ "id": 1, "total_debt": "100.00" })).expect("parses");

    let suggestions = SuggestionEngine::default().evaluate(&snapshot, now());
    assert!(find(&suggestions, RuleId::ConsentRequired).is_none());
    assert!(suggestions.is_empty());
}

#[test]
fn far_future_clock_does_not_overflow_deadline() {
    let far_future: DateTime<Utc> =
        serde_json::from_value(json!("+262142-12-30T00:00:00Z")).expect("timestamp parses");
    let snapshot = case(json!({ "days_overdue": 95 }));

    let suggestions = SuggestionEngine::default().evaluate(&snapshot, far_future);
    assert!(find(&suggestions, RuleId::DealSuggestion).is_some());
    assert!(find(&suggestions, RuleId::MessageTemplate).is_some());
}
