use crate::infra::parse_timestamp;
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use collections_ai::config::parse_suggestion_limit;
use collections_ai::error::AppError;
use collections_ai::workflows::collections::format::format_brl;
use collections_ai::workflows::collections::template::TOKEN_COUNT;
use collections_ai::workflows::collections::{
    render, CaseId, CaseSnapshot, CaseStatus, EngineConfig, MessageTokens, Suggestion,
    SuggestionEngine, TimelineEvent, TimelineEventType,
};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print suggestions as JSON instead of a table.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SuggestArgs {
    /// Path to a JSON case snapshot
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Maximum number of suggestions to print (at least 1)
    #[arg(long, value_parser = parse_suggestion_limit)]
    pub(crate) limit: Option<usize>,
    /// Print suggestions as JSON instead of a table.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Template containing {{1}}..{{5}} placeholders
    #[arg(long)]
    pub(crate) template: String,
    /// Positional token values, in order (repeat up to five times)
    #[arg(long = "token")]
    pub(crate) tokens: Vec<String>,
}

pub(crate) fn run_suggest(args: SuggestArgs) -> Result<(), AppError> {
    let SuggestArgs {
        snapshot,
        now,
        limit,
        json,
    } = args;

    let raw = std::fs::read_to_string(&snapshot)?;
    let snapshot: CaseSnapshot = serde_json::from_str(&raw)?;
    let now = now.unwrap_or_else(Utc::now);
    let engine = SuggestionEngine::new(limit.map(EngineConfig::with_limit).unwrap_or_default());

    let suggestions = engine.evaluate(&snapshot, now);
    print_suggestions(&snapshot, &suggestions, json)
}

pub(crate) fn run_render(args: RenderArgs) -> Result<(), AppError> {
    println!("{}", render_with_tokens(&args.template, args.tokens)?);
    Ok(())
}

fn render_with_tokens(template: &str, tokens: Vec<String>) -> Result<String, AppError> {
    if tokens.len() > TOKEN_COUNT {
        return Err(AppError::Usage(format!(
            "at most {TOKEN_COUNT} tokens are supported, got {}",
            tokens.len()
        )));
    }
    Ok(render(template, &MessageTokens::from_values(tokens)))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let engine = SuggestionEngine::default();

    println!("Collections copilot demo ({})", now.format("%Y-%m-%d %H:%M UTC"));
    for snapshot in sample_cases(now) {
        let suggestions = engine.evaluate(&snapshot, now);
        print_suggestions(&snapshot, &suggestions, args.json)?;
    }
    Ok(())
}

fn print_suggestions(
    snapshot: &CaseSnapshot,
    suggestions: &[Suggestion],
    json: bool,
) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(suggestions)?);
        return Ok(());
    }

    let debt = snapshot
        .sanitized_debt()
        .map(format_brl)
        .unwrap_or_else(|| "n/d".to_string());
    let overdue = snapshot
        .sanitized_days_overdue()
        .map(|days| days.to_string())
        .unwrap_or_else(|| "n/d".to_string());
    println!(
        "\nCase {} ({}) - {} | {} | {} days overdue",
        snapshot.case_number, snapshot.id, snapshot.customer_name, debt, overdue
    );

    if suggestions.is_empty() {
        println!("  No suggestions");
        return Ok(());
    }

    for (index, suggestion) in suggestions.iter().enumerate() {
        println!(
            "  {}. [{:?}/{:?}] {} ({:.2}) - {}",
            index + 1,
            suggestion.priority,
            suggestion.kind,
            suggestion.title,
            suggestion.confidence,
            suggestion.id
        );
        println!("     {}", suggestion.description);
        if let Some(template) = &suggestion.template {
            println!("     > {template}");
        }
    }
    Ok(())
}

/// Representative cases used by the demo command and the seeded in-memory repository.
pub(crate) fn sample_cases(now: DateTime<Utc>) -> Vec<CaseSnapshot> {
    vec![
        CaseSnapshot {
            id: CaseId(1),
            case_number: "COB-2026-0001".to_string(),
            customer_name: "Fernanda Alves Costa".to_string(),
            customer_phone: Some("+55 11 91234-5678".to_string()),
            customer_email: Some("fernanda.costa@example.com".to_string()),
            total_debt: Some(Decimal::new(1_000_000, 2)),
            days_overdue: Some(95),
            status: CaseStatus::InContact,
            risk_score: Some(82),
            has_consent: Some(true),
            contract_type: Some("Empréstimo pessoal".to_string()),
            installments_overdue: 4,
            total_installments: 12,
            last_contact_at: Some(now - Duration::days(6)),
            timeline: vec![TimelineEvent {
                event_type: TimelineEventType::Contact,
                title: "Ligação sem resposta".to_string(),
                created_at: now - Duration::days(6),
            }],
        },
        CaseSnapshot {
            id: CaseId(2),
            case_number: "COB-2026-0002".to_string(),
            customer_name: "Marcos Vinícius Prado".to_string(),
            customer_phone: Some("+55 21 99876-5432".to_string()),
            customer_email: None,
            total_debt: Some(Decimal::new(235_090, 2)),
            days_overdue: Some(12),
            status: CaseStatus::New,
            risk_score: Some(35),
            has_consent: Some(true),
            contract_type: Some("Cartão de crédito".to_string()),
            installments_overdue: 1,
            total_installments: 6,
            last_contact_at: None,
            timeline: Vec::new(),
        },
        CaseSnapshot {
            id: CaseId(3),
            case_number: "COB-2026-0003".to_string(),
            customer_name: "Juliana Ribeiro".to_string(),
            customer_phone: Some("+55 31 98765-0000".to_string()),
            customer_email: Some("juliana.ribeiro@example.com".to_string()),
            total_debt: Some(Decimal::new(518_075, 2)),
            days_overdue: Some(48),
            status: CaseStatus::PromiseToPay,
            risk_score: Some(58),
            has_consent: Some(true),
            contract_type: Some("Financiamento".to_string()),
            installments_overdue: 3,
            total_installments: 24,
            last_contact_at: Some(now - Duration::days(1)),
            timeline: vec![TimelineEvent {
                event_type: TimelineEventType::Note,
                title: "Promessa de pagamento para o dia 10".to_string(),
                created_at: now - Duration::days(1),
            }],
        },
        CaseSnapshot {
            id: CaseId(4),
            case_number: "COB-2026-0004".to_string(),
            customer_name: "Antônio Pereira".to_string(),
            customer_phone: None,
            customer_email: Some("antonio.p@example.com".to_string()),
            total_debt: Some(Decimal::new(89_900, 2)),
            days_overdue: Some(33),
            status: CaseStatus::Negotiating,
            risk_score: Some(71),
            has_consent: Some(false),
            contract_type: None,
            installments_overdue: 2,
            total_installments: 3,
            last_contact_at: Some(now - Duration::days(10)),
            timeline: Vec::new(),
        },
    ]
}
