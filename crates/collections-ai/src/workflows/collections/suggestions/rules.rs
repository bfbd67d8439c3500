use serde::{Deserialize, Serialize};

use super::discount::DiscountOffer;
use super::{Priority, RuleId, Suggestion, SuggestionKind};
use crate::workflows::collections::domain::CaseSnapshot;
use crate::workflows::collections::facts::{CaseFacts, NO_CONTACT_SENTINEL_DAYS};
use crate::workflows::collections::format::{format_brl, format_date};
use crate::workflows::collections::template::{payment_deadline, render, MessageTokens};

const CONTACT_TIMING_CONFIDENCE: f64 = 0.85;
const DEAL_CONFIDENCE: f64 = 0.72;
const RISK_WARNING_CONFIDENCE: f64 = 0.89;
const CONSENT_CONFIDENCE: f64 = 1.0;
const MESSAGE_TEMPLATE_CONFIDENCE: f64 = 0.78;
const CHANNEL_INSIGHT_CONFIDENCE: f64 = 0.65;
const FOLLOW_UP_CONFIDENCE: f64 = 0.82;
const INSTALLMENT_CONFIDENCE: f64 = 0.75;

const DEAL_MIN_DAYS_OVERDUE: i64 = 30;
const MESSAGING_CHANNEL_MIN_DAYS_OVERDUE: i64 = 30;
const URGENT_MESSAGE_MIN_DAYS_OVERDUE: i64 = 45;
const INSTALLMENT_ALERT_THRESHOLD: u32 = 2;

type Rule = fn(&CaseSnapshot, &CaseFacts) -> Option<Suggestion>;

/// Evaluators in emission order, matching [`RuleId::ALL`].
const RULES: [(RuleId, Rule); 8] = [
    (RuleId::ContactTiming, contact_timing),
    (RuleId::DealSuggestion, deal_suggestion),
    (RuleId::RiskWarning, risk_warning),
    (RuleId::ConsentRequired, consent_required),
    (RuleId::MessageTemplate, message_template),
    (RuleId::ChannelInsight, channel_insight),
    (RuleId::FollowUp, follow_up),
    (RuleId::InstallmentInsight, installment_insight),
];

/// Runs every rule; none short-circuits another. A rule only ever emits its own id.
pub(crate) fn evaluate_all(snapshot: &CaseSnapshot, facts: &CaseFacts) -> Vec<Suggestion> {
    RULES
        .iter()
        .filter_map(|(id, rule)| {
            rule(snapshot, facts).filter(|suggestion| {
                debug_assert_eq!(suggestion.id, *id, "rule emitted a foreign id");
                suggestion.id == *id
            })
        })
        .collect()
}

/// Tone of a drafted collection message, chosen by days overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTone {
    Friendly,
    Urgent,
    LastAttempt,
}

impl MessageTone {
    pub fn for_days_overdue(days_overdue: i64) -> Self {
        match days_overdue {
            days if days <= 15 => MessageTone::Friendly,
            days if days <= URGENT_MESSAGE_MIN_DAYS_OVERDUE => MessageTone::Urgent,
            _ => MessageTone::LastAttempt,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageTone::Friendly => "amigável",
            MessageTone::Urgent => "urgente",
            MessageTone::LastAttempt => "última tentativa",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            MessageTone::Friendly => {
                "Olá {{1}}, tudo bem? Identificamos um valor em aberto de {{2}}, vencido há {{3}} dias. \
                 Se preferir, pagando até {{5}} o valor fica em {{4}}. Podemos ajudar a regularizar?"
            }
            MessageTone::Urgent => {
                "{{1}}, seu débito de {{2}} está em atraso há {{3}} dias. \
                 Regularize até {{5}} e pague apenas {{4}}. Responda esta mensagem para negociar."
            }
            MessageTone::LastAttempt => {
                "{{1}}, esta é nossa última tentativa de acordo amigável para o débito de {{2}}, \
                 em atraso há {{3}} dias. Condição final: {{4}} com pagamento até {{5}}. \
                 Após essa data o caso seguirá para as próximas etapas de cobrança."
            }
        }
    }
}

fn contact_timing(snapshot: &CaseSnapshot, facts: &CaseFacts) -> Option<Suggestion> {
    if facts.has_recent_contact || !snapshot.has_consent? {
        return None;
    }

    let description = if facts.contact_recorded {
        format!(
            "Último contato há {} dias. Retome a conversa hoje para não perder o engajamento.",
            facts.days_since_last_contact
        )
    } else {
        format!(
            "Nenhum contato registrado neste caso ({NO_CONTACT_SENTINEL_DAYS}+ dias sem contato). \
             Faça a primeira abordagem hoje."
        )
    };

    Some(Suggestion {
        id: RuleId::ContactTiming,
        kind: SuggestionKind::Action,
        priority: Priority::High,
        title: "Realizar contato hoje".to_string(),
        description,
        reasoning: "Casos sem contato há 3 dias ou mais têm queda na taxa de recuperação."
            .to_string(),
        action_label: Some("Registrar contato".to_string()),
        template: None,
        confidence: CONTACT_TIMING_CONFIDENCE,
    })
}

fn deal_suggestion(snapshot: &CaseSnapshot, facts: &CaseFacts) -> Option<Suggestion> {
    let days_overdue = snapshot.sanitized_days_overdue()?;
    if days_overdue <= DEAL_MIN_DAYS_OVERDUE || facts.has_recent_promise {
        return None;
    }

    let offer = DiscountOffer::for_case(snapshot.sanitized_debt()?, days_overdue)?;
    let original = format_brl(offer.original);
    let discounted = format_brl(offer.discounted);
    let deadline = format_date(payment_deadline(facts.now));

    let priority = if facts.is_high_risk {
        Priority::High
    } else {
        Priority::Medium
    };

    Some(Suggestion {
        id: RuleId::DealSuggestion,
        kind: SuggestionKind::Deal,
        priority,
        title: format!("Oferecer {}% de desconto para quitação", offer.percent),
        description: format!(
            "Proposta de quitação à vista por {discounted} ({}% sobre {original}).",
            offer.percent
        ),
        reasoning: format!(
            "Com {days_overdue} dias de atraso, descontos progressivos aumentam a chance de acordo."
        ),
        action_label: Some("Aplicar proposta".to_string()),
        template: Some(format!(
            "Olá {}, temos uma condição especial: quitando seu débito de {original} até {deadline}, \
             você paga apenas {discounted} ({}% de desconto).",
            snapshot.first_name(),
            offer.percent
        )),
        confidence: DEAL_CONFIDENCE,
    })
}

fn risk_warning(snapshot: &CaseSnapshot, facts: &CaseFacts) -> Option<Suggestion> {
    if !facts.is_high_risk {
        return None;
    }
    let risk_score = snapshot.sanitized_risk_score()?;

    Some(Suggestion {
        id: RuleId::RiskWarning,
        kind: SuggestionKind::Warning,
        priority: Priority::High,
        title: "Risco elevado de inadimplência".to_string(),
        description: format!(
            "Score de risco {risk_score}/100 com {} parcela(s) em atraso.",
            snapshot.installments_overdue
        ),
        reasoning: "Score de risco a partir de 70 indica necessidade de acompanhamento do supervisor."
            .to_string(),
        action_label: Some("Escalar para supervisor".to_string()),
        template: None,
        confidence: RISK_WARNING_CONFIDENCE,
    })
}

fn consent_required(snapshot: &CaseSnapshot, _facts: &CaseFacts) -> Option<Suggestion> {
    if snapshot.has_consent? {
        return None;
    }

    Some(Suggestion {
        id: RuleId::ConsentRequired,
        kind: SuggestionKind::Warning,
        priority: Priority::High,
        title: "Consentimento LGPD pendente".to_string(),
        description: "O cliente não autorizou contato. Registre o consentimento antes de qualquer \
                      abordagem ativa."
            .to_string(),
        reasoning: "A LGPD exige autorização registrada para contato ativo com o titular dos dados."
            .to_string(),
        action_label: Some("Solicitar consentimento".to_string()),
        template: None,
        confidence: CONSENT_CONFIDENCE,
    })
}

fn message_template(snapshot: &CaseSnapshot, facts: &CaseFacts) -> Option<Suggestion> {
    if !snapshot.has_consent? || facts.has_recent_contact {
        return None;
    }

    let days_overdue = snapshot.sanitized_days_overdue()?;
    let tone = MessageTone::for_days_overdue(days_overdue);
    let tokens = MessageTokens::for_case(snapshot, facts.now);

    let priority = if days_overdue > URGENT_MESSAGE_MIN_DAYS_OVERDUE {
        Priority::High
    } else {
        Priority::Medium
    };

    Some(Suggestion {
        id: RuleId::MessageTemplate,
        kind: SuggestionKind::Message,
        priority,
        title: format!("Mensagem sugerida: tom {}", tone.label()),
        description: format!(
            "Rascunho de mensagem em tom {} para {days_overdue} dias de atraso.",
            tone.label()
        ),
        reasoning: "O tom da mensagem acompanha a faixa de atraso do caso.".to_string(),
        action_label: Some("Usar mensagem".to_string()),
        template: Some(render(tone.template(), &tokens)),
        confidence: MESSAGE_TEMPLATE_CONFIDENCE,
    })
}

fn channel_insight(snapshot: &CaseSnapshot, _facts: &CaseFacts) -> Option<Suggestion> {
    if !snapshot.has_consent? {
        return None;
    }
    snapshot.phone()?;
    snapshot.email()?;

    let days_overdue = snapshot.sanitized_days_overdue()?;
    let (channel, reasoning) = if days_overdue > MESSAGING_CHANNEL_MIN_DAYS_OVERDUE {
        (
            "WhatsApp",
            "Atrasos acima de 30 dias respondem melhor a mensagens instantâneas.",
        )
    } else {
        (
            "E-mail",
            "Atrasos curtos respondem bem a lembretes formais por e-mail.",
        )
    };

    Some(Suggestion {
        id: RuleId::ChannelInsight,
        kind: SuggestionKind::Insight,
        priority: Priority::Low,
        title: format!("Canal preferencial: {channel}"),
        description: format!(
            "Cliente com telefone e e-mail cadastrados. Para {days_overdue} dias de atraso, \
             priorize {channel}."
        ),
        reasoning: reasoning.to_string(),
        action_label: None,
        template: None,
        confidence: CHANNEL_INSIGHT_CONFIDENCE,
    })
}

fn follow_up(_snapshot: &CaseSnapshot, facts: &CaseFacts) -> Option<Suggestion> {
    if !facts.has_recent_promise {
        return None;
    }

    Some(Suggestion {
        id: RuleId::FollowUp,
        kind: SuggestionKind::Action,
        priority: Priority::Medium,
        title: "Acompanhar promessa de pagamento".to_string(),
        description: "Há uma promessa de pagamento registrada nos últimos 7 dias. Agende um \
                      lembrete para a data combinada."
            .to_string(),
        reasoning: "Lembretes próximos à data prometida aumentam o cumprimento de promessas."
            .to_string(),
        action_label: Some("Agendar lembrete".to_string()),
        template: None,
        confidence: FOLLOW_UP_CONFIDENCE,
    })
}

fn installment_insight(snapshot: &CaseSnapshot, _facts: &CaseFacts) -> Option<Suggestion> {
    let overdue = snapshot.installments_overdue;
    if overdue <= INSTALLMENT_ALERT_THRESHOLD {
        return None;
    }
    let total = snapshot.total_installments.max(overdue);

    Some(Suggestion {
        id: RuleId::InstallmentInsight,
        kind: SuggestionKind::Insight,
        priority: Priority::Medium,
        title: "Várias parcelas em atraso".to_string(),
        description: format!("{overdue} de {total} parcelas estão em atraso."),
        reasoning: "Mais de duas parcelas vencidas favorecem renegociar o saldo completo."
            .to_string(),
        action_label: Some("Propor renegociação".to_string()),
        template: None,
        confidence: INSTALLMENT_CONFIDENCE,
    })
}
