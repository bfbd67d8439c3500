use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CaseId, CaseSnapshot};
use super::repository::{CaseRepository, FeedbackPublisher, FeedbackVerdict, RepositoryError};
use super::service::{CaseAssistantService, CaseServiceError};
use super::suggestions::{RuleId, Suggestion};
use super::template::{render, MessageTokens, TOKEN_COUNT};

/// Router builder exposing suggestion, apply, feedback and template endpoints.
pub fn case_assistant_router<R, F>(service: Arc<CaseAssistantService<R, F>>) -> Router
where
    R: CaseRepository + 'static,
    F: FeedbackPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/suggestions/evaluate",
            post(evaluate_handler::<R, F>),
        )
        .route(
            "/api/v1/cases/:case_id/suggestions",
            get(suggestions_handler::<R, F>),
        )
        .route(
            "/api/v1/cases/:case_id/suggestions/:suggestion_id/apply",
            post(apply_handler::<R, F>),
        )
        .route(
            "/api/v1/cases/:case_id/suggestions/:suggestion_id/feedback",
            post(feedback_handler::<R, F>),
        )
        .route("/api/v1/templates/render", post(render_handler))
        .with_state(service)
}

/// Optional evaluation instant; the request time is used when absent.
#[derive(Debug, Default, Deserialize)]
pub struct EvaluationClock {
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

impl EvaluationClock {
    fn resolve(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub snapshot: CaseSnapshot,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub case_id: CaseId,
    pub evaluated_at: DateTime<Utc>,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub verdict: FeedbackVerdict,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub template: String,
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub snapshot: Option<CaseSnapshot>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenderResponse {
    pub rendered: String,
}

pub(crate) async fn evaluate_handler<R, F>(
    State(service): State<Arc<CaseAssistantService<R, F>>>,
    Json(request): Json<EvaluateRequest>,
) -> Response
where
    R: CaseRepository + 'static,
    F: FeedbackPublisher + 'static,
{
    let evaluated_at = request.now.unwrap_or_else(Utc::now);
    let suggestions = service.engine().evaluate(&request.snapshot, evaluated_at);
    let body = EvaluateResponse {
        case_id: request.snapshot.id,
        evaluated_at,
        suggestions,
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) async fn suggestions_handler<R, F>(
    State(service): State<Arc<CaseAssistantService<R, F>>>,
    Path(case_id): Path<u64>,
    Query(clock): Query<EvaluationClock>,
) -> Response
where
    R: CaseRepository + 'static,
    F: FeedbackPublisher + 'static,
{
    match service.refresh(CaseId(case_id), clock.resolve()) {
        Ok(batch) => (StatusCode::OK, Json(batch)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn apply_handler<R, F>(
    State(service): State<Arc<CaseAssistantService<R, F>>>,
    Path((case_id, suggestion_id)): Path<(u64, String)>,
    Query(clock): Query<EvaluationClock>,
) -> Response
where
    R: CaseRepository + 'static,
    F: FeedbackPublisher + 'static,
{
    let Some(suggestion_id) = RuleId::parse(&suggestion_id) else {
        return unknown_suggestion(&suggestion_id);
    };

    match service.apply(CaseId(case_id), suggestion_id, clock.resolve()) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn feedback_handler<R, F>(
    State(service): State<Arc<CaseAssistantService<R, F>>>,
    Path((case_id, suggestion_id)): Path<(u64, String)>,
    Json(request): Json<FeedbackRequest>,
) -> Response
where
    R: CaseRepository + 'static,
    F: FeedbackPublisher + 'static,
{
    let Some(suggestion_id) = RuleId::parse(&suggestion_id) else {
        return unknown_suggestion(&suggestion_id);
    };

    let FeedbackRequest {
        verdict,
        comment,
        now,
    } = request;
    let now = now.unwrap_or_else(Utc::now);

    match service.record_feedback(CaseId(case_id), suggestion_id, verdict, comment, now) {
        Ok(feedback) => (StatusCode::ACCEPTED, Json(feedback)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn render_handler(Json(request): Json<RenderRequest>) -> Response {
    let RenderRequest {
        template,
        tokens,
        snapshot,
        now,
    } = request;

    let tokens = match snapshot {
        Some(snapshot) => MessageTokens::for_case(&snapshot, now.unwrap_or_else(Utc::now)),
        None if tokens.len() > TOKEN_COUNT => {
            let payload = json!({
                "error": format!("at most {TOKEN_COUNT} tokens are supported, got {}", tokens.len()),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        None => MessageTokens::from_values(tokens),
    };

    let body = RenderResponse {
        rendered: render(&template, &tokens),
    };
    (StatusCode::OK, Json(body)).into_response()
}

fn unknown_suggestion(raw: &str) -> Response {
    let payload = json!({
        "error": format!("unknown suggestion id '{raw}'"),
    });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn error_response(err: CaseServiceError) -> Response {
    let status = match &err {
        CaseServiceError::CaseNotFound(_)
        | CaseServiceError::SuggestionNotFound { .. }
        | CaseServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CaseServiceError::NotApplicable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        CaseServiceError::Superseded { .. } => StatusCode::CONFLICT,
        CaseServiceError::Repository(_) | CaseServiceError::Feedback(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, Json(payload)).into_response()
}
