use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::guidance::templates::Topic;
use crate::llm_client::catalog;
use crate::session::accounting::{Action, Effect, RateLimitStatus};
use crate::session::models::{
    ChecklistProgress, ChecklistState, ConversationTurn, ProfileInput, SessionCounters,
    StartupProfile,
};
use crate::session::store::dispatch;
use crate::state::AppState;

const QUERY_PREVIEW_CHARS: usize = 100;

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Serialize)]
pub struct ExchangeSummary {
    pub index: usize,
    pub topic: Topic,
    pub query_preview: String,
    pub asked_at: DateTime<Utc>,
    pub answered_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub exchanges: Vec<ExchangeSummary>,
    pub turns: Vec<ConversationTurn>,
    pub counters: SessionCounters,
    pub checklists: ChecklistState,
    pub profile: Option<StartupProfile>,
}

#[derive(Deserialize)]
pub struct ChecklistToggle {
    pub checked: bool,
}

#[derive(Serialize)]
pub struct ChecklistToggled {
    pub key: String,
    pub index: usize,
    pub checked: bool,
    pub progress: ChecklistProgress,
}

#[derive(Deserialize)]
pub struct UsageQuery {
    pub model: Option<String>,
}

#[derive(Serialize)]
pub struct UsageReport {
    pub api_calls: u64,
    pub total_tokens_estimate: u64,
    pub model: String,
    pub estimated_cost_usd: f64,
    pub rate_limit: RateLimitStatus,
}

/// Truncates a query for the history list.
fn preview(query: &str) -> String {
    if query.chars().count() <= QUERY_PREVIEW_CHARS {
        return query.to_string();
    }
    let head: String = query.chars().take(QUERY_PREVIEW_CHARS).collect();
    format!("{head}...")
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.read(session_id).await?;

    let exchanges = (0..session.log.exchange_count())
        .filter_map(|index| {
            session
                .log
                .exchange(index)
                .map(|(question, answer)| ExchangeSummary {
                    index,
                    topic: question.topic,
                    query_preview: preview(&question.content),
                    asked_at: question.timestamp,
                    answered_at: answer.timestamp,
                })
        })
        .collect();

    Ok(Json(SessionSnapshot {
        session_id,
        exchanges,
        turns: session.log.turns().to_vec(),
        counters: session.counters,
        checklists: session.checklists.clone(),
        profile: session.profile.clone(),
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/profile
///
/// Replaces the stored profile wholesale.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<ProfileInput>,
) -> Result<Json<StartupProfile>, AppError> {
    if [&input.industry, &input.stage, &input.team_size]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(AppError::Validation(
            "industry, stage and team_size are required".to_string(),
        ));
    }

    let mut session = state.sessions.acquire(session_id).await?;
    let action = Action::SaveProfile {
        input,
        at: Utc::now(),
    };
    match dispatch(&mut session, action).into_iter().next() {
        Some(Effect::ProfileSaved(profile)) => Ok(Json(profile)),
        other => Err(AppError::Internal(anyhow::anyhow!(
            "unexpected effect: {other:?}"
        ))),
    }
}

/// POST /api/v1/sessions/:id/history/clear
///
/// Empties the conversation log and checklists. Usage counters are kept.
pub async fn handle_clear_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionCounters>, AppError> {
    let mut session = state.sessions.acquire(session_id).await?;
    dispatch(&mut session, Action::ClearHistory);
    Ok(Json(session.counters))
}

/// PATCH /api/v1/sessions/:id/checklists/:key/:index
pub async fn handle_toggle_checklist(
    State(state): State<AppState>,
    Path((session_id, key, index)): Path<(Uuid, String, usize)>,
    Json(toggle): Json<ChecklistToggle>,
) -> Result<Json<ChecklistToggled>, AppError> {
    let mut session = state.sessions.acquire(session_id).await?;
    let action = Action::ToggleChecklist {
        key,
        index,
        checked: toggle.checked,
    };
    match dispatch(&mut session, action).into_iter().next() {
        Some(Effect::ChecklistUpdated { key, progress }) => Ok(Json(ChecklistToggled {
            key,
            index,
            checked: toggle.checked,
            progress,
        })),
        Some(Effect::Rejected(rejection)) => Err(rejection.into()),
        other => Err(AppError::Internal(anyhow::anyhow!(
            "unexpected effect: {other:?}"
        ))),
    }
}

/// GET /api/v1/sessions/:id/usage?model=
pub async fn handle_usage(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(params): Query<UsageQuery>,
) -> Result<Json<UsageReport>, AppError> {
    let counters = state.sessions.read(session_id).await?.counters;
    let model = params
        .model
        .unwrap_or_else(|| state.config.default_model.clone());

    Ok(Json(UsageReport {
        api_calls: counters.api_calls,
        total_tokens_estimate: counters.total_tokens_estimate,
        estimated_cost_usd: catalog::estimate_cost(&model, counters.total_tokens_estimate),
        model,
        rate_limit: RateLimitStatus::for_calls(counters.api_calls),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_query_untouched() {
        assert_eq!(preview("How do I hire?"), "How do I hire?");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(150);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), QUERY_PREVIEW_CHARS + 3);
    }
}
