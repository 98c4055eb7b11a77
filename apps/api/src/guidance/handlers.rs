//! Axum route handlers for guidance turns and exports.

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use chrono::{DateTime, Utc};
use futures::{stream, Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::guidance::builder::Modifier;
use crate::guidance::checklist::extract_checklist_items;
use crate::guidance::export::{export_json, export_markdown, export_text, ExportFormat};
use crate::guidance::service::{execute_turn, prepare_turn, run_turn};
use crate::llm_client::StreamUpdate;
use crate::session::accounting::{Submission, TurnReport};
use crate::state::AppState;

const STREAM_BUFFER: usize = 64;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GuidanceRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub modifier: Modifier,
    #[serde(default = "default_include_context")]
    pub include_context: bool,
    /// Overrides the server-wide key for this request.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stream: Option<bool>,
}

fn default_include_context() -> bool {
    true
}

impl GuidanceRequest {
    fn into_submission(self, config: &Config, now: DateTime<Utc>) -> Submission {
        Submission {
            topic: self.topic,
            query: self.query,
            modifier: self.modifier,
            include_context: self.include_context,
            api_key: self
                .api_key
                .filter(|key| !key.trim().is_empty())
                .or_else(|| config.openrouter_api_key.clone()),
            model: self.model.unwrap_or_else(|| config.default_model.clone()),
            max_tokens: self.max_tokens.unwrap_or(config.default_max_tokens),
            temperature: config.default_temperature,
            top_p: config.default_top_p,
            stream: self.stream.unwrap_or(config.enable_streaming),
            submitted_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/guidance
///
/// Runs one turn. With `stream` off the finished `TurnReport` is returned as
/// JSON. With `stream` on the response is an event stream: `partial` events
/// carry the text so far (with cursor), `final` the finished text, then one
/// `turn` event with the report or one `error` event. Validation failures are
/// returned as plain HTTP errors before any stream starts.
pub async fn handle_guidance(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<GuidanceRequest>,
) -> Result<Response, AppError> {
    let mut session = state.sessions.acquire(session_id).await?;
    let submission = request.into_submission(&state.config, Utc::now());

    if !submission.stream {
        let report = run_turn(&state.llm, &mut session, submission).await?;
        return Ok(Json(report).into_response());
    }

    let turn = prepare_turn(&mut session, submission)?;

    let (update_tx, update_rx) = mpsc::channel::<StreamUpdate>(STREAM_BUFFER);
    let (outcome_tx, outcome_rx) = oneshot::channel::<Result<TurnReport, AppError>>();
    let llm = state.llm.clone();

    // The turn runs to completion even if the client goes away; the guard
    // moves into the task so the session stays locked until accounting is done.
    tokio::spawn(async move {
        let outcome = execute_turn(&llm, &mut session, turn, Some(&update_tx)).await;
        drop(update_tx);
        drop(session);
        if outcome_tx.send(outcome).is_err() {
            debug!(%session_id, "client disconnected before turn outcome");
        }
    });

    Ok(Sse::new(turn_events(update_rx, outcome_rx))
        .keep_alive(KeepAlive::default())
        .into_response())
}

fn turn_events(
    updates: mpsc::Receiver<StreamUpdate>,
    outcome: oneshot::Receiver<Result<TurnReport, AppError>>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let updates = stream::unfold(updates, |mut rx| async move {
        rx.recv().await.map(|update| (update_event(update), rx))
    });

    let outcome = stream::once(async move {
        match outcome.await {
            Ok(Ok(report)) => Event::default()
                .event("turn")
                .json_data(&report)
                .unwrap_or_else(|e| error_event("INTERNAL_ERROR", &e.to_string())),
            Ok(Err(err)) => error_event(err.code(), &err.user_message()),
            Err(_) => error_event("INTERNAL_ERROR", "turn ended without an outcome"),
        }
    });

    updates.chain(outcome).map(Ok)
}

fn update_event(update: StreamUpdate) -> Event {
    match update {
        StreamUpdate::Partial(text) => {
            Event::default().event("partial").data(event_text(&text))
        }
        StreamUpdate::Final(text) => Event::default().event("final").data(event_text(&text)),
    }
}

/// SSE fields may not carry carriage returns; line breaks become bare `\n`,
/// which the event encoder splits into `data:` lines.
fn event_text(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn error_event(code: &str, message: &str) -> Event {
    let payload = json!({ "code": code, "message": message });
    Event::default().event("error").data(payload.to_string())
}

/// GET /api/v1/sessions/:id/exchanges/:n/export?format=markdown|text|json
pub async fn handle_export(
    State(state): State<AppState>,
    Path((session_id, exchange)): Path<(Uuid, usize)>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let session = state.sessions.read(session_id).await?;
    let (question, guidance) = session
        .log
        .exchange(exchange)
        .ok_or_else(|| AppError::NotFound(format!("Exchange {exchange} not found")))?;

    let now = Utc::now();
    let checklist = extract_checklist_items(&guidance.content);
    let body = match params.format {
        ExportFormat::Markdown => export_markdown(
            &question.content,
            &guidance.content,
            guidance.topic,
            &checklist,
            now,
        ),
        ExportFormat::Text => export_text(&guidance.content),
        ExportFormat::Json => export_json(question, guidance, &checklist, now)
            .map_err(|e| AppError::Internal(e.into()))?,
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        params.format.filename(now)
    );

    Ok((
        [
            (header::CONTENT_TYPE, params.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_from_config() {
        let mut config = Config::for_tests("http://localhost/unused");
        config.openrouter_api_key = Some("sk-or-server-key-0123456".into());
        config.enable_streaming = false;

        let request: GuidanceRequest =
            serde_json::from_value(json!({"query": "How do I hire?"})).unwrap();
        let submission = request.into_submission(&config, Utc::now());

        assert_eq!(submission.api_key.as_deref(), Some("sk-or-server-key-0123456"));
        assert_eq!(submission.model, config.default_model);
        assert_eq!(submission.max_tokens, 2000);
        assert!(!submission.stream);
        assert!(submission.include_context);
        assert_eq!(submission.modifier, Modifier::None);
        assert!(submission.topic.is_none());
    }

    #[test]
    fn test_request_key_overrides_server_key() {
        let mut config = Config::for_tests("http://localhost/unused");
        config.openrouter_api_key = Some("sk-or-server-key-0123456".into());

        let request: GuidanceRequest = serde_json::from_value(json!({
            "query": "q",
            "api_key": "sk-or-user-key-0123456789",
            "modifier": "expand",
            "include_context": false,
            "stream": true
        }))
        .unwrap();
        let submission = request.into_submission(&config, Utc::now());
        assert_eq!(submission.api_key.as_deref(), Some("sk-or-user-key-0123456789"));
        assert_eq!(submission.modifier, Modifier::Expand);
        assert!(!submission.include_context);
        assert!(submission.stream);
    }

    #[test]
    fn test_event_text_drops_carriage_returns() {
        assert_eq!(event_text("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(event_text("plain"), "plain");
    }

    #[test]
    fn test_blank_request_key_falls_back() {
        let config = Config::for_tests("http://localhost/unused");
        let request: GuidanceRequest =
            serde_json::from_value(json!({"query": "q", "api_key": "  "})).unwrap();
        assert!(request.into_submission(&config, Utc::now()).api_key.is_none());
    }
}
