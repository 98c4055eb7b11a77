//! Drives one guidance turn: validate and build (reducer), call the
//! completion API, then feed the outcome back for accounting.
//!
//! Callers hold the session's exclusive guard for the whole turn, so the
//! build → call → account sequence is one critical section.

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::llm_client::{LlmClient, StreamUpdate};
use crate::session::accounting::{Action, Effect, PreparedTurn, RateLimitStatus, Submission, TurnReport};
use crate::session::models::SessionState;
use crate::session::store::dispatch;

/// Validates the submission and builds the request. No network call happens
/// and the session is not modified.
pub fn prepare_turn(
    session: &mut SessionState,
    submission: Submission,
) -> Result<Box<PreparedTurn>, AppError> {
    match single(dispatch(session, Action::Submit(submission)))? {
        Effect::CallCompletion(turn) => {
            for warning in &turn.warnings {
                warn!(topic = %turn.topic, "{warning}");
            }
            Ok(turn)
        }
        Effect::Rejected(rejection) => Err(rejection.into()),
        other => Err(unexpected(other)),
    }
}

/// Calls the API for a prepared turn and records the outcome. On failure the
/// session is left exactly as it was.
pub async fn execute_turn(
    llm: &LlmClient,
    session: &mut SessionState,
    turn: Box<PreparedTurn>,
    updates: Option<&mpsc::Sender<StreamUpdate>>,
) -> Result<TurnReport, AppError> {
    info!(
        topic = %turn.topic,
        model = %turn.request.model,
        stream = turn.stream,
        "requesting guidance"
    );

    let outcome = if turn.stream {
        llm.stream(&turn.request, updates).await
    } else {
        llm.complete(&turn.request).await
    };

    let action = match outcome {
        Ok(response) => Action::Completed {
            turn,
            response,
            completed_at: Utc::now(),
        },
        Err(e) => {
            error!(topic = %turn.topic, "Guidance request failed: {e}");
            Action::Failed {
                diagnostic: e.to_string(),
            }
        }
    };

    match single(dispatch(session, action))? {
        Effect::TurnRecorded(report) => {
            if report.rate_limit != RateLimitStatus::Ok {
                warn!(
                    api_calls = report.counters.api_calls,
                    "session is at {:?} request volume",
                    report.rate_limit
                );
            }
            Ok(report)
        }
        Effect::ReportFailure(diagnostic) => Err(AppError::Upstream(diagnostic)),
        other => Err(unexpected(other)),
    }
}

/// Full turn without incremental display.
pub async fn run_turn(
    llm: &LlmClient,
    session: &mut SessionState,
    submission: Submission,
) -> Result<TurnReport, AppError> {
    let turn = prepare_turn(session, submission)?;
    execute_turn(llm, session, turn, None).await
}

fn single(effects: Vec<Effect>) -> Result<Effect, AppError> {
    effects
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("reducer produced no effect")))
}

fn unexpected(effect: Effect) -> AppError {
    AppError::Internal(anyhow::anyhow!("unexpected effect: {effect:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::builder::Modifier;
    use crate::llm_client::{catalog, test_server};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/api/v1/chat/completions";

    fn submission(query: &str, stream: bool) -> Submission {
        Submission {
            topic: Some("funding".into()),
            query: query.into(),
            modifier: Modifier::None,
            include_context: true,
            api_key: Some("sk-or-v1-0123456789abcdef".into()),
            model: catalog::DEFAULT_MODEL.into(),
            max_tokens: 2000,
            temperature: 0.7,
            top_p: 0.9,
            stream,
            submitted_at: Utc::now(),
        }
    }

    async fn server_with(template: ResponseTemplate) -> (MockServer, LlmClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(template)
            .mount(&server)
            .await;
        let llm = LlmClient::new(format!("{}{}", server.uri(), ENDPOINT), Duration::from_secs(5))
            .unwrap();
        (server, llm)
    }

    #[tokio::test]
    async fn test_streamed_turn_is_recorded() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"1. Build a deck\\n\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"2. Meet angels\"}}]}\n\n",
            "data: [DONE]\n\n"
        );
        let (_server, llm) =
            server_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")).await;

        let mut session = SessionState::default();
        let report = run_turn(&llm, &mut session, submission("How do I raise?", true))
            .await
            .unwrap();

        assert_eq!(report.response, "1. Build a deck\n2. Meet angels");
        assert_eq!(report.checklist.as_ref().map(|c| c.items.len()), Some(2));
        assert_eq!(session.counters.api_calls, 1);
        assert_eq!(session.log.len(), 2);
    }

    #[tokio::test]
    async fn test_non_streamed_turn_is_recorded() {
        let (_server, llm) = server_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Bootstrap first."}}]
        })))
        .await;

        let mut session = SessionState::default();
        let report = run_turn(&llm, &mut session, submission("Should I raise?", false))
            .await
            .unwrap();
        assert_eq!(report.response, "Bootstrap first.");
        assert_eq!(session.log.turns()[1].content, "Bootstrap first.");
    }

    #[tokio::test]
    async fn test_transport_failure_changes_nothing() {
        let (_server, llm) =
            server_with(ResponseTemplate::new(500).set_body_string("upstream exploded")).await;

        let mut session = SessionState::default();
        run_turn(&llm, &mut session, submission("first", false))
            .await
            .unwrap_err();

        let err = run_turn(&llm, &mut session, submission("second", true))
            .await
            .unwrap_err();
        match err {
            AppError::Upstream(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("upstream exploded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(session, SessionState::default());
    }

    #[tokio::test]
    async fn test_stream_cut_off_mid_body_changes_nothing() {
        let url = test_server::truncated_stream(test_server::FIRST_FRAGMENT_LINE).await;
        let llm = LlmClient::new(url, Duration::from_secs(5)).unwrap();

        let mut session = SessionState::default();
        let turn = prepare_turn(&mut session, submission("How do I raise?", true)).unwrap();
        let (tx, mut rx) = mpsc::channel(8);
        let err = execute_turn(&llm, &mut session, turn, Some(&tx))
            .await
            .unwrap_err();
        drop(tx);

        assert!(matches!(&err, AppError::Upstream(msg) if msg.starts_with("Network error")));
        assert!(matches!(rx.recv().await, Some(StreamUpdate::Partial(_))));
        assert_eq!(session, SessionState::default());
    }

    #[tokio::test]
    async fn test_rejections_never_reach_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let llm = LlmClient::new(format!("{}{}", server.uri(), ENDPOINT), Duration::from_secs(5))
            .unwrap();

        let mut session = SessionState::default();
        let err = run_turn(&llm, &mut session, submission("  ", true)).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyInput));

        let mut no_key = submission("How do I raise?", true);
        no_key.api_key = None;
        let err = run_turn(&llm, &mut session, no_key).await.unwrap_err();
        assert!(matches!(err, AppError::MissingCredential));

        assert_eq!(session, SessionState::default());
    }
}
