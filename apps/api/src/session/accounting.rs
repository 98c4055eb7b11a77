//! Session accounting as a pure reducer.
//!
//! `reduce(state, action)` returns the next state and the effects the caller
//! must perform. Network calls never happen here: `Submit` yields a
//! `CallCompletion` effect, and the caller feeds the outcome back as
//! `Completed` or `Failed`. All mutations for one turn happen inside the
//! single `Completed` step; `Failed` leaves the state untouched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::guidance::builder::{build_prompt, Modifier, PromptInput};
use crate::guidance::checklist::extract_checklist_items;
use crate::guidance::templates::Topic;
use crate::llm_client::{catalog, is_plausible_api_key, CompletionRequest};
use crate::session::models::{
    estimate_tokens, ChecklistProgress, ChecklistState, ConversationTurn, ProfileInput, Role,
    SessionCounters, SessionState, StartupProfile,
};

pub const RATE_LIMIT_WARNING_CALLS: u64 = 40;
pub const RATE_LIMIT_CALLS: u64 = 50;

/// Everything the user submitted for one turn, with server defaults applied.
#[derive(Debug, Clone)]
pub struct Submission {
    pub topic: Option<String>,
    pub query: String,
    pub modifier: Modifier,
    pub include_context: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
    pub submitted_at: DateTime<Utc>,
}

/// A validated turn waiting for its completion.
#[derive(Debug, Clone)]
pub struct PreparedTurn {
    pub topic: Topic,
    pub query: String,
    pub prompt: String,
    pub request: CompletionRequest,
    pub stream: bool,
    pub submitted_at: DateTime<Utc>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("empty query")]
    EmptyInput,
    #[error("missing API key")]
    MissingCredential,
    #[error("model '{0}' is not available")]
    UnsupportedModel(String),
    #[error("checklist '{key}' has no item {index}")]
    UnknownChecklistItem { key: String, index: usize },
}

#[derive(Debug, Clone)]
pub enum Action {
    Submit(Submission),
    Completed {
        turn: Box<PreparedTurn>,
        response: String,
        completed_at: DateTime<Utc>,
    },
    Failed {
        diagnostic: String,
    },
    SaveProfile {
        input: ProfileInput,
        at: DateTime<Utc>,
    },
    ClearHistory,
    ToggleChecklist {
        key: String,
        index: usize,
        checked: bool,
    },
}

#[derive(Debug, Clone)]
pub enum Effect {
    CallCompletion(Box<PreparedTurn>),
    Rejected(Rejection),
    TurnRecorded(TurnReport),
    ReportFailure(String),
    ProfileSaved(StartupProfile),
    HistoryCleared,
    ChecklistUpdated {
        key: String,
        progress: ChecklistProgress,
    },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitStatus {
    Ok,
    Warning,
    Reached,
}

impl RateLimitStatus {
    /// Advisory only. Nothing is blocked at any level.
    pub fn for_calls(api_calls: u64) -> Self {
        if api_calls >= RATE_LIMIT_CALLS {
            RateLimitStatus::Reached
        } else if api_calls >= RATE_LIMIT_WARNING_CALLS {
            RateLimitStatus::Warning
        } else {
            RateLimitStatus::Ok
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChecklistView {
    pub key: String,
    pub items: Vec<String>,
    pub flags: Vec<bool>,
    pub progress: ChecklistProgress,
}

/// Outcome of a successful turn, as returned to the user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TurnReport {
    pub exchange: usize,
    pub topic: Topic,
    pub topic_label: &'static str,
    pub response: String,
    pub checklist: Option<ChecklistView>,
    pub counters: SessionCounters,
    pub rate_limit: RateLimitStatus,
    pub related_topics: Vec<Topic>,
    pub warnings: Vec<String>,
}

pub fn reduce(mut state: SessionState, action: Action) -> (SessionState, Vec<Effect>) {
    let effects = match action {
        Action::Submit(submission) => vec![prepare(&state, submission)],
        Action::Completed {
            turn,
            response,
            completed_at,
        } => {
            if response.trim().is_empty() {
                vec![Effect::ReportFailure(
                    "The API returned an empty response".to_string(),
                )]
            } else {
                vec![Effect::TurnRecorded(record(
                    &mut state,
                    *turn,
                    response,
                    completed_at,
                ))]
            }
        }
        Action::Failed { diagnostic } => vec![Effect::ReportFailure(diagnostic)],
        Action::SaveProfile { input, at } => {
            let profile = StartupProfile {
                name: input.name.filter(|name| !name.trim().is_empty()),
                industry: input.industry,
                stage: input.stage,
                team_size: input.team_size,
                updated_at: at,
            };
            state.profile = Some(profile.clone());
            vec![Effect::ProfileSaved(profile)]
        }
        Action::ClearHistory => {
            // Counters are cumulative for the whole session and survive a clear.
            state.log = Default::default();
            state.checklists = ChecklistState::default();
            vec![Effect::HistoryCleared]
        }
        Action::ToggleChecklist {
            key,
            index,
            checked,
        } => match state.checklists.set(&key, index, checked) {
            Some(progress) => vec![Effect::ChecklistUpdated { key, progress }],
            None => vec![Effect::Rejected(Rejection::UnknownChecklistItem { key, index })],
        },
    };

    (state, effects)
}

fn prepare(state: &SessionState, submission: Submission) -> Effect {
    let query = submission.query.trim();
    if query.is_empty() {
        return Effect::Rejected(Rejection::EmptyInput);
    }

    let Some(api_key) = submission
        .api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
    else {
        return Effect::Rejected(Rejection::MissingCredential);
    };

    if !catalog::is_supported(&submission.model) {
        return Effect::Rejected(Rejection::UnsupportedModel(submission.model));
    }

    let mut warnings = Vec::new();
    if !is_plausible_api_key(&api_key) {
        warnings.push("API key format looks incorrect".to_string());
    }

    let built = build_prompt(PromptInput {
        topic_key: submission.topic.as_deref(),
        query,
        profile: state.profile.as_ref(),
        modifier: submission.modifier,
        history: submission.include_context.then_some(&state.log),
    });

    let request = CompletionRequest {
        api_key,
        model: submission.model,
        messages: built.messages(),
        max_tokens: catalog::clamp_max_tokens(submission.max_tokens),
        temperature: submission.temperature,
        top_p: submission.top_p,
    };

    Effect::CallCompletion(Box::new(PreparedTurn {
        topic: built.topic,
        query: query.to_string(),
        prompt: built.prompt,
        request,
        stream: submission.stream,
        submitted_at: submission.submitted_at,
        warnings,
    }))
}

fn record(
    state: &mut SessionState,
    turn: PreparedTurn,
    response: String,
    completed_at: DateTime<Utc>,
) -> TurnReport {
    state.counters.api_calls += 1;
    state.counters.total_tokens_estimate += estimate_tokens(&turn.prompt, &response);

    state.log.push_exchange(
        ConversationTurn {
            role: Role::User,
            content: turn.query,
            topic: turn.topic,
            timestamp: turn.submitted_at,
        },
        ConversationTurn {
            role: Role::Assistant,
            content: response.clone(),
            topic: turn.topic,
            timestamp: completed_at,
        },
    );

    let items = extract_checklist_items(&response);
    let checklist = if items.is_empty() {
        None
    } else {
        let key = ChecklistState::key_for(turn.topic, state.log.len());
        let flags = state.checklists.ensure(&key, items.len()).to_vec();
        let progress = ChecklistProgress::of(&flags);
        Some(ChecklistView {
            key,
            items,
            flags,
            progress,
        })
    };

    TurnReport {
        exchange: state.log.exchange_count() - 1,
        topic: turn.topic,
        topic_label: turn.topic.label(),
        response,
        checklist,
        counters: state.counters,
        rate_limit: RateLimitStatus::for_calls(state.counters.api_calls),
        related_topics: turn.topic.related(),
        warnings: turn.warnings,
    }
}
