use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::guidance::templates::Topic;
use crate::llm_client::{ChatMessage, ChatRole};

/// Number of trailing turns sent upstream as context (three exchanges).
pub const CONTEXT_WINDOW_TURNS: usize = 6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl From<Role> for ChatRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub topic: Topic,
    pub timestamp: DateTime<Utc>,
}

/// Ordered conversation log. Turns are only ever appended, in user/assistant pairs.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub(crate) fn push_exchange(&mut self, user: ConversationTurn, assistant: ConversationTurn) {
        self.turns.push(user);
        self.turns.push(assistant);
    }

    /// The last `CONTEXT_WINDOW_TURNS` turns as chat messages, oldest first.
    pub fn context_window(&self) -> Vec<ChatMessage> {
        let start = self.turns.len().saturating_sub(CONTEXT_WINDOW_TURNS);
        self.turns[start..]
            .iter()
            .map(|turn| ChatMessage::new(turn.role.into(), turn.content.clone()))
            .collect()
    }

    /// The user/assistant pair at exchange index `n`.
    pub fn exchange(&self, n: usize) -> Option<(&ConversationTurn, &ConversationTurn)> {
        let user = self.turns.get(n * 2)?;
        let assistant = self.turns.get(n * 2 + 1)?;
        Some((user, assistant))
    }

    pub fn exchange_count(&self) -> usize {
        self.turns.len() / 2
    }
}

/// Cumulative per-session usage. Never decreases; survives history clears.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionCounters {
    pub api_calls: u64,
    pub total_tokens_estimate: u64,
}

/// Length-based token heuristic over the combined prompt and response text:
/// one token per four characters.
pub fn estimate_tokens(prompt: &str, response: &str) -> u64 {
    ((prompt.chars().count() + response.chars().count()) / 4) as u64
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl ChecklistProgress {
    pub fn of(flags: &[bool]) -> Self {
        let completed = flags.iter().filter(|f| **f).count();
        let total = flags.len();
        let percent = if total > 0 {
            (completed * 100 / total) as u8
        } else {
            0
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// Completion flags per checklist, keyed by `{topic}_{log length}`.
/// An entry's length is fixed at creation.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChecklistState {
    entries: BTreeMap<String, Vec<bool>>,
}

impl ChecklistState {
    pub fn key_for(topic: Topic, log_len: usize) -> String {
        format!("{}_{}", topic.key(), log_len)
    }

    /// Creates an all-unchecked entry unless one already exists.
    pub fn ensure(&mut self, key: &str, item_count: usize) -> &[bool] {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| vec![false; item_count])
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&[bool]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Sets one flag. Returns `None` for an unknown key or out-of-range index.
    pub fn set(&mut self, key: &str, index: usize, checked: bool) -> Option<ChecklistProgress> {
        let flags = self.entries.get_mut(key)?;
        *flags.get_mut(index)? = checked;
        Some(ChecklistProgress::of(flags))
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Profile fields as submitted by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub name: Option<String>,
    pub industry: String,
    pub stage: String,
    pub team_size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartupProfile {
    pub name: Option<String>,
    pub industry: String,
    pub stage: String,
    pub team_size: String,
    pub updated_at: DateTime<Utc>,
}

impl StartupProfile {
    /// Fixed-format sentence appended to prompts.
    pub fn context_sentence(&self) -> String {
        format!(
            "Startup Context: {} startup at {} stage with {} team members.",
            self.industry, self.stage, self.team_size
        )
    }
}

/// All per-session state. Lives only in memory.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SessionState {
    pub log: ConversationLog,
    pub counters: SessionCounters,
    pub checklists: ChecklistState,
    pub profile: Option<StartupProfile>,
}
