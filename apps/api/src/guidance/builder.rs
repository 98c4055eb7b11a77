//! Request builder: template + query + profile context + modifier, plus the
//! trailing conversation window.

use serde::{Deserialize, Serialize};

use crate::guidance::templates::Topic;
use crate::llm_client::prompts::ADVISOR_SYSTEM;
use crate::llm_client::{ChatMessage, ChatRole};
use crate::session::models::{ConversationLog, StartupProfile};

/// Follow-up instruction applied to a request. At most one per request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    #[default]
    None,
    Refine,
    Simplify,
    Expand,
}

impl Modifier {
    pub fn instruction(self) -> Option<&'static str> {
        match self {
            Modifier::None => None,
            Modifier::Refine => Some(
                "Provide a more refined, detailed version of your previous response \
                 with specific examples and case studies.",
            ),
            Modifier::Simplify => Some(
                "Simplify your previous response to be more concise and actionable, \
                 focusing on immediate next steps.",
            ),
            Modifier::Expand => Some(
                "Expand on your previous response with more comprehensive details, \
                 additional strategies, and deeper insights.",
            ),
        }
    }
}

pub struct PromptInput<'a> {
    pub topic_key: Option<&'a str>,
    pub query: &'a str,
    pub profile: Option<&'a StartupProfile>,
    pub modifier: Modifier,
    /// `None` when the caller opted out of conversation context.
    pub history: Option<&'a ConversationLog>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPrompt {
    pub topic: Topic,
    pub prompt: String,
    pub context: Vec<ChatMessage>,
}

impl BuiltPrompt {
    /// System message, then the context window, then the new prompt.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.context.len() + 2);
        messages.push(ChatMessage::new(ChatRole::System, ADVISOR_SYSTEM));
        messages.extend(self.context.iter().cloned());
        messages.push(ChatMessage::new(ChatRole::User, self.prompt.clone()));
        messages
    }
}

pub fn build_prompt(input: PromptInput<'_>) -> BuiltPrompt {
    let topic = Topic::from_key(input.topic_key);
    let mut prompt = topic.render(input.query);

    if let Some(profile) = input.profile {
        prompt.push_str("\n\n");
        prompt.push_str(&profile.context_sentence());
    }

    if let Some(instruction) = input.modifier.instruction() {
        prompt.push_str("\n\n");
        prompt.push_str(instruction);
    }

    let context = input
        .history
        .filter(|log| !log.is_empty())
        .map(ConversationLog::context_window)
        .unwrap_or_default();

    BuiltPrompt {
        topic,
        prompt,
        context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::prompts::{GENERAL_PROMPT, SCALING_PROMPT};
    use crate::session::models::{ConversationTurn, Role};
    use chrono::Utc;

    const SCALING_MARKER: &str = "specializing in business scaling strategies";

    fn input<'a>(topic: Option<&'a str>, query: &'a str) -> PromptInput<'a> {
        PromptInput {
            topic_key: topic,
            query,
            profile: None,
            modifier: Modifier::None,
            history: None,
        }
    }

    fn fintech_profile() -> StartupProfile {
        StartupProfile {
            name: Some("Ledgerly".into()),
            industry: "Fintech".into(),
            stage: "MVP".into(),
            team_size: "Solo Founder".into(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_scaling_without_profile_or_modifier() {
        let built = build_prompt(input(Some("scaling"), "How do I scale from 10 to 100 users?"));
        assert_eq!(built.topic, Topic::Scaling);
        assert!(SCALING_PROMPT.contains(SCALING_MARKER));
        assert!(built.prompt.contains(SCALING_MARKER));
        assert!(built.prompt.contains("How do I scale from 10 to 100 users?"));
        assert!(!built.prompt.contains("Startup Context:"));
        assert!(built.context.is_empty());
    }

    #[test]
    fn test_unknown_topic_uses_general_template() {
        for key in [None, Some("crypto"), Some("")] {
            let built = build_prompt(input(key, "Where do I start?"));
            assert_eq!(built.topic, Topic::General);
            assert!(built.prompt.starts_with(&GENERAL_PROMPT[..60]));
        }
    }

    #[test]
    fn test_profile_sentence_names_all_three_fields() {
        let profile = fintech_profile();
        let built = build_prompt(PromptInput {
            profile: Some(&profile),
            ..input(Some("funding"), "How much should I raise?")
        });
        assert!(built.prompt.contains(
            "Startup Context: Fintech startup at MVP stage with Solo Founder team members."
        ));
    }

    #[test]
    fn test_modifier_suffix_follows_profile() {
        let profile = fintech_profile();
        let built = build_prompt(PromptInput {
            profile: Some(&profile),
            modifier: Modifier::Simplify,
            ..input(Some("team"), "Who do I hire first?")
        });
        let context_at = built.prompt.find("Startup Context:").unwrap();
        let modifier_at = built.prompt.find("Simplify your previous response").unwrap();
        assert!(context_at < modifier_at);
        assert!(built.prompt.ends_with("focusing on immediate next steps."));
    }

    #[test]
    fn test_each_modifier_has_distinct_instruction() {
        let refine = Modifier::Refine.instruction().unwrap();
        let expand = Modifier::Expand.instruction().unwrap();
        assert!(refine.contains("case studies"));
        assert!(expand.contains("additional strategies"));
        assert!(Modifier::None.instruction().is_none());
    }

    #[test]
    fn test_messages_wrap_context_between_system_and_prompt() {
        let mut log = ConversationLog::default();
        for i in 0..4 {
            log.push_exchange(
                ConversationTurn {
                    role: Role::User,
                    content: format!("q{i}"),
                    topic: Topic::General,
                    timestamp: Utc::now(),
                },
                ConversationTurn {
                    role: Role::Assistant,
                    content: format!("a{i}"),
                    topic: Topic::General,
                    timestamp: Utc::now(),
                },
            );
        }
        let built = build_prompt(PromptInput {
            history: Some(&log),
            ..input(Some("product"), "What next?")
        });
        let messages = built.messages();
        assert_eq!(messages.len(), 8);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].content, "q1");
        assert_eq!(messages[6].content, "a3");
        assert_eq!(messages[7].role, ChatRole::User);
        assert_eq!(messages[7].content, built.prompt);
    }
}
