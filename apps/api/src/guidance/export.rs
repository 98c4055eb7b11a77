//! Export documents for a finished exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::guidance::templates::Topic;
use crate::session::models::ConversationTurn;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Text,
    Json,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Text => "text/plain; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    /// Download filename embedding the generation time.
    pub fn filename(self, at: DateTime<Utc>) -> String {
        let stamp = at.format("%Y%m%d_%H%M%S");
        match self {
            ExportFormat::Markdown => format!("startup_guidance_{stamp}.md"),
            ExportFormat::Text => format!("guidance_{stamp}.txt"),
            ExportFormat::Json => format!("guidance_{stamp}.json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExchangeExport<'a> {
    topic: Topic,
    topic_label: &'static str,
    question: &'a ConversationTurn,
    guidance: &'a ConversationTurn,
    checklist: &'a [String],
    exported_at: DateTime<Utc>,
}

/// Human-readable document: topic, time, question, guidance, checklist.
pub fn export_markdown(
    query: &str,
    response: &str,
    topic: Topic,
    checklist: &[String],
    at: DateTime<Utc>,
) -> String {
    let mut doc = format!(
        "# Startup Guidance: {}\n\n*Generated on {}*\n\n## Question\n\n{}\n\n## Guidance\n\n{}\n",
        topic.label(),
        at.format("%Y-%m-%d %H:%M:%S UTC"),
        query.trim(),
        response.trim()
    );

    if !checklist.is_empty() {
        doc.push_str("\n## Action Checklist\n\n");
        for item in checklist {
            doc.push_str("- [ ] ");
            doc.push_str(item);
            doc.push('\n');
        }
    }

    doc
}

/// Plain-text export is the raw response, unchanged.
pub fn export_text(response: &str) -> String {
    response.to_string()
}

pub fn export_json(
    question: &ConversationTurn,
    guidance: &ConversationTurn,
    checklist: &[String],
    at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ExchangeExport {
        topic: guidance.topic,
        topic_label: guidance.topic.label(),
        question,
        guidance,
        checklist,
        exported_at: at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::models::Role;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_filenames_embed_timestamp() {
        assert_eq!(
            ExportFormat::Markdown.filename(at()),
            "startup_guidance_20260314_092653.md"
        );
        assert_eq!(ExportFormat::Text.filename(at()), "guidance_20260314_092653.txt");
        assert_eq!(ExportFormat::Json.filename(at()), "guidance_20260314_092653.json");
    }

    #[test]
    fn test_markdown_contains_all_sections() {
        let items = vec!["Build a pitch deck".to_string(), "Update the cap table".to_string()];
        let doc = export_markdown(
            "How do I raise?",
            "Start with angels.\n1. Build a pitch deck\n",
            Topic::Funding,
            &items,
            at(),
        );
        assert!(doc.starts_with("# Startup Guidance: Funding & Investment"));
        assert!(doc.contains("*Generated on 2026-03-14 09:26:53 UTC*"));
        assert!(doc.contains("## Question\n\nHow do I raise?"));
        assert!(doc.contains("## Guidance\n\nStart with angels."));
        assert!(doc.contains("- [ ] Build a pitch deck\n- [ ] Update the cap table\n"));
    }

    #[test]
    fn test_markdown_without_checklist_has_no_section() {
        let doc = export_markdown("q", "plain answer", Topic::General, &[], at());
        assert!(!doc.contains("Action Checklist"));
    }

    #[test]
    fn test_text_is_raw_response() {
        assert_eq!(export_text("  raw\n"), "  raw\n");
    }

    #[test]
    fn test_json_export_shape() {
        let question = ConversationTurn {
            role: Role::User,
            content: "q".into(),
            topic: Topic::Team,
            timestamp: at(),
        };
        let guidance = ConversationTurn {
            role: Role::Assistant,
            content: "- hire".into(),
            topic: Topic::Team,
            timestamp: at(),
        };
        let json = export_json(&question, &guidance, &["hire".to_string()], at()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["topic"], "team");
        assert_eq!(value["question"]["role"], "user");
        assert_eq!(value["guidance"]["content"], "- hire");
        assert_eq!(value["checklist"][0], "hire");
    }
}
