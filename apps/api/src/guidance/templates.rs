//! Template registry: maps a topic key to its instruction template, display
//! label and example questions. Lookup never fails; unknown keys resolve to
//! the general template.

use serde::{Deserialize, Serialize};

use crate::guidance::prompts::{
    DOCUMENTS_PROMPT, FUNDING_PROMPT, GENERAL_PROMPT, MARKETING_PROMPT, PRODUCT_PROMPT,
    QUERY_PLACEHOLDER, SCALING_PROMPT, TEAM_PROMPT,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Scaling,
    Funding,
    Team,
    Documents,
    Product,
    Marketing,
    #[default]
    General,
}

/// Catalog order, as presented to the user.
pub const ALL_TOPICS: [Topic; 7] = [
    Topic::Scaling,
    Topic::Funding,
    Topic::Team,
    Topic::Documents,
    Topic::Product,
    Topic::Marketing,
    Topic::General,
];

const RELATED_TOPIC_COUNT: usize = 3;

impl Topic {
    /// Resolves a topic key. Missing, empty or unknown keys fall back to `General`.
    pub fn from_key(key: Option<&str>) -> Topic {
        let key = key.map(|k| k.trim().to_ascii_lowercase()).unwrap_or_default();
        ALL_TOPICS
            .into_iter()
            .find(|topic| topic.key() == key)
            .unwrap_or(Topic::General)
    }

    pub fn key(self) -> &'static str {
        match self {
            Topic::Scaling => "scaling",
            Topic::Funding => "funding",
            Topic::Team => "team",
            Topic::Documents => "documents",
            Topic::Product => "product",
            Topic::Marketing => "marketing",
            Topic::General => "general",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Topic::Scaling => "Scaling Business",
            Topic::Funding => "Funding & Investment",
            Topic::Team => "Team Setup & Hiring",
            Topic::Documents => "Legal Documents",
            Topic::Product => "Product Strategy",
            Topic::Marketing => "Marketing & Growth",
            Topic::General => "General Advice",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Topic::Scaling => SCALING_PROMPT,
            Topic::Funding => FUNDING_PROMPT,
            Topic::Team => TEAM_PROMPT,
            Topic::Documents => DOCUMENTS_PROMPT,
            Topic::Product => PRODUCT_PROMPT,
            Topic::Marketing => MARKETING_PROMPT,
            Topic::General => GENERAL_PROMPT,
        }
    }

    pub fn examples(self) -> &'static [&'static str] {
        match self {
            Topic::Scaling => &[
                "How do I scale my SaaS from 100 to 1000 users?",
                "What infrastructure changes are needed for scaling?",
                "How to maintain quality while scaling rapidly?",
                "Building a scalable sales process for B2B startup",
            ],
            Topic::Funding => &[
                "How much should I raise in a seed round?",
                "What do investors look for in a pitch deck?",
                "How to prepare for Series A fundraising?",
                "Should I bootstrap or raise venture capital?",
            ],
            Topic::Team => &[
                "What should be my first 5 hires for a tech startup?",
                "How to structure equity compensation for employees?",
                "Building a remote-first company culture",
                "How to hire developers for a non-technical founder?",
            ],
            Topic::Documents => &[
                "What legal documents do I need to incorporate?",
                "How to create a founder vesting agreement?",
                "What should be in my employee contracts?",
                "Privacy policy requirements for my web app",
            ],
            Topic::Product => &[
                "How to define MVP features for my app?",
                "Validating product-market fit strategies",
                "Building a product roadmap for next 6 months",
                "How to prioritize features with limited resources?",
            ],
            Topic::Marketing => &[
                "Best marketing channels for B2B SaaS?",
                "How to get first 100 customers without paid ads?",
                "Building a content marketing strategy from scratch",
                "Growth hacking tactics for early-stage startups",
            ],
            Topic::General => &[
                "How to validate my startup idea?",
                "Time management tips for solo founders",
                "Balancing full-time job with startup",
                "When should I quit my job to work on startup full-time?",
            ],
        }
    }

    /// Interpolates the query into this topic's template.
    pub fn render(self, query: &str) -> String {
        self.template().replacen(QUERY_PLACEHOLDER, query, 1)
    }

    /// The first few other topics in catalog order.
    pub fn related(self) -> Vec<Topic> {
        ALL_TOPICS
            .into_iter()
            .filter(|topic| *topic != self)
            .take(RELATED_TOPIC_COUNT)
            .collect()
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Public view of one catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct TopicCard {
    pub key: Topic,
    pub label: &'static str,
    pub examples: &'static [&'static str],
}

pub fn topic_catalog() -> Vec<TopicCard> {
    ALL_TOPICS
        .into_iter()
        .map(|topic| TopicCard {
            key: topic,
            label: topic.label(),
            examples: topic.examples(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_known() {
        assert_eq!(Topic::from_key(Some("scaling")), Topic::Scaling);
        assert_eq!(Topic::from_key(Some(" Funding ")), Topic::Funding);
    }

    #[test]
    fn test_from_key_falls_back_to_general() {
        for key in [None, Some(""), Some("astrology"), Some("scaling!"), Some("GENERALX")] {
            assert_eq!(Topic::from_key(key), Topic::General, "key {key:?}");
        }
    }

    #[test]
    fn test_every_template_has_one_placeholder() {
        for topic in ALL_TOPICS {
            assert_eq!(
                topic.template().matches(QUERY_PLACEHOLDER).count(),
                1,
                "{topic} template"
            );
        }
    }

    #[test]
    fn test_render_interpolates_query() {
        let rendered = Topic::Funding.render("How much should I raise?");
        assert!(rendered.contains("User query: How much should I raise?"));
        assert!(!rendered.contains(QUERY_PLACEHOLDER));
    }

    #[test]
    fn test_render_leaves_braces_in_query_alone() {
        let rendered = Topic::General.render("what about {query} literally?");
        assert!(rendered.contains("User query: what about {query} literally?"));
    }

    #[test]
    fn test_related_excludes_self() {
        assert_eq!(
            Topic::Scaling.related(),
            vec![Topic::Funding, Topic::Team, Topic::Documents]
        );
        assert_eq!(
            Topic::Funding.related(),
            vec![Topic::Scaling, Topic::Team, Topic::Documents]
        );
    }

    #[test]
    fn test_catalog_lists_all_topics_with_examples() {
        let catalog = topic_catalog();
        assert_eq!(catalog.len(), 7);
        assert!(catalog.iter().all(|card| card.examples.len() == 4));
    }
}
