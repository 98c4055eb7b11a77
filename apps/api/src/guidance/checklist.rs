//! Checklist extraction from finished guidance text.
//!
//! An item is any line that starts with a list marker: `1.` / `1)`, `-`, `*`,
//! `+`, `•`, optionally followed by a `[ ]` / `[x]` checkbox. The marker is
//! stripped from the returned item. Pure and deterministic.

use std::sync::LazyLock;

use regex::Regex;

static ITEM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+[.)]|[-*+•])\s+(?:\[[ xX]\]\s*)?(?P<item>.+?)\s*$")
        .expect("checklist pattern is valid")
});

pub fn extract_checklist_items(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| ITEM_PATTERN.captures(line))
        .filter_map(|caps| caps.name("item").map(|m| m.as_str().to_string()))
        .filter(|item| item.chars().any(char::is_alphanumeric))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUIDANCE: &str = "\
## Overview
Scaling is a marathon.

## Actionable Steps
1. Automate onboarding (Week 1-2)
2) Hire a support lead
- Track weekly active users
* Set up error monitoring
- [ ] Draft a pricing page
- [x] Review churn cohorts
• Talk to ten customers

---
Closing thoughts without a marker.";

    #[test]
    fn test_extracts_all_marker_styles() {
        let items = extract_checklist_items(GUIDANCE);
        assert_eq!(
            items,
            vec![
                "Automate onboarding (Week 1-2)",
                "Hire a support lead",
                "Track weekly active users",
                "Set up error monitoring",
                "Draft a pricing page",
                "Review churn cohorts",
                "Talk to ten customers",
            ]
        );
    }

    #[test]
    fn test_indented_items_are_recognised() {
        let items = extract_checklist_items("Steps:\n   - nested step\n\t3. third step");
        assert_eq!(items, vec!["nested step", "third step"]);
    }

    #[test]
    fn test_no_items_is_empty_not_error() {
        assert!(extract_checklist_items("Just a paragraph.\nAnother one.").is_empty());
        assert!(extract_checklist_items("").is_empty());
    }

    #[test]
    fn test_rules_and_bare_markers_are_ignored() {
        assert!(extract_checklist_items("---\n* * *\n- \n1.").is_empty());
        assert!(extract_checklist_items("2024 was a good year").is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = extract_checklist_items(GUIDANCE);
        let second = extract_checklist_items(GUIDANCE);
        assert_eq!(first.len(), second.len());
        assert_eq!(first, second);
    }
}
