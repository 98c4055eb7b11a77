//! Selectable models, token bounds and rough pricing.

use serde::Serialize;

pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

pub const AVAILABLE_MODELS: &[&str] = &[
    "openai/gpt-4o-mini",
    "openai/gpt-4o",
    "anthropic/claude-3-5-sonnet",
    "google/gemini-pro",
    "meta-llama/llama-3-70b-instruct",
];

pub const MIN_MAX_TOKENS: u32 = 500;
pub const MAX_MAX_TOKENS: u32 = 4000;

/// Cost per 1K tokens for models without an explicit entry.
const FALLBACK_COST_PER_1K: f64 = 0.001;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
    pub speed: &'static str,
    pub cost: &'static str,
    pub quality: &'static str,
    pub best_for: &'static str,
}

const MODEL_INFO: &[ModelInfo] = &[
    ModelInfo {
        id: "openai/gpt-4o-mini",
        name: "GPT-4o Mini",
        provider: "OpenAI",
        speed: "Fast",
        cost: "Low",
        quality: "Good",
        best_for: "General queries, cost-effective",
    },
    ModelInfo {
        id: "openai/gpt-4o",
        name: "GPT-4o",
        provider: "OpenAI",
        speed: "Medium",
        cost: "Medium",
        quality: "Excellent",
        best_for: "Complex analysis, high-quality responses",
    },
    ModelInfo {
        id: "anthropic/claude-3-5-sonnet",
        name: "Claude 3.5 Sonnet",
        provider: "Anthropic",
        speed: "Medium",
        cost: "Medium",
        quality: "Excellent",
        best_for: "Detailed analysis, technical content",
    },
    ModelInfo {
        id: "google/gemini-pro",
        name: "Gemini Pro",
        provider: "Google",
        speed: "Fast",
        cost: "Low",
        quality: "Good",
        best_for: "Quick responses, general advice",
    },
];

const COST_PER_1K: &[(&str, f64)] = &[
    ("openai/gpt-4o-mini", 0.0002),
    ("openai/gpt-4o", 0.005),
    ("anthropic/claude-3-5-sonnet", 0.004),
    ("google/gemini-pro", 0.0001),
];

/// One selectable model. Not every model has a descriptive card.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelOption {
    pub id: &'static str,
    pub info: Option<&'static ModelInfo>,
}

/// Every selectable model, in catalog order.
pub fn model_options() -> Vec<ModelOption> {
    AVAILABLE_MODELS
        .iter()
        .map(|&id| ModelOption {
            id,
            info: model_info(id),
        })
        .collect()
}

pub fn is_supported(model: &str) -> bool {
    AVAILABLE_MODELS.contains(&model)
}

pub fn model_info(model: &str) -> Option<&'static ModelInfo> {
    MODEL_INFO.iter().find(|info| info.id == model)
}

/// Rough USD estimate for `tokens` (input and output combined).
pub fn estimate_cost(model: &str, tokens: u64) -> f64 {
    let per_1k = COST_PER_1K
        .iter()
        .find(|(id, _)| *id == model)
        .map(|(_, cost)| *cost)
        .unwrap_or(FALLBACK_COST_PER_1K);
    (tokens as f64 / 1000.0) * per_1k
}

pub fn clamp_max_tokens(requested: u32) -> u32 {
    requested.clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS)
}
