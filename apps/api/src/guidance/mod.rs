// Guidance turns: topic templates, prompt assembly, checklist extraction, export.
// All completion calls go through llm_client.

pub mod builder;
pub mod checklist;
pub mod export;
pub mod handlers;
pub mod prompts;
pub mod service;
pub mod templates;
