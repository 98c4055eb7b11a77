use anyhow::{bail, Context, Result};

use crate::llm_client::catalog;

const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Application configuration loaded from environment variables.
/// Every field has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server-wide fallback credential. Sessions may supply their own key per request.
    pub openrouter_api_key: Option<String>,
    pub openrouter_api_url: String,
    pub default_model: String,
    pub default_max_tokens: u32,
    pub default_temperature: f32,
    pub default_top_p: f32,
    pub enable_streaming: bool,
    pub request_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Config {
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openrouter_api_url: std::env::var("OPENROUTER_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            default_model: std::env::var("DEFAULT_MODEL")
                .unwrap_or_else(|_| catalog::DEFAULT_MODEL.to_string()),
            default_max_tokens: parse_env("DEFAULT_MAX_TOKENS", 2000)?,
            default_temperature: parse_env("DEFAULT_TEMPERATURE", 0.7)?,
            default_top_p: parse_env("DEFAULT_TOP_P", 0.9)?,
            enable_streaming: parse_env("ENABLE_STREAMING", true)?,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 120)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
        .validated()
    }

    /// Rejects a default model that no request could use.
    fn validated(self) -> Result<Self> {
        if !catalog::is_supported(&self.default_model) {
            bail!(
                "DEFAULT_MODEL '{}' is not one of: {}",
                self.default_model,
                catalog::AVAILABLE_MODELS.join(", ")
            );
        }
        Ok(self)
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration pointing at a local mock endpoint.
    pub fn for_tests(api_url: &str) -> Self {
        Config {
            openrouter_api_key: None,
            openrouter_api_url: api_url.to_string(),
            default_model: catalog::DEFAULT_MODEL.to_string(),
            default_max_tokens: 2000,
            default_temperature: 0.7,
            default_top_p: 0.9,
            enable_streaming: true,
            request_timeout_secs: 5,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_default_model_passes() {
        let config = Config::for_tests("http://localhost/unused");
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_unknown_default_model_fails_startup() {
        let mut config = Config::for_tests("http://localhost/unused");
        config.default_model = "openai/gpt-4o-mni".to_string();
        let err = config.validated().unwrap_err().to_string();
        assert!(err.contains("DEFAULT_MODEL 'openai/gpt-4o-mni'"));
        assert!(err.contains("openai/gpt-4o-mini"));
    }
}
