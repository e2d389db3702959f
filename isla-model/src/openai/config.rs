//! Connection settings for [`OpenAIClient`](super::OpenAIClient).

use std::time::Duration;

/// The default OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// How to reach the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    /// Upper bound for a single HTTP request.
    pub timeout: Duration,
    /// Extra attempts for throttled, timed out or 5xx requests.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for every further attempt.
    pub initial_backoff: Duration,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            api_base: OPENAI_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
        }
    }

    /// Config for an OpenAI-compatible server (vLLM, Ollama, LM Studio...).
    pub fn compatible(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::new(api_key, model).with_api_base(api_base)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatible_config_targets_custom_base() {
        let config = OpenAIConfig::compatible("key", "http://localhost:11434/v1/", "llama3");
        assert_eq!(config.completions_url(), "http://localhost:11434/v1/chat/completions");
        assert_eq!(config.model, "llama3");
    }

    #[test]
    fn defaults_allow_bounded_retries() {
        let config = OpenAIConfig::new("key", "gpt-4o-mini");
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
