//! Process-wide assistant settings.
//!
//! Built once at start-up, validated by [`AssistantConfigBuilder::build`] and
//! read-only afterwards. Each component receives the slice it needs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use isla_core::GenerationConfig;
use isla_model::OpenAIConfig;
use isla_rag::IndexConfig;
use isla_weather::WeatherMode;

use crate::error::{AssistantError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_DOCUMENT: &str = "data/TENERIFE.pdf";
pub const DEFAULT_INDEX_DIR: &str = "./isla_index";

/// All assistant settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub similarity_threshold: f32,
    pub max_history_turns: usize,
    pub weather_max_days: u32,
    pub weather_mode: WeatherMode,
    pub document_path: PathBuf,
    pub persist_dir: PathBuf,
    /// Replaces the built-in system prompt when set.
    pub system_prompt_path: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 1024,
            top_p: 0.9,
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 5,
            similarity_threshold: 0.0,
            max_history_turns: 10,
            weather_max_days: 7,
            weather_mode: WeatherMode::Simulated { seed: 42 },
            document_path: PathBuf::from(DEFAULT_DOCUMENT),
            persist_dir: PathBuf::from(DEFAULT_INDEX_DIR),
            system_prompt_path: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AssistantConfig {
    pub fn builder() -> AssistantConfigBuilder {
        AssistantConfigBuilder::default()
    }

    /// Reopen a validated config for overrides (command-line flags).
    pub fn into_builder(self) -> AssistantConfigBuilder {
        AssistantConfigBuilder { config: self }
    }

    /// Read settings from the process environment. The binary loads `.env`
    /// into it once at startup.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, so callers can supply any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut builder = Self::builder();

        if let Some(key) = get("OPENAI_API_KEY") {
            builder = builder.api_key(key);
        }
        if let Some(model) = get("ISLA_MODEL") {
            builder = builder.model(model);
        }
        if let Some(v) = get("ISLA_TEMPERATURE") {
            builder = builder.temperature(parse("ISLA_TEMPERATURE", &v)?);
        }
        if let Some(v) = get("ISLA_MAX_TOKENS") {
            builder = builder.max_tokens(parse("ISLA_MAX_TOKENS", &v)?);
        }
        if let Some(v) = get("ISLA_TOP_P") {
            builder = builder.top_p(parse("ISLA_TOP_P", &v)?);
        }
        if let Some(v) = get("ISLA_CHUNK_SIZE") {
            builder = builder.chunk_size(parse("ISLA_CHUNK_SIZE", &v)?);
        }
        if let Some(v) = get("ISLA_CHUNK_OVERLAP") {
            builder = builder.chunk_overlap(parse("ISLA_CHUNK_OVERLAP", &v)?);
        }
        if let Some(v) = get("ISLA_TOP_K") {
            builder = builder.top_k(parse("ISLA_TOP_K", &v)?);
        }
        if let Some(v) = get("ISLA_SIMILARITY_THRESHOLD") {
            builder = builder.similarity_threshold(parse("ISLA_SIMILARITY_THRESHOLD", &v)?);
        }
        if let Some(v) = get("ISLA_MAX_HISTORY") {
            builder = builder.max_history_turns(parse("ISLA_MAX_HISTORY", &v)?);
        }
        if let Some(v) = get("ISLA_WEATHER_MAX_DAYS") {
            builder = builder.weather_max_days(parse("ISLA_WEATHER_MAX_DAYS", &v)?);
        }

        let seed = match get("ISLA_WEATHER_SEED") {
            Some(v) => parse("ISLA_WEATHER_SEED", &v)?,
            None => 42,
        };
        let mode = match get("ISLA_WEATHER_MODE").map(|m| m.to_lowercase()).as_deref() {
            None | Some("simulated") => WeatherMode::Simulated { seed },
            Some("live") => WeatherMode::Live { api_key: get("WEATHER_API_KEY").unwrap_or_default() },
            Some(other) => {
                return Err(AssistantError::Config(format!(
                    "ISLA_WEATHER_MODE must be 'simulated' or 'live', got '{other}'"
                )));
            }
        };
        builder = builder.weather_mode(mode);

        if let Some(path) = get("ISLA_DOCUMENT") {
            builder = builder.document_path(path);
        }
        if let Some(dir) = get("ISLA_INDEX_DIR") {
            builder = builder.persist_dir(dir);
        }
        if let Some(path) = get("ISLA_SYSTEM_PROMPT") {
            builder = builder.system_prompt_path(path);
        }
        if let Some(v) = get("ISLA_REQUEST_TIMEOUT") {
            builder = builder.request_timeout(Duration::from_secs(parse("ISLA_REQUEST_TIMEOUT", &v)?));
        }

        builder.build()
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_tokens,
            top_p: self.top_p,
        }
    }

    pub fn index_config(&self) -> Result<IndexConfig> {
        IndexConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .similarity_threshold(self.similarity_threshold)
            .persist_dir(&self.persist_dir)
            .build()
            .map_err(|e| AssistantError::Config(e.to_string()))
    }

    pub fn openai_config(&self) -> OpenAIConfig {
        OpenAIConfig::new(&self.api_key, &self.model).with_timeout(self.request_timeout)
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| AssistantError::Config(format!("{key}='{value}' is invalid: {e}")))
}

/// Builder for a validated [`AssistantConfig`].
#[derive(Debug, Clone, Default)]
pub struct AssistantConfigBuilder {
    config: AssistantConfig,
}

impl AssistantConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.config.top_p = top_p;
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    pub fn max_history_turns(mut self, turns: usize) -> Self {
        self.config.max_history_turns = turns;
        self
    }

    pub fn weather_max_days(mut self, days: u32) -> Self {
        self.config.weather_max_days = days;
        self
    }

    pub fn weather_mode(mut self, mode: WeatherMode) -> Self {
        self.config.weather_mode = mode;
        self
    }

    pub fn document_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.document_path = path.into();
        self
    }

    pub fn persist_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.persist_dir = dir.into();
        self
    }

    pub fn system_prompt_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.system_prompt_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Config`] if:
    /// - the OpenAI API key is empty
    /// - `chunk_overlap >= chunk_size`, or either `top_k` or `max_history_turns` is zero
    /// - `temperature` is outside `0..=2` or `top_p` outside `(0, 1]`
    /// - live weather is selected without a weather API key
    pub fn build(self) -> Result<AssistantConfig> {
        let c = self.config;
        let fail = |msg: String| Err(AssistantError::Config(msg));

        if c.api_key.trim().is_empty() {
            return fail("OPENAI_API_KEY is not set".to_string());
        }
        if c.chunk_size == 0 || c.chunk_overlap >= c.chunk_size {
            return fail(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                c.chunk_overlap, c.chunk_size
            ));
        }
        if c.top_k == 0 {
            return fail("top_k must be greater than zero".to_string());
        }
        if c.max_history_turns == 0 {
            return fail("max_history_turns must be greater than zero".to_string());
        }
        if !(0.0..=2.0).contains(&c.temperature) {
            return fail(format!("temperature must be within 0..=2, got {}", c.temperature));
        }
        if !(c.top_p > 0.0 && c.top_p <= 1.0) {
            return fail(format!("top_p must be within (0, 1], got {}", c.top_p));
        }
        if matches!(&c.weather_mode, WeatherMode::Live { api_key } if api_key.trim().is_empty()) {
            return fail("ISLA_WEATHER_MODE=live requires WEATHER_API_KEY".to_string());
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_only_need_an_api_key() {
        let config = AssistantConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.top_k, 5);
        assert_eq!(config.weather_mode, WeatherMode::Simulated { seed: 42 });
        assert_eq!(config.generation_config(), GenerationConfig::default());
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = AssistantConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }

    #[test]
    fn env_values_override_defaults() {
        let config = AssistantConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("ISLA_TOP_K", "3"),
            ("ISLA_MAX_HISTORY", "4"),
            ("ISLA_REQUEST_TIMEOUT", "10"),
            ("ISLA_WEATHER_SEED", "7"),
        ]))
        .unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.max_history_turns, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.weather_mode, WeatherMode::Simulated { seed: 7 });
    }

    #[test]
    fn unparseable_numbers_are_config_errors() {
        let err = AssistantConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "k"), ("ISLA_TOP_K", "cinco")]))
            .unwrap_err();
        assert!(err.to_string().contains("ISLA_TOP_K"));
    }

    #[test]
    fn live_weather_needs_a_key() {
        let err = AssistantConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "k"),
            ("ISLA_WEATHER_MODE", "live"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("WEATHER_API_KEY"));

        let ok = AssistantConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "k"),
            ("ISLA_WEATHER_MODE", "LIVE"),
            ("WEATHER_API_KEY", "w"),
        ]));
        assert!(ok.is_ok());
    }

    #[test]
    fn builder_rejects_out_of_range_sampling() {
        let base = || AssistantConfig::builder().api_key("k");
        assert!(base().temperature(2.5).build().is_err());
        assert!(base().top_p(0.0).build().is_err());
        assert!(base().chunk_size(100).chunk_overlap(100).build().is_err());
        assert!(base().max_history_turns(0).build().is_err());
        assert!(base().top_k(0).build().is_err());
    }
}
