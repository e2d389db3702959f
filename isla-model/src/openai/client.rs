//! OpenAI client implementation.

use super::config::OpenAIConfig;
use super::convert::{self, ChatResponse, ErrorResponse};
use async_trait::async_trait;
use isla_core::{Completion, GenerationConfig, Llm, LlmError, LlmRequest, Message};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

/// OpenAI chat-completions client.
pub struct OpenAIClient {
    client: reqwest::Client,
    config: OpenAIConfig,
}

impl OpenAIClient {
    /// Create a new client. Fails when the API key is empty.
    pub fn new(config: OpenAIConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::InvalidRequest("OpenAI API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Send a tiny prompt and report whether the API answered.
    pub async fn test_connection(&self) -> bool {
        let request = LlmRequest::new(
            vec![Message::user("Say OK")],
            GenerationConfig { max_output_tokens: 10, ..GenerationConfig::default() },
        );
        match self.send_once(&request).await {
            Ok(_) => {
                info!(model = %self.config.model, "connection test succeeded");
                true
            }
            Err(e) => {
                warn!(model = %self.config.model, error = %e, "connection test failed");
                false
            }
        }
    }

    async fn send_once(&self, request: &LlmRequest) -> Result<Completion, LlmError> {
        let body = convert::build_request(
            &self.config.model,
            &request.messages,
            &request.tools,
            &request.config,
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let total_tokens = parsed.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0);
        let finish_reason =
            parsed.choices.first().and_then(|c| c.finish_reason.clone()).unwrap_or_default();
        info!(model = %self.config.model, total_tokens, finish_reason = %finish_reason, "completion received");

        convert::from_response(parsed)
    }

    fn transport_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout { seconds: self.config.timeout.as_secs() }
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}

/// Map a non-success status and its body to an [`LlmError`].
fn status_error(status: StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited(message),
        _ => LlmError::Api { status: status.as_u16(), message },
    }
}

#[async_trait]
impl Llm for OpenAIClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: LlmRequest) -> Result<Completion, LlmError> {
        debug!(
            model = %self.config.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending completion request"
        );

        let mut backoff = self.config.initial_backoff;
        let mut attempt = 0;
        loop {
            match self.send_once(&request).await {
                Ok(completion) => return Ok(completion),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, delay_ms = backoff.as_millis() as u64, "retrying completion");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        let result = OpenAIClient::new(OpenAIConfig::new("  ", "gpt-4o-mini"));
        assert!(matches!(result, Err(LlmError::InvalidRequest(_))));
    }

    #[test]
    fn status_mapping_extracts_error_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(
            status_error(StatusCode::UNAUTHORIZED, body),
            LlmError::Unauthorized("Incorrect API key provided".into())
        );
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, body),
            LlmError::RateLimited(_)
        ));
    }

    #[test]
    fn unparseable_error_body_is_kept_verbatim() {
        let err = status_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err, LlmError::Api { status: 502, message: "upstream down".into() });
        assert!(err.is_retryable());
    }
}
