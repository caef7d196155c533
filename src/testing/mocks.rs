//! Mock implementations for testing
//!
//! Provides a scripted LlmProvider so routing behavior can be asserted
//! deterministically, without a live generation service.

use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, TokenUsage,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock LLM provider returning scripted responses in order
///
/// Responses cycle once exhausted. `with_failure` makes every call fail,
/// which is how provider outages are simulated in pipeline tests.
#[derive(Debug)]
pub struct MockLlmProvider {
    pub responses: Vec<String>,
    pub current_response: Arc<Mutex<usize>>,
    pub should_fail: bool,
}

impl MockLlmProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            current_response: Arc::new(Mutex::new(0)),
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            responses: vec![],
            current_response: Arc::new(Mutex::new(0)),
            should_fail: true,
        }
    }

    pub fn single_response(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Number of completion calls made so far
    pub async fn calls_made(&self) -> usize {
        *self.current_response.lock().await
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn available_models(&self) -> Vec<String> {
        vec!["mock-model".to_string()]
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if self.should_fail {
            return Err(LlmError::RequestFailed("Mock LLM failure".to_string()));
        }

        let mut current = self.current_response.lock().await;
        let response_idx = *current % self.responses.len().max(1);
        *current += 1;

        let content = if self.responses.is_empty() {
            "Mock response".to_string()
        } else {
            self.responses[response_idx].clone()
        };

        Ok(CompletionResponse {
            content: Some(content),
            model: "mock-model".to_string(),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
            finish_reason: FinishReason::Stop,
        })
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        if self.should_fail {
            Err(LlmError::RequestFailed(
                "Mock health check failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::Message;

    fn request() -> CompletionRequest {
        CompletionRequest {
            messages: vec![Message::user("hello")],
            model: "mock-model".to_string(),
            max_tokens: None,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_mock_cycles_scripted_responses() {
        let provider = MockLlmProvider::new(vec!["first".to_string(), "second".to_string()]);

        let a = provider.complete(request()).await.unwrap();
        let b = provider.complete(request()).await.unwrap();
        let c = provider.complete(request()).await.unwrap();

        assert_eq!(a.content.as_deref(), Some("first"));
        assert_eq!(b.content.as_deref(), Some("second"));
        assert_eq!(c.content.as_deref(), Some("first"));
        assert_eq!(provider.calls_made().await, 3);
    }

    #[test]
    fn test_mock_failure_mode() {
        let provider = MockLlmProvider::with_failure();

        tokio_test::block_on(async {
            assert!(provider.complete(request()).await.is_err());
            assert!(provider.health_check().await.is_err());
        });
    }
}
