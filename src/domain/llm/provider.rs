use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for chat-completion backends (OpenAI, Hugging Face router, ...)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Scripted provider: replies are consumed in order, then the fallback
    /// reply (if any) is returned for every further call.
    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        replies: Mutex<VecDeque<Result<String, String>>>,
        fallback: Option<String>,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                replies: Mutex::new(VecDeque::new()),
                fallback: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Queue a reply for the next call
        pub fn with_reply(self, content: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(Ok(content.into()));
            self
        }

        /// Queue an error for the next call
        pub fn with_error(self, error: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(Err(error.into()));
            self
        }

        /// Reply returned once the queue is exhausted
        pub fn with_fallback(mut self, content: impl Into<String>) -> Self {
            self.fallback = Some(content.into());
            self
        }

        /// Requests received so far
        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
            self.requests.lock().unwrap().push(request);

            let next = self.replies.lock().unwrap().pop_front();
            let content = match next {
                Some(Ok(content)) => content,
                Some(Err(error)) => return Err(DomainError::provider(self.name, error)),
                None => self.fallback.clone().ok_or_else(|| {
                    DomainError::provider(self.name, "No mock response configured")
                })?,
            };

            Ok(LlmResponse::new(
                format!("mock-{}", self.call_count()),
                model.to_string(),
                super::super::Message::assistant(content),
            ))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
