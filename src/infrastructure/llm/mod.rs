//! LLM provider implementations

mod factory;
mod http_client;
mod openai;

pub use factory::{LlmBackend, LlmProviderConfig, LlmProviderFactory};
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
