//! LLM integration for roster-extract.
//!
//! Supports:
//! - **Anthropic**: Direct API access via rig-core
//! - **OpenAI**: Direct API access via rig-core
//!
//! Uses the rig-core crate for HTTP transport and the `RigAdapter` to bridge
//! rig's `CompletionModel` trait to our `LlmProvider` trait.

pub mod provider;
mod rig_adapter;

pub use provider::{ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role};
pub use rig_adapter::RigAdapter;

use std::sync::Arc;

use rig::client::CompletionClient;
use secrecy::ExposeSecret;

use crate::error::{ConfigError, LlmError};

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Anthropic,
    OpenAi,
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: secrecy::SecretString,
    pub model: String,
}

impl LlmConfig {
    /// Build configuration from environment variables.
    ///
    /// `ROSTER_LLM_BACKEND` selects the backend (default `anthropic`);
    /// the matching API key variable must be set. `ROSTER_MODEL`
    /// overrides the backend's default model.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = match std::env::var("ROSTER_LLM_BACKEND") {
            Ok(v) if v.eq_ignore_ascii_case("anthropic") => LlmBackend::Anthropic,
            Ok(v) if v.eq_ignore_ascii_case("openai") => LlmBackend::OpenAi,
            Ok(v) => {
                return Err(ConfigError::InvalidValue {
                    key: "ROSTER_LLM_BACKEND".to_string(),
                    message: format!("unsupported backend '{v}' (expected 'anthropic' or 'openai')"),
                });
            }
            Err(_) => LlmBackend::Anthropic,
        };

        let key_var = match backend {
            LlmBackend::Anthropic => "ANTHROPIC_API_KEY",
            LlmBackend::OpenAi => "OPENAI_API_KEY",
        };
        let api_key = std::env::var(key_var)
            .map_err(|_| ConfigError::MissingEnvVar(key_var.to_string()))?;

        let default_model = match backend {
            LlmBackend::Anthropic => "claude-sonnet-4-20250514",
            LlmBackend::OpenAi => "gpt-4o",
        };
        let model =
            std::env::var("ROSTER_MODEL").unwrap_or_else(|_| default_model.to_string());

        Ok(Self {
            backend,
            api_key: secrecy::SecretString::from(api_key),
            model,
        })
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.backend {
        LlmBackend::Anthropic => create_anthropic_provider(config),
        LlmBackend::OpenAi => create_openai_provider(config),
    }
}

fn create_anthropic_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    use rig::providers::anthropic;

    let client: rig::client::Client<anthropic::client::AnthropicExt> =
        anthropic::Client::new(config.api_key.expose_secret()).map_err(|e| {
            LlmError::RequestFailed {
                provider: "anthropic".to_string(),
                reason: format!("Failed to create Anthropic client: {}", e),
            }
        })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Using Anthropic (model: {})", config.model);
    Ok(Arc::new(RigAdapter::new(model, &config.model)))
}

fn create_openai_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    use rig::providers::openai;

    let client: rig::client::Client<openai::client::OpenAIResponsesExt> =
        openai::Client::new(config.api_key.expose_secret()).map_err(|e| {
            LlmError::RequestFailed {
                provider: "openai".to_string(),
                reason: format!("Failed to create OpenAI client: {}", e),
            }
        })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Using OpenAI (model: {})", config.model);
    Ok(Arc::new(RigAdapter::new(model, &config.model)))
}
