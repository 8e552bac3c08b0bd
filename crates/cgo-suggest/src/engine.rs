use std::time::Duration;

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;

use cgo_core::settings::{ai_configured, AiSettings};

use crate::prompt::Prompt;
use crate::ClassifyError;

const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 1500;

/// A model that answers one prompt with raw text.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ClassifyError>;
}

fn map_backend(provider: &str) -> Result<LLMBackend, ClassifyError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(ClassifyError::Configuration(format!(
            "unknown provider: {other}"
        ))),
    }
}

/// [`Completion`] backed by the `llm` crate.
#[derive(Debug, Clone)]
pub struct LlmEngine {
    settings: AiSettings,
}

impl LlmEngine {
    /// Fails with [`ClassifyError::Configuration`] when the settings cannot
    /// reach any provider.
    pub fn new(settings: AiSettings) -> Result<Self, ClassifyError> {
        if !ai_configured(&settings) {
            return Err(ClassifyError::Configuration(format!(
                "no API key for provider {}",
                settings.provider
            )));
        }
        map_backend(&settings.provider)?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ClassifyError> {
        let backend = map_backend(&self.settings.provider)?;

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .model(&self.settings.model)
            .system(&prompt.system)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS);

        if !self.settings.api_key.is_empty() {
            builder = builder.api_key(&self.settings.api_key);
        }

        let llm = builder
            .build()
            .map_err(|e| ClassifyError::Configuration(format!("build LLM: {e}")))?;

        let messages = vec![ChatMessage::user().content(&prompt.user).build()];

        let response = llm
            .chat(&messages)
            .await
            .map_err(|e| ClassifyError::Transport(format!("chat: {e}")))?;

        match response.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ClassifyError::Parse),
        }
    }
}

#[async_trait]
impl Completion for LlmEngine {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ClassifyError> {
        tracing::debug!(
            provider = %self.settings.provider,
            model = %self.settings.model,
            "sending classification request"
        );
        self.generate(prompt).await
    }
}

/// Bounds another [`Completion`]. Expiry is a [`ClassifyError::Transport`].
#[derive(Debug, Clone)]
pub struct Timed<C> {
    inner: C,
    timeout: Duration,
}

impl<C: Completion> Timed<C> {
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: Completion> Completion for Timed<C> {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ClassifyError> {
        match tokio::time::timeout(self.timeout, self.inner.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ClassifyError::Transport(format!(
                "timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
