use parley_model::ModelProvider;

use super::ConversationController;
use crate::gateway::CompletionGateway;
use crate::transcript::{TranscriptError, TranscriptStore};

/// The system prompt used when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// The greeting used when none is configured.
pub const DEFAULT_GREETING: &str =
    "Hello! I am your AI Assistant. How can I help you today?";

/// [`ConversationController`] builder.
pub struct ControllerBuilder {
    gateway: CompletionGateway,
    system_prompt: Option<String>,
    greeting: Option<String>,
}

impl ControllerBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            gateway: CompletionGateway::new(provider),
            system_prompt: None,
            greeting: None,
        }
    }

    /// Sets the system prompt that opens the transcript.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the assistant greeting that follows the system prompt.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    /// Builds the controller with a freshly initialized transcript.
    ///
    /// Fails if the system prompt or the greeting is blank.
    pub fn build(self) -> Result<ConversationController, TranscriptError> {
        let mut store = TranscriptStore::new();
        store.initialize(
            self.system_prompt
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_owned()),
            self.greeting.unwrap_or_else(|| DEFAULT_GREETING.to_owned()),
        )?;
        Ok(ConversationController {
            store,
            gateway: self.gateway,
        })
    }
}
