use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::debug;

use super::{ReasoningClient, ReasoningError};

const SYSTEM_PROMPT: &str =
    "You are a precise assistant. Answer with a single JSON object and nothing else.";

/// Chat-completion backed reasoning client.
#[derive(Clone)]
pub struct GenaiReasoner {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiReasoner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiReasoner")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiReasoner {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ReasoningClient for GenaiReasoner {
    async fn complete(&self, prompt: &str) -> Result<String, ReasoningError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending reasoning request");

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| ReasoningError::RequestFailed {
                model: self.model.clone(),
                message: e.to_string(),
            })?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(ReasoningError::EmptyResponse);
        }

        debug!(reply_len = text.len(), "Reasoning reply received");
        Ok(text)
    }
}
