//! Text-in/text-out reasoning capability used for eligibility and score combination.
//!
//! Callers treat every reply as untrusted: [`extract_json_object`] pulls the outermost JSON
//! object out of free text and each call site applies its own fallback.

pub mod chat;
pub mod error;
pub mod json;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use chat::GenaiReasoner;
pub use error::ReasoningError;
pub use json::extract_json_object;
#[cfg(any(test, feature = "mock"))]
pub use mock::{ScriptedReasoner, is_eligibility_prompt, prompt_company_ids};

use async_trait::async_trait;

#[async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Sends one prompt and returns the raw text reply.
    async fn complete(&self, prompt: &str) -> Result<String, ReasoningError>;
}
