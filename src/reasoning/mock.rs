use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ReasoningClient, ReasoningError};
use crate::domain::CompanyId;

type Responder = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reasoning double.
///
/// Queued replies are served first, in order; afterwards the responder (if any) builds a
/// reply from the prompt. With neither, the call fails with `RequestFailed`.
#[derive(Default)]
pub struct ScriptedReasoner {
    queue: Mutex<VecDeque<Option<String>>>,
    responder: Option<Responder>,
    prompts: Mutex<Vec<String>>,
}

impl std::fmt::Debug for ScriptedReasoner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedReasoner")
            .field("queued", &self.queue.lock().len())
            .field("calls", &self.call_count())
            .finish()
    }
}

impl ScriptedReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.queue.lock().push_back(Some(text.into()));
        self
    }

    /// Queues a failed call.
    pub fn fail(self) -> Self {
        self.queue.lock().push_back(None);
        self
    }

    /// Answers every call after the queue drains. `None` from the closure is a failed call.
    pub fn responder<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(f));
        self
    }

    /// Answers eligibility prompts with `eligible(id)` and scoring prompts with `score(id)`
    /// for every company the prompt lists.
    pub fn simulating<E, S>(eligible: E, score: S) -> Self
    where
        E: Fn(CompanyId) -> bool + Send + Sync + 'static,
        S: Fn(CompanyId) -> f64 + Send + Sync + 'static,
    {
        Self::new().responder(move |prompt| {
            let entries: Vec<String> = prompt_company_ids(prompt)
                .into_iter()
                .map(|id| {
                    if is_eligibility_prompt(prompt) {
                        format!("\"{id}\": {}", eligible(id))
                    } else {
                        format!("\"{id}\": {}", score(id))
                    }
                })
                .collect();
            Some(format!("{{{}}}", entries.join(", ")))
        })
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl ReasoningClient for ScriptedReasoner {
    async fn complete(&self, prompt: &str) -> Result<String, ReasoningError> {
        self.prompts.lock().push(prompt.to_string());

        let scripted = self.queue.lock().pop_front();
        let reply = match scripted {
            Some(reply) => reply,
            None => self.responder.as_ref().and_then(|f| f(prompt)),
        };

        reply.ok_or_else(|| ReasoningError::RequestFailed {
            model: "scripted".to_string(),
            message: "no scripted reply".to_string(),
        })
    }
}

pub fn is_eligibility_prompt(prompt: &str) -> bool {
    prompt.contains("NUTS II")
}

/// Company ids listed in an eligibility or scoring prompt, in prompt order.
pub fn prompt_company_ids(prompt: &str) -> Vec<CompanyId> {
    let leading_id = |rest: &str| -> Option<CompanyId> {
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    };

    prompt
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            if let Some(rest) = line.strip_prefix("Company ") {
                leading_id(rest)
            } else if let Some(rest) = line.strip_prefix("\"company_id\": ") {
                leading_id(rest)
            } else {
                None
            }
        })
        .collect()
}
