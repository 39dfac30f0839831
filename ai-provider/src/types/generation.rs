//! Types for text-generation requests.

use serde::{Deserialize, Serialize};

/// A single prompt to be answered by whichever provider and key the router picks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Request {
    /// User-facing prompt text.
    pub prompt: String,
    /// Optional system-level instruction sent alongside the prompt.
    pub system_instruction: Option<String>,
    /// Whether the caller will parse the reply as JSON.
    ///
    /// Adapters do not enforce a JSON response mode; the flag travels with the
    /// request so callers and logs know a structured reply is expected.
    pub expects_json: bool,
}

impl Request {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn expecting_json(mut self) -> Self {
        self.expects_json = true;
        self
    }
}
