//! The external AI collaborator boundary.
//!
//! Everything behind this trait is untrusted and network-bound: calls are
//! bounded by a timeout, retried once on transport failure, and any output
//! that fails intent decoding degrades to `Unrecognized` instead of reaching
//! the executor.

pub mod context;
pub mod gemini;

pub use gemini::GeminiClient;

use crate::error::TaskpilotError;
use crate::intent::IntentEnvelope;

pub trait Collaborator {
    /// Translate one free-text command into a structured intent, given the
    /// current store state as context.
    fn interpret(
        &self,
        command: &str,
        context: &serde_json::Value,
    ) -> Result<IntentEnvelope, TaskpilotError>;

    /// Ask for free text (recommendation or discussion). An empty reply is
    /// valid; callers fall back to a deterministic line.
    fn compose(&self, prompt: &str) -> Result<String, TaskpilotError>;
}
