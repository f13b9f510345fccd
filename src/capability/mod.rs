//! External generative capability
//!
//! The orchestrator's only dependency on a language model: persona
//! utterances, addressee classification and meeting summaries.

mod mock;
mod openai;
mod registry;
mod traits;

pub mod prompts;

pub use mock::MockCapability;
#[cfg(test)]
pub use mock::MockConfig;
pub use openai::OpenAiCapability;
pub use registry::*;
pub use traits::*;
