//! Language-model assistant: herbal chatbot and plant recognition.

mod client;
mod error;

pub use client::AssistantClient;
pub use error::AssistantError;

/// Reply used when the assistant has no API key.
pub const CHAT_NOT_CONFIGURED: &str =
    "AI chatbot is not configured. Please set the OPENAI_API_KEY environment variable.";

/// Error shown when plant recognition has no API key.
pub const RECOGNITION_NOT_CONFIGURED: &str =
    "AI recognition is not configured. Please set the OPENAI_API_KEY environment variable.";
