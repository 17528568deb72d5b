//! Conversation state and document ingestion for a chat assistant.
//!
//! The [`ConversationController`] is the only type a UI layer needs: it
//! owns the session's transcript, turns uploads into text and forwards the
//! transcript to a completion service through a model provider.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod controller;
pub mod conversation;
pub mod extract;
mod gateway;
mod transcript;

pub use controller::{
    ControllerBuilder, ControllerError, ConversationController,
    DEFAULT_GREETING, DEFAULT_SYSTEM_PROMPT, Submission,
};
pub use conversation::{Role, Turn};
pub use extract::{DocumentFormat, ExtractError, ExtractedDocument, extract};
pub use gateway::{CompletionError, CompletionGateway};
pub use transcript::{TranscriptError, TranscriptStore};
