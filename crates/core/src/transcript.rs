//! The in-memory conversation log.

use crate::conversation::{Role, Turn};

/// Errors returned by [`TranscriptStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptError {
    /// The text is empty or whitespace-only.
    #[error("input is empty")]
    EmptyInput,
    /// A user turn was appended before the seed turns exist.
    #[error("transcript is not initialized")]
    NotInitialized,
}

/// The ordered, append-only log of turns for one session.
///
/// Once initialized, the first turn is always the system prompt and the
/// second one is the greeting. Turns are never removed or reordered. The
/// only other state is a pending input, which is a scratch value outside
/// the transcript itself.
///
/// The store has no internal locking. Mutations go through `&mut self`, so
/// one session can never have two submissions in flight.
#[derive(Clone, Debug, Default)]
pub struct TranscriptStore {
    turns: Vec<Turn>,
    pending_input: Option<String>,
}

impl TranscriptStore {
    /// Creates an empty, uninitialized store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the seed turns have been created.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.turns.is_empty()
    }

    /// Creates the system turn and the greeting turn.
    ///
    /// Calling this again on an initialized store does nothing and returns
    /// the current transcript, whatever the arguments are.
    pub fn initialize<S, G>(
        &mut self,
        system_prompt: S,
        greeting: G,
    ) -> Result<&[Turn], TranscriptError>
    where
        S: Into<String>,
        G: Into<String>,
    {
        if self.is_initialized() {
            return Ok(&self.turns);
        }

        let system_prompt = system_prompt.into();
        let greeting = greeting.into();
        if is_blank(&system_prompt) || is_blank(&greeting) {
            return Err(TranscriptError::EmptyInput);
        }

        self.turns.push(Turn {
            role: Role::System,
            content: system_prompt,
        });
        self.turns.push(Turn {
            role: Role::Assistant,
            content: greeting,
        });
        debug!("transcript initialized");
        Ok(&self.turns)
    }

    /// Appends a user turn.
    ///
    /// Blank text is rejected with [`TranscriptError::EmptyInput`] and the
    /// transcript stays untouched. The text itself is stored as-is.
    pub fn append_user<S: Into<String>>(
        &mut self,
        text: S,
    ) -> Result<(), TranscriptError> {
        let text = text.into();
        if is_blank(&text) {
            return Err(TranscriptError::EmptyInput);
        }
        if !self.is_initialized() {
            return Err(TranscriptError::NotInitialized);
        }
        self.push(Role::User, text);
        Ok(())
    }

    /// Appends a user turn to a store that is already initialized.
    ///
    /// Returns `false` and leaves the transcript untouched if the text is
    /// blank.
    pub(crate) fn append_initialized_user(&mut self, text: &str) -> bool {
        debug_assert!(self.is_initialized(), "transcript is not initialized");
        if is_blank(text) {
            return false;
        }
        self.push(Role::User, text.to_owned());
        true
    }

    /// Appends an assistant turn.
    ///
    /// The caller guarantees the text is not empty and that a user turn was
    /// appended before.
    pub fn append_assistant<S: Into<String>>(&mut self, text: S) {
        let text = text.into();
        debug_assert!(self.is_initialized(), "transcript is not initialized");
        debug_assert!(!text.is_empty(), "assistant turn must not be empty");
        self.push(Role::Assistant, text);
    }

    /// Returns every turn so far, in conversation order.
    #[inline]
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    /// Stores the input that is about to be submitted.
    #[inline]
    pub fn set_pending_input<S: Into<String>>(&mut self, text: S) {
        self.pending_input = Some(text.into());
    }

    /// Consumes the pending input, leaving nothing behind.
    #[inline]
    pub fn take_pending_input(&mut self) -> Option<String> {
        self.pending_input.take()
    }

    fn push(&mut self, role: Role, content: String) {
        debug!("appending {role} turn ({} bytes)", content.len());
        self.turns.push(Turn { role, content });
    }
}

#[inline]
fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
