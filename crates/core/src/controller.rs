mod builder;

use crate::conversation::Turn;
use crate::extract::{self, ExtractError};
use crate::gateway::{CompletionError, CompletionGateway};
use crate::transcript::TranscriptStore;
pub use builder::{ControllerBuilder, DEFAULT_GREETING, DEFAULT_SYSTEM_PROMPT};

/// The outcome of a submission that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The input was appended and answered with this reply.
    Replied(String),
    /// The input was blank and has been dropped. Nothing changed.
    Ignored,
}

/// A failed submission.
///
/// Every variant leaves the transcript in a well-defined state: extraction
/// failures change nothing, completion failures leave the user turn
/// unanswered at the end of the transcript.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The document could not be turned into text.
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// The document was read but contained no text.
    #[error("document contained no extractable text")]
    EmptyDocument {
        /// The media type the document was declared with.
        media_type: String,
    },
    /// The completion service failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// The single entry point for the UI layer.
///
/// The controller owns the session's transcript and forwards it to the
/// completion service. Submissions take `&mut self`, so each one runs to
/// completion before the next can start.
pub struct ConversationController {
    store: TranscriptStore,
    gateway: CompletionGateway,
}

impl ConversationController {
    /// Returns every turn so far, in conversation order.
    #[inline]
    pub fn transcript(&self) -> &[Turn] {
        self.store.snapshot()
    }

    /// Submits a typed message.
    ///
    /// Blank text is dropped and reported as [`Submission::Ignored`]. On a
    /// completion failure the user turn stays in the transcript without an
    /// answer, so the caller may resubmit.
    pub async fn submit_text(
        &mut self,
        text: &str,
    ) -> Result<Submission, ControllerError> {
        // The builder initializes the store before handing it over.
        if !self.store.append_initialized_user(text) {
            debug!("dropping blank submission");
            return Ok(Submission::Ignored);
        }

        let reply = match self.gateway.complete(self.store.snapshot()).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("leaving user turn unanswered: {err}");
                return Err(err.into());
            }
        };
        self.store.append_assistant(reply.clone());
        Ok(Submission::Replied(reply))
    }

    /// Submits an uploaded document as if its text had been typed.
    ///
    /// Nothing is appended when the document can't be extracted or has no
    /// text in it.
    pub async fn submit_document(
        &mut self,
        media_type: &str,
        bytes: &[u8],
    ) -> Result<Submission, ControllerError> {
        let document = extract::extract(media_type, bytes).inspect_err(|err| {
            warn!("rejected upload: {err}");
        })?;
        if document.text().trim().is_empty() {
            return Err(ControllerError::EmptyDocument {
                media_type: document.source_media_type().to_owned(),
            });
        }
        self.submit_text(&document.into_text()).await
    }

    /// Stores text as the pending input, replacing any previous one.
    #[inline]
    pub fn set_pending_input<S: Into<String>>(&mut self, text: S) {
        self.store.set_pending_input(text);
    }

    /// Submits the pending input, clearing it before anything else happens.
    ///
    /// Having no pending input behaves like submitting blank text.
    pub async fn submit_pending_input(
        &mut self,
    ) -> Result<Submission, ControllerError> {
        let Some(input) = self.store.take_pending_input() else {
            return Ok(Submission::Ignored);
        };
        self.submit_text(&input).await
    }
}
