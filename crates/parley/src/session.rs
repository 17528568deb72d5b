use std::path::Path;

use parley_core::{
    ControllerBuilder, ConversationController, Submission, Turn,
};
use parley_model::ModelProvider;

use crate::Error;
use crate::upload::media_type_for_path;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    controller_builder: ControllerBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let controller_builder =
            ControllerBuilder::with_model_provider(provider);
        Self { controller_builder }
    }

    /// Sets the system prompt for the conversation.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.controller_builder =
            self.controller_builder.with_system_prompt(prompt);
        self
    }

    /// Sets the greeting shown before the user says anything.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.controller_builder = self.controller_builder.with_greeting(greeting);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Result<Session, Error> {
        let controller = self.controller_builder.build()?;
        Ok(Session { controller })
    }
}

/// A chat session, like a window that displays messages and has a input box
/// and an upload button.
///
/// It is basically a wrapper around [`ConversationController`].
pub struct Session {
    controller: ConversationController,
}

impl Session {
    /// Returns the transcript to render.
    #[inline]
    pub fn transcript(&self) -> &[Turn] {
        self.controller.transcript()
    }

    /// Sends a message to the session and waits for the reply.
    #[inline]
    pub async fn send_message(
        &mut self,
        message: &str,
    ) -> Result<Submission, Error> {
        Ok(self.controller.submit_text(message).await?)
    }

    /// Uploads an in-memory document declared as `media_type`.
    #[inline]
    pub async fn upload(
        &mut self,
        media_type: &str,
        bytes: &[u8],
    ) -> Result<Submission, Error> {
        Ok(self.controller.submit_document(media_type, bytes).await?)
    }

    /// Reads the file at `path` and uploads it, declaring the media type
    /// that matches its extension.
    pub async fn upload_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<Submission, Error> {
        let path = path.as_ref();
        let bytes =
            tokio::fs::read(path).await.map_err(|source| Error::Io {
                path: path.to_owned(),
                source,
            })?;
        let media_type = media_type_for_path(path);
        debug!("uploading {} as {media_type}", path.display());
        self.upload(media_type, &bytes).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use parley_core::{ControllerError, ExtractError, Role};
    use parley_test_model::TestModelProvider;

    use super::*;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("parley-session-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_send_message() {
        let mut model_provider = TestModelProvider::default();
        model_provider.add_reply("Hi, what can I do for you?");

        let mut session = SessionBuilder::with_model_provider(model_provider)
            .with_system_prompt("Be brief.")
            .build()
            .unwrap();
        assert_eq!(session.transcript().len(), 2);

        let submission = session.send_message("Hello").await.unwrap();
        assert_eq!(
            submission,
            Submission::Replied("Hi, what can I do for you?".to_owned())
        );
        assert_eq!(session.transcript().len(), 4);
    }

    #[tokio::test]
    async fn test_upload_text_file() {
        let mut model_provider = TestModelProvider::default();
        model_provider.add_reply("Read it.");
        let mut session = SessionBuilder::with_model_provider(model_provider)
            .build()
            .unwrap();

        let path = temp_file("clause.txt", b"The tenant shall pay rent.");
        session.upload_file(&path).await.unwrap();

        let turn = &session.transcript()[2];
        assert_eq!(turn.role(), Role::User);
        assert_eq!(turn.content(), "The tenant shall pay rent.");
    }

    #[tokio::test]
    async fn test_upload_unknown_extension() {
        let model_provider = TestModelProvider::default();
        let mut session = SessionBuilder::with_model_provider(model_provider)
            .build()
            .unwrap();

        let path = temp_file("photo.png", b"\x89PNG");
        let err = session.upload_file(&path).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Conversation(ControllerError::Extract(
                ExtractError::UnsupportedFormat(_)
            ))
        ));
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let model_provider = TestModelProvider::default();
        let mut session = SessionBuilder::with_model_provider(model_provider)
            .build()
            .unwrap();

        let err = session
            .upload_file("/definitely/not/here.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(session.transcript().len(), 2);
    }
}
