//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use parley_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelReply, ModelRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<PresetResponse>,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should respond to each request. Every request consumes the next
/// preset response in order. If there are no enough responses in the script,
/// an error will be returned.
///
/// Clones share the same script, so a test can keep one clone around to
/// inspect the received requests after handing the provider over.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        self.script().responses.push_back(preset);
    }

    #[inline]
    pub fn add_reply<S: Into<String>>(&mut self, content: S) {
        self.add_response(PresetResponse::with_content(content));
    }

    #[inline]
    pub fn add_failure<S: Into<String>>(&mut self, kind: ErrorKind, message: S) {
        self.add_response(PresetResponse::with_failure(kind, message));
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far, in order.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.script().requests.clone()
    }

    /// Returns the number of preset responses not consumed yet.
    pub fn remaining(&self) -> usize {
        self.script().responses.len()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        // A panicking test must not poison the other clones.
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Debug for TestModelProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestModelProvider")
            .field("remaining", &self.remaining())
            .field("delay", &self.delay)
            .finish()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let preset = {
            let mut script = self.script();
            script.requests.push(req.clone());
            script.responses.pop_front()
        };
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            match preset {
                Some(PresetResponse::Reply(reply)) => Ok(reply),
                Some(PresetResponse::Failure { kind, message }) => {
                    Err(Error { message, kind })
                }
                None => Err(Error {
                    message: "no enough responses".to_owned(),
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use parley_model::ModelMessage;

    use super::*;

    fn request(text: &str) -> ModelRequest {
        ModelRequest {
            messages: vec![ModelMessage::User(text.to_owned())],
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestModelProvider::default();
        provider.add_reply("Hello, world!");
        provider.add_failure(ErrorKind::Unauthorized, "bad key");

        let reply = provider.send_request(&request("Hi")).await.unwrap();
        assert_eq!(reply.content, "Hello, world!");

        let err = provider.send_request(&request("Again")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.to_string(), "bad key");

        let err = provider.send_request(&request("More")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_clones_share_script() {
        let mut provider = TestModelProvider::default();
        provider.add_reply("one");
        let observer = provider.clone();

        provider.send_request(&request("Hi")).await.unwrap();

        assert_eq!(observer.remaining(), 0);
        assert_eq!(observer.requests(), vec![request("Hi")]);
    }

    #[tokio::test]
    async fn test_delay() {
        let mut provider = TestModelProvider::default();
        provider.add_reply("late");
        provider.set_delay(Duration::from_millis(5));

        let started = std::time::Instant::now();
        provider.send_request(&request("Hi")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(5));
    }
}
