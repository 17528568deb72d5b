use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use parley_model::{
    ErrorKind, ModelFinishReason, ModelMessage, ModelProvider,
    ModelProviderError, ModelReply, ModelRequest,
};
use tokio::time::sleep;

#[derive(Debug)]
struct EchoModelProviderError(ErrorKind);

impl Display for EchoModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for EchoModelProviderError {}

impl ModelProviderError for EchoModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Replies with the last user message, after a short delay.
struct EchoModelProvider;

impl ModelProvider for EchoModelProvider {
    type Error = EchoModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let last_user = req.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.clone()),
            _ => None,
        });
        async move {
            sleep(Duration::from_millis(1)).await;
            match last_user {
                Some(text) => Ok(ModelReply::stop(format!("You said {text}"))),
                None => Err(EchoModelProviderError(ErrorKind::Other)),
            }
        }
    }
}

#[tokio::test]
async fn test_completion() {
    let provider = EchoModelProvider;
    let req = ModelRequest {
        messages: vec![
            ModelMessage::System("Be brief.".to_owned()),
            ModelMessage::Assistant("Hello!".to_owned()),
            ModelMessage::User("Good morning".to_owned()),
        ],
    };
    let reply = provider.send_request(&req).await.unwrap();
    assert_eq!(reply.content, "You said Good morning");
    assert_eq!(reply.finish_reason, Some(ModelFinishReason::Stop));
}

#[tokio::test]
async fn test_error() {
    let provider = EchoModelProvider;
    let req = ModelRequest {
        messages: vec![ModelMessage::System("Be brief.".to_owned())],
    };
    let err = provider.send_request(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);
}

#[test]
fn test_message_content() {
    let msg = ModelMessage::Assistant("Hi there".to_owned());
    assert_eq!(msg.content(), "Hi there");
}

#[test]
fn test_error_kind_serialization() {
    let json = serde_json::to_string(&ErrorKind::RateLimitExceeded).unwrap();
    assert_eq!(json, "\"rate_limit_exceeded\"");
    let kind: ErrorKind = serde_json::from_str("\"unauthorized\"").unwrap();
    assert_eq!(kind, ErrorKind::Unauthorized);
}
