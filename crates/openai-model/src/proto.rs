use parley_model::{
    ErrorKind, ModelFinishReason, ModelMessage, ModelReply, ModelRequest,
};
use serde::{Deserialize, Serialize};

use crate::{Error, OpenAIConfig};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletion {
    pub id: Option<String>,
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant { content: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &ModelRequest,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: req.messages.iter().map(create_message).collect(),
        stream: false,
    }
}

#[inline]
fn create_message(msg: &ModelMessage) -> Message {
    match msg {
        ModelMessage::System(content) => Message::System {
            content: content.clone(),
        },
        ModelMessage::User(content) => Message::User {
            content: content.clone(),
        },
        ModelMessage::Assistant(content) => Message::Assistant {
            content: content.clone(),
        },
    }
}

/// Parses a successful response body into a reply.
///
/// The first choice is the reply. A body without choices, or whose first
/// choice carries no text, is malformed.
pub fn parse_reply(body: &str) -> Result<ModelReply, Error> {
    let completion =
        serde_json::from_str::<ChatCompletion>(body).map_err(|err| {
            Error::new(
                format!("invalid completion payload: {err}"),
                ErrorKind::MalformedResponse,
            )
        })?;
    trace!("got completion: {:?}", completion.id);

    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(Error::new(
            "completion has no choices",
            ErrorKind::MalformedResponse,
        ));
    };
    let content = match choice.message.content {
        Some(content) if !content.is_empty() => content,
        _ => {
            return Err(Error::new(
                "completion has no content",
                ErrorKind::MalformedResponse,
            ));
        }
    };

    let finish_reason =
        choice
            .finish_reason
            .as_deref()
            .and_then(|reason| match reason {
                "stop" => Some(ModelFinishReason::Stop),
                "length" => Some(ModelFinishReason::Length),
                "content_filter" => Some(ModelFinishReason::ContentFilter),
                _ => None,
            });

    Ok(ModelReply {
        content,
        finish_reason,
    })
}

/// Extracts the human-readable message from an error response body, if the
/// body follows the usual `{"error": {"message": ...}}` shape.
pub fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.error.message)
}
