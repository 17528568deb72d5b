use parley_model::{ErrorKind, ModelReply};
use serde::{Deserialize, Serialize};

/// The preset outcome of one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetResponse {
    /// The request succeeds with this reply.
    #[serde(rename = "reply")]
    Reply(ModelReply),
    /// The request fails with this error.
    #[serde(rename = "failure")]
    Failure {
        /// Kind of the error.
        kind: ErrorKind,
        /// Message of the error.
        message: String,
    },
}

impl PresetResponse {
    /// Creates a successful `PresetResponse` with the specified text.
    #[inline]
    pub fn with_content<S: Into<String>>(content: S) -> Self {
        Self::Reply(ModelReply::stop(content))
    }

    /// Creates a failed `PresetResponse`.
    #[inline]
    pub fn with_failure<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }
}
