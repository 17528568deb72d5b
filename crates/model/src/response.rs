use serde::{Deserialize, Serialize};

/// The reason why a model reply has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFinishReason {
    /// The model has finished generating text.
    Stop,
    /// The reply was cut off by the token limit.
    Length,
    /// The reply was filtered by the provider.
    ContentFilter,
}

/// A complete reply from the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelReply {
    /// The reply text, exactly as produced by the model.
    pub content: String,
    /// The reason the model finished generating, if reported.
    pub finish_reason: Option<ModelFinishReason>,
}

impl ModelReply {
    /// Creates a reply that finished normally.
    #[inline]
    pub fn stop<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some(ModelFinishReason::Stop),
        }
    }
}
