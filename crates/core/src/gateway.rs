use std::pin::Pin;
use std::sync::Arc;

use parley_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelReply, ModelRequest,
};
use tracing::Instrument;

use crate::conversation::Turn;

type CompleteResult = Result<ModelReply, CompletionError>;
type BoxedCompleteFuture = Pin<Box<dyn Future<Output = CompleteResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ModelRequest) -> BoxedCompleteFuture + Send + Sync>;

/// A failed completion request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("completion failed: {message}")]
pub struct CompletionError {
    kind: ErrorKind,
    message: String,
}

impl CompletionError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the classification of the failure.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable cause.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A wrapper around a model provider that provides a type-erased interface
/// for sending a whole transcript and getting the reply text back.
///
/// Every call is a single attempt. Failures are returned to the caller as
/// they are, nothing is retried here.
#[derive(Clone)]
pub struct CompletionGateway {
    handler_fn: HandlerFn,
}

impl CompletionGateway {
    /// Creates a gateway that sends requests through `provider`.
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since the controller doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            trace!("sending request: {:?}", req);
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    fut.await.map_err(|err| {
                        error!("got an error: {err:?}");
                        from_provider_error(err)
                    })
                }
                .instrument(trace_span!("completion request")),
            )
        });
        Self { handler_fn }
    }

    /// Sends every turn, in order, and returns the reply verbatim.
    ///
    /// An empty reply is treated as a malformed response, so callers can
    /// always append what they get.
    pub async fn complete(
        &self,
        transcript: &[Turn],
    ) -> Result<String, CompletionError> {
        let req = ModelRequest {
            messages: transcript.iter().map(Turn::to_model_message).collect(),
        };
        let reply = (self.handler_fn)(req).await?;

        if reply.content.is_empty() {
            return Err(CompletionError::new(
                ErrorKind::MalformedResponse,
                "the model returned an empty reply",
            ));
        }
        if reply.finish_reason == Some(ModelFinishReason::Length) {
            warn!("reply was cut off by the token limit");
        }
        Ok(reply.content)
    }
}

fn from_provider_error<E: ModelProviderError>(err: E) -> CompletionError {
    CompletionError::new(err.kind(), err.to_string())
}
