use thiserror::Error;

/// Boxed error preserving the original cause of a failure.
///
/// Transport and decoder failures are carried verbatim so downstream code can
/// downcast and pattern-match on the concrete type that produced them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

///Error carried by a rejected [`Promise`](crate::Promise)
#[derive(Debug, Error)]
pub enum Error {
    ///The underlying operation reported failure; the original cause is
    ///preserved unchanged
    #[error("transport failure")]
    Transport(#[source] BoxError),

    ///The underlying operation claimed success but the completion payload was
    ///missing a field the requested response shape needs
    #[error("malformed completion: missing {0}")]
    MalformedCompletion(&'static str),

    ///The payload bytes were retrieved but the decoder rejected them; the
    ///decoder's original error is preserved
    #[error("decoding failure")]
    Decoding(#[source] BoxError),

    ///The promise was cancelled before the underlying operation completed
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    ///Check if the promise was rejected by a cancellation request
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    ///Retrieve the original transport error, if that is what rejected the
    ///promise
    pub fn transport(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Transport(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }

    ///Retrieve the original decoder error, if that is what rejected the
    ///promise
    pub fn decoding(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Decoding(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}
