use thiserror::Error;

pub type SuggestResult<T> = Result<T, SuggestError>;

/// Failures of a single weight-suggestion round trip.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("credential variable {0} is not set")]
    MissingCredential(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("unable to decode API response: {0}")]
    Decode(serde_json::Error),

    #[error("API response carried no text")]
    EmptyReply,

    #[error("reply is not a weight object: {source} (text: {text:?})")]
    MalformedWeights {
        text: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize samples: {0}")]
    Samples(serde_json::Error),
}
