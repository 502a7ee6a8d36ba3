use std::pin::Pin;

use thiserror::Error;

use crate::leonardo_api::{PollResponse, SubmitRequest, SubmitResponse};

pub type TransportFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;

/// The two calls the generation client makes against the remote service.
pub trait Transport {
    fn submit<'a>(
        &'a self,
        endpoint: &'a str,
        api_key: &'a str,
        body: &'a SubmitRequest,
    ) -> TransportFuture<'a, SubmitResponse>;

    fn fetch_generation<'a>(
        &'a self,
        endpoint: &'a str,
        api_key: &'a str,
        generation_id: &'a str,
    ) -> TransportFuture<'a, PollResponse>;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Couldn't decode response: {source}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },
}

impl TransportError {
    /// Whatever the remote sent back, if anything.
    pub fn payload(&self) -> Option<&str> {
        match self {
            TransportError::Http(_) => None,
            TransportError::Status { body, .. } | TransportError::Decode { body, .. } => {
                Some(body.as_str()).filter(|b| !b.is_empty())
            }
        }
    }
}
