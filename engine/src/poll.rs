//! The status polling state machine, kept free of IO so it can be driven from tests.

use crate::leonardo_api::PollResponse;

/// Lifecycle state of a remote job as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    /// Anything that is not terminal, including a missing status.
    Pending(Option<String>),
    Complete,
    Failed,
}

impl GenerationStatus {
    pub fn from_remote(status: Option<&str>) -> Self {
        match status {
            Some("COMPLETE") => GenerationStatus::Complete,
            Some("FAILED") => GenerationStatus::Failed,
            other => GenerationStatus::Pending(other.map(str::to_string)),
        }
    }
}

/// What one poll attempt saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Status {
        status: GenerationStatus,
        image_urls: Vec<String>,
    },
    TransportFailed,
}

impl Observation {
    pub fn from_response(resp: PollResponse) -> Self {
        let (status, images) = match resp.generations_by_pk {
            Some(record) => (record.status, record.generated_images.unwrap_or_default()),
            None => (None, vec![]),
        };
        Observation::Status {
            status: GenerationStatus::from_remote(status.as_deref()),
            // a null url still counts as an entry, so it resolves as an empty result
            image_urls: images
                .into_iter()
                .map(|img| img.url.unwrap_or_default())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Image(String),
    EmptyResult,
    RemoteFailed,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Continue,
    Resolved(Resolution),
}

/// Decides what follows `observation`, made on attempt number `attempt` (1-based)
/// out of `max_attempts`.
pub fn step(observation: &Observation, attempt: u32, max_attempts: u32) -> Transition {
    match observation {
        Observation::Status {
            status: GenerationStatus::Complete,
            image_urls,
        } => match image_urls.first() {
            Some(url) if !url.is_empty() => Transition::Resolved(Resolution::Image(url.clone())),
            _ => Transition::Resolved(Resolution::EmptyResult),
        },
        Observation::Status {
            status: GenerationStatus::Failed,
            ..
        } => Transition::Resolved(Resolution::RemoteFailed),
        _ if attempt >= max_attempts => Transition::Resolved(Resolution::TimedOut),
        _ => Transition::Continue,
    }
}
