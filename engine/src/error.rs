use strum::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ValidationErrorKind {
    #[strum(to_string = "missing prompt")]
    MissingPrompt,
}

/// Every way a generation call can end without an image.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    Validation(ValidationErrorKind),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Couldn't submit generation job: {reason}")]
    Submission {
        reason: String,
        payload: Option<String>,
    },

    #[error("Generation {generation_id} failed remotely")]
    RemoteGenerationFailed { generation_id: String },

    #[error("Generation {generation_id} completed without any image")]
    EmptyResult { generation_id: String },

    #[error("Generation {generation_id} timed out after {attempts} attempts")]
    Timeout { generation_id: String, attempts: u32 },
}

/// Text a front end shows for a failed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserMessage {
    pub title: &'static str,
    pub body: &'static str,
}

impl GenerationError {
    pub fn is_validation(&self) -> bool {
        matches!(self, GenerationError::Validation(_))
    }

    /// Only the empty prompt gets its own message. It is the one failure the user
    /// can prevent before anything goes over the network.
    pub fn user_message(&self) -> UserMessage {
        match self {
            GenerationError::Validation(ValidationErrorKind::MissingPrompt) => UserMessage {
                title: "Missing Prompt",
                body: "Please enter a description for the image.",
            },
            _ => UserMessage {
                title: "Generation Failed",
                body: "Could not generate the image. Please try again.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_validation_is_distinguished() {
        let missing = GenerationError::Validation(ValidationErrorKind::MissingPrompt);
        assert!(missing.is_validation());
        assert_eq!(missing.user_message().title, "Missing Prompt");

        let others = [
            GenerationError::Configuration("missing API key".into()),
            GenerationError::Submission {
                reason: "boom".into(),
                payload: None,
            },
            GenerationError::RemoteGenerationFailed {
                generation_id: "g".into(),
            },
            GenerationError::EmptyResult {
                generation_id: "g".into(),
            },
            GenerationError::Timeout {
                generation_id: "g".into(),
                attempts: 15,
            },
        ];
        for err in others {
            assert!(!err.is_validation());
            assert_eq!(err.user_message().title, "Generation Failed");
        }
    }

    #[test]
    fn display() {
        let err = GenerationError::Timeout {
            generation_id: "g1".into(),
            attempts: 15,
        };
        assert_eq!(err.to_string(), "Generation g1 timed out after 15 attempts");
        assert_eq!(
            GenerationError::Validation(ValidationErrorKind::MissingPrompt).to_string(),
            "Invalid input: missing prompt"
        );
    }
}
