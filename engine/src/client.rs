use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::{
    config::GeneratorConfig,
    error::{GenerationError, ValidationErrorKind},
    leonardo_api::{HttpTransport, SubmitRequest},
    poll::{self, Observation, Resolution, Transition},
    sleeper::{Sleeper, TokioSleeper},
    style::descriptor_for,
    transport::Transport,
};

/// Lets the caller surface input problems to the user. The client itself never
/// renders anything.
pub trait ValidationPresenter {
    fn present_validation_error(&self, kind: ValidationErrorKind);
}

/// Drives one generation per [`GenerationClient::generate_image`] call:
/// submit the job, poll it, resolve to an image URL or an error.
/// Calls share nothing but the configuration, so they can run concurrently.
#[derive(Clone)]
pub struct GenerationClient {
    config: Arc<GeneratorConfig>,
    api_key: Option<String>,
    transport: Arc<dyn Transport + Send + Sync>,
    sleeper: Arc<dyn Sleeper + Send + Sync>,
    presenter: Option<Arc<dyn ValidationPresenter + Send + Sync>>,
}

impl GenerationClient {
    pub fn new(config: GeneratorConfig, api_key: Option<String>) -> Self {
        Self::with_parts(
            config,
            api_key,
            Arc::new(HttpTransport::default()),
            Arc::new(TokioSleeper),
        )
    }

    pub fn with_parts(
        config: GeneratorConfig,
        api_key: Option<String>,
        transport: Arc<dyn Transport + Send + Sync>,
        sleeper: Arc<dyn Sleeper + Send + Sync>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            api_key,
            transport,
            sleeper,
            presenter: None,
        }
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn ValidationPresenter + Send + Sync>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn build_request(&self, prompt: &str, style: &str) -> SubmitRequest {
        let descriptor = descriptor_for(&self.config.styles, style);
        SubmitRequest {
            prompt: format!("({prompt}), {descriptor} style, high quality, detailed"),
            negative_prompt: self.config.negative_prompt.clone(),
            model_id: self.config.model_id.clone(),
            width: self.config.width,
            height: self.config.height,
            num_images: self.config.num_images,
            guidance_scale: self.config.guidance_scale,
        }
    }

    pub async fn generate_image(&self, prompt: &str, style: &str) -> Result<String, GenerationError> {
        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            error!("Leonardo API key is not set");
            return Err(GenerationError::Configuration("missing API key".into()));
        };

        let prompt = prompt.trim();
        if prompt.is_empty() {
            let kind = ValidationErrorKind::MissingPrompt;
            if let Some(presenter) = &self.presenter {
                presenter.present_validation_error(kind);
            }
            return Err(GenerationError::Validation(kind));
        }

        let request = self.build_request(prompt, style);
        let generation_id = self.submit(api_key, &request).await?;
        info!("Generation initiated, ID: {generation_id}");

        self.poll(api_key, &generation_id).await
    }

    async fn submit(&self, api_key: &str, request: &SubmitRequest) -> Result<String, GenerationError> {
        let response = self
            .transport
            .submit(&self.config.endpoint, api_key, request)
            .await
            .map_err(|e| {
                error!("Error initiating image generation: {e}");
                GenerationError::Submission {
                    reason: e.to_string(),
                    payload: e.payload().map(str::to_string),
                }
            })?;

        match response.generation_id() {
            Some(id) => Ok(id.to_string()),
            None => {
                error!("Failed to get generation ID from initial response: {response:?}");
                Err(GenerationError::Submission {
                    reason: "response carried no generation id".into(),
                    payload: serde_json::to_string(&response).ok(),
                })
            }
        }
    }

    async fn poll(&self, api_key: &str, generation_id: &str) -> Result<String, GenerationError> {
        let max_attempts = self.config.max_poll_attempts;
        let interval = self.config.poll_interval();
        let mut attempt = 0;

        let resolution = loop {
            // only reachable with a budget of zero
            if attempt >= max_attempts {
                break Resolution::TimedOut;
            }
            self.sleeper.sleep(interval).await;
            attempt += 1;
            debug!("Polling attempt {attempt} for generation {generation_id}...");

            let observation = match self
                .transport
                .fetch_generation(&self.config.endpoint, api_key, generation_id)
                .await
            {
                Ok(resp) => Observation::from_response(resp),
                Err(e) => {
                    warn!("Polling error for generation {generation_id}: {e}");
                    Observation::TransportFailed
                }
            };
            if let Observation::Status { status, .. } = &observation {
                debug!("Generation status: {status:?}");
            }

            if let Transition::Resolved(resolution) = poll::step(&observation, attempt, max_attempts) {
                break resolution;
            }
        };

        let generation_id = generation_id.to_string();
        match resolution {
            Resolution::Image(url) => {
                info!("Generation complete: {url}");
                Ok(url)
            }
            Resolution::EmptyResult => {
                error!("Generation {generation_id} complete but no images found");
                Err(GenerationError::EmptyResult { generation_id })
            }
            Resolution::RemoteFailed => {
                error!("Generation {generation_id} failed");
                Err(GenerationError::RemoteGenerationFailed { generation_id })
            }
            Resolution::TimedOut => {
                error!("Generation {generation_id} timed out after {attempt} attempts");
                Err(GenerationError::Timeout {
                    generation_id,
                    attempts: attempt,
                })
            }
        }
    }
}
