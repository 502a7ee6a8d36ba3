use std::{collections::BTreeMap, fs, path::Path, time::Duration};

use color_eyre::{Result, eyre::WrapErr as _};
use serde::{Deserialize, Serialize};

use crate::style::Style;

pub const LEONARDO_API_URL: &str = "https://cloud.leonardo.ai/api/rest/v1/generations";
pub const DEFAULT_MODEL_ID: &str = "aa77f04e-3eec-4034-9c07-d0f619684628";
pub const DEFAULT_NEGATIVE_PROMPT: &str = "multiple cats, multiple dogs, two cats, two dogs, text, words, signature, watermark, blurry, low quality, deformed";

/// Everything the generation client needs apart from the credential.
/// Every field falls back to its default when missing from a settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub model_id: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub num_images: u32,
    pub guidance_scale: u32,
    pub max_poll_attempts: u32,
    pub poll_interval_ms: u64,
    pub styles: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: LEONARDO_API_URL.into(),
            model_id: DEFAULT_MODEL_ID.into(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.into(),
            width: 512,
            height: 512,
            num_images: 1,
            guidance_scale: 7,
            max_poll_attempts: 15,
            poll_interval_ms: 2000,
            styles: Style::default_table(),
        }
    }
}

impl GeneratorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path)
            .wrap_err_with(|| format!("Couldn't read generator config {}", path.display()))?;
        Ok(ron::from_str(&src)?)
    }
}
