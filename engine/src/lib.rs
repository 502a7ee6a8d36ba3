pub mod client;
pub mod config;
pub mod error;
pub mod leonardo_api;
pub mod poll;
pub mod sleeper;
pub mod style;
pub mod transport;

pub use client::{GenerationClient, ValidationPresenter};
pub use config::GeneratorConfig;
pub use error::{GenerationError, UserMessage, ValidationErrorKind};
pub use style::Style;
