use std::collections::BTreeMap;

use strum::{Display, EnumIter, IntoEnumIterator};

/// The art styles offered to the user. Each one expands into a keyword phrase
/// that biases the model towards a look.
#[derive(
    Debug,
    Clone,
    Copy,
    Display,
    PartialEq,
    Eq,
    EnumIter,
    Default,
)]
pub enum Style {
    #[default]
    Cozy,
    Comic,
    Animation,
}

impl Style {
    pub fn descriptor(&self) -> &'static str {
        match self {
            Style::Cozy => "ghibli studio cozy soft comfortable illustration painted",
            Style::Comic => "comic style art illustration",
            Style::Animation => "anime style detailed animation movie still illustration",
        }
    }

    /// The built-in lookup table, keyed by display name.
    pub fn default_table() -> BTreeMap<String, String> {
        Style::iter()
            .map(|s| (s.to_string(), s.descriptor().to_string()))
            .collect()
    }
}

/// Looks `style` up in `table`. Unknown names are used as the descriptor verbatim.
pub fn descriptor_for<'a>(table: &'a BTreeMap<String, String>, style: &'a str) -> &'a str {
    table.get(style).map(String::as_str).unwrap_or(style)
}
