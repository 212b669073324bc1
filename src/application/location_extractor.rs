//! Location Extractor
//!
//! Turns free-form post text into a canonical place-name using a few-shot
//! prompt against the inference backend.

use crate::domain::ports::{InferenceBackend, InferenceError};
use crate::domain::value_objects::PlaceName;
use std::sync::Arc;

/// Instructional preamble with five worked examples.
pub const FEW_SHOT_PROMPT: &str = r#"You are an expert at extracting location data from tweet text and metadata. Given a tweet, you will output the most relevant location from smallest-to-largest administrative units (city, state, region, country). If you can't identify it, return Unknown.

Example 1: {"text": "Just landed in Paris for the summer!", "location_values": "France"}, output: "Paris, France"

Example 2: {"text": "i am who i am", "location_values": "in your walls"}, output: "Unknown"

Example 3: {"text": "I love programming!", "location_values": "web3, metaverse"}, output: "Unknown"

Example 4: {"text": "Exploring the beautiful beaches of Bali.", "location_values": "Indonesia"}, output: "Bali, Indonesia"

Example 5: {"text": "The game today was amazing!", "location_values": "user/location: Memphis, Tennessee; media/location: San Francisco, California"}, output: "San Francisco, California, USA"
"#;

/// Extracts a canonical place-name from text.
///
/// Model output is best-effort: anything other than the `Unknown` sentinel
/// is passed downstream as an opaque geocoding query.
pub struct LocationExtractor {
    backend: Arc<dyn InferenceBackend>,
}

impl LocationExtractor {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Build the full prompt for a piece of text and optional context.
    pub fn build_prompt(text: &str, context: &str) -> String {
        let full_text = if context.is_empty() {
            text.to_string()
        } else {
            format!("{} [Location context: {}]", text, context)
        };

        format!("{}Tweet: {}\nLocation:", FEW_SHOT_PROMPT, full_text)
    }

    /// Extract the most specific location mentioned in `text`.
    ///
    /// Backend failures are returned as-is; they are not an `Unknown` result.
    pub async fn extract(&self, text: &str, context: &str) -> Result<PlaceName, InferenceError> {
        let prompt = Self::build_prompt(text, context);
        let raw = self.backend.infer(&prompt).await?;
        let place = PlaceName::parse(&raw);

        tracing::debug!("extracted location {:?} from raw output {:?}", place, raw);
        Ok(place)
    }
}
