use crate::{
    error::{SuggestError, SuggestResult},
    samples::Sample,
};

const INSTRUCTION: &str = "Suggest new values for w1, w2, w3 in the formula:
  V = w1*norm(temp) - w2*norm(ndvi) + w3*norm(bldDensity)
to improve hotspot accuracy.
Respond with JSON exactly like: { \"w1\": 0.5, \"w2\": 0.3, \"w3\": 0.2 }.";

/// Builds the tuning prompt. The samples are embedded as two-space indented JSON.
pub fn build_prompt(samples: &[Sample]) -> SuggestResult<String> {
    let serialized = serialize_samples(samples)?;
    let prompt = format!("Here are some zones:\n{serialized}\n\n{INSTRUCTION}");
    Ok(prompt.trim().to_string())
}

pub fn serialize_samples(samples: &[Sample]) -> SuggestResult<String> {
    serde_json::to_string_pretty(samples).map_err(SuggestError::Samples)
}
