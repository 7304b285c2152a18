use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SuggestError, SuggestResult};

const FENCE: &str = "```";

/// Coefficients of `V = w1*temp - w2*ndvi + w3*bldDensity` over normalized features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightTriple {
    pub w1: f64,
    pub w2: f64,
    pub w3: f64,
}

impl WeightTriple {
    /// The triple the map data was published with.
    pub const TUNED: WeightTriple = WeightTriple {
        w1: 0.6,
        w2: 0.2,
        w3: 0.2,
    };

    pub const UNIT: WeightTriple = WeightTriple {
        w1: 1.0,
        w2: 1.0,
        w3: 1.0,
    };

    pub fn new(w1: f64, w2: f64, w3: f64) -> Self {
        Self { w1, w2, w3 }
    }

    pub fn score(&self, temp: f64, ndvi: f64, bld_density: f64) -> f64 {
        self.w1 * temp - self.w2 * ndvi + self.w3 * bld_density
    }
}

impl Default for WeightTriple {
    fn default() -> Self {
        Self::TUNED
    }
}

impl fmt::Display for WeightTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ w1: {}, w2: {}, w3: {} }}", self.w1, self.w2, self.w3)
    }
}

/// Removes every "```" marker, an optional `json` tag after it and the whitespace that follows.
pub fn strip_fences(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(FENCE) {
        cleaned.push_str(&rest[..pos]);
        rest = &rest[pos + FENCE.len()..];
        rest = rest.strip_prefix("json").unwrap_or(rest);
        rest = rest.trim_start();
    }
    cleaned.push_str(rest);
    cleaned.trim().to_string()
}

/// Parses an already fence-stripped reply.
pub fn parse_weights(text: &str) -> SuggestResult<WeightTriple> {
    serde_json::from_str(text).map_err(|source| SuggestError::MalformedWeights {
        text: text.to_string(),
        source,
    })
}
