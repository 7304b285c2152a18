pub mod config;
pub mod error;
pub mod gemini;
pub mod geojson;
pub mod prompt;
pub mod samples;
pub mod suggest;
pub mod vulnerability;
pub mod weights;

pub use config::GeneratorConfig;
pub use error::{SuggestError, SuggestResult};
pub use gemini::{GeminiClient, GenerationReply, TextGenerator};
pub use samples::Sample;
pub use suggest::{Suggestion, WeightSuggester};
pub use weights::WeightTriple;
