//! The idea-generation pipeline: normalize, fetch trends, synthesize.
//!
//! Each stage is a small module with a total or explicitly-fallible
//! contract; the route layer composes them per request. No stage keeps
//! state across requests.

pub mod coerce;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod prompt;
pub mod synthesizer;
pub mod trends;

pub use coerce::{coerce_business_idea, coerce_trends, sanitize_string};
pub use error::SynthesisError;
pub use extract::{extract_first_json_object, recover_json_object};
pub use normalize::normalize_answers;
pub use prompt::build_prompt;
pub use synthesizer::{fallback_idea, recover_response_shape, IdeaSynthesizer};
pub use trends::{fetch_trends_for_industry, gather_trends};
