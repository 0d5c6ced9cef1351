//! Error taxonomy for the synthesis stage.
//!
//! Trend fetching degrades silently; synthesis does the opposite. Every
//! variant here is surfaced to the caller with diagnostic detail, because a
//! wrong or missing idea must not be papered over.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The completion service answered with a non-success status.
    #[error("completion request failed with status {status}")]
    Upstream { status: u16, details: String },

    /// The completion service answered 2xx with no usable text content.
    #[error("completion service returned an empty response")]
    EmptyResponse,

    /// Neither strict parsing nor balanced-object extraction recovered JSON
    /// from the model output. Carries the raw text for diagnostics.
    #[error("failed to parse model response as JSON")]
    Unparseable { raw: String },

    /// Transport-level failure (timeout, connection error) on the call.
    #[error("completion request error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_status() {
        let err = SynthesisError::Upstream {
            status: 429,
            details: "rate limited".to_string(),
        };
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_unparseable_keeps_raw_text() {
        let err = SynthesisError::Unparseable {
            raw: "gibberish".to_string(),
        };
        match err {
            SynthesisError::Unparseable { raw } => assert_eq!(raw, "gibberish"),
            _ => unreachable!(),
        }
    }
}
