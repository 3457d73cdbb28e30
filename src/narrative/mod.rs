//! Natural-language market commentary.
//!
//! The valuation pipeline only sees the [`NarrativeGenerator`] trait: a price
//! and a feature set go in, opaque prose (or a failure) comes out. The Gemini
//! REST client is the production implementation; tests substitute their own.

use thiserror::Error;

use crate::domain::PropertyFeatures;

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;
pub use prompt::build_prompt;

/// Failure of the external text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    #[error("missing API key: set {var} in the environment or .env")]
    MissingCredential { var: String },
    #[error("API key rejected ({status}): {message}")]
    CredentialRejected { status: u16, message: String },
    #[error("quota exhausted: {message}")]
    QuotaExhausted { message: String },
    #[error("service error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("service returned no text")]
    EmptyResponse,
}

/// Turns a valued property into prose commentary.
pub trait NarrativeGenerator {
    /// Blocking; may take several seconds.
    fn explain(&self, point_estimate: u64, features: &PropertyFeatures) -> Result<String, NarrativeError>;
}
