//! Process-level error type.
//!
//! Module errors (`ValidationError`, `NarrativeError`, `ConfigError`) are typed
//! enums; they are flattened into an `AppError` only at the binary boundary,
//! where all we still need is a message and an exit code.

use crate::config::ConfigError;
use crate::domain::ValidationError;
use crate::narrative::NarrativeError;

/// Exit code for bad input, bad configuration, or a missing credential.
pub const EXIT_USAGE: u8 = 2;

/// Exit code for runtime failures (terminal I/O, external service).
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::usage(format!("Invalid property features: {err}"))
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::usage(err.to_string())
    }
}

impl From<NarrativeError> for AppError {
    fn from(err: NarrativeError) -> Self {
        match err {
            NarrativeError::MissingCredential { .. } => Self::usage(err.to_string()),
            other => Self::runtime(format!("Market analysis failed: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_is_a_usage_error() {
        let err: AppError = NarrativeError::MissingCredential {
            var: "GOOGLE_API_KEY".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn service_failures_are_runtime_errors() {
        let err: AppError = NarrativeError::EmptyResponse.into();
        assert_eq!(err.exit_code(), EXIT_RUNTIME);
        assert!(err.to_string().starts_with("Market analysis failed"));
    }
}
