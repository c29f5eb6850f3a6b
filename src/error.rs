//! Error taxonomy for gemterm.
//!
//! [`StartupError`] covers everything that stops the program before the chat
//! loop starts (exit code 1). [`ChatError`] covers failures inside a single
//! turn; the loop reports them and keeps going.

use thiserror::Error;

/// Unrecoverable failures during startup.
#[derive(Debug, Error)]
pub enum StartupError {
    /// No API key in the environment and none entered at the prompt.
    #[error("API Key is required to proceed")]
    MissingCredential,

    /// The provider client rejected the credential.
    #[error("Error configuring API key: {0}")]
    Configure(String),

    /// The model could not be initialised.
    #[error("Error initializing model: {0}")]
    ModelInit(String),
}

/// Failures while sending a turn or consuming its streamed reply.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    /// Network, API, or decoding error raised by the provider stream.
    #[error("{0}")]
    Stream(String),

    /// The stream finished without producing any text.
    #[error("the model returned an empty response")]
    EmptyResponse,
}

impl ChatError {
    /// Whether the provider message looks like an authentication failure.
    ///
    /// A syntactically valid but revoked key only surfaces on the first
    /// request, so it is reported per turn with a hint rather than at startup.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ChatError::Stream(msg) => {
                let msg = msg.to_ascii_lowercase();
                ["api_key_invalid", "api key not valid", "401", "403", "permission_denied", "unauthenticated"]
                    .iter()
                    .any(|needle| msg.contains(needle))
            }
            ChatError::EmptyResponse => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_detection() {
        let err = ChatError::Stream("HTTP 400: API key not valid. Please pass a valid API key.".into());
        assert!(err.is_auth_failure());
        let err = ChatError::Stream("status 403 PERMISSION_DENIED".into());
        assert!(err.is_auth_failure());
    }

    #[test]
    fn test_non_auth_failures() {
        assert!(!ChatError::Stream("connection reset by peer".into()).is_auth_failure());
        assert!(!ChatError::EmptyResponse.is_auth_failure());
    }

    #[test]
    fn test_startup_messages() {
        assert_eq!(
            StartupError::MissingCredential.to_string(),
            "API Key is required to proceed"
        );
        assert_eq!(
            StartupError::ModelInit("bad name".into()).to_string(),
            "Error initializing model: bad name"
        );
    }
}
