//! Client-side error taxonomy

/// Everything that can go wrong between a user action and the backend.
///
/// Errors are handled by the component that made the call and turned into a
/// toast; nothing here is meant to bubble further than that.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Logical failure reported by the backend (`status: false` or a bare
    /// message payload). Shown to the user verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Client-side validation that blocks a request from being sent.
    #[error("{0}")]
    Validation(String),

    #[error("Only PDF, Images, or Text files allowed.")]
    UnsupportedFile { mime: String },

    #[error("{0} is not supported in this browser.")]
    Unsupported(&'static str),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Backend rejection with a fallback when the payload carried no message.
    pub fn rejected(message: Option<String>, fallback: &str) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => ClientError::Rejected(m),
            _ => ClientError::Rejected(fallback.to_string()),
        }
    }
}

/// Text for a toast: backend and validation messages verbatim, transport
/// failures replaced by the caller's generic wording.
pub fn user_message(err: &ClientError, fallback: &str) -> String {
    match err {
        ClientError::Rejected(_)
        | ClientError::Validation(_)
        | ClientError::UnsupportedFile { .. }
        | ClientError::Unsupported(_) => err.to_string(),
        ClientError::Network(_)
        | ClientError::Status { .. }
        | ClientError::Decode(_)
        | ClientError::Storage(_) => fallback.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_prefers_backend_message() {
        let err = ClientError::rejected(Some("Incorrect password".into()), "Login failed");
        assert_eq!(err.to_string(), "Incorrect password");
    }

    #[test]
    fn rejected_falls_back_on_blank_message() {
        let err = ClientError::rejected(Some("  ".into()), "Signup failed");
        assert_eq!(err.to_string(), "Signup failed");
        assert_eq!(
            ClientError::rejected(None, "Upload failed"),
            ClientError::Rejected("Upload failed".into())
        );
    }

    #[test]
    fn user_message_hides_transport_details() {
        let network = ClientError::Network("TypeError: Failed to fetch".into());
        assert_eq!(user_message(&network, "Login failed! Something went wrong."), "Login failed! Something went wrong.");

        let rejected = ClientError::Rejected("User not found".into());
        assert_eq!(user_message(&rejected, "Login failed"), "User not found");
    }

    #[test]
    fn unsupported_file_message_is_user_facing() {
        let err = ClientError::UnsupportedFile {
            mime: "application/zip".into(),
        };
        assert_eq!(err.to_string(), "Only PDF, Images, or Text files allowed.");
    }
}
