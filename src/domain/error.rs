use thiserror::Error;

/// Failure of any call to the model registry backend.
///
/// Transport failures, non-success statuses and undecodable bodies all land
/// here. Callers only ever see the message; there is no finer classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Remote error: {message}")]
pub struct RemoteError {
    message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn transport(error: impl std::fmt::Display) -> Self {
        Self::new(format!("Request failed: {}", error))
    }

    pub fn status(status: u16, body: impl AsRef<str>) -> Self {
        let body = body.as_ref();

        if body.is_empty() {
            Self::new(format!("HTTP {}", status))
        } else {
            Self::new(format!("HTTP {}: {}", status, body))
        }
    }

    pub fn decode(error: impl std::fmt::Display) -> Self {
        Self::new(format!("Failed to parse response: {}", error))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_with_body() {
        let error = RemoteError::status(500, "boom");
        assert_eq!(error.to_string(), "Remote error: HTTP 500: boom");
    }

    #[test]
    fn test_status_error_without_body() {
        let error = RemoteError::status(404, "");
        assert_eq!(error.message(), "HTTP 404");
    }

    #[test]
    fn test_transport_error() {
        let error = RemoteError::transport("connection refused");
        assert_eq!(error.message(), "Request failed: connection refused");
    }
}
