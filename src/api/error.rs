/// Failure of a call to the Approval API.
///
/// Auth, validation and server errors are all the same kind to the client;
/// the message is whatever the server said, or the HTTP status line.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    pub fn request_failed(message: impl Into<String>) -> Self {
        ApiError::RequestFailed {
            status: None,
            message: message.into(),
        }
    }

    /// Builds the error for a non-2xx response.
    pub fn from_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("Request failed: {} {}", status, reason.unwrap_or("")).trim_end().to_string()
        } else {
            body.to_string()
        };
        ApiError::RequestFailed {
            status: Some(status),
            message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::RequestFailed { message, .. } => message,
        }
    }
}

impl From<wreq::Error> for ApiError {
    fn from(e: wreq::Error) -> Self {
        ApiError::request_failed(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::request_failed(format!("Failed to parse API response: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_prefers_body() {
        let err = ApiError::from_response(400, Some("Bad Request"), "Email already registered");
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_from_response_falls_back_to_status_line() {
        let err = ApiError::from_response(502, Some("Bad Gateway"), "  ");
        assert_eq!(err.message(), "Request failed: 502 Bad Gateway");

        let err = ApiError::from_response(599, None, "");
        assert_eq!(err.message(), "Request failed: 599");
    }
}
