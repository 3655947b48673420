//! API Error Types
//!
//! Maps transport failures and HTTP status codes of the backend to one
//! error enum, and derives the message shown to the user from it.

use serde::Deserialize;
use thiserror::Error;

/// Message shown for failures without a bespoke message
pub const GENERIC_USER_MESSAGE: &str = "Something went wrong";

/// Errors that can occur when talking to the backend API
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401: missing, invalid or expired credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// 404: resource does not exist (or the key does not match)
    #[error("Not found")]
    NotFound,

    /// 507: the time slot filled up before the registration arrived
    #[error("Capacity exceeded: {message}")]
    CapacityExceeded { message: String },

    /// Any other 4xx/5xx
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    /// Connection could not be established
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Success status but the body did not decode
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Error body sent by the backend (`authenticated` is ignored)
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    /// Build from a non-success status and its raw body.
    ///
    /// JSON bodies carry `{message, authenticated}`; anything else is used
    /// verbatim.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            401 => ApiError::Unauthorized { message },
            404 => ApiError::NotFound,
            507 => ApiError::CapacityExceeded { message },
            _ => ApiError::Status { status, message },
        }
    }

    /// Classify a reqwest transport error
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable
        } else {
            ApiError::Request(err)
        }
    }

    /// HTTP status behind this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::NotFound => Some(404),
            ApiError::CapacityExceeded { .. } => Some(507),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Text to display for this error
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { message } | ApiError::CapacityExceeded { message } if !message.is_empty() => {
                message.clone()
            }
            ApiError::NotFound => "does not exist".to_string(),
            _ => GENERIC_USER_MESSAGE.to_string(),
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let body = r#"{"message": "Invalid credentials", "authenticated": false}"#;
        assert!(matches!(
            ApiError::from_status(401, body),
            ApiError::Unauthorized { message } if message == "Invalid credentials"
        ));
        assert!(matches!(ApiError::from_status(404, ""), ApiError::NotFound));
        assert!(matches!(
            ApiError::from_status(507, r#"{"message": "Registrations are full for this timeslot", "authenticated": true}"#),
            ApiError::CapacityExceeded { .. }
        ));
        assert!(matches!(
            ApiError::from_status(500, "Traceback ...\n"),
            ApiError::Status { status: 500, message } if message == "Traceback ..."
        ));
    }

    #[test]
    fn test_user_messages() {
        let err = ApiError::from_status(507, r#"{"message": "Slot is full"}"#);
        assert_eq!(err.user_message(), "Slot is full");

        let err = ApiError::from_status(401, r#"{"message": "Expired token. Reauthentication required."}"#);
        assert_eq!(err.user_message(), "Expired token. Reauthentication required.");

        assert_eq!(ApiError::NotFound.user_message(), "does not exist");
        assert_eq!(ApiError::Timeout.user_message(), GENERIC_USER_MESSAGE);
        assert_eq!(
            ApiError::Unauthorized { message: String::new() }.user_message(),
            GENERIC_USER_MESSAGE
        );
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(ApiError::from_status(422, "nope").status(), Some(422));
        assert_eq!(ApiError::Unavailable.status(), None);
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            status: 400,
            message: "name has to be defined".to_string(),
        };
        assert_eq!(err.to_string(), "API error 400: name has to be defined");
    }
}
