//! Client error type and the mapping to user-facing messages.

use sitebook_core::error::CoreError;

/// Errors from the REST service layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Status {
        status: u16,
        /// Message extracted from the response body, empty when none.
        message: String,
        /// Raw response body for debugging.
        body: String,
    },

    /// The API rejected the session token. The session has been cleared.
    #[error("Session expired")]
    SessionExpired,

    /// A 2xx response whose body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A domain error raised before the request was sent, usually form
    /// validation.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status code, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::SessionExpired => Some(401),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Whether the failure happened in transport rather than in the API.
pub fn is_network_error(err: &ApiError) -> bool {
    match err {
        ApiError::Request(e) => e.is_connect() || e.is_timeout() || e.is_request(),
        _ => false,
    }
}

/// Convert any client error into a message fit to show the user.
///
/// A message supplied by the server wins; otherwise a default for the status
/// or failure kind is used.
pub fn get_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Request(e) if e.is_timeout() => {
            "The request timed out. Please try again.".to_string()
        }
        ApiError::Request(e) if e.is_decode() => {
            "Received an unexpected response from the server.".to_string()
        }
        ApiError::Request(_) => "Network error: please check your connection.".to_string(),
        ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
        ApiError::Status { status, .. } => default_status_message(*status),
        ApiError::SessionExpired => "Your session has expired. Please log in again.".to_string(),
        ApiError::Decode(_) => "Received an unexpected response from the server.".to_string(),
        ApiError::Core(CoreError::Validation(msg)) => msg.clone(),
        ApiError::Core(CoreError::Unauthorized(msg)) => capitalize(msg),
        ApiError::Core(other) => other.to_string(),
        ApiError::Config(msg) => msg.clone(),
    }
}

fn default_status_message(status: u16) -> String {
    match status {
        400 => "The request was invalid.".to_string(),
        401 => "You are not signed in.".to_string(),
        403 => "You do not have permission to perform this action.".to_string(),
        404 => "The requested record was not found.".to_string(),
        409 => "This record conflicts with an existing one.".to_string(),
        422 => "Some fields are invalid.".to_string(),
        500..=599 => "Server error, please try again later.".to_string(),
        other => format!("Request failed with status {other}."),
    }
}

fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Understands `{ "message": ".." }`, `{ "error": ".." }` and
/// `{ "errors": [{ "msg": ".." }, ..] }` (express-validator style).
pub(crate) fn extract_server_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return String::new();
    };

    for key in ["message", "error"] {
        if let Some(msg) = json.get(key).and_then(|v| v.as_str()) {
            if !msg.trim().is_empty() {
                return msg.to_string();
            }
        }
    }

    if let Some(errors) = json.get("errors").and_then(|v| v.as_array()) {
        let messages: Vec<&str> = errors
            .iter()
            .filter_map(|e| {
                e.get("msg")
                    .or_else(|| e.get("message"))
                    .and_then(|m| m.as_str())
                    .or_else(|| e.as_str())
            })
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, body: &str) -> ApiError {
        ApiError::Status {
            status,
            message: extract_server_message(body),
            body: body.to_string(),
        }
    }

    #[test]
    fn server_message_wins() {
        let err = status(400, r#"{"message":"Phone already registered"}"#);
        assert_eq!(get_error_message(&err), "Phone already registered");
    }

    #[test]
    fn error_field_is_used() {
        let err = status(409, r#"{"error":"Duplicate attendance"}"#);
        assert_eq!(get_error_message(&err), "Duplicate attendance");
    }

    #[test]
    fn validator_errors_are_joined() {
        let err = status(
            422,
            r#"{"errors":[{"msg":"Name is required"},{"msg":"Phone is invalid"}]}"#,
        );
        assert_eq!(
            get_error_message(&err),
            "Name is required; Phone is invalid"
        );
    }

    #[test]
    fn status_defaults_without_body() {
        assert_eq!(
            get_error_message(&status(404, "")),
            "The requested record was not found."
        );
        assert_eq!(
            get_error_message(&status(503, "<html>bad gateway</html>")),
            "Server error, please try again later."
        );
        assert_eq!(
            get_error_message(&status(418, "{}")),
            "Request failed with status 418."
        );
    }

    #[test]
    fn validation_message_passes_through() {
        let err = ApiError::Core(CoreError::Validation("phone: phone must be 10-15 digits".into()));
        assert_eq!(get_error_message(&err), "phone: phone must be 10-15 digits");
        assert!(!is_network_error(&err));
    }

    #[test]
    fn wrong_password_message() {
        let err = ApiError::Core(CoreError::Unauthorized("incorrect password".into()));
        assert_eq!(get_error_message(&err), "Incorrect password");
    }

    #[test]
    fn session_expired_message() {
        assert_eq!(
            get_error_message(&ApiError::SessionExpired),
            "Your session has expired. Please log in again."
        );
        assert_eq!(ApiError::SessionExpired.status(), Some(401));
    }

    #[test]
    fn request_error_reads_as_network_error() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = ApiError::Request(req_err);
        assert!(get_error_message(&err).starts_with("Network error"));
    }
}
