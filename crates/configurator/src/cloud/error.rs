//! Errors of the configuration service boundary

use thiserror::Error;

/// PostgreSQL "insufficient privilege", raised by row-level security policies
const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Result type for cloud operations.
pub type CloudResult<T> = Result<T, CloudError>;

/// Failures of upload / save / list calls
#[derive(Debug, Error)]
pub enum CloudError {
    /// Service URL or key missing from the settings.
    #[error("cloud service is not configured")]
    NotConfigured,

    /// Save was requested without a configuration name.
    #[error("configuration name is empty")]
    EmptyName,

    /// Rejected by an access policy (HTTP 401/403, row-level security).
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    /// The service could not be reached.
    #[error("network unreachable: {0}")]
    Unreachable(String),

    /// The service answered with an error status.
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Upload succeeded but no usable public URL could be formed.
    #[error("no public URL for uploaded object '{path}'")]
    MissingPublicUrl { path: String },

    /// Response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Other transport failure.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Local file could not be read for upload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CloudError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            CloudError::Unreachable(e.to_string())
        } else if e.is_decode() {
            CloudError::Decode(e.to_string())
        } else {
            CloudError::Http(e)
        }
    }
}

impl CloudError {
    /// Classify an error response by status and body
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = error_message(body);
        if is_access_denied(status, body) {
            CloudError::AccessDenied { message }
        } else {
            CloudError::Rejected { status, message }
        }
    }

    /// Whether this failure comes from an access policy
    pub fn is_access_denied(&self) -> bool {
        matches!(self, CloudError::AccessDenied { .. })
    }

    /// Text shown in the notification area
    pub fn user_message(&self) -> String {
        match self {
            CloudError::NotConfigured => {
                "Cloud storage is not configured. Set the service URL and key in Settings.".to_string()
            }
            CloudError::EmptyName => "Enter a name for the configuration.".to_string(),
            CloudError::AccessDenied { .. } => {
                "Access denied. The storage policy does not allow this operation; check the bucket and table policies.".to_string()
            }
            CloudError::Unreachable(_) => {
                "Cannot reach the cloud service. Check your network connection.".to_string()
            }
            CloudError::Rejected { status, message } => {
                format!("The cloud service rejected the request ({status}): {message}")
            }
            CloudError::MissingPublicUrl { .. } => {
                "Upload finished but no public link was returned.".to_string()
            }
            other => format!("Cloud operation failed: {other}"),
        }
    }
}

fn is_access_denied(status: u16, body: &str) -> bool {
    if status == 401 || status == 403 {
        return true;
    }
    if body.contains(PG_INSUFFICIENT_PRIVILEGE) {
        return true;
    }
    body.to_ascii_lowercase().contains("row-level security")
}

/// Pull a human message out of a JSON error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error", "msg"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_is_access_denied() {
        assert!(CloudError::from_response(403, "{}").is_access_denied());
        assert!(CloudError::from_response(401, "").is_access_denied());
    }

    #[test]
    fn test_rls_body_is_access_denied() {
        let body = r#"{"statusCode":"400","error":"Unauthorized","message":"new row violates row-level security policy"}"#;
        let err = CloudError::from_response(400, body);
        assert!(err.is_access_denied());
        assert!(err.to_string().contains("row-level security"));

        let pg = r#"{"code":"42501","message":"permission denied for table configurations"}"#;
        assert!(CloudError::from_response(400, pg).is_access_denied());
    }

    #[test]
    fn test_other_errors_rejected() {
        let err = CloudError::from_response(500, r#"{"message":"boom"}"#);
        match err {
            CloudError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_plain_text_body_kept() {
        let err = CloudError::from_response(502, " bad gateway \n");
        assert!(matches!(err, CloudError::Rejected { ref message, .. } if message == "bad gateway"));
    }

    #[test]
    fn test_user_messages() {
        assert!(CloudError::NotConfigured.user_message().contains("Settings"));
        let denied = CloudError::AccessDenied { message: "x".into() };
        assert!(denied.user_message().starts_with("Access denied"));
        assert!(CloudError::Unreachable("dns".into()).user_message().contains("network"));
    }
}
