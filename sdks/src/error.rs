// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Error taxonomy shared by every remote operation.

/// Errors that can occur while talking to the Ernest API.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// No response was obtained (DNS, refused connection, timeout, broken body).
    #[error("Connection error: {0}")]
    Connection(String),

    /// 401 or 403: credentials missing, expired or insufficient.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// 404 on the requested path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-2xx response. `message` is the raw response body.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body does not have the expected shape.
    #[error("Invalid response: {0}")]
    Protocol(String),

    /// The request could not be built from the caller's input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ManagerError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, body: String, path: &str) -> Self {
        match status {
            401 | 403 => {
                if body.trim().is_empty() {
                    ManagerError::Auth(format!("HTTP {}", status))
                } else {
                    ManagerError::Auth(body)
                }
            }
            404 => ManagerError::NotFound(path.to_string()),
            _ => ManagerError::Api {
                status,
                message: body,
            },
        }
    }
}

/// Return the body of a 2xx response, or the classified error for anything else.
pub(crate) fn check_status(status: u16, body: String, path: &str) -> Result<String, ManagerError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(ManagerError::from_status(status, body, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses() {
        assert!(matches!(
            ManagerError::from_status(401, "expired".into(), "/services/"),
            ManagerError::Auth(msg) if msg == "expired"
        ));
        assert!(matches!(
            ManagerError::from_status(403, String::new(), "/session/"),
            ManagerError::Auth(msg) if msg == "HTTP 403"
        ));
    }

    #[test]
    fn test_not_found_carries_path() {
        let err = ManagerError::from_status(404, "nope".into(), "/services/foo");
        assert!(matches!(err, ManagerError::NotFound(path) if path == "/services/foo"));
    }

    #[test]
    fn test_other_status_is_api_error_with_raw_body() {
        let err = ManagerError::from_status(422, "{\"error\":\"bad name\"}".into(), "/services/");
        assert_eq!(err.to_string(), "{\"error\":\"bad name\"}");
        assert!(matches!(err, ManagerError::Api { status: 422, .. }));
    }

    #[test]
    fn test_check_status_passes_success_through() {
        assert_eq!(check_status(204, String::new(), "/").unwrap(), "");
        assert!(check_status(500, "boom".into(), "/").is_err());
    }
}
