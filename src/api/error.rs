use thiserror::Error;

/// Status reported when a request failed before any response arrived
pub const FALLBACK_STATUS: u16 = 500;

/// Everything that can go wrong while talking to the photo API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP error, timeout, connection failure or an unreadable body
    #[error("{message} (status {status})")]
    NetworkFailure { status: u16, message: String },

    /// The photo identifier is missing, non-numeric or zero
    #[error("Invalid photo ID")]
    InvalidId,

    /// The query worked but matched nothing
    #[error("No photos found for \"{query}\"")]
    EmptyResult { query: String },
}

impl ApiError {
    pub fn network(status: u16, message: impl Into<String>) -> Self {
        ApiError::NetworkFailure {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any
    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NetworkFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short text for the error state shown in the UI
    pub fn to_user_message(&self) -> String {
        match self {
            ApiError::NetworkFailure { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16()).unwrap_or(FALLBACK_STATUS);
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Could not reach the photo service".to_string()
        } else {
            err.to_string()
        };
        ApiError::NetworkFailure { status, message }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::NetworkFailure {
            status: FALLBACK_STATUS,
            message: format!("Unexpected response from the photo service: {err}"),
        }
    }
}
