//! Transport and server error types
//!
//! Local validation failures live in [`crate::conservation::Violation`]; this
//! module covers everything that can go wrong once a request leaves the
//! process, plus the field-error map the backend returns on a 422.

use std::collections::BTreeMap;
use thiserror::Error;

/// Field validation errors in the Laravel response format
///
/// ```json
/// {
///     "message": "The given data was invalid.",
///     "errors": {
///         "stok_manual": ["The stok manual must be at least 1."]
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Field name to its messages, in field order
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error for a specific field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message for the first failing field
    pub fn first(&self) -> Option<(&str, &str)> {
        self.errors.iter().find_map(|(field, messages)| {
            messages
                .first()
                .map(|message| (field.as_str(), message.as_str()))
        })
    }

    /// Convert from the validator crate's errors
    pub fn from_validator(errors: validator::ValidationErrors) -> Self {
        let mut result = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, error.code));
                result.add(field.to_string(), message);
            }
        }
        result
    }

    /// Build from the `errors` object of a 422 body
    pub fn from_map(map: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let mut result = Self::new();
        for (field, messages) in map {
            for message in messages {
                result.add(field.clone(), message);
            }
        }
        result
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// How a failed request should be presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lock or deadlock on the backend; the same request may succeed shortly
    Contention,
    /// The record changed underneath the draft; reload before retrying
    Conflict,
    Unauthorized,
    /// The backend rejected specific fields
    Validation,
    /// The request never got a response
    Network,
    /// A success response that could not be understood
    Decode,
    Generic,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contention => "contention",
            Self::Conflict => "conflict",
            Self::Unauthorized => "unauthorized",
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Decode => "decode",
            Self::Generic => "generic",
        }
    }
}

/// Phrases the backend uses when a row lock could not be taken
const CONTENTION_MARKERS: &[&str] = &[
    "deadlock",
    "lock wait timeout",
    "could not obtain lock",
    "serialization failure",
    "try again",
    "coba lagi",
];

/// Client-side API error
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Non-2xx response; `message` is the backend's `message` field when it
    /// sent one, otherwise the raw body
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// 422 with per-field errors
    #[error("{message}")]
    Validation {
        message: String,
        errors: ValidationErrors,
    },

    #[error("request timed out")]
    Timeout,

    #[error("network: {0}")]
    Network(String),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// HTTP status, when the backend answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Validation { .. } => Some(422),
            _ => None,
        }
    }

    /// Message suitable for showing verbatim
    pub fn message(&self) -> String {
        match self {
            Self::Server { message, .. } | Self::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Server { status, message } => {
                let lowered = message.to_lowercase();
                if matches!(status, 423 | 429 | 503)
                    || CONTENTION_MARKERS.iter().any(|m| lowered.contains(m))
                {
                    ErrorKind::Contention
                } else if matches!(status, 409 | 412) {
                    ErrorKind::Conflict
                } else if matches!(status, 401 | 403) {
                    ErrorKind::Unauthorized
                } else {
                    ErrorKind::Generic
                }
            }
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Timeout | Self::Network(_) => ErrorKind::Network,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use validator::Validate;

    #[test]
    fn test_lock_responses_are_contention() {
        assert_eq!(ApiError::server(423, "Locked").kind(), ErrorKind::Contention);
        assert_eq!(ApiError::server(503, "busy").kind(), ErrorKind::Contention);
        assert_eq!(
            ApiError::server(500, "SQLSTATE[40001]: Deadlock found when trying to get lock").kind(),
            ErrorKind::Contention
        );
        assert_eq!(
            ApiError::server(500, "Lock wait timeout exceeded").kind(),
            ErrorKind::Contention
        );
    }

    #[test]
    fn test_conflict_and_generic() {
        assert_eq!(ApiError::server(409, "Data sudah berubah").kind(), ErrorKind::Conflict);
        assert_eq!(ApiError::server(500, "Server Error").kind(), ErrorKind::Generic);
        assert_eq!(ApiError::server(404, "Produksi tidak ditemukan").kind(), ErrorKind::Generic);
        assert_eq!(ApiError::server(401, "Unauthenticated.").kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_transport_errors() {
        assert_eq!(ApiError::Timeout.kind(), ErrorKind::Network);
        assert_eq!(ApiError::Network("refused".into()).status_code(), None);
        assert_eq!(ApiError::decode("bad body").kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_message_is_verbatim() {
        let err = ApiError::server(500, "Stok bahan tidak mencukupi");
        assert_eq!(err.message(), "Stok bahan tidak mencukupi");
        assert_eq!(err.to_string(), "HTTP 500: Stok bahan tidak mencukupi");
    }

    #[test]
    fn test_validation_errors_map() {
        let errors = ValidationErrors::from_map([
            ("stok_manual".to_string(), vec!["must be at least 1".to_string()]),
            ("detail_produksi".to_string(), vec!["is required".to_string()]),
        ]);

        assert_eq!(errors.first(), Some(("detail_produksi", "is required")));
        assert_eq!(
            errors.to_string(),
            "detail_produksi: is required; stok_manual: must be at least 1"
        );
    }

    #[derive(Validate)]
    struct Counter {
        #[validate(range(min = 1, message = "too small"))]
        count: u32,
    }

    #[test]
    fn test_from_validator() {
        let err = Counter { count: 0 }.validate().unwrap_err();
        let errors = ValidationErrors::from_validator(err);
        assert_eq!(errors.first(), Some(("count", "too small")));
    }
}
