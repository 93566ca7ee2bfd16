use std::time::Duration;

use campvue_core::query::ParameterError;
use campvue_core::ridb::ValidationError;

#[derive(thiserror::Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("RIDB did not respond within {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("RIDB API responded with {status} {status_text}")]
    Remote { status: u16, status_text: String },

    #[error("{0}")]
    MalformedResponse(String),

    #[error("RIDB payload failed validation: {0}")]
    SchemaViolation(String),

    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to reach RIDB: {0}")]
    Transport(String),

    #[error("Server misconfigured: {0}")]
    Config(String),
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        match err {
            missing @ ValidationError::MissingField(_) => Error::MalformedResponse(missing.to_string()),
            ValidationError::Shape(details) => Error::SchemaViolation(details),
        }
    }
}

impl Error {
    /// Short machine-readable name of the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Generic(_) => "generic",
            Error::Timeout(_) => "timeout",
            Error::Remote { .. } => "remote",
            Error::MalformedResponse(_) => "malformed_response",
            Error::SchemaViolation(_) => "schema_violation",
            Error::InvalidParameter(_) => "invalid_parameter",
            Error::NotFound(_) => "not_found",
            Error::Transport(_) => "transport",
            Error::Config(_) => "config",
        }
    }

    /// Whether the caller, rather than RIDB or this process, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidParameter(_) | Error::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_message() {
        let err = Error::Remote {
            status: 503,
            status_text: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "RIDB API responded with 503 Service Unavailable");
        assert_eq!(err.kind(), "remote");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_validation_errors_map_to_taxonomy() {
        let missing: Error = ValidationError::MissingField("FacilityID").into();
        assert_eq!(missing.kind(), "malformed_response");
        assert_eq!(
            missing.to_string(),
            "Incomplete or malformed RIDB response (missing FacilityID)"
        );

        let shape: Error = ValidationError::Shape("expected an object".to_string()).into();
        assert_eq!(shape.kind(), "schema_violation");
    }

    #[test]
    fn test_parameter_errors_are_transparent() {
        let err: Error = ParameterError::Offset.into();
        assert_eq!(
            err.to_string(),
            "Invalid 'offset' query parameter. Must be a non-negative integer."
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_timeout_message() {
        let err = Error::Timeout(Duration::from_secs(12));
        assert_eq!(err.to_string(), "RIDB did not respond within 12000ms");
    }
}
