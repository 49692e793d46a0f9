use thiserror::Error;

/// Unified error type for the plugtrack library
///
/// Nothing on the event or query path of the tracker returns this type; it
/// covers the fallible edges around it (configuration, descriptor decoding,
/// location parsing).
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// A descriptor that cannot describe an operation
    #[error("Invalid operation descriptor: {message}")]
    InvalidDescriptor { message: String },

    /// A script plugin location that is not a valid URI
    #[error("Invalid plugin location: {location}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    /// IO errors
    #[error("IO operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization errors
    #[error("Serialization failed: {format}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TrackerError {
    /// Create a configuration error naming the offending field
    pub fn configuration_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Configuration {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn invalid_descriptor<S: Into<String>>(message: S) -> Self {
        Self::InvalidDescriptor {
            message: message.into(),
        }
    }

    pub fn invalid_location<S: Into<String>>(location: S, source: url::ParseError) -> Self {
        Self::InvalidLocation {
            location: location.into(),
            source,
        }
    }

    /// Create an IO error
    pub fn io<S: Into<String>>(operation: S, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        format: S,
        source: E,
    ) -> Self {
        Self::Serialization {
            format: format.into(),
            source: Box::new(source),
        }
    }

    /// Name of the field a configuration error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Configuration { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("json", err)
    }
}

impl From<serde_yaml::Error> for TrackerError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization("yaml", err)
    }
}

/// Result type alias for plugtrack operations
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackerError::configuration_field("must be a power of two", "shard_amount");
        assert_eq!(err.to_string(), "Configuration error: must be a power of two");
        assert_eq!(err.field(), Some("shard_amount"));
    }

    #[test]
    fn test_invalid_location_keeps_source() {
        let parse_err = url::Url::parse("not a uri").unwrap_err();
        let err = TrackerError::invalid_location("not a uri", parse_err);

        assert!(err.to_string().contains("not a uri"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TrackerError = json_err.into();
        match err {
            TrackerError::Serialization { format, .. } => assert_eq!(format, "json"),
            other => panic!("Expected Serialization error, got {:?}", other),
        }
    }
}
