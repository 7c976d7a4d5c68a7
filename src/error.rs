use thiserror::Error;

/// Main error type for catalog resolution
#[derive(Error, Debug)]
pub enum CatalogError {
    // Resolution errors
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unsupported space: {0}")]
    UnsupportedSpace(String),

    #[error("Lookup failure: no {what} registered for backend `{backend}`")]
    LookupFailure { what: &'static str, backend: String },

    // Settings errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Result type alias for CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failure_message() {
        let err = CatalogError::LookupFailure {
            what: "action distribution",
            backend: "wgpu".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Lookup failure: no action distribution registered for backend `wgpu`"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let err: CatalogError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CatalogError::Json(_)));
    }
}
