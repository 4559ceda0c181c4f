use crate::domain::model::Address;
use thiserror::Error;

/// Failures talking to the remote lookup service. History is never touched
/// when one of these is returned.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Lookup request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Lookup request timed out")]
    Timeout,

    #[error("Invalid lookup URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Lookup service returned HTTP {status}")]
    Status { status: u16 },

    #[error("Malformed lookup response: {reason}")]
    MalformedResponse { reason: String },
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else if err.is_decode() {
            LookupError::MalformedResponse {
                reason: err.to_string(),
            }
        } else {
            LookupError::Network(err)
        }
    }
}

/// Failures of the durable key-value store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {message}")]
    Backend { message: String },
}

#[derive(Error, Debug)]
pub enum CepError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Address resolved but history was not saved: {source}")]
    NotSaved {
        address: Address,
        #[source]
        source: PersistenceError,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Persistence,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CepError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CepError::Lookup(_) => ErrorCategory::Network,
            CepError::Persistence(_) | CepError::NotSaved { .. } => ErrorCategory::Persistence,
            CepError::ConfigError { .. }
            | CepError::ConfigValidationError { .. }
            | CepError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 地址已取得，只是沒有寫入歷史
            CepError::NotSaved { .. } => ErrorSeverity::Low,
            CepError::Lookup(_) => ErrorSeverity::Medium,
            CepError::Persistence(_) => ErrorSeverity::High,
            CepError::ConfigError { .. }
            | CepError::ConfigValidationError { .. }
            | CepError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CepError::Lookup(LookupError::Timeout) => {
                "The address service did not answer in time".to_string()
            }
            CepError::Lookup(LookupError::Status { status }) => {
                format!("The address service rejected the request (HTTP {})", status)
            }
            CepError::Lookup(_) => "Could not reach the address service".to_string(),
            CepError::Persistence(_) => "Could not access the local history".to_string(),
            CepError::NotSaved { .. } => {
                "Address found, but it could not be saved to the history".to_string()
            }
            CepError::ConfigError { message } => format!("Configuration problem: {}", message),
            CepError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            CepError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CepError::Lookup(LookupError::Timeout) => {
                "Retry later or raise --timeout-seconds"
            }
            CepError::Lookup(LookupError::Status { .. }) => {
                "Check the CEP format (8 digits, e.g. 01310-100)"
            }
            CepError::Lookup(_) => "Check your network connection and the API endpoint",
            CepError::Persistence(_) | CepError::NotSaved { .. } => {
                "Check that the storage path exists and is writable"
            }
            CepError::ConfigError { .. }
            | CepError::ConfigValidationError { .. }
            | CepError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CepError>;
