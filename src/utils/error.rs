use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Record store returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lookup,
    Network,
    RecordStore,
    Configuration,
    Validation,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// CLI 結束碼：Low 0、Medium 2、High 1、Critical 3
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl DirectoryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DirectoryError::NotFound { .. } => ErrorCategory::Lookup,
            DirectoryError::NetworkError(_) => ErrorCategory::Network,
            DirectoryError::ApiError { .. } => ErrorCategory::RecordStore,
            DirectoryError::ConfigError { .. }
            | DirectoryError::MissingConfigError { .. }
            | DirectoryError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DirectoryError::ValidationError { .. } => ErrorCategory::Validation,
            DirectoryError::CsvError(_)
            | DirectoryError::IoError(_)
            | DirectoryError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 找不到資料只會讓畫面變空，不算失敗
            ErrorCategory::Lookup => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::RecordStore | ErrorCategory::Validation | ErrorCategory::Output => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DirectoryError::NotFound { collection, id } => {
                format!("No record '{}' exists in '{}'", id, collection)
            }
            DirectoryError::NetworkError(_) => {
                "Could not reach the record store, loading failed".to_string()
            }
            DirectoryError::ApiError { status, message } => {
                format!("The record store rejected the request ({}): {}", status, message)
            }
            DirectoryError::ValidationError { message } => message.clone(),
            DirectoryError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            DirectoryError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Lookup => "Check the record id, it may have been deleted",
            ErrorCategory::Network => "Check your network connection and try again",
            ErrorCategory::RecordStore => {
                "Verify the API key has access to the base and the collection name is correct"
            }
            ErrorCategory::Configuration => {
                "Set RESOURCES_API_KEY and RESOURCES_BASE_ID or pass --config with a valid TOML file"
            }
            ErrorCategory::Validation => "Fill in every required field",
            ErrorCategory::Output => "Check the output destination and fixture files",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_low_severity() {
        let err = DirectoryError::NotFound {
            collection: "services".to_string(),
            id: "rec1".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.to_string(), "Record not found: services/rec1");
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = DirectoryError::MissingConfigError {
            field: "store.api_key".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("store.api_key"));
        assert_eq!(err.severity().exit_code(), 3);
    }

    #[test]
    fn test_exit_codes_by_severity() {
        let api = DirectoryError::ApiError {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(api.severity().exit_code(), 1);
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
        assert_eq!(ErrorSeverity::Low.exit_code(), 0);
    }
}
