use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{service} API returned {status}: {body}")]
    ApiStatusError {
        service: String,
        status: u16,
        body: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Configuration,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LeadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LeadError::ApiError(_) => ErrorCategory::Network,
            LeadError::ApiStatusError { .. } => ErrorCategory::Api,
            LeadError::ConfigError { .. }
            | LeadError::MissingConfigError { .. }
            | LeadError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            LeadError::IoError(_) => ErrorCategory::Io,
            LeadError::CsvError(_)
            | LeadError::SerializationError(_)
            | LeadError::ProcessingError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路與 API 錯誤通常重跑即可
            ErrorCategory::Network | ErrorCategory::Api => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LeadError::ApiError(_) => {
                "Check network connectivity and the API base URL, then retry".to_string()
            }
            LeadError::ApiStatusError { status: 401, service, .. }
            | LeadError::ApiStatusError { status: 403, service, .. } => {
                format!("Check the {} API key", service)
            }
            LeadError::ApiStatusError { status: 429, .. } => {
                "Rate limited: wait a moment or raise rate_limit_delay_ms".to_string()
            }
            LeadError::ApiStatusError { .. } => {
                "Inspect the response body; the request payload may be rejected".to_string()
            }
            LeadError::MissingConfigError { field } => {
                format!("Set {} in the config file or environment", field)
            }
            LeadError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of {}", field)
            }
            LeadError::ConfigError { .. } => "Review the configuration file".to_string(),
            LeadError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            LeadError::CsvError(_) | LeadError::SerializationError(_) => {
                "The input data could not be encoded; run with --verbose for details".to_string()
            }
            LeadError::ProcessingError { .. } => "Run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the remote API: {}", self),
            ErrorCategory::Api => format!("The remote API rejected the request: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("Could not read or write a file: {}", self),
            ErrorCategory::Data => format!("Could not process the data: {}", self),
        }
    }

    /// 程式結束碼，依嚴重程度決定
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, LeadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failures_are_critical() {
        let err = LeadError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_auth_failure_suggests_checking_key() {
        let err = LeadError::ApiStatusError {
            service: "DiscoLike".to_string(),
            status: 401,
            body: String::new(),
        };
        assert_eq!(err.category(), ErrorCategory::Api);
        assert_eq!(err.exit_code(), 2);
        assert!(err.recovery_suggestion().contains("DiscoLike"));
    }

    #[test]
    fn test_config_errors_exit_with_one() {
        let err = LeadError::MissingConfigError {
            field: "discovery.api_key".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().starts_with("Configuration problem"));
    }
}
