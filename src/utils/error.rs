use thiserror::Error;

#[derive(Error, Debug)]
pub enum StonewalkerError {
    #[error("{0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{message}")]
    ApiError { status: u16, message: String },

    #[error("Health check failed")]
    HealthCheckError { status: u16 },

    #[error("SSE connection failed")]
    StreamError { reason: String },

    #[error("Timed out waiting for {what} after {elapsed_ms}ms")]
    TimeoutError { what: String, elapsed_ms: u64 },

    #[error("Invalid input: {message}")]
    InvalidInputError { message: String },

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 命令列結束碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl StonewalkerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::StreamError { .. } | Self::TimeoutError { .. } => {
                ErrorCategory::Network
            }
            Self::ApiError { .. } | Self::HealthCheckError { .. } | Self::SerializationError(_) => {
                ErrorCategory::Backend
            }
            Self::InvalidInputError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Backend => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(e) if e.is_connect() => {
                "Could not reach the Stonewalker backend".to_string()
            }
            Self::HttpError(e) if e.is_timeout() => "The Stonewalker took too long to answer".to_string(),
            Self::ApiError { status, message } => format!("Backend returned {}: {}", status, message),
            Self::InvalidInputError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the backend is running and the API base URL is correct",
            ErrorCategory::Backend => "Retry the query; run /health to inspect backend dependencies",
            ErrorCategory::Input => "Shorten or rephrase the query",
            ErrorCategory::Configuration => "Fix the configuration file, flags or environment variables",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, StonewalkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_backend_message() {
        let err = StonewalkerError::ApiError {
            status: 500,
            message: "Search failed".to_string(),
        };
        assert_eq!(err.to_string(), "Search failed");
        assert_eq!(err.category(), ErrorCategory::Backend);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = StonewalkerError::MissingConfigError {
            field: "api.base_url".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("configuration"));
    }

    #[test]
    fn test_exit_code_follows_severity() {
        let input = StonewalkerError::InvalidInputError {
            message: "too long".to_string(),
        };
        let backend = StonewalkerError::HealthCheckError { status: 503 };
        let config = StonewalkerError::ConfigError {
            message: "bad toml".to_string(),
        };
        let io = StonewalkerError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));

        assert_eq!(input.severity().exit_code(), 0);
        assert_eq!(backend.severity().exit_code(), 2);
        assert_eq!(config.severity().exit_code(), 1);
        assert_eq!(io.severity().exit_code(), 3);
    }
}
