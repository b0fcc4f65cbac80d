use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecGroupError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}: {body}")]
    UnexpectedStatus {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SecGroupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SecGroupError::ApiError(_) => ErrorCategory::Network,
            SecGroupError::UnexpectedStatus { .. } => ErrorCategory::Api,
            SecGroupError::SerializationError(_) => ErrorCategory::Data,
            SecGroupError::IoError(_) => ErrorCategory::System,
            SecGroupError::UrlError(_)
            | SecGroupError::ConfigValidationError { .. }
            | SecGroupError::InvalidConfigValueError { .. }
            | SecGroupError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 連線問題或伺服器端 5xx 通常可以重跑
            SecGroupError::ApiError(_) => ErrorSeverity::Medium,
            SecGroupError::UnexpectedStatus { status, .. } if *status >= 500 => {
                ErrorSeverity::Medium
            }
            SecGroupError::UnexpectedStatus { .. } => ErrorSeverity::High,
            SecGroupError::SerializationError(_) => ErrorSeverity::High,
            SecGroupError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SecGroupError::ApiError(_) => {
                "Check that the API endpoint is reachable and try again".to_string()
            }
            SecGroupError::UnexpectedStatus { status: 401, .. }
            | SecGroupError::UnexpectedStatus { status: 403, .. } => {
                "Check that the access token is valid and may manage security groups".to_string()
            }
            SecGroupError::UnexpectedStatus { status, .. } if *status >= 500 => {
                "The API server reported an internal error; retry later".to_string()
            }
            SecGroupError::UnexpectedStatus { .. } => {
                "Inspect the response body for details about the rejected request".to_string()
            }
            SecGroupError::SerializationError(_) => {
                "The API returned an unexpected payload; verify the endpoint is a v2 API".to_string()
            }
            SecGroupError::IoError(_) => "Check file paths and permissions".to_string(),
            SecGroupError::UrlError(_) => "Use a full http(s) URL for the API endpoint".to_string(),
            SecGroupError::ConfigValidationError { .. }
            | SecGroupError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            SecGroupError::MissingConfigError { field } => {
                format!("Provide a value for '{}' via flag, environment or config file", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SecGroupError::ApiError(e) if e.is_timeout() => {
                "The API request timed out".to_string()
            }
            SecGroupError::ApiError(e) if e.is_connect() => {
                "Could not connect to the API endpoint".to_string()
            }
            SecGroupError::UnexpectedStatus {
                method,
                url,
                status,
                ..
            } => format!("{} {} failed with HTTP status {}", method, url, status),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SecGroupError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16) -> SecGroupError {
        SecGroupError::UnexpectedStatus {
            method: "PUT".to_string(),
            url: "https://api.example.com/v2/security_groups/abc".to_string(),
            status,
            body: "{}".to_string(),
        }
    }

    #[test]
    fn test_server_errors_are_retryable() {
        assert_eq!(status_error(502).severity(), ErrorSeverity::Medium);
        assert_eq!(status_error(400).severity(), ErrorSeverity::High);
        assert_eq!(status_error(502).category(), ErrorCategory::Api);
    }

    #[test]
    fn test_auth_failures_point_at_the_token() {
        assert!(status_error(401).recovery_suggestion().contains("access token"));
    }

    #[test]
    fn test_missing_config_names_the_field() {
        let err = SecGroupError::MissingConfigError {
            field: "address".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.recovery_suggestion().contains("address"));
    }
}
