use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Authentication rejected by upstream API: {message}")]
    AuthError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Workflow task '{task}' failed: {details}")]
    WorkflowError { task: String, details: String },
}

/// 錯誤分類：配置錯誤重跑無效，上游錯誤交給排程器重試
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    Processing,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::AuthError { .. } => ErrorCategory::Upstream,
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::ValidationError { .. }
            | EtlError::WorkflowError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 上游錯誤交給外部排程器重試
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::AuthError { .. } => ErrorSeverity::High,
            // 配置錯誤重試也不會成功
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
            EtlError::IoError(_) => ErrorSeverity::High,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::ValidationError { .. }
            | EtlError::WorkflowError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity and upstream API status, then re-run the task".to_string()
            }
            EtlError::AuthError { .. } => {
                "Verify SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET / SPOTIFY_USER_TOKEN / TWITTER_BEARER_TOKEN and re-run".to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Set the {} environment variable before running", field)
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of {} and re-run", field)
            }
            EtlError::ConfigError { .. } => "Review the configuration and re-run".to_string(),
            EtlError::IoError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
            EtlError::ValidationError { .. } => {
                "Inspect the upstream data; the full run can be repeated safely".to_string()
            }
            EtlError::WorkflowError { .. } => {
                "Re-run the workflow; completed tasks overwrite their previous output".to_string()
            }
            _ => "Re-run the pipeline; runs are idempotent by overwrite".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Upstream => format!("Upstream API problem: {}", self),
            ErrorCategory::Processing => format!("Data processing problem: {}", self),
            ErrorCategory::Storage => format!("Storage problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
