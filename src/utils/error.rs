use thiserror::Error;

#[derive(Error, Debug)]
pub enum CupError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unexpected response from {endpoint}: HTTP {status}")]
    UnexpectedResponse { endpoint: String, status: u16 },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Group '{group}' needs {required} gameweeks but only {available} were selected")]
    InsufficientSlotsError {
        group: String,
        required: usize,
        available: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Tournament,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CupError {
    pub fn validation(message: impl Into<String>) -> Self {
        CupError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CupError::ApiError(_) | CupError::UnexpectedResponse { .. } => ErrorCategory::Network,
            CupError::CsvError(_) | CupError::SerializationError(_) => ErrorCategory::Data,
            CupError::ConfigValidationError { .. }
            | CupError::InvalidConfigValueError { .. }
            | CupError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CupError::ValidationError { .. } | CupError::InsufficientSlotsError { .. } => {
                ErrorCategory::Tournament
            }
            CupError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路問題通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration | ErrorCategory::Tournament => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CupError::ApiError(_) => {
                "Check your network connection and the FPL base URL, then retry".to_string()
            }
            CupError::UnexpectedResponse { status, .. } if *status == 404 => {
                "Check that the league id exists and is a classic league".to_string()
            }
            CupError::UnexpectedResponse { .. } => {
                "The FPL API may be updating between gameweeks; retry in a few minutes".to_string()
            }
            CupError::CsvError(_) | CupError::SerializationError(_) => {
                "Make sure the input file is valid JSON in the expected shape".to_string()
            }
            CupError::ConfigValidationError { field, .. }
            | CupError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' entry in your configuration file", field)
            }
            CupError::MissingConfigError { field } => {
                format!("Add '{}' to your configuration file", field)
            }
            CupError::ValidationError { .. } => {
                "Make sure every participant is assigned to exactly one declared group".to_string()
            }
            CupError::InsufficientSlotsError { required, .. } => {
                format!("Select at least {} gameweeks in [tournament].gameweeks", required)
            }
            CupError::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the data source: {}", self),
            ErrorCategory::Data => format!("Could not read tournament data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Tournament => format!("Cannot build the tournament: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CupError>;
