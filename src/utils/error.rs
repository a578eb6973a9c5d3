use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No board source given")]
    MissingSource,

    #[error("Board extraction failed: {message}")]
    Extraction { message: String },

    #[error("Board title is missing or empty")]
    MissingTitle,

    #[error("Invalid vote count '{value}' on card '{message}'")]
    InvalidVotes { value: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Board snapshot error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Extraction,
    Data,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ExportError {
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingSource => ErrorCategory::Input,
            Self::Extraction { .. } | Self::Http(_) => ErrorCategory::Extraction,
            Self::MissingTitle | Self::InvalidVotes { .. } | Self::Json(_) => ErrorCategory::Data,
            Self::Io(_) => ErrorCategory::Output,
            Self::ConfigValidation { .. } | Self::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路問題通常重試即可
            Self::Http(e) if e.is_timeout() || e.is_connect() => ErrorSeverity::Medium,
            Self::Io(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingSource => "Pass the board URL as the first argument",
            Self::Extraction { .. } => {
                "Check that the URL points at a rendered board page and that the selectors match it"
            }
            Self::MissingTitle => "Check that the provided URL is correct",
            Self::InvalidVotes { .. } => {
                "Set format.on_invalid_votes = \"zero\" to count unreadable votes as zero"
            }
            Self::Io(_) => "Check that the output directory exists and is writable",
            Self::Http(_) => "Check the network connection and that the board is publicly shared",
            Self::Json(_) => "Check that the snapshot file is a board exported as JSON",
            Self::ConfigValidation { .. } | Self::InvalidConfigValue { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingSource => "Please provide a URL as the first argument.".to_string(),
            Self::MissingTitle => {
                "Board title does not exist. Please check if provided URL is correct.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// 依嚴重程度決定 process 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
