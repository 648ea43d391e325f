use crate::core::validation::ValidationError;
use thiserror::Error;

/// Why a single metadata provider was skipped.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx HTTP status
    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// Body was not the JSON the provider speaks
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Provider answered but reported a failure code of its own
    #[error("rejected: {0}")]
    Rejected(String),
}

/// One failed entry in the provider chain.
#[derive(Debug)]
pub struct ProviderAttempt {
    pub provider: String,
    pub failure: ProviderFailure,
}

impl std::fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider, self.failure)
    }
}

/// Centralized error types for the application
///
/// The first four variants form the user-facing taxonomy; the remaining ones
/// wrap plumbing errors so `?` works across layers.
#[derive(Error, Debug)]
pub enum AppError {
    /// User input does not look like a supported TikTok/YouTube link
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Every configured metadata source failed
    #[error("All metadata sources failed: {}", format_attempts(.attempts))]
    Upstream { attempts: Vec<ProviderAttempt> },

    /// A source answered but gave no usable media link
    #[error("No usable media: {0}")]
    EmptyResult(String),

    /// Every automated download strategy failed
    #[error("Download blocked: {0}")]
    DownloadBlocked(String),

    /// HTTP/Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

fn format_attempts(attempts: &[ProviderAttempt]) -> String {
    if attempts.is_empty() {
        return "no sources configured".to_string();
    }
    attempts.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl AppError {
    /// The single message shown to the user at the workflow boundary.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidUrl(msg) => format!("❌ {}", msg),
            AppError::Upstream { .. } => "❌ Failed to fetch video data. Please try again in a moment.".to_string(),
            AppError::EmptyResult(_) => "❌ Content unavailable: no downloadable media was found.".to_string(),
            AppError::DownloadBlocked(_) => {
                "📥 Automatic download was blocked. Follow the instructions to save the file.".to_string()
            }
            AppError::Http(_) | AppError::Io(_) | AppError::Json(_) | AppError::Url(_) => {
                "❌ Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Short category name for logs.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::InvalidUrl(_) => "invalid_url",
            AppError::Upstream { .. } => "upstream",
            AppError::EmptyResult(_) => "empty_result",
            AppError::DownloadBlocked(_) => "download_blocked",
            AppError::Http(_) => "http",
            AppError::Io(_) => "io",
            AppError::Json(_) => "json",
            AppError::Url(_) => "url",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidUrl(err.to_string())
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
