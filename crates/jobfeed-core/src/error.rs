use thiserror::Error;

/// Reasons a [`Vacancy`](crate::Vacancy) cannot be constructed.
///
/// Each variant corresponds to exactly one field rule, so callers can tell
/// which field of a raw record was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title was empty or only whitespace.
    #[error("Vacancy title must be a non-empty string")]
    EmptyTitle,

    /// URL was empty or only whitespace.
    #[error("Vacancy URL must be a non-empty string")]
    EmptyUrl,

    /// URL does not begin with `http`.
    #[error("Vacancy URL must start with 'http': {0}")]
    InvalidUrl(String),

    /// A salary bound was negative.
    #[error("Salary {field} must be a non-negative integer, got {value}")]
    NegativeSalary { field: &'static str, value: i64 },

    /// A salary bound in a JSON record was not an integer.
    #[error("Salary {field} must be an integer or null, got {value}")]
    NonIntegerSalary { field: &'static str, value: String },

    /// A text field in a JSON record was present but not a string.
    #[error("Field {0} must be a string")]
    NotAString(&'static str),

    /// Description was empty or only whitespace.
    #[error("Vacancy description must be a non-empty string")]
    EmptyDescription,
}

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur in Jobfeed.
/// It uses the `thiserror` crate for ergonomic error handling and automatic
/// conversion from underlying library errors.
///
/// # Error Conversion
///
/// Most errors automatically convert from their source types using the `#[from]` attribute:
/// - `ValidationError` → `AppError::Validation`
/// - `std::io::Error` → `AppError::Io`
/// - `serde_json::Error` → `AppError::SerializationError`
///
/// # Examples
///
/// ```
/// use jobfeed_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::Generic("Something went wrong".to_string()))
/// }
///
/// assert!(example().is_err());
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// A vacancy failed field validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Transport-level failure reaching the listing service.
    ///
    /// DNS failures, refused connections and broken bodies end up here.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The listing service answered with a non-success status.
    #[error("API error: HTTP {status} {reason}")]
    ApiError { status: u16, reason: String },

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Filesystem failure other than a missing backing file.
    ///
    /// Missing or unparseable store files are not errors; see
    /// `jobfeed_store::ReadStatus`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A configured URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A store file name was empty or contained path components.
    #[error("Invalid store name: {0}")]
    InvalidStoreName(String),

    /// The configuration file exists but could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ConnectionError(msg) => {
                format!(
                    "Cannot reach the vacancies API: {}\n   Check your internet connection.",
                    msg
                )
            }
            AppError::ApiError { status, reason } => match *status {
                400 => format!(
                    "The vacancies API rejected the request ({}).\n   Try a different keyword or fewer pages.",
                    reason
                ),
                403 => "Access to the vacancies API was denied (HTTP 403).".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                s if s >= 500 => format!(
                    "The vacancies API is unavailable (HTTP {} {}).\n   Try again later.",
                    s, reason
                ),
                _ => format!("API error: HTTP {} {}", status, reason),
            },
            AppError::Timeout(secs) => {
                format!(
                    "Request timed out after {} seconds.\n   The server may be overloaded. Try again later.",
                    secs
                )
            }
            AppError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied: {}\n   Check the data directory permissions.", e)
            }
            AppError::InvalidStoreName(name) => {
                format!(
                    "Invalid file name: {:?}\n   Example: vacancies.json",
                    name
                )
            }
            _ => self.to_string(),
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// # Examples
    ///
    /// ```
    /// use jobfeed_core::error::AppError;
    ///
    /// let err = AppError::ConnectionError("connection reset".to_string());
    /// assert!(err.is_retryable());
    ///
    /// let err = AppError::ApiError { status: 503, reason: "Service Unavailable".into() };
    /// assert!(err.is_retryable());
    ///
    /// let err = AppError::ApiError { status: 404, reason: "Not Found".into() };
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::ConnectionError(_) | AppError::Timeout(_) => true,
            AppError::ApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
