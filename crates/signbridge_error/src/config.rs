//! Configuration error types.

/// Configuration error with source location.
///
/// `key` names the offending setting when one can be identified
/// (for example `retry.max_retries` or `API_KEY`).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {}{} at line {} in {}", message, key_suffix(key), line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Setting the error refers to, if known
    pub key: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

fn key_suffix(key: &Option<String>) -> String {
    key.as_ref()
        .map(|k| format!(" (setting: {})", k))
        .unwrap_or_default()
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use signbridge_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to parse signbridge.toml");
    /// assert!(err.key.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a ConfigError tied to a specific setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use signbridge_error::ConfigError;
    ///
    /// let err = ConfigError::for_key("retry.max_retries", "must be at least 1");
    /// assert!(format!("{}", err).contains("retry.max_retries"));
    /// ```
    #[track_caller]
    pub fn for_key(key: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: Some(key.into()),
            line: location.line(),
            file: location.file(),
        }
    }
}
