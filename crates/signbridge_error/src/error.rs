//! Top-level error wrapper types.

use crate::{ConfigError, GenerationError, ModelError, ServerError};

/// Every error condition a Signbridge operation can produce.
///
/// # Examples
///
/// ```
/// use signbridge_error::{ConfigError, SignbridgeError};
///
/// let config_err = ConfigError::new("Missing field");
/// let err: SignbridgeError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum SignbridgeErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Keyword-to-sentence generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Classifier error
    #[from(ModelError)]
    Model(ModelError),
    /// HTTP listener error
    #[from(ServerError)]
    Server(ServerError),
}

/// Signbridge error with kind discrimination.
///
/// # Examples
///
/// ```
/// use signbridge_error::{ConfigError, SignbridgeResult};
///
/// fn might_fail() -> SignbridgeResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Signbridge Error: {}", _0)]
pub struct SignbridgeError(Box<SignbridgeErrorKind>);

impl SignbridgeError {
    /// Create a new error from a kind.
    pub fn new(kind: SignbridgeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SignbridgeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to SignbridgeErrorKind
impl<T> From<T> for SignbridgeError
where
    T: Into<SignbridgeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Signbridge operations.
pub type SignbridgeResult<T> = std::result::Result<T, SignbridgeError>;
