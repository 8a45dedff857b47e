//! Classifier model errors.

/// Error conditions for loading and running the landmark classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ModelErrorKind {
    /// Model artifact could not be read
    #[display("Failed to load model: {}", _0)]
    Load(String),
    /// Model artifact or its output is inconsistent
    #[display("Malformed model: {}", _0)]
    Malformed(String),
    /// Input vector length does not match the model
    #[display("X has {} features, but the model is expecting {} features as input", actual, expected)]
    DimensionMismatch {
        /// Features the model was trained on
        expected: usize,
        /// Features supplied
        actual: usize,
    },
    /// Input vector was empty
    #[display("Input feature vector is empty")]
    EmptyInput,
}

/// Model error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Model Error: {} at line {} in {}", kind, line, file)]
pub struct ModelError {
    /// The kind of error that occurred
    pub kind: ModelErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ModelError {
    /// Create a new ModelError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ModelErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ModelErrorKind {
        &self.kind
    }
}
