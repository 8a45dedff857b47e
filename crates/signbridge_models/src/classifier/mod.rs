//! Landmark classifier capability.

mod linear;

pub use linear::LinearClassifier;

use signbridge_error::ModelError;

/// Label predicted for one feature vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub struct Prediction(
    /// Label text
    pub String,
);

impl Prediction {
    /// Label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A pretrained model that maps a landmark feature vector to a label.
///
/// Implementations are loaded once at startup and shared read-only across
/// requests.
pub trait Classifier: Send + Sync {
    /// Predict the label for `features`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` for an empty vector and `DimensionMismatch` when
    /// its length differs from [`input_dim`](Classifier::input_dim).
    fn predict(&self, features: &[f64]) -> Result<Prediction, ModelError>;

    /// Number of features the model expects.
    fn input_dim(&self) -> usize;
}
