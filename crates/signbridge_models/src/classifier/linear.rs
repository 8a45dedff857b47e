//! Linear classifier loaded from a JSON artifact.
//!
//! Artifact layout:
//!
//! ```json
//! {"classes": ["A", "B", "C"],
//!  "weights": [[...], [...], [...]],
//!  "intercepts": [0.1, -0.2, 0.0]}
//! ```
//!
//! `coefficients` is accepted as an alias for `weights`. A two-class model may
//! carry a single weight row, in which case a positive decision score selects
//! the second class.

use super::{Classifier, Prediction};
use serde::Deserialize;
use serde_json::Value;
use signbridge_error::{ModelError, ModelErrorKind};
use std::path::Path;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct Artifact {
    classes: Vec<Value>,
    #[serde(alias = "coefficients")]
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

/// Multinomial linear model: the predicted class maximizes `w·x + b`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearClassifier {
    classes: Vec<String>,
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    input_dim: usize,
}

impl LinearClassifier {
    /// Load a model artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns `Load` if the file cannot be read and `Malformed` if its
    /// contents are not a consistent model.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ModelError::new(ModelErrorKind::Load(format!("{}: {}", path.display(), e)))
        })?;
        let model = Self::from_json(&raw)?;
        debug!(
            classes = model.classes.len(),
            input_dim = model.input_dim,
            "Loaded classifier"
        );
        Ok(model)
    }

    /// Parse a model artifact from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` on invalid JSON or inconsistent dimensions.
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let artifact: Artifact = serde_json::from_str(raw)
            .map_err(|e| ModelError::new(ModelErrorKind::Malformed(e.to_string())))?;
        Self::from_parts(
            artifact
                .classes
                .into_iter()
                .map(label_text)
                .collect::<Result<Vec<_>, _>>()?,
            artifact.weights,
            artifact.intercepts,
        )
    }

    /// Build a model from its parameters.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` when the classes, weight rows and intercepts do
    /// not line up.
    pub fn from_parts(
        classes: Vec<String>,
        weights: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> Result<Self, ModelError> {
        let malformed = |msg: String| ModelError::new(ModelErrorKind::Malformed(msg));

        if classes.len() < 2 {
            return Err(malformed(format!(
                "need at least 2 classes, got {}",
                classes.len()
            )));
        }
        let binary = classes.len() == 2 && weights.len() == 1;
        if !binary && weights.len() != classes.len() {
            return Err(malformed(format!(
                "{} weight rows for {} classes",
                weights.len(),
                classes.len()
            )));
        }
        if intercepts.len() != weights.len() {
            return Err(malformed(format!(
                "{} intercepts for {} weight rows",
                intercepts.len(),
                weights.len()
            )));
        }

        let input_dim = weights[0].len();
        if input_dim == 0 {
            return Err(malformed("weight rows are empty".to_string()));
        }
        if let Some(row) = weights.iter().position(|w| w.len() != input_dim) {
            return Err(malformed(format!(
                "weight row {} has {} entries, expected {}",
                row,
                weights[row].len(),
                input_dim
            )));
        }
        if weights.iter().flatten().chain(&intercepts).any(|v| !v.is_finite()) {
            return Err(malformed("parameters must be finite".to_string()));
        }

        Ok(Self {
            classes,
            weights,
            intercepts,
            input_dim,
        })
    }

    /// Class labels in model order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    fn scores(&self, features: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| w.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &[f64]) -> Result<Prediction, ModelError> {
        if features.is_empty() {
            return Err(ModelError::new(ModelErrorKind::EmptyInput));
        }
        if features.len() != self.input_dim {
            return Err(ModelError::new(ModelErrorKind::DimensionMismatch {
                expected: self.input_dim,
                actual: features.len(),
            }));
        }

        let scores = self.scores(features);
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ModelError::new(ModelErrorKind::Malformed(
                "decision score is not finite".to_string(),
            )));
        }

        let index = if scores.len() == 1 {
            usize::from(scores[0] > 0.0)
        } else {
            // First maximum wins on ties.
            scores
                .iter()
                .enumerate()
                .fold(0, |best, (i, s)| if *s > scores[best] { i } else { best })
        };

        Ok(Prediction(self.classes[index].clone()))
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }
}

fn label_text(value: Value) -> Result<String, ModelError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ModelError::new(ModelErrorKind::Malformed(format!(
            "unsupported class label: {}",
            other
        )))),
    }
}
