//! Landmark prediction outcome.

use serde::{Deserialize, Serialize};
use signbridge_models::{Classifier, Prediction};

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LandmarkInput {
    /// Flattened landmark coordinates
    pub input: Vec<f64>,
}

/// Result of running the classifier on one request.
///
/// Both variants are served with HTTP 200. Callers tell them apart by the
/// variant (or the `result` / `error` key on the wire), never by status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PredictOutcome {
    /// The classifier produced a label
    Ok {
        /// Stringified label
        result: String,
    },
    /// The classifier rejected the input
    Failed {
        /// Failure description
        error: String,
    },
}

impl PredictOutcome {
    /// Run `classifier` on `features`, capturing any failure as a value.
    pub fn run(classifier: &dyn Classifier, features: &[f64]) -> Self {
        match classifier.predict(features) {
            Ok(prediction) => prediction.into(),
            Err(e) => {
                tracing::warn!(error = %e, features = features.len(), "Prediction failed");
                Self::Failed {
                    error: e.kind.to_string(),
                }
            }
        }
    }

    /// Whether a label was produced.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

impl From<Prediction> for PredictOutcome {
    fn from(prediction: Prediction) -> Self {
        Self::Ok {
            result: prediction.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_wire_shapes() {
        let ok = PredictOutcome::from(Prediction("A".to_string()));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"result": "A"}));

        let failed = PredictOutcome::Failed {
            error: "Input feature vector is empty".to_string(),
        };
        assert!(!failed.is_ok());
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"error": "Input feature vector is empty"})
        );
    }
}
