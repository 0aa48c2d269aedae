//! Score prediction capability and its artifact-backed implementation.

mod artifacts;
mod preprocessor;
mod regressor;

pub use artifacts::{ArtifactModel, ArtifactPaths, StartupError};
pub use preprocessor::{FittedPreprocessor, NumericScaler, OneHotEncoder, PreprocessorArtifact};
pub use regressor::LinearRegressor;

use serde::{Deserialize, Serialize};

use super::record::{FieldName, StudentRecord};

/// Numeric encoding of a record, laid out as the regressor expects.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A predicted exam score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub score: f64,
}

impl PredictionResult {
    pub fn new(score: f64) -> Self {
        Self { score }
    }

    /// Score rounded to two decimals for display.
    pub fn display(&self) -> String {
        format!("{:.2}", self.score)
    }
}

/// Failure of the transform or predict step for a single record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("{field} value '{value}' was not seen when the preprocessor was fit (known: {known})")]
    UnseenCategory {
        field: FieldName,
        value: String,
        known: String,
    },
    #[error("{field} cannot be encoded by a {transformer} transformer")]
    SchemaMismatch {
        field: FieldName,
        transformer: &'static str,
    },
    #[error("model expects {expected} features but received {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("model produced a non-finite score")]
    NonFinite,
}

/// Capability pair supplied by the offline training pipeline.
///
/// Implementations are loaded once and shared read-only between requests.
pub trait ScoreModel: Send + Sync {
    fn transform(&self, record: &StudentRecord) -> Result<FeatureVector, PredictionError>;

    fn predict_raw(&self, features: &FeatureVector) -> Result<f64, PredictionError>;

    fn predict(&self, record: &StudentRecord) -> Result<PredictionResult, PredictionError> {
        let features = self.transform(record)?;
        let score = self.predict_raw(&features)?;
        if !score.is_finite() {
            return Err(PredictionError::NonFinite);
        }
        Ok(PredictionResult::new(score))
    }
}

/// Model that ignores its input and always returns the same score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScoreModel(pub f64);

impl ScoreModel for FixedScoreModel {
    fn transform(&self, _record: &StudentRecord) -> Result<FeatureVector, PredictionError> {
        Ok(FeatureVector::new(Vec::new()))
    }

    fn predict_raw(&self, _features: &FeatureVector) -> Result<f64, PredictionError> {
        Ok(self.0)
    }
}
