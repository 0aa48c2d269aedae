use serde::{Deserialize, Serialize};

use super::{FeatureVector, PredictionError};

/// Ordinary least squares regressor: `intercept + coefficients · features`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegressor {
    pub fn width(&self) -> usize {
        self.coefficients.len()
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        if features.len() != self.width() {
            return Err(PredictionError::DimensionMismatch {
                expected: self.width(),
                actual: features.len(),
            });
        }

        let score = self
            .coefficients
            .iter()
            .zip(features.values())
            .fold(self.intercept, |acc, (weight, value)| acc + weight * value);

        if score.is_finite() {
            Ok(score)
        } else {
            Err(PredictionError::NonFinite)
        }
    }
}
