use serde::{Deserialize, Serialize};

use super::artifacts::StartupError;
use super::{FeatureVector, PredictionError};
use crate::advisor::record::{FieldName, FieldOrder, FieldValue, StudentRecord};

/// Serialized form of a fitted preprocessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessorArtifact {
    /// Column order of the frame the preprocessor was fit on.
    pub feature_order: Vec<String>,
    #[serde(default)]
    pub numeric: Vec<NumericScaler>,
    #[serde(default)]
    pub categorical: Vec<OneHotEncoder>,
}

/// Standard scaling: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericScaler {
    pub feature: String,
    pub mean: f64,
    pub scale: f64,
}

/// One indicator column per fitted category, in the listed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub feature: String,
    pub categories: Vec<String>,
}

/// Preprocessor whose columns have been resolved against its fit order.
#[derive(Debug, Clone)]
pub struct FittedPreprocessor {
    order: FieldOrder,
    numeric: Vec<(usize, FieldName, NumericScaler)>,
    categorical: Vec<(usize, FieldName, OneHotEncoder)>,
}

impl FittedPreprocessor {
    pub fn from_artifact(artifact: PreprocessorArtifact) -> Result<Self, StartupError> {
        let order = FieldOrder::from_names(&artifact.feature_order)
            .map_err(|err| StartupError::InvalidArtifact(format!("preprocessor: {err}")))?;

        let mut claimed: Vec<FieldName> = Vec::new();
        let mut resolve = |feature: &str| -> Result<(usize, FieldName), StartupError> {
            let field = FieldName::from_name(feature).ok_or_else(|| {
                StartupError::InvalidArtifact(format!(
                    "preprocessor references unknown column '{feature}'"
                ))
            })?;
            if claimed.contains(&field) {
                return Err(StartupError::InvalidArtifact(format!(
                    "preprocessor encodes {field} more than once"
                )));
            }
            claimed.push(field);
            Ok((order.position(field), field))
        };

        let mut numeric = Vec::with_capacity(artifact.numeric.len());
        for scaler in artifact.numeric {
            let (column, field) = resolve(&scaler.feature)?;
            if !scaler.scale.is_finite() || scaler.scale == 0.0 || !scaler.mean.is_finite() {
                return Err(StartupError::InvalidArtifact(format!(
                    "scaler for {field} has unusable mean/scale"
                )));
            }
            numeric.push((column, field, scaler));
        }

        let mut categorical = Vec::with_capacity(artifact.categorical.len());
        for encoder in artifact.categorical {
            let (column, field) = resolve(&encoder.feature)?;
            if encoder.categories.is_empty() {
                return Err(StartupError::InvalidArtifact(format!(
                    "encoder for {field} has no categories"
                )));
            }
            categorical.push((column, field, encoder));
        }

        Ok(Self {
            order,
            numeric,
            categorical,
        })
    }

    pub fn field_order(&self) -> &FieldOrder {
        &self.order
    }

    /// Number of columns produced by [`FittedPreprocessor::transform`].
    pub fn output_width(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|(_, _, encoder)| encoder.categories.len())
                .sum::<usize>()
    }

    /// Encode a record: scaled numeric block first, then each one-hot block.
    pub fn transform(&self, record: &StudentRecord) -> Result<FeatureVector, PredictionError> {
        let row: Vec<FieldValue> = record
            .values_in(&self.order)
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        self.transform_row(&row)
    }

    fn transform_row(&self, row: &[FieldValue]) -> Result<FeatureVector, PredictionError> {
        let mut values = Vec::with_capacity(self.output_width());

        for (column, field, scaler) in &self.numeric {
            let raw = match row[*column] {
                FieldValue::Integer(value) => value as f64,
                FieldValue::Float(value) => value,
                FieldValue::Level(_) => {
                    return Err(PredictionError::SchemaMismatch {
                        field: *field,
                        transformer: "numeric",
                    })
                }
            };
            values.push((raw - scaler.mean) / scaler.scale);
        }

        for (column, field, encoder) in &self.categorical {
            let FieldValue::Level(label) = row[*column] else {
                return Err(PredictionError::SchemaMismatch {
                    field: *field,
                    transformer: "one-hot",
                });
            };
            let hot = encoder
                .categories
                .iter()
                .position(|category| category == label)
                .ok_or_else(|| PredictionError::UnseenCategory {
                    field: *field,
                    value: label.to_string(),
                    known: encoder.categories.join(", "),
                })?;
            values.extend(
                (0..encoder.categories.len()).map(|idx| if idx == hot { 1.0 } else { 0.0 }),
            );
        }

        Ok(FeatureVector::new(values))
    }
}
