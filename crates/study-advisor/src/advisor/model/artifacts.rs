use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use super::preprocessor::{FittedPreprocessor, PreprocessorArtifact};
use super::regressor::LinearRegressor;
use super::{FeatureVector, PredictionError, ScoreModel};
use crate::advisor::record::StudentRecord;

/// Locations of the serialized model and preprocessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub preprocessor: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("artifacts/student_performance_model.json"),
            preprocessor: PathBuf::from("artifacts/student_data_preprocessor.json"),
        }
    }
}

/// Artifact missing or corrupt; fatal before any input is accepted.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("artifact not found at {}", path.display())]
    Missing { path: PathBuf },
    #[error("failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("artifact {} is corrupt: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),
}

/// Production model: fitted preprocessor feeding a linear regressor.
#[derive(Debug, Clone)]
pub struct ArtifactModel {
    preprocessor: FittedPreprocessor,
    regressor: LinearRegressor,
}

impl ArtifactModel {
    pub fn load(paths: &ArtifactPaths) -> Result<Self, StartupError> {
        let preprocessor: PreprocessorArtifact = read_json(&paths.preprocessor)?;
        let regressor: LinearRegressor = read_json(&paths.model)?;
        let model = Self::from_parts(FittedPreprocessor::from_artifact(preprocessor)?, regressor)?;

        info!(
            model = %paths.model.display(),
            preprocessor = %paths.preprocessor.display(),
            features = model.regressor.width(),
            "loaded prediction artifacts"
        );
        Ok(model)
    }

    pub fn from_parts(
        preprocessor: FittedPreprocessor,
        regressor: LinearRegressor,
    ) -> Result<Self, StartupError> {
        if preprocessor.output_width() != regressor.width() {
            return Err(StartupError::InvalidArtifact(format!(
                "preprocessor produces {} features but model expects {}",
                preprocessor.output_width(),
                regressor.width()
            )));
        }

        Ok(Self {
            preprocessor,
            regressor,
        })
    }

    pub fn preprocessor(&self) -> &FittedPreprocessor {
        &self.preprocessor
    }
}

impl ScoreModel for ArtifactModel {
    fn transform(&self, record: &StudentRecord) -> Result<FeatureVector, PredictionError> {
        self.preprocessor.transform(record)
    }

    fn predict_raw(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        self.regressor.predict(features)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StartupError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            StartupError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            StartupError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&contents).map_err(|source| StartupError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
