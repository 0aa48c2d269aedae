use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::advisor::feedback::FeedbackRules;
use crate::advisor::model::{FeatureVector, FixedScoreModel, PredictionError, ScoreModel};
use crate::advisor::record::{Answer, FieldName, RawFields, RawValue, StudentRecord};
use crate::advisor::service::AdvisorService;

/// Student with every conditional rule triggered.
pub(super) fn struggling_student() -> StudentRecord {
    StudentRecord {
        hours_studied: 20,
        attendance: 90,
        sleep_hours: 7.0,
        tutoring_sessions: 1,
        extracurricular_activities: Answer::Yes,
        previous_scores: 75,
        ..StudentRecord::default()
    }
}

/// Student with none of the conditional rules triggered.
pub(super) fn diligent_student() -> StudentRecord {
    StudentRecord {
        hours_studied: 42,
        attendance: 98,
        sleep_hours: 8.5,
        tutoring_sessions: 4,
        extracurricular_activities: Answer::No,
        previous_scores: 80,
        ..StudentRecord::default()
    }
}

pub(super) fn raw_fields(record: &StudentRecord) -> RawFields {
    record.to_raw()
}

pub(super) fn raw_with(field: FieldName, value: RawValue) -> RawFields {
    let mut raw = raw_fields(&struggling_student());
    raw.insert(field.as_str().to_string(), value);
    raw
}

pub(super) fn fixed_service(score: f64) -> AdvisorService<FixedScoreModel> {
    AdvisorService::new(Arc::new(FixedScoreModel(score)), FeedbackRules::default())
}

/// Model whose preprocessor was fit without the submitted education level.
pub(super) struct UnseenLevelModel;

impl ScoreModel for UnseenLevelModel {
    fn transform(&self, record: &StudentRecord) -> Result<FeatureVector, PredictionError> {
        Err(PredictionError::UnseenCategory {
            field: FieldName::ParentalEducationLevel,
            value: record.parental_education_level.label().to_string(),
            known: "College, High School, Postgraduate".to_string(),
        })
    }

    fn predict_raw(&self, _features: &FeatureVector) -> Result<f64, PredictionError> {
        Ok(0.0)
    }
}

pub(super) fn failing_service() -> AdvisorService<UnseenLevelModel> {
    AdvisorService::new(Arc::new(UnseenLevelModel), FeedbackRules::default())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
