use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::feedback::FeedbackMessage;
use super::model::ScoreModel;
use super::record::{RawFields, StudentRecord};
use super::service::{AdvisorError, AdvisorService, PredictionOutcome};

/// Router builder exposing the prediction and field catalogue endpoints.
pub fn advisor_router<M>(service: Arc<AdvisorService<M>>) -> Router
where
    M: ScoreModel + 'static,
{
    Router::new()
        .route("/api/v1/predictions", post(predict_handler::<M>))
        .route("/api/v1/fields", get(fields_handler))
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictionView {
    pub(crate) score: f64,
    pub(crate) display: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictionResponse {
    pub(crate) record: StudentRecord,
    pub(crate) prediction: PredictionView,
    pub(crate) feedback: Vec<FeedbackMessage>,
}

impl From<PredictionOutcome> for PredictionResponse {
    fn from(outcome: PredictionOutcome) -> Self {
        Self {
            prediction: PredictionView {
                score: outcome.prediction.score,
                display: outcome.prediction.display(),
            },
            record: outcome.record,
            feedback: outcome.feedback,
        }
    }
}

pub(crate) async fn predict_handler<M>(
    State(service): State<Arc<AdvisorService<M>>>,
    axum::Json(raw): axum::Json<RawFields>,
) -> Response
where
    M: ScoreModel + 'static,
{
    match service.handle_predict_request(&raw) {
        Ok(outcome) => {
            let body = PredictionResponse::from(outcome);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(AdvisorError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(AdvisorError::Prediction(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn fields_handler() -> Response {
    let payload = json!({ "fields": StudentRecord::catalogue() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
