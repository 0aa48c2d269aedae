use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::feedback::{FeedbackEngine, FeedbackMessage, FeedbackRules};
use super::model::{PredictionError, PredictionResult, ScoreModel};
use super::record::{assemble, RawFields, StudentRecord, ValidationError};
use super::session::{PredictionSession, SessionEntry};

/// Prediction plus the feedback derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub record: StudentRecord,
    pub prediction: PredictionResult,
    pub feedback: Vec<FeedbackMessage>,
}

/// Service composing the assembler, the score model, and the feedback engine.
pub struct AdvisorService<M> {
    model: Arc<M>,
    engine: FeedbackEngine,
}

impl<M> AdvisorService<M>
where
    M: ScoreModel + 'static,
{
    pub fn new(model: Arc<M>, rules: FeedbackRules) -> Self {
        Self {
            model,
            engine: FeedbackEngine::new(rules),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn feedback_rules(&self) -> &FeedbackRules {
        self.engine.rules()
    }

    /// Validate raw form values, predict a score, and derive feedback.
    pub fn handle_predict_request(
        &self,
        raw: &RawFields,
    ) -> Result<PredictionOutcome, AdvisorError> {
        let record = assemble(raw).map_err(|err| {
            warn!(field = err.field(), error = %err, "rejected prediction request");
            err
        })?;
        Ok(self.predict_record(record)?)
    }

    /// Predict for an already-assembled record.
    pub fn predict_record(
        &self,
        record: StudentRecord,
    ) -> Result<PredictionOutcome, PredictionError> {
        let prediction = self.model.predict(&record).map_err(|err| {
            warn!(error = %err, "prediction failed");
            err
        })?;
        let feedback = self.engine.generate(prediction.score, &record);

        debug!(
            score = prediction.score,
            previous = record.previous_scores,
            messages = feedback.len(),
            "prediction complete"
        );

        Ok(PredictionOutcome {
            record,
            prediction,
            feedback,
        })
    }

    /// Run a request and keep the outcome in the session when it succeeds.
    pub fn predict_into<'s>(
        &self,
        session: &'s mut PredictionSession,
        raw: &RawFields,
    ) -> Result<&'s SessionEntry, AdvisorError> {
        let outcome = self.handle_predict_request(raw)?;
        Ok(session.store(outcome))
    }
}

/// Error raised by the advisor service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}
