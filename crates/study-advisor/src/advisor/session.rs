use chrono::{DateTime, Utc};
use serde::Serialize;

use super::feedback::FeedbackMessage;
use super::model::PredictionResult;
use super::record::StudentRecord;
use super::service::PredictionOutcome;

/// Last successful prediction together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionEntry {
    pub record: StudentRecord,
    pub prediction: PredictionResult,
    pub feedback: Vec<FeedbackMessage>,
    pub predicted_at: DateTime<Utc>,
}

/// Caller-owned result holder for one interactive session.
///
/// Only successful predictions are stored; a failed request leaves the
/// previous entry in place.
#[derive(Debug, Clone, Default)]
pub struct PredictionSession {
    last: Option<SessionEntry>,
}

impl PredictionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&SessionEntry> {
        self.last.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    pub fn store(&mut self, outcome: PredictionOutcome) -> &SessionEntry {
        let PredictionOutcome {
            record,
            prediction,
            feedback,
        } = outcome;

        self.last.insert(SessionEntry {
            record,
            prediction,
            feedback,
            predicted_at: Utc::now(),
        })
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
