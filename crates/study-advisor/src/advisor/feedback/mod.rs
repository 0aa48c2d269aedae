mod config;
mod message;
mod rules;

pub use config::FeedbackRules;
pub use message::{FeedbackKind, FeedbackMessage, Tone};

use super::record::StudentRecord;

/// Stateless evaluator that applies the rule thresholds to a prediction.
#[derive(Debug, Clone, Default)]
pub struct FeedbackEngine {
    rules: FeedbackRules,
}

impl FeedbackEngine {
    pub fn new(rules: FeedbackRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &FeedbackRules {
        &self.rules
    }

    /// Evaluate every rule in presentation order.
    ///
    /// The trend and study-hours rules always contribute one message; the
    /// remaining four contribute at most one each.
    pub fn generate(&self, prediction: f64, record: &StudentRecord) -> Vec<FeedbackMessage> {
        let mut messages = Vec::with_capacity(6);
        messages.push(rules::trend(prediction, record, &self.rules));
        messages.push(rules::study_hours(record, &self.rules));
        messages.extend(rules::attendance(record, &self.rules));
        messages.extend(rules::sleep(record, &self.rules));
        messages.extend(rules::tutoring(record, &self.rules));
        messages.extend(rules::extracurricular(record));
        messages
    }
}

/// Feedback using the default thresholds.
pub fn generate_feedback(prediction: f64, record: &StudentRecord) -> Vec<FeedbackMessage> {
    FeedbackEngine::default().generate(prediction, record)
}
