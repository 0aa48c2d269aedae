//! Exam score prediction and rule-based study feedback.
//!
//! Raw form values are assembled into a [`StudentRecord`], scored by a
//! [`ScoreModel`], and turned into ordered [`FeedbackMessage`]s. The service
//! and router wrap that pipeline in a request/response boundary.

pub mod batch;
pub mod feedback;
pub mod model;
pub mod record;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use batch::{score_csv, BatchError, BatchReport, BatchRow, BatchRowStatus};
pub use feedback::{
    generate_feedback, FeedbackEngine, FeedbackKind, FeedbackMessage, FeedbackRules, Tone,
};
pub use model::{
    ArtifactModel, ArtifactPaths, FeatureVector, FixedScoreModel, PredictionError,
    PredictionResult, ScoreModel, StartupError,
};
pub use record::{
    assemble, FieldDomain, FieldName, FieldOrder, FieldSpec, FieldValue, RawFields, RawValue,
    StudentRecord, ValidationError,
};
pub use router::advisor_router;
pub use service::{AdvisorError, AdvisorService, PredictionOutcome};
pub use session::{PredictionSession, SessionEntry};
