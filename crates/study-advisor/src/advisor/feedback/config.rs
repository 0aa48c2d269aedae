use serde::{Deserialize, Serialize};

/// Hand-picked thresholds driving the feedback rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRules {
    /// Score difference treated as noise around the previous score.
    pub trend_buffer: f64,
    pub study_hours_target: u8,
    pub attendance_target: u8,
    pub sleep_target: f64,
    pub tutoring_target: u8,
}

impl Default for FeedbackRules {
    fn default() -> Self {
        Self {
            trend_buffer: 2.0,
            study_hours_target: 40,
            attendance_target: 95,
            sleep_target: 8.0,
            tutoring_target: 3,
        }
    }
}
