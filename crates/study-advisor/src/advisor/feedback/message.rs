use std::fmt;

use serde::{Deserialize, Serialize};

/// Presentation intent of a feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Insight,
    Action,
    Suggestion,
}

impl Tone {
    pub fn label(self) -> &'static str {
        match self {
            Tone::Positive => "positive",
            Tone::Insight => "insight",
            Tone::Action => "action",
            Tone::Suggestion => "suggestion",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule branch that produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    TrendImprovement,
    TrendDrop,
    TrendStable,
    StudyHoursPriority,
    StudyHoursOnTrack,
    Attendance,
    Sleep,
    Tutoring,
    Extracurricular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    pub kind: FeedbackKind,
    pub tone: Tone,
    pub headline: String,
    pub text: String,
}

impl FeedbackMessage {
    pub(crate) fn new(
        kind: FeedbackKind,
        tone: Tone,
        headline: &str,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            tone,
            headline: headline.to_string(),
            text: text.into(),
        }
    }
}

impl fmt::Display for FeedbackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.headline, self.text)
    }
}
