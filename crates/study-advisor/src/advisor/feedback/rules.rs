use super::config::FeedbackRules;
use super::message::{FeedbackKind, FeedbackMessage, Tone};
use crate::advisor::record::{Answer, StudentRecord};

/// Compare the prediction with the previous score; always yields one message.
pub(crate) fn trend(
    prediction: f64,
    record: &StudentRecord,
    rules: &FeedbackRules,
) -> FeedbackMessage {
    let previous = record.previous_scores;
    let delta = prediction - f64::from(previous);

    if delta > rules.trend_buffer {
        FeedbackMessage::new(
            FeedbackKind::TrendImprovement,
            Tone::Positive,
            "Great Improvement!",
            format!(
                "Your previous score was {previous}, but your predicted score is {prediction:.2}. \
                 This shows your current habits are very effective. Keep it up!"
            ),
        )
    } else if delta < -rules.trend_buffer {
        FeedbackMessage::new(
            FeedbackKind::TrendDrop,
            Tone::Insight,
            "Insight",
            format!(
                "Your previous score was {previous}, but your predicted score is {prediction:.2}. \
                 Other factors might be pulling your score down. See the action items below."
            ),
        )
    } else {
        FeedbackMessage::new(
            FeedbackKind::TrendStable,
            Tone::Positive,
            "Stable Performance",
            format!(
                "Your predicted score of {prediction:.2} is very close to your previous score of \
                 {previous}. This shows you are consistent. See below for tips to break through \
                 to the next level."
            ),
        )
    }
}

/// Study time is the biggest lever; always yields one message.
pub(crate) fn study_hours(record: &StudentRecord, rules: &FeedbackRules) -> FeedbackMessage {
    let hours = record.hours_studied;
    let target = rules.study_hours_target;

    if hours < target {
        FeedbackMessage::new(
            FeedbackKind::StudyHoursPriority,
            Tone::Action,
            "Top Priority",
            format!(
                "You study {hours} hours per week. Students with top scores often study \
                 {target}+ hours. This is likely the biggest lever you can pull to increase \
                 your score."
            ),
        )
    } else {
        FeedbackMessage::new(
            FeedbackKind::StudyHoursOnTrack,
            Tone::Positive,
            "Great Work",
            format!(
                "You are studying {hours} hours per week. This is a key habit for high scores."
            ),
        )
    }
}

pub(crate) fn attendance(
    record: &StudentRecord,
    rules: &FeedbackRules,
) -> Option<FeedbackMessage> {
    let attendance = record.attendance;
    let target = rules.attendance_target;

    (attendance < target).then(|| {
        FeedbackMessage::new(
            FeedbackKind::Attendance,
            Tone::Action,
            "Action Item",
            format!(
                "Your attendance is {attendance}%. Increasing this to {target}-100% is a simple \
                 but powerful way to improve your score."
            ),
        )
    })
}

pub(crate) fn sleep(record: &StudentRecord, rules: &FeedbackRules) -> Option<FeedbackMessage> {
    let sleep = record.sleep_hours;
    let target = rules.sleep_target;

    (sleep < target).then(|| {
        FeedbackMessage::new(
            FeedbackKind::Sleep,
            Tone::Action,
            "Action Item",
            format!(
                "You're getting {sleep:.1} hours of sleep. Performance tends to peak for students \
                 who get {target}-{upper} hours. Try going to bed 30 minutes earlier.",
                upper = target + 1.0
            ),
        )
    })
}

pub(crate) fn tutoring(
    record: &StudentRecord,
    rules: &FeedbackRules,
) -> Option<FeedbackMessage> {
    let sessions = record.tutoring_sessions;

    (sessions < rules.tutoring_target).then(|| {
        FeedbackMessage::new(
            FeedbackKind::Tutoring,
            Tone::Suggestion,
            "Suggestion",
            format!(
                "You have {sessions} tutoring sessions. If you are struggling, increasing this \
                 could provide a significant boost."
            ),
        )
    })
}

pub(crate) fn extracurricular(record: &StudentRecord) -> Option<FeedbackMessage> {
    (record.extracurricular_activities == Answer::Yes).then(|| {
        FeedbackMessage::new(
            FeedbackKind::Extracurricular,
            Tone::Insight,
            "Insight",
            "Extracurricular activities are great, but they take time and can come with a \
             slight score drop. Be sure to balance your time and study hours effectively.",
        )
    })
}
