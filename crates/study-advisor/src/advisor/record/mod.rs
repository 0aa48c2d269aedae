//! Canonical student record and the assembler that builds it from raw form values.

mod assembler;
mod domain;
mod fields;

pub use assembler::{assemble, RawFields, RawValue, ValidationError};
pub use domain::{
    Answer, Distance, EducationLevel, Gender, Level, PeerInfluence, Quality, SchoolType,
};
pub use fields::{
    FieldDomain, FieldName, FieldOrder, FieldOrderError, FieldSpec, FieldValue, FIELD_COUNT,
};

use serde::{Deserialize, Serialize};

/// Fixed-schema description of one student, used for prediction and feedback.
///
/// Deserialization runs the assembler, so a record obtained from JSON has
/// passed the same domain checks as one built from form values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFields")]
pub struct StudentRecord {
    #[serde(rename = "Hours_Studied")]
    pub hours_studied: u8,
    #[serde(rename = "Attendance")]
    pub attendance: u8,
    #[serde(rename = "Parental_Involvement")]
    pub parental_involvement: Level,
    #[serde(rename = "Access_to_Resources")]
    pub access_to_resources: Quality,
    #[serde(rename = "Extracurricular_Activities")]
    pub extracurricular_activities: Answer,
    #[serde(rename = "Sleep_Hours")]
    pub sleep_hours: f64,
    #[serde(rename = "Previous_Scores")]
    pub previous_scores: u8,
    #[serde(rename = "Motivation_Level")]
    pub motivation_level: Level,
    #[serde(rename = "Internet_Access")]
    pub internet_access: Answer,
    #[serde(rename = "Tutoring_Sessions")]
    pub tutoring_sessions: u8,
    #[serde(rename = "Family_Income")]
    pub family_income: Level,
    #[serde(rename = "Teacher_Quality")]
    pub teacher_quality: Quality,
    #[serde(rename = "School_Type")]
    pub school_type: SchoolType,
    #[serde(rename = "Peer_Influence")]
    pub peer_influence: PeerInfluence,
    #[serde(rename = "Physical_Activity")]
    pub physical_activity: u8,
    #[serde(rename = "Learning_Disabilities")]
    pub learning_disabilities: Answer,
    #[serde(rename = "Parental_Education_Level")]
    pub parental_education_level: EducationLevel,
    #[serde(rename = "Distance_from_Home")]
    pub distance_from_home: Distance,
    #[serde(rename = "Gender")]
    pub gender: Gender,
}

impl StudentRecord {
    pub fn value(&self, field: FieldName) -> FieldValue {
        match field {
            FieldName::HoursStudied => FieldValue::Integer(self.hours_studied.into()),
            FieldName::Attendance => FieldValue::Integer(self.attendance.into()),
            FieldName::ParentalInvolvement => FieldValue::Level(self.parental_involvement.label()),
            FieldName::AccessToResources => FieldValue::Level(self.access_to_resources.label()),
            FieldName::ExtracurricularActivities => {
                FieldValue::Level(self.extracurricular_activities.label())
            }
            FieldName::SleepHours => FieldValue::Float(self.sleep_hours),
            FieldName::PreviousScores => FieldValue::Integer(self.previous_scores.into()),
            FieldName::MotivationLevel => FieldValue::Level(self.motivation_level.label()),
            FieldName::InternetAccess => FieldValue::Level(self.internet_access.label()),
            FieldName::TutoringSessions => FieldValue::Integer(self.tutoring_sessions.into()),
            FieldName::FamilyIncome => FieldValue::Level(self.family_income.label()),
            FieldName::TeacherQuality => FieldValue::Level(self.teacher_quality.label()),
            FieldName::SchoolType => FieldValue::Level(self.school_type.label()),
            FieldName::PeerInfluence => FieldValue::Level(self.peer_influence.label()),
            FieldName::PhysicalActivity => FieldValue::Integer(self.physical_activity.into()),
            FieldName::LearningDisabilities => {
                FieldValue::Level(self.learning_disabilities.label())
            }
            FieldName::ParentalEducationLevel => {
                FieldValue::Level(self.parental_education_level.label())
            }
            FieldName::DistanceFromHome => FieldValue::Level(self.distance_from_home.label()),
            FieldName::Gender => FieldValue::Level(self.gender.label()),
        }
    }

    /// Lay the record out in the given field order.
    pub fn values_in(&self, order: &FieldOrder) -> Vec<(FieldName, FieldValue)> {
        order
            .fields()
            .iter()
            .map(|field| (*field, self.value(*field)))
            .collect()
    }

    /// Convert back to the raw mapping the assembler consumes.
    pub fn to_raw(&self) -> RawFields {
        FieldName::ALL
            .into_iter()
            .map(|field| {
                let raw = match self.value(field) {
                    FieldValue::Integer(value) => RawValue::Integer(value),
                    FieldValue::Float(value) => RawValue::Float(value),
                    FieldValue::Level(label) => RawValue::Text(label.to_string()),
                };
                (field.as_str().to_string(), raw)
            })
            .collect()
    }

    /// Field catalogue with the values a fresh form starts from.
    pub fn catalogue() -> Vec<FieldSpec> {
        let defaults = Self::default();
        FieldName::ALL
            .into_iter()
            .map(|name| FieldSpec {
                name,
                domain: name.domain(),
                default: defaults.value(name),
            })
            .collect()
    }
}

impl Default for StudentRecord {
    /// The values the input form is pre-filled with.
    fn default() -> Self {
        Self {
            hours_studied: 20,
            attendance: 90,
            parental_involvement: Level::High,
            access_to_resources: Quality::Good,
            extracurricular_activities: Answer::Yes,
            sleep_hours: 7.0,
            previous_scores: 75,
            motivation_level: Level::High,
            internet_access: Answer::Yes,
            tutoring_sessions: 1,
            family_income: Level::High,
            teacher_quality: Quality::Good,
            school_type: SchoolType::Public,
            peer_influence: PeerInfluence::Positive,
            physical_activity: 3,
            learning_disabilities: Answer::No,
            parental_education_level: EducationLevel::Bachelors,
            distance_from_home: Distance::Short,
            gender: Gender::Female,
        }
    }
}

impl TryFrom<RawFields> for StudentRecord {
    type Error = ValidationError;

    fn try_from(raw: RawFields) -> Result<Self, Self::Error> {
        assemble(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_first_listed_level() {
        for spec in StudentRecord::catalogue() {
            if let (FieldDomain::Levels { levels }, FieldValue::Level(label)) =
                (spec.domain, spec.default)
            {
                assert_eq!(levels[0], label, "default for {}", spec.name);
            }
        }
    }

    #[test]
    fn values_follow_the_requested_order() {
        let record = StudentRecord::default();
        let mut names: Vec<&str> = FieldName::ALL.iter().map(|f| f.as_str()).collect();
        names.rotate_left(5);
        let order = FieldOrder::from_names(&names).expect("rotated order is valid");

        let values = record.values_in(&order);
        assert_eq!(values.len(), FIELD_COUNT);
        assert_eq!(values[0], (FieldName::SleepHours, FieldValue::Float(7.0)));
        assert_eq!(
            values[FIELD_COUNT - 1],
            (
                FieldName::ExtracurricularActivities,
                FieldValue::Level("Yes")
            )
        );
    }

    #[test]
    fn serializes_with_form_field_names() {
        let json = serde_json::to_value(StudentRecord::default()).expect("serializes");
        assert_eq!(json["Hours_Studied"], 20);
        assert_eq!(json["Sleep_Hours"], 7.0);
        assert_eq!(json["Parental_Education_Level"], "Bachelor's");
        assert_eq!(json["Distance_from_Home"], "Short");
    }

    #[test]
    fn deserializing_runs_domain_checks() {
        let mut json = serde_json::to_value(StudentRecord::default()).expect("serializes");
        let parsed: StudentRecord = serde_json::from_value(json.clone()).expect("valid record");
        assert_eq!(parsed, StudentRecord::default());

        json["Attendance"] = serde_json::json!(45);
        let err = serde_json::from_value::<StudentRecord>(json).expect_err("attendance too low");
        assert!(err.to_string().contains("Attendance"));
    }
}
