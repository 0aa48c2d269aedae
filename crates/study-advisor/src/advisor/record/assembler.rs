use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{
    Answer, Distance, EducationLevel, Gender, Level, PeerInfluence, Quality, SchoolType,
};
use super::fields::{FieldDomain, FieldName};
use super::StudentRecord;

/// Committed form values keyed by field name.
pub type RawFields = BTreeMap<String, RawValue>;

/// Untyped value as submitted by a form widget, JSON body, or CSV cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Interpret a textual cell, preferring integers over floats over text.
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return RawValue::Integer(value);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => RawValue::Float(value),
            _ => RawValue::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Integer(value) => write!(f, "{value}"),
            RawValue::Float(value) => write!(f, "{value}"),
            RawValue::Text(value) => write!(f, "'{value}'"),
        }
    }
}

/// Raw input outside a field's declared domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: FieldName },
    #[error("{field} is not a recognised field")]
    UnknownField { field: String },
    #[error("{field} expects {expected}, got {value}")]
    WrongType {
        field: FieldName,
        expected: String,
        value: RawValue,
    },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: FieldName,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be a multiple of {step}, got {value}")]
    OffStep {
        field: FieldName,
        value: f64,
        step: f64,
    },
    #[error("{field} must be one of {allowed}, got '{value}'")]
    UnknownLevel {
        field: FieldName,
        value: String,
        allowed: String,
    },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::UnknownField { field } => field,
            ValidationError::MissingField { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::OffStep { field, .. }
            | ValidationError::UnknownLevel { field, .. } => field.as_str(),
        }
    }
}

/// Build a [`StudentRecord`] from raw values, checking every field against its domain.
pub fn assemble(raw: &RawFields) -> Result<StudentRecord, ValidationError> {
    if let Some(name) = raw.keys().find(|name| FieldName::from_name(name).is_none()) {
        return Err(ValidationError::UnknownField {
            field: name.clone(),
        });
    }

    let fields = FieldReader { raw };

    Ok(StudentRecord {
        hours_studied: fields.count(FieldName::HoursStudied)?,
        attendance: fields.count(FieldName::Attendance)?,
        parental_involvement: fields.level(FieldName::ParentalInvolvement, Level::from_label)?,
        access_to_resources: fields.level(FieldName::AccessToResources, Quality::from_label)?,
        extracurricular_activities: fields
            .level(FieldName::ExtracurricularActivities, Answer::from_label)?,
        sleep_hours: fields.stepped(FieldName::SleepHours)?,
        previous_scores: fields.count(FieldName::PreviousScores)?,
        motivation_level: fields.level(FieldName::MotivationLevel, Level::from_label)?,
        internet_access: fields.level(FieldName::InternetAccess, Answer::from_label)?,
        tutoring_sessions: fields.count(FieldName::TutoringSessions)?,
        family_income: fields.level(FieldName::FamilyIncome, Level::from_label)?,
        teacher_quality: fields.level(FieldName::TeacherQuality, Quality::from_label)?,
        school_type: fields.level(FieldName::SchoolType, SchoolType::from_label)?,
        peer_influence: fields.level(FieldName::PeerInfluence, PeerInfluence::from_label)?,
        physical_activity: fields.count(FieldName::PhysicalActivity)?,
        learning_disabilities: fields.level(FieldName::LearningDisabilities, Answer::from_label)?,
        parental_education_level: fields
            .level(FieldName::ParentalEducationLevel, EducationLevel::from_label)?,
        distance_from_home: fields.level(FieldName::DistanceFromHome, Distance::from_label)?,
        gender: fields.level(FieldName::Gender, Gender::from_label)?,
    })
}

struct FieldReader<'a> {
    raw: &'a RawFields,
}

impl FieldReader<'_> {
    fn get(&self, field: FieldName) -> Result<&RawValue, ValidationError> {
        self.raw
            .get(field.as_str())
            .ok_or(ValidationError::MissingField { field })
    }

    fn count(&self, field: FieldName) -> Result<u8, ValidationError> {
        let FieldDomain::Integer { min, max } = field.domain() else {
            unreachable!("{field} is not an integer field");
        };

        let value = match self.get(field)? {
            RawValue::Integer(value) => *value,
            RawValue::Float(value) if value.fract() == 0.0 => *value as i64,
            other => {
                return Err(ValidationError::WrongType {
                    field,
                    expected: "a whole number".to_string(),
                    value: other.clone(),
                })
            }
        };

        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                field,
                value: value as f64,
                min: min as f64,
                max: max as f64,
            });
        }

        u8::try_from(value).map_err(|_| ValidationError::OutOfRange {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }

    fn stepped(&self, field: FieldName) -> Result<f64, ValidationError> {
        let FieldDomain::Float { min, max, step } = field.domain() else {
            unreachable!("{field} is not a numeric field");
        };

        let value = match self.get(field)? {
            RawValue::Integer(value) => *value as f64,
            RawValue::Float(value) => *value,
            other => {
                return Err(ValidationError::WrongType {
                    field,
                    expected: "a number".to_string(),
                    value: other.clone(),
                })
            }
        };

        if !(min..=max).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            });
        }

        if ((value - min) / step).fract() != 0.0 {
            return Err(ValidationError::OffStep { field, value, step });
        }

        Ok(value)
    }

    fn level<T>(
        &self,
        field: FieldName,
        parse: fn(&str) -> Option<T>,
    ) -> Result<T, ValidationError> {
        let FieldDomain::Levels { levels } = field.domain() else {
            unreachable!("{field} is not a categorical field");
        };
        let allowed = levels.join(", ");

        match self.get(field)? {
            RawValue::Text(value) => parse(value).ok_or_else(|| ValidationError::UnknownLevel {
                field,
                value: value.clone(),
                allowed,
            }),
            other => Err(ValidationError::WrongType {
                field,
                expected: format!("one of {allowed}"),
                value: other.clone(),
            }),
        }
    }
}
