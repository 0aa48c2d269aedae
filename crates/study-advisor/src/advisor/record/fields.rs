use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use super::domain::{
    Answer, Distance, EducationLevel, Gender, Level, PeerInfluence, Quality, SchoolType,
};

pub const FIELD_COUNT: usize = 19;

const ANSWER_NO_FIRST: &[&str] = &["No", "Yes"];

/// The nineteen named features collected for every student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    HoursStudied,
    Attendance,
    ParentalInvolvement,
    AccessToResources,
    ExtracurricularActivities,
    SleepHours,
    PreviousScores,
    MotivationLevel,
    InternetAccess,
    TutoringSessions,
    FamilyIncome,
    TeacherQuality,
    SchoolType,
    PeerInfluence,
    PhysicalActivity,
    LearningDisabilities,
    ParentalEducationLevel,
    DistanceFromHome,
    Gender,
}

impl FieldName {
    /// Canonical order, matching the column layout of the training export.
    pub const ALL: [FieldName; FIELD_COUNT] = [
        FieldName::HoursStudied,
        FieldName::Attendance,
        FieldName::ParentalInvolvement,
        FieldName::AccessToResources,
        FieldName::ExtracurricularActivities,
        FieldName::SleepHours,
        FieldName::PreviousScores,
        FieldName::MotivationLevel,
        FieldName::InternetAccess,
        FieldName::TutoringSessions,
        FieldName::FamilyIncome,
        FieldName::TeacherQuality,
        FieldName::SchoolType,
        FieldName::PeerInfluence,
        FieldName::PhysicalActivity,
        FieldName::LearningDisabilities,
        FieldName::ParentalEducationLevel,
        FieldName::DistanceFromHome,
        FieldName::Gender,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::HoursStudied => "Hours_Studied",
            FieldName::Attendance => "Attendance",
            FieldName::ParentalInvolvement => "Parental_Involvement",
            FieldName::AccessToResources => "Access_to_Resources",
            FieldName::ExtracurricularActivities => "Extracurricular_Activities",
            FieldName::SleepHours => "Sleep_Hours",
            FieldName::PreviousScores => "Previous_Scores",
            FieldName::MotivationLevel => "Motivation_Level",
            FieldName::InternetAccess => "Internet_Access",
            FieldName::TutoringSessions => "Tutoring_Sessions",
            FieldName::FamilyIncome => "Family_Income",
            FieldName::TeacherQuality => "Teacher_Quality",
            FieldName::SchoolType => "School_Type",
            FieldName::PeerInfluence => "Peer_Influence",
            FieldName::PhysicalActivity => "Physical_Activity",
            FieldName::LearningDisabilities => "Learning_Disabilities",
            FieldName::ParentalEducationLevel => "Parental_Education_Level",
            FieldName::DistanceFromHome => "Distance_from_Home",
            FieldName::Gender => "Gender",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    pub fn domain(self) -> FieldDomain {
        match self {
            FieldName::HoursStudied => FieldDomain::Integer { min: 1, max: 45 },
            FieldName::Attendance => FieldDomain::Integer { min: 60, max: 100 },
            FieldName::PreviousScores => FieldDomain::Integer { min: 0, max: 100 },
            FieldName::TutoringSessions => FieldDomain::Integer { min: 0, max: 8 },
            FieldName::PhysicalActivity => FieldDomain::Integer { min: 0, max: 7 },
            FieldName::SleepHours => FieldDomain::Float {
                min: 4.0,
                max: 10.0,
                step: 0.5,
            },
            FieldName::ParentalInvolvement
            | FieldName::MotivationLevel
            | FieldName::FamilyIncome => FieldDomain::Levels { levels: Level::LEVELS },
            FieldName::AccessToResources | FieldName::TeacherQuality => {
                FieldDomain::Levels { levels: Quality::LEVELS }
            }
            FieldName::ExtracurricularActivities | FieldName::InternetAccess => {
                FieldDomain::Levels { levels: Answer::LEVELS }
            }
            FieldName::LearningDisabilities => FieldDomain::Levels { levels: ANSWER_NO_FIRST },
            FieldName::SchoolType => FieldDomain::Levels { levels: SchoolType::LEVELS },
            FieldName::PeerInfluence => FieldDomain::Levels { levels: PeerInfluence::LEVELS },
            FieldName::ParentalEducationLevel => FieldDomain::Levels {
                levels: EducationLevel::LEVELS,
            },
            FieldName::DistanceFromHome => FieldDomain::Levels { levels: Distance::LEVELS },
            FieldName::Gender => FieldDomain::Levels { levels: Gender::LEVELS },
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Declared value domain of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldDomain {
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64, step: f64 },
    Levels { levels: &'static [&'static str] },
}

impl FieldDomain {
    pub fn describe(&self) -> String {
        match self {
            FieldDomain::Integer { min, max } => format!("integer {min}-{max}"),
            FieldDomain::Float { min, max, step } => {
                format!("number {min:.1}-{max:.1} in steps of {step}")
            }
            FieldDomain::Levels { levels } => format!("one of {}", levels.join(", ")),
        }
    }
}

/// Typed value of a single field, as handed to the preprocessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Level(&'static str),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value:.1}"),
            FieldValue::Level(label) => f.write_str(label),
        }
    }
}

/// Entry of the field catalogue published to form renderers.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: FieldName,
    pub domain: FieldDomain,
    pub default: FieldValue,
}

/// A complete, duplicate-free ordering of the nineteen fields.
///
/// Preprocessors resolve their columns positionally against the order they
/// were fit on, so records must be laid out in exactly that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOrder {
    fields: Vec<FieldName>,
}

impl FieldOrder {
    pub fn canonical() -> Self {
        Self {
            fields: FieldName::ALL.to_vec(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Result<Self, FieldOrderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(FIELD_COUNT);

        for name in names {
            let name = name.as_ref();
            let field = FieldName::from_name(name)
                .ok_or_else(|| FieldOrderError::Unknown(name.to_string()))?;
            if !seen.insert(field) {
                return Err(FieldOrderError::Duplicate(field));
            }
            fields.push(field);
        }

        if let Some(missing) = FieldName::ALL.into_iter().find(|field| !seen.contains(field)) {
            return Err(FieldOrderError::Missing(missing));
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldName] {
        &self.fields
    }

    pub fn position(&self, field: FieldName) -> usize {
        self.fields
            .iter()
            .position(|candidate| *candidate == field)
            .unwrap_or_else(|| unreachable!("field orders always contain every field"))
    }
}

impl Default for FieldOrder {
    fn default() -> Self {
        Self::canonical()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldOrderError {
    #[error("unknown field '{0}' in field order")]
    Unknown(String),
    #[error("field {0} appears more than once in field order")]
    Duplicate(FieldName),
    #[error("field order is missing {0}")]
    Missing(FieldName),
}
