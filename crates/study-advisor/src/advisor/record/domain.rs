use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a closed categorical domain whose serde names are the form labels.
macro_rules! level_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const LEVELS: &'static [&'static str] = &[$($label),+];

            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            pub fn from_label(value: &str) -> Option<Self> {
                match value {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

level_enum! {
    /// Three-step intensity scale shared by involvement, motivation and income.
    Level {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
}

level_enum! {
    /// Quality grading used for resource access and teaching.
    Quality {
        Good => "Good",
        Average => "Average",
        Poor => "Poor",
    }
}

level_enum! {
    Answer {
        Yes => "Yes",
        No => "No",
    }
}

level_enum! {
    SchoolType {
        Public => "Public",
        Private => "Private",
    }
}

level_enum! {
    PeerInfluence {
        Positive => "Positive",
        Negative => "Negative",
        Neutral => "Neutral",
    }
}

level_enum! {
    /// Highest education level reached by a parent or guardian.
    EducationLevel {
        Bachelors => "Bachelor's",
        Masters => "Master's",
        HighSchool => "High School",
        SomeCollege => "Some College",
        Phd => "PhD",
        NoFormal => "None",
    }
}

level_enum! {
    Distance {
        Short => "Short",
        Medium => "Medium",
        Long => "Long",
    }
}

level_enum! {
    Gender {
        Female => "Female",
        Male => "Male",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_parsing() {
        for label in EducationLevel::LEVELS {
            let level = EducationLevel::from_label(label).expect("known level");
            assert_eq!(level.label(), *label);
        }
        assert_eq!(Answer::from_label("yes"), None);
    }

    #[test]
    fn serde_uses_form_labels() {
        let json = serde_json::to_string(&EducationLevel::SomeCollege).expect("serializes");
        assert_eq!(json, "\"Some College\"");
        let parsed: EducationLevel = serde_json::from_str("\"Bachelor's\"").expect("parses");
        assert_eq!(parsed, EducationLevel::Bachelors);
    }
}
