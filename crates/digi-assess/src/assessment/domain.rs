use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier wrapper for assessments.
    AssessmentId
);
string_id!(
    /// Identifier of a question in the bank.
    QuestionId
);
string_id!(
    /// Identifier of an answer option, unique within its question.
    OptionId
);
string_id!(
    /// Identifier of a maturity dimension (e.g. `strategy`).
    DimensionId
);
string_id!(
    /// Identifier of a pillar, unique within its dimension.
    PillarId
);

/// Company details captured at start and enriched by the intro questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub size: Option<String>,
    pub sector: Option<String>,
}

/// Lifecycle of an assessment. `Completed` and `Abandoned` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentStatus::InProgress => "in_progress",
            AssessmentStatus::Completed => "completed",
            AssessmentStatus::Abandoned => "abandoned",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, AssessmentStatus::InProgress)
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative band for a 0–100 percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLevel {
    Low,
    Moderate,
    Good,
    Excellent,
}

impl ScoreLevel {
    pub const fn for_percentage(percentage: u32) -> Self {
        if percentage >= 76 {
            Self::Excellent
        } else if percentage >= 51 {
            Self::Good
        } else if percentage >= 26 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub const fn ordered() -> [Self; 4] {
        [Self::Excellent, Self::Good, Self::Moderate, Self::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

/// `round(points / max * 100)` with half-up rounding; 0 when `max` is 0.
pub(crate) fn percentage(points: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    ((f64::from(points) / f64::from(max)) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 6), 17);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(18, 36), 50);
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn score_level_boundaries_are_inclusive_lower_bounds() {
        assert_eq!(ScoreLevel::for_percentage(25), ScoreLevel::Low);
        assert_eq!(ScoreLevel::for_percentage(26), ScoreLevel::Moderate);
        assert_eq!(ScoreLevel::for_percentage(51), ScoreLevel::Good);
        assert_eq!(ScoreLevel::for_percentage(76), ScoreLevel::Excellent);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = QuestionId::from("intro_sector");
        assert_eq!(serde_json::to_string(&id).expect("serializes"), "\"intro_sector\"");
    }
}
