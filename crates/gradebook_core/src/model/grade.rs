//! Grade levels and grade records.

use crate::model::entity::{CompetencyId, StudentId, ValidationError};
use serde::Serialize;

/// Storage-assigned grade identifier.
pub type GradeId = i64;

/// Competency level on the four-step scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeLevel {
    Beginning = 1,
    Developing = 2,
    Proficient = 3,
    Advanced = 4,
}

impl GradeLevel {
    /// All levels in ascending order.
    pub const ALL: [GradeLevel; 4] = [
        Self::Beginning,
        Self::Developing,
        Self::Proficient,
        Self::Advanced,
    ];

    /// Numeric value as stored in `grades.level`.
    pub fn value(self) -> i64 {
        self as i64
    }

    /// Human-readable label.
    pub fn name(self) -> &'static str {
        match self {
            Self::Beginning => "Beginning",
            Self::Developing => "Developing",
            Self::Proficient => "Proficient",
            Self::Advanced => "Advanced",
        }
    }
}

impl TryFrom<i64> for GradeLevel {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Beginning),
            2 => Ok(Self::Developing),
            3 => Ok(Self::Proficient),
            4 => Ok(Self::Advanced),
            other => Err(ValidationError::LevelOutOfRange(other)),
        }
    }
}

/// Label for a raw stored level.
///
/// Storage constrains levels to `1..=4`, so "Unknown" only shows up if a row
/// was written around that constraint.
pub fn level_name(level: i64) -> &'static str {
    GradeLevel::try_from(level).map_or("Unknown", GradeLevel::name)
}

/// One stored grade: the level a student holds for one competency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub id: GradeId,
    pub student_id: StudentId,
    pub competency_id: CompetencyId,
    pub level: i64,
}
