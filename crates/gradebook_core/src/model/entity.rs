//! Student and competency records.
//!
//! # Responsibility
//! - Define the two named entity types and their identifiers.
//! - Validate user-facing labels (student names, competency titles).
//!
//! # Invariants
//! - A label is never blank; it is stored exactly as given.
//! - Labels are unique per entity kind (enforced by storage).

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned student identifier.
pub type StudentId = i64;

/// Storage-assigned competency identifier.
pub type CompetencyId = i64;

/// A tracked student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
}

/// A named skill or criterion students are graded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Competency {
    pub id: CompetencyId,
    pub title: String,
}

/// Which named entity an operation or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Student,
    Competency,
}

impl EntityKind {
    /// Lowercase noun used in messages.
    pub fn noun(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Competency => "competency",
        }
    }

    /// Name of the label field for this kind (`name` or `title`).
    pub fn label_field(self) -> &'static str {
        match self {
            Self::Student => "name",
            Self::Competency => "title",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun())
    }
}

/// Typed pointer to one stored entity, used for not-found and reference errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: i64,
}

impl EntityRef {
    pub fn student(id: StudentId) -> Self {
        Self {
            kind: EntityKind::Student,
            id,
        }
    }

    pub fn competency(id: CompetencyId) -> Self {
        Self {
            kind: EntityKind::Competency,
            id,
        }
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Rule violations detected before anything reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name or title is empty or whitespace only.
    BlankLabel(EntityKind),
    /// Level is not in `1..=4`.
    LevelOutOfRange(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankLabel(kind) => {
                write!(f, "{} {} must not be empty", kind, kind.label_field())
            }
            Self::LevelOutOfRange(level) => {
                write!(f, "level {level} is out of range; expected 1 to 4")
            }
        }
    }
}

impl Error for ValidationError {}

/// Rejects blank names/titles.
pub fn validate_label(kind: EntityKind, label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() {
        return Err(ValidationError::BlankLabel(kind));
    }
    Ok(())
}
