//! Domain model for students, competencies and grades.
//!
//! # Responsibility
//! - Define the record shapes shared by repositories and services.
//! - Own label and level validation rules.
//!
//! # Invariants
//! - Identifiers are assigned by storage and never reused.
//! - Grade levels are one of `GradeLevel`'s four values.

pub mod entity;
pub mod grade;
pub mod lookup;

pub use entity::{
    validate_label, Competency, CompetencyId, EntityKind, EntityRef, Student, StudentId,
    ValidationError,
};
pub use grade::{level_name, Grade, GradeId, GradeLevel};
pub use lookup::LookupToken;
