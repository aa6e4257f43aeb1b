//! Repository layer: record persistence behind use-case oriented traits.
//!
//! # Responsibility
//! - Define data access contracts for entities and grades.
//! - Keep SQL and SQLite error codes inside the core persistence boundary.
//!
//! # Invariants
//! - Repositories only accept connections at the latest schema version.
//! - Expected outcomes (blank input, duplicates, bad levels, missing rows)
//!   surface as dedicated `RepoError` variants, not raw SQLite errors.
//! - Multi-row writes run in one IMMEDIATE transaction.

use crate::db::migrations::{current_version, latest_version, REQUIRED_TABLES};
use crate::db::DbError;
use crate::model::{CompetencyId, EntityKind, EntityRef, StudentId, ValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod entity_repo;
pub mod grade_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from entity and grade persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Name or title is blank.
    InvalidInput(EntityKind),
    /// Name or title already taken by another entity of the same kind.
    DuplicateName { kind: EntityKind, value: String },
    /// Grade level outside `1..=4`.
    InvalidLevel(i64),
    /// A grade write referenced an entity that does not exist.
    InvalidReference(EntityRef),
    /// Target entity does not exist.
    NotFound(EntityRef),
    /// No grade stored for the pair.
    GradeNotFound {
        student_id: StudentId,
        competency_id: CompetencyId,
    },
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection was not migrated to the version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Whether the caller can report the problem and ask for new input.
    ///
    /// Storage-level failures are not recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::DuplicateName { .. }
                | Self::InvalidLevel(_)
                | Self::InvalidReference(_)
                | Self::NotFound(_)
                | Self::GradeNotFound { .. }
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(kind) => {
                write!(f, "{} {} must not be empty", kind, kind.label_field())
            }
            Self::DuplicateName { kind, value } => {
                write!(f, "a {kind} with {} '{value}' already exists", kind.label_field())
            }
            Self::InvalidLevel(level) => {
                write!(f, "invalid level {level}; must be an integer from 1 to 4")
            }
            Self::InvalidReference(target) => write!(f, "{target} does not exist"),
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::GradeNotFound {
                student_id,
                competency_id,
            } => write!(
                f,
                "no grade recorded for student {student_id} on competency {competency_id}"
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "gradebook repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "gradebook repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::BlankLabel(kind) => Self::InvalidInput(kind),
            ValidationError::LevelOutOfRange(level) => Self::InvalidLevel(level),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Checks a row exists in `students` or `competencies`.
fn entity_exists(conn: &Connection, target: EntityRef) -> RepoResult<bool> {
    let sql = match target.kind {
        EntityKind::Student => "SELECT EXISTS(SELECT 1 FROM students WHERE student_id = ?1);",
        EntityKind::Competency => {
            "SELECT EXISTS(SELECT 1 FROM competencies WHERE competency_id = ?1);"
        }
    };
    let exists: i64 = conn.query_row(sql, [target.id], |row| row.get(0))?;
    Ok(exists == 1)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
