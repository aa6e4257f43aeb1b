//! Core record-keeping logic for the gradebook.
//! This crate owns the schema, id-or-name resolution, grade storage and
//! reporting; the shell only parses input and renders results.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{ensure_schema, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{
    level_name, Competency, CompetencyId, EntityKind, EntityRef, Grade, GradeId, GradeLevel,
    LookupToken, Student, StudentId, ValidationError,
};
pub use repo::entity_repo::{EntityRepository, SqliteEntityRepository};
pub use repo::grade_repo::{GradeEntry, GradeRepository, LevelCount, SqliteGradeRepository};
pub use repo::{RepoError, RepoResult};
pub use service::report_service::{LevelSummary, ReportEntry, ReportService, StudentReport};
pub use service::resolver::Resolver;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
