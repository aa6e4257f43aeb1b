//! Student/competency repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Create, look up and delete students and competencies.
//! - Trigger the grade cascade when an entity is deleted.
//!
//! # Invariants
//! - Labels are validated before any SQL runs.
//! - A delete removes the entity's grades and the entity in one transaction,
//!   so a failure can never leave orphaned grades behind.

use crate::model::{
    validate_label, Competency, CompetencyId, EntityKind, EntityRef, Student, StudentId,
};
use crate::repo::grade_repo::{delete_grades_for_competency, delete_grades_for_student};
use crate::repo::{
    ensure_connection_ready, entity_exists, is_unique_violation, RepoError, RepoResult,
};
use log::info;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Repository interface for the two named entity kinds.
pub trait EntityRepository {
    /// Inserts a student and returns its new id.
    fn add_student(&self, name: &str) -> RepoResult<StudentId>;
    /// Inserts a competency and returns its new id.
    fn add_competency(&self, title: &str) -> RepoResult<CompetencyId>;
    fn get_student_by_id(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Exact, case-sensitive name match.
    fn get_student_by_name(&self, name: &str) -> RepoResult<Option<Student>>;
    fn get_competency_by_id(&self, id: CompetencyId) -> RepoResult<Option<Competency>>;
    /// Exact, case-sensitive title match.
    fn get_competency_by_title(&self, title: &str) -> RepoResult<Option<Competency>>;
    /// Deletes a student with all of its grades; returns the number of grades removed.
    fn delete_student(&self, id: StudentId) -> RepoResult<usize>;
    /// Deletes a competency with all of its grades; returns the number of grades removed.
    fn delete_competency(&self, id: CompetencyId) -> RepoResult<usize>;
}

/// SQLite-backed entity repository.
#[derive(Clone, Copy)]
pub struct SqliteEntityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntityRepository<'conn> {
    /// Constructs a repository from a connection that passed `ensure_schema`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntityRepository for SqliteEntityRepository<'_> {
    fn add_student(&self, name: &str) -> RepoResult<StudentId> {
        insert_entity(self.conn, &STUDENTS, name)
    }

    fn add_competency(&self, title: &str) -> RepoResult<CompetencyId> {
        insert_entity(self.conn, &COMPETENCIES, title)
    }

    fn get_student_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let row = find_by_id(self.conn, &STUDENTS, id)?;
        Ok(row.map(|(id, name)| Student { id, name }))
    }

    fn get_student_by_name(&self, name: &str) -> RepoResult<Option<Student>> {
        let row = find_by_label(self.conn, &STUDENTS, name)?;
        Ok(row.map(|(id, name)| Student { id, name }))
    }

    fn get_competency_by_id(&self, id: CompetencyId) -> RepoResult<Option<Competency>> {
        let row = find_by_id(self.conn, &COMPETENCIES, id)?;
        Ok(row.map(|(id, title)| Competency { id, title }))
    }

    fn get_competency_by_title(&self, title: &str) -> RepoResult<Option<Competency>> {
        let row = find_by_label(self.conn, &COMPETENCIES, title)?;
        Ok(row.map(|(id, title)| Competency { id, title }))
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<usize> {
        delete_with_grades(self.conn, &STUDENTS, id)
    }

    fn delete_competency(&self, id: CompetencyId) -> RepoResult<usize> {
        delete_with_grades(self.conn, &COMPETENCIES, id)
    }
}

/// Column layout of one entity table.
struct EntityTable {
    kind: EntityKind,
    insert_sql: &'static str,
    select_by_id_sql: &'static str,
    select_by_label_sql: &'static str,
    delete_sql: &'static str,
}

const STUDENTS: EntityTable = EntityTable {
    kind: EntityKind::Student,
    insert_sql: "INSERT INTO students (name) VALUES (?1);",
    select_by_id_sql: "SELECT student_id, name FROM students WHERE student_id = ?1;",
    select_by_label_sql: "SELECT student_id, name FROM students WHERE name = ?1;",
    delete_sql: "DELETE FROM students WHERE student_id = ?1;",
};

const COMPETENCIES: EntityTable = EntityTable {
    kind: EntityKind::Competency,
    insert_sql: "INSERT INTO competencies (title) VALUES (?1);",
    select_by_id_sql: "SELECT competency_id, title FROM competencies WHERE competency_id = ?1;",
    select_by_label_sql: "SELECT competency_id, title FROM competencies WHERE title = ?1;",
    delete_sql: "DELETE FROM competencies WHERE competency_id = ?1;",
};

fn insert_entity(conn: &Connection, table: &EntityTable, label: &str) -> RepoResult<i64> {
    validate_label(table.kind, label)?;

    match conn.execute(table.insert_sql, [label]) {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            info!(
                "event=entity_add module=repo status=ok kind={} id={}",
                table.kind, id
            );
            Ok(id)
        }
        Err(err) if is_unique_violation(&err) => Err(RepoError::DuplicateName {
            kind: table.kind,
            value: label.to_string(),
        }),
        Err(err) => Err(err.into()),
    }
}

fn find_by_id(conn: &Connection, table: &EntityTable, id: i64) -> RepoResult<Option<(i64, String)>> {
    let row = conn
        .query_row(table.select_by_id_sql, [id], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?;
    Ok(row)
}

fn find_by_label(
    conn: &Connection,
    table: &EntityTable,
    label: &str,
) -> RepoResult<Option<(i64, String)>> {
    let row = conn
        .query_row(table.select_by_label_sql, [label], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?;
    Ok(row)
}

fn delete_with_grades(conn: &Connection, table: &EntityTable, id: i64) -> RepoResult<usize> {
    let target = EntityRef {
        kind: table.kind,
        id,
    };
    // Repositories share `&Connection`; transactions are never nested on it.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    if !entity_exists(&tx, target)? {
        return Err(RepoError::NotFound(target));
    }

    let grades_removed = match table.kind {
        EntityKind::Student => delete_grades_for_student(&tx, id)?,
        EntityKind::Competency => delete_grades_for_competency(&tx, id)?,
    };
    tx.execute(table.delete_sql, [id])?;
    tx.commit()?;

    info!(
        "event=entity_delete module=repo status=ok kind={} id={} grades_removed={}",
        table.kind, id, grades_removed
    );
    Ok(grades_removed)
}
