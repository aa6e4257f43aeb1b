//! Grade store: one level per (student, competency) pair.
//!
//! # Responsibility
//! - Upsert and delete grade rows.
//! - Provide the per-student read models used by reports.
//!
//! # Invariants
//! - At most one grade exists per pair (`UNIQUE (student_id, competency_id)`).
//! - Assigning again overwrites the level in place; `grade_id` is kept.
//! - A grade is only written when both referenced entities exist.

use crate::model::{CompetencyId, EntityRef, Grade, GradeId, GradeLevel, StudentId};
use crate::repo::{ensure_connection_ready, entity_exists, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::Serialize;

/// One grade joined with its competency title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeEntry {
    pub competency_id: CompetencyId,
    pub competency_title: String,
    pub level: i64,
}

/// Number of competencies a student holds at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: i64,
    pub count: u32,
}

/// Repository interface for grade records.
pub trait GradeRepository {
    /// Records `level` for the pair, replacing any previous level.
    ///
    /// # Errors
    /// - `InvalidLevel` when `level` is not in `1..=4`.
    /// - `InvalidReference` when the student or competency does not exist.
    fn assign_grade(
        &self,
        student_id: StudentId,
        competency_id: CompetencyId,
        level: i64,
    ) -> RepoResult<GradeId>;
    fn get_grade(
        &self,
        student_id: StudentId,
        competency_id: CompetencyId,
    ) -> RepoResult<Option<Grade>>;
    /// All grades of one student ordered by competency id. Empty when none.
    fn grades_for_student(&self, student_id: StudentId) -> RepoResult<Vec<GradeEntry>>;
    /// Per-level counts for one student, highest level first, absent levels omitted.
    fn grade_counts_for_student(&self, student_id: StudentId) -> RepoResult<Vec<LevelCount>>;
    /// Removes the grade for one pair.
    fn delete_grade(&self, student_id: StudentId, competency_id: CompetencyId) -> RepoResult<()>;
}

/// SQLite-backed grade store.
#[derive(Clone, Copy)]
pub struct SqliteGradeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGradeRepository<'conn> {
    /// Constructs a repository from a connection that passed `ensure_schema`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl GradeRepository for SqliteGradeRepository<'_> {
    fn assign_grade(
        &self,
        student_id: StudentId,
        competency_id: CompetencyId,
        level: i64,
    ) -> RepoResult<GradeId> {
        let level = GradeLevel::try_from(level)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for target in [
            EntityRef::student(student_id),
            EntityRef::competency(competency_id),
        ] {
            if !entity_exists(&tx, target)? {
                return Err(RepoError::InvalidReference(target));
            }
        }

        let grade_id: GradeId = tx.query_row(
            "INSERT INTO grades (student_id, competency_id, level)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (student_id, competency_id)
             DO UPDATE SET level = excluded.level
             RETURNING grade_id;",
            params![student_id, competency_id, level.value()],
            |row| row.get(0),
        )?;
        tx.commit()?;

        info!(
            "event=grade_assign module=repo status=ok student_id={} competency_id={} level={} grade_id={}",
            student_id,
            competency_id,
            level.value(),
            grade_id
        );
        Ok(grade_id)
    }

    fn get_grade(
        &self,
        student_id: StudentId,
        competency_id: CompetencyId,
    ) -> RepoResult<Option<Grade>> {
        let grade = self
            .conn
            .query_row(
                "SELECT grade_id, student_id, competency_id, level
                 FROM grades
                 WHERE student_id = ?1 AND competency_id = ?2;",
                params![student_id, competency_id],
                |row| {
                    Ok(Grade {
                        id: row.get("grade_id")?,
                        student_id: row.get("student_id")?,
                        competency_id: row.get("competency_id")?,
                        level: row.get("level")?,
                    })
                },
            )
            .optional()?;
        Ok(grade)
    }

    fn grades_for_student(&self, student_id: StudentId) -> RepoResult<Vec<GradeEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.competency_id, c.title, g.level
             FROM grades g
             INNER JOIN competencies c ON c.competency_id = g.competency_id
             WHERE g.student_id = ?1
             ORDER BY c.competency_id ASC;",
        )?;
        let mut rows = stmt.query([student_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(GradeEntry {
                competency_id: row.get(0)?,
                competency_title: row.get(1)?,
                level: row.get(2)?,
            });
        }
        Ok(entries)
    }

    fn grade_counts_for_student(&self, student_id: StudentId) -> RepoResult<Vec<LevelCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT level, COUNT(*)
             FROM grades
             WHERE student_id = ?1
             GROUP BY level
             ORDER BY level DESC;",
        )?;
        let mut rows = stmt.query([student_id])?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next()? {
            counts.push(LevelCount {
                level: row.get(0)?,
                count: row.get(1)?,
            });
        }
        Ok(counts)
    }

    fn delete_grade(&self, student_id: StudentId, competency_id: CompetencyId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM grades WHERE student_id = ?1 AND competency_id = ?2;",
            params![student_id, competency_id],
        )?;

        if changed == 0 {
            return Err(RepoError::GradeNotFound {
                student_id,
                competency_id,
            });
        }

        info!(
            "event=grade_delete module=repo status=ok student_id={} competency_id={}",
            student_id, competency_id
        );
        Ok(())
    }
}

/// Removes every grade held by one student. Runs on the caller's transaction.
pub(crate) fn delete_grades_for_student(
    conn: &Connection,
    student_id: StudentId,
) -> RepoResult<usize> {
    let removed = conn.execute("DELETE FROM grades WHERE student_id = ?1;", [student_id])?;
    Ok(removed)
}

/// Removes every grade recorded against one competency. Runs on the caller's transaction.
pub(crate) fn delete_grades_for_competency(
    conn: &Connection,
    competency_id: CompetencyId,
) -> RepoResult<usize> {
    let removed = conn.execute(
        "DELETE FROM grades WHERE competency_id = ?1;",
        [competency_id],
    )?;
    Ok(removed)
}
