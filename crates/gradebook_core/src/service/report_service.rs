//! Per-student competency reports.
//!
//! # Invariants
//! - `entries` holds every grade the student has, each with its level name.
//! - `counts` is sorted by level descending and never contains zero counts.
//! - A student without grades yields an empty report, not an error.

use crate::model::{level_name, CompetencyId, StudentId};
use crate::repo::grade_repo::GradeRepository;
use crate::repo::RepoResult;
use serde::Serialize;

/// One line of the detail listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub competency_id: CompetencyId,
    pub title: String,
    pub level: i64,
    pub level_name: &'static str,
}

/// One line of the level summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    pub level: i64,
    pub level_name: &'static str,
    pub count: u32,
}

/// Detail listing plus level summary for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentReport {
    pub student_id: StudentId,
    pub entries: Vec<ReportEntry>,
    pub counts: Vec<LevelSummary>,
}

impl StudentReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds reports from the grade store.
pub struct ReportService<G: GradeRepository> {
    grades: G,
}

impl<G: GradeRepository> ReportService<G> {
    pub fn new(grades: G) -> Self {
        Self { grades }
    }

    /// Aggregates a student's grades into detail entries and level counts.
    pub fn generate_report(&self, student_id: StudentId) -> RepoResult<StudentReport> {
        let entries = self
            .grades
            .grades_for_student(student_id)?
            .into_iter()
            .map(|grade| ReportEntry {
                competency_id: grade.competency_id,
                level_name: level_name(grade.level),
                title: grade.competency_title,
                level: grade.level,
            })
            .collect();

        let counts = self
            .grades
            .grade_counts_for_student(student_id)?
            .into_iter()
            .map(|summary| LevelSummary {
                level: summary.level,
                level_name: level_name(summary.level),
                count: summary.count,
            })
            .collect();

        Ok(StudentReport {
            student_id,
            entries,
            counts,
        })
    }
}
