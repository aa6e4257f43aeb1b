//! Text rendering of core results for the menu shell.

use gradebook_core::{
    Competency, EntityKind, GradeLevel, LookupToken, RepoError, Student, StudentReport,
};

pub const MENU: &str = "\n--- Student Record Manager ---
1. Add Student
2. Add Competency
3. Assign Grade
4. Generate Student Report
5. Delete Student
6. Delete Competency
7. Exit";

pub const INVALID_LEVEL: &str = "Invalid level. Must be an integer from 1 to 4.";

/// `Enter competency level (1 = Beginning, ...)`
pub fn level_legend() -> String {
    let levels = GradeLevel::ALL
        .iter()
        .map(|level| format!("{} = {}", level.value(), level.name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Enter competency level ({levels})")
}

pub fn not_found(kind: EntityKind, token: &LookupToken) -> String {
    match token {
        LookupToken::Id(_) | LookupToken::OutOfRangeId(_) => {
            format!("No {kind} found with ID '{token}'.")
        }
        LookupToken::Name(label) => {
            format!("No {kind} found with {} '{label}'.", kind.label_field())
        }
    }
}

/// Message for an error the user can fix by trying again.
pub fn recoverable_error(err: &RepoError) -> String {
    match err {
        RepoError::InvalidLevel(_) => INVALID_LEVEL.to_string(),
        RepoError::DuplicateName { kind, value } => format!(
            "\nA {kind} with {} '{value}' already exists.",
            kind.label_field()
        ),
        other => format!("\nCould not complete the action: {other}."),
    }
}

pub fn student_added(name: &str, id: i64) -> String {
    format!("\nStudent '{name}' added with ID {id}.")
}

pub fn competency_added(title: &str, id: i64) -> String {
    format!("\nCompetency '{title}' added with ID {id}.")
}

pub fn grade_recorded(student: &Student, competency: &Competency, level: GradeLevel) -> String {
    format!(
        "\nRecorded '{}' ({}) for student {} ({}) on competency {}, {}.",
        level.name(),
        level.value(),
        student.name,
        student.id,
        competency.id,
        competency.title
    )
}

pub fn student_deleted(student: &Student, grades_removed: usize) -> String {
    format!(
        "\nStudent {} ({}) and their associated grades ({grades_removed}) were deleted.",
        student.name, student.id
    )
}

pub fn competency_deleted(competency: &Competency, grades_removed: usize) -> String {
    format!(
        "\nCompetency {}, {}, and its associated grades ({grades_removed}) were deleted.",
        competency.id, competency.title
    )
}

/// Detail listing followed by the level summary.
pub fn report(student: &Student, report: &StudentReport) -> String {
    let mut out = format!("\nReport for student {} ({}):\n", student.name, student.id);
    if report.is_empty() {
        out.push_str("\tNo grades recorded.\n");
    }
    for entry in &report.entries {
        out.push_str(&format!(
            "\tCompetency {}, {}   |   {} ({})\n",
            entry.competency_id, entry.title, entry.level_name, entry.level
        ));
    }
    out.push_str("\n\t");
    out.push_str(&"-".repeat(76));
    out.push_str("\n\n\tCompetency Amount Summary:\n");
    for line in &report.counts {
        out.push_str(&format!(
            "\t\t{} ({}): {}\n",
            line.level_name, line.level, line.count
        ));
    }
    out
}
