use gradebook_core::db::open_db_in_memory;
use gradebook_core::{
    EntityRef, EntityRepository, GradeEntry, GradeRepository, LevelCount, RepoError,
    SqliteEntityRepository, SqliteGradeRepository,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn seed(conn: &Connection) -> (i64, i64) {
    let repo = SqliteEntityRepository::try_new(conn).unwrap();
    let student = repo.add_student("Ada").unwrap();
    let competency = repo.add_competency("Recursion").unwrap();
    (student, competency)
}

#[test]
fn reassigning_overwrites_level_in_place() {
    let conn = setup();
    let (student, competency) = seed(&conn);
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    let first_id = grades.assign_grade(student, competency, 2).unwrap();
    let second_id = grades.assign_grade(student, competency, 4).unwrap();

    assert_eq!(first_id, second_id);
    assert_eq!(grade_rows(&conn), 1);
    let grade = grades.get_grade(student, competency).unwrap().unwrap();
    assert_eq!(grade.level, 4);
    assert_eq!(grade.id, first_id);
}

#[test]
fn repeated_identical_assignment_is_idempotent() {
    let conn = setup();
    let (student, competency) = seed(&conn);
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    let first = grades.assign_grade(student, competency, 3).unwrap();
    let again = grades.assign_grade(student, competency, 3).unwrap();

    assert_eq!(first, again);
    assert_eq!(grade_rows(&conn), 1);
}

#[test]
fn every_level_on_the_scale_is_accepted() {
    let conn = setup();
    let (student, competency) = seed(&conn);
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    for level in 1..=4 {
        grades.assign_grade(student, competency, level).unwrap();
        let stored = grades.get_grade(student, competency).unwrap().unwrap();
        assert_eq!(stored.level, level);
    }
}

#[test]
fn levels_outside_scale_are_invalid() {
    let conn = setup();
    let (student, competency) = seed(&conn);
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    for level in [0, 5, -1, 100] {
        let err = grades.assign_grade(student, competency, level).unwrap_err();
        assert!(matches!(err, RepoError::InvalidLevel(value) if value == level));
        assert!(err.is_recoverable());
    }
    assert_eq!(grade_rows(&conn), 0);
}

#[test]
fn level_is_checked_before_references() {
    let conn = setup();
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    let err = grades.assign_grade(99, 99, 9).unwrap_err();
    assert!(matches!(err, RepoError::InvalidLevel(9)));
}

#[test]
fn missing_references_are_rejected() {
    let conn = setup();
    let (student, competency) = seed(&conn);
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    let err = grades.assign_grade(student + 10, competency, 2).unwrap_err();
    assert!(
        matches!(err, RepoError::InvalidReference(target) if target == EntityRef::student(student + 10))
    );

    let err = grades.assign_grade(student, competency + 10, 2).unwrap_err();
    assert!(
        matches!(err, RepoError::InvalidReference(target) if target == EntityRef::competency(competency + 10))
    );

    assert_eq!(grade_rows(&conn), 0);
}

#[test]
fn grades_for_student_joins_titles_in_competency_order() {
    let conn = setup();
    let entities = SqliteEntityRepository::try_new(&conn).unwrap();
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    let ada = entities.add_student("Ada").unwrap();
    let grace = entities.add_student("Grace").unwrap();
    let recursion = entities.add_competency("Recursion").unwrap();
    let closures = entities.add_competency("Closures").unwrap();
    grades.assign_grade(ada, closures, 1).unwrap();
    grades.assign_grade(ada, recursion, 3).unwrap();
    grades.assign_grade(grace, recursion, 4).unwrap();

    let listed = grades.grades_for_student(ada).unwrap();
    assert_eq!(
        listed,
        vec![
            GradeEntry {
                competency_id: recursion,
                competency_title: "Recursion".to_string(),
                level: 3,
            },
            GradeEntry {
                competency_id: closures,
                competency_title: "Closures".to_string(),
                level: 1,
            },
        ]
    );
}

#[test]
fn grades_for_student_without_grades_is_empty() {
    let conn = setup();
    let (student, _) = seed(&conn);
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    assert!(grades.grades_for_student(student).unwrap().is_empty());
    assert!(grades.grades_for_student(404).unwrap().is_empty());
    assert!(grades.grade_counts_for_student(student).unwrap().is_empty());
}

#[test]
fn level_counts_are_descending_and_skip_absent_levels() {
    let conn = setup();
    let entities = SqliteEntityRepository::try_new(&conn).unwrap();
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    let ada = entities.add_student("Ada").unwrap();
    for (title, level) in [("A", 4), ("B", 1), ("C", 4), ("D", 2)] {
        let competency = entities.add_competency(title).unwrap();
        grades.assign_grade(ada, competency, level).unwrap();
    }

    let counts = grades.grade_counts_for_student(ada).unwrap();
    assert_eq!(
        counts,
        vec![
            LevelCount { level: 4, count: 2 },
            LevelCount { level: 2, count: 1 },
            LevelCount { level: 1, count: 1 },
        ]
    );
}

#[test]
fn delete_grade_removes_single_pair() {
    let conn = setup();
    let entities = SqliteEntityRepository::try_new(&conn).unwrap();
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    let ada = entities.add_student("Ada").unwrap();
    let recursion = entities.add_competency("Recursion").unwrap();
    let closures = entities.add_competency("Closures").unwrap();
    grades.assign_grade(ada, recursion, 3).unwrap();
    grades.assign_grade(ada, closures, 2).unwrap();

    grades.delete_grade(ada, recursion).unwrap();

    assert!(grades.get_grade(ada, recursion).unwrap().is_none());
    assert!(grades.get_grade(ada, closures).unwrap().is_some());

    let err = grades.delete_grade(ada, recursion).unwrap_err();
    assert!(matches!(
        err,
        RepoError::GradeNotFound {
            student_id,
            competency_id,
        } if student_id == ada && competency_id == recursion
    ));
}

fn grade_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM grades;", [], |row| row.get(0))
        .unwrap()
}
