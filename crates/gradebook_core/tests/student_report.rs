use gradebook_core::db::open_db_in_memory;
use gradebook_core::{
    EntityRepository, GradeRepository, LevelSummary, ReportEntry, ReportService, Resolver,
    SqliteEntityRepository, SqliteGradeRepository,
};
use rusqlite::Connection;

#[test]
fn single_grade_report_end_to_end() {
    let conn = open_db_in_memory().unwrap();
    let entities = SqliteEntityRepository::try_new(&conn).unwrap();
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();
    let resolver = Resolver::new(entities);
    let reports = ReportService::new(grades);

    assert_eq!(entities.add_student("Ada").unwrap(), 1);
    assert_eq!(entities.add_competency("Recursion").unwrap(), 1);

    let student = resolver.resolve_student_input("Ada").unwrap().unwrap();
    let competency = resolver.resolve_competency_input("1").unwrap().unwrap();
    grades.assign_grade(student.id, competency.id, 3).unwrap();

    let report = reports.generate_report(1).unwrap();
    assert_eq!(report.student_id, 1);
    assert_eq!(
        report.entries,
        vec![ReportEntry {
            competency_id: 1,
            title: "Recursion".to_string(),
            level: 3,
            level_name: "Proficient",
        }]
    );
    assert_eq!(
        report.counts,
        vec![LevelSummary {
            level: 3,
            level_name: "Proficient",
            count: 1,
        }]
    );
}

#[test]
fn reassigned_grade_shows_only_latest_level() {
    let conn = open_db_in_memory().unwrap();
    let entities = SqliteEntityRepository::try_new(&conn).unwrap();
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();
    let reports = ReportService::new(grades);

    let ada = entities.add_student("Ada").unwrap();
    let recursion = entities.add_competency("Recursion").unwrap();
    grades.assign_grade(ada, recursion, 2).unwrap();
    grades.assign_grade(ada, recursion, 4).unwrap();

    let report = reports.generate_report(ada).unwrap();
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].level, 4);
    assert_eq!(report.entries[0].level_name, "Advanced");
    assert_eq!(
        report.counts,
        vec![LevelSummary {
            level: 4,
            level_name: "Advanced",
            count: 1,
        }]
    );
    assert!(report.counts.iter().all(|summary| summary.level != 2));
}

#[test]
fn student_without_grades_gets_empty_report() {
    let conn = open_db_in_memory().unwrap();
    let entities = SqliteEntityRepository::try_new(&conn).unwrap();
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();
    let reports = ReportService::new(grades);

    let ada = entities.add_student("Ada").unwrap();
    entities.add_competency("Recursion").unwrap();

    let report = reports.generate_report(ada).unwrap();
    assert!(report.is_empty());
    assert!(report.entries.is_empty());
    assert!(report.counts.is_empty());
}

#[test]
fn summary_groups_levels_highest_first() {
    let conn = open_db_in_memory().unwrap();
    let entities = SqliteEntityRepository::try_new(&conn).unwrap();
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();
    let reports = ReportService::new(grades);

    let ada = entities.add_student("Ada").unwrap();
    for (title, level) in [
        ("Recursion", 1),
        ("Closures", 3),
        ("Traits", 3),
        ("Lifetimes", 2),
    ] {
        let competency = entities.add_competency(title).unwrap();
        grades.assign_grade(ada, competency, level).unwrap();
    }

    let report = reports.generate_report(ada).unwrap();
    assert_eq!(report.entries.len(), 4);
    let summary: Vec<(i64, &str, u32)> = report
        .counts
        .iter()
        .map(|line| (line.level, line.level_name, line.count))
        .collect();
    assert_eq!(
        summary,
        vec![(3, "Proficient", 2), (2, "Developing", 1), (1, "Beginning", 1)]
    );
}

#[test]
fn deleted_competency_drops_out_of_report() {
    let conn = open_db_in_memory().unwrap();
    let entities = SqliteEntityRepository::try_new(&conn).unwrap();
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();
    let reports = ReportService::new(grades);

    let ada = entities.add_student("Ada").unwrap();
    let recursion = entities.add_competency("Recursion").unwrap();
    let closures = entities.add_competency("Closures").unwrap();
    grades.assign_grade(ada, recursion, 4).unwrap();
    grades.assign_grade(ada, closures, 1).unwrap();

    entities.delete_competency(recursion).unwrap();

    let report = reports.generate_report(ada).unwrap();
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].title, "Closures");
    assert_eq!(report.counts.len(), 1);
    assert_eq!(report.counts[0].level, 1);
}

#[test]
fn out_of_range_stored_level_is_labelled_unknown() {
    let conn = open_db_in_memory().unwrap();
    let entities = SqliteEntityRepository::try_new(&conn).unwrap();
    let ada = entities.add_student("Ada").unwrap();
    let recursion = entities.add_competency("Recursion").unwrap();
    write_unchecked_level(&conn, ada, recursion, 7);

    let reports = ReportService::new(SqliteGradeRepository::try_new(&conn).unwrap());
    let report = reports.generate_report(ada).unwrap();

    assert_eq!(report.entries[0].level_name, "Unknown");
    assert_eq!(report.counts[0].level_name, "Unknown");
    assert_eq!(report.counts[0].count, 1);
}

#[test]
fn report_serializes_with_level_names() {
    let conn = open_db_in_memory().unwrap();
    let entities = SqliteEntityRepository::try_new(&conn).unwrap();
    let grades = SqliteGradeRepository::try_new(&conn).unwrap();

    let ada = entities.add_student("Ada").unwrap();
    let recursion = entities.add_competency("Recursion").unwrap();
    grades.assign_grade(ada, recursion, 1).unwrap();

    let report = ReportService::new(grades).generate_report(ada).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["student_id"], 1);
    assert_eq!(json["entries"][0]["title"], "Recursion");
    assert_eq!(json["entries"][0]["level_name"], "Beginning");
    assert_eq!(json["counts"][0]["count"], 1);
}

fn write_unchecked_level(conn: &Connection, student_id: i64, competency_id: i64, level: i64) {
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "INSERT INTO grades (student_id, competency_id, level) VALUES (?1, ?2, ?3);",
        [student_id, competency_id, level],
    )
    .unwrap();
    conn.execute_batch("PRAGMA ignore_check_constraints = OFF;")
        .unwrap();
}
