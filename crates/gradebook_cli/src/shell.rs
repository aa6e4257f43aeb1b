//! Menu-driven shell over the gradebook core.
//!
//! # Responsibility
//! - Prompt for input, parse ids/levels at the boundary, render results.
//! - Re-prompt on recoverable core errors; stop on storage failures.
//!
//! # Invariants
//! - Every line handed to the core is trimmed.
//! - End of input ends the session like the Exit option.

use crate::render;
use anyhow::Result;
use gradebook_core::{
    EntityKind, EntityRepository, GradeLevel, GradeRepository, LookupToken, RepoResult,
    ReportService, Resolver, SqliteEntityRepository, SqliteGradeRepository,
};
use log::info;
use rusqlite::Connection;
use std::io::{BufRead, Write};

enum Flow {
    Continue,
    Exit,
}

/// Interactive session bound to one open database.
pub struct Shell<'conn, R, W> {
    entities: SqliteEntityRepository<'conn>,
    grades: SqliteGradeRepository<'conn>,
    resolver: Resolver<SqliteEntityRepository<'conn>>,
    reports: ReportService<SqliteGradeRepository<'conn>>,
    json_reports: bool,
    input: R,
    output: W,
}

impl<'conn, R: BufRead, W: Write> Shell<'conn, R, W> {
    pub fn new(conn: &'conn Connection, input: R, output: W) -> RepoResult<Self> {
        let entities = SqliteEntityRepository::try_new(conn)?;
        let grades = SqliteGradeRepository::try_new(conn)?;
        Ok(Self {
            entities,
            grades,
            resolver: Resolver::new(entities),
            reports: ReportService::new(grades),
            json_reports: false,
            input,
            output,
        })
    }

    /// Prints reports as pretty JSON instead of the text layout.
    pub fn with_json_reports(mut self, enabled: bool) -> Self {
        self.json_reports = enabled;
        self
    }

    /// Runs the menu loop until Exit or end of input.
    pub fn run(&mut self) -> Result<()> {
        info!("event=session module=cli status=start");
        loop {
            writeln!(self.output, "{}", render::MENU)?;
            let Some(choice) = self.prompt("Select an option: ")? else {
                break;
            };

            let flow = match choice.as_str() {
                "1" => self.add_student()?,
                "2" => self.add_competency()?,
                "3" => self.assign_grade()?,
                "4" => self.student_report()?,
                "5" => self.delete_student()?,
                "6" => self.delete_competency()?,
                "7" => Flow::Exit,
                _ => {
                    writeln!(self.output, "Invalid option. Try again.")?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                break;
            }
        }
        writeln!(self.output, "Exiting student record manager...")?;
        self.output.flush()?;
        info!("event=session module=cli status=end");
        Ok(())
    }

    fn add_student(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt("Student name: ")? else {
            return Ok(Flow::Exit);
        };
        let added = self.entities.add_student(&name);
        if let Some(id) = self.recover(added)? {
            writeln!(self.output, "{}", render::student_added(&name, id))?;
        }
        Ok(Flow::Continue)
    }

    fn add_competency(&mut self) -> Result<Flow> {
        let Some(title) = self.prompt("Competency title: ")? else {
            return Ok(Flow::Exit);
        };
        let added = self.entities.add_competency(&title);
        if let Some(id) = self.recover(added)? {
            writeln!(self.output, "{}", render::competency_added(&title, id))?;
        }
        Ok(Flow::Continue)
    }

    fn assign_grade(&mut self) -> Result<Flow> {
        let Some(token) = self.prompt_token("Student name or ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(student) = self.resolver.resolve_student(&token)? else {
            return self.report_not_found(EntityKind::Student, &token);
        };

        let Some(token) = self.prompt_token("Competency title or ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(competency) = self.resolver.resolve_competency(&token)? else {
            return self.report_not_found(EntityKind::Competency, &token);
        };

        writeln!(self.output, "{}", render::level_legend())?;
        let Some(raw_level) = self.prompt("Level: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(level) = raw_level.parse::<i64>() else {
            writeln!(self.output, "{}", render::INVALID_LEVEL)?;
            return Ok(Flow::Continue);
        };

        let assigned = self.grades.assign_grade(student.id, competency.id, level);
        if self.recover(assigned)?.is_some() {
            let level = GradeLevel::try_from(level)?;
            writeln!(
                self.output,
                "{}",
                render::grade_recorded(&student, &competency, level)
            )?;
        }
        Ok(Flow::Continue)
    }

    fn student_report(&mut self) -> Result<Flow> {
        let Some(token) = self.prompt_token("Student name or ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(student) = self.resolver.resolve_student(&token)? else {
            return self.report_not_found(EntityKind::Student, &token);
        };

        let report = self.reports.generate_report(student.id)?;
        if self.json_reports {
            writeln!(self.output, "{}", serde_json::to_string_pretty(&report)?)?;
        } else {
            writeln!(self.output, "{}", render::report(&student, &report))?;
        }
        Ok(Flow::Continue)
    }

    fn delete_student(&mut self) -> Result<Flow> {
        let Some(token) = self.prompt_token("Student name or ID to delete: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(student) = self.resolver.resolve_student(&token)? else {
            return self.report_not_found(EntityKind::Student, &token);
        };

        let deleted = self.entities.delete_student(student.id);
        if let Some(removed) = self.recover(deleted)? {
            writeln!(self.output, "{}", render::student_deleted(&student, removed))?;
        }
        Ok(Flow::Continue)
    }

    fn delete_competency(&mut self) -> Result<Flow> {
        let Some(token) = self.prompt_token("Competency title or ID to delete: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(competency) = self.resolver.resolve_competency(&token)? else {
            return self.report_not_found(EntityKind::Competency, &token);
        };

        let deleted = self.entities.delete_competency(competency.id);
        if let Some(removed) = self.recover(deleted)? {
            writeln!(
                self.output,
                "{}",
                render::competency_deleted(&competency, removed)
            )?;
        }
        Ok(Flow::Continue)
    }

    /// Writes `label`, reads one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_token(&mut self, label: &str) -> Result<Option<LookupToken>> {
        Ok(self.prompt(label)?.map(|raw| LookupToken::parse(&raw)))
    }

    fn report_not_found(&mut self, kind: EntityKind, token: &LookupToken) -> Result<Flow> {
        writeln!(self.output, "{}", render::not_found(kind, token))?;
        Ok(Flow::Continue)
    }

    /// Prints recoverable errors and yields `None`; passes anything else up.
    fn recover<T>(&mut self, result: RepoResult<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                writeln!(self.output, "{}", render::recoverable_error(&err))?;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
