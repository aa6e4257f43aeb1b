//! Id-or-name resolution for students and competencies.
//!
//! # Responsibility
//! - Map a `LookupToken` onto a stored entity.
//!
//! # Invariants
//! - `LookupToken::Id` only ever consults ids, `LookupToken::Name` only labels.
//! - `LookupToken::OutOfRangeId` resolves to nothing without a query.
//! - Not found is `Ok(None)`, never an error, so callers can re-prompt.

use crate::model::{Competency, LookupToken, Student};
use crate::repo::entity_repo::EntityRepository;
use crate::repo::RepoResult;
use log::debug;

/// Resolves user tokens through an entity repository.
pub struct Resolver<R: EntityRepository> {
    repo: R,
}

impl<R: EntityRepository> Resolver<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Finds the student an id or name token refers to.
    pub fn resolve_student(&self, token: &LookupToken) -> RepoResult<Option<Student>> {
        let student = match token {
            LookupToken::Id(id) => self.repo.get_student_by_id(*id)?,
            LookupToken::OutOfRangeId(_) => None,
            LookupToken::Name(name) => self.repo.get_student_by_name(name)?,
        };
        debug!(
            "event=resolve module=service kind=student by={} found={}",
            token_mode(token),
            student.is_some()
        );
        Ok(student)
    }

    /// Finds the competency an id or title token refers to.
    pub fn resolve_competency(&self, token: &LookupToken) -> RepoResult<Option<Competency>> {
        let competency = match token {
            LookupToken::Id(id) => self.repo.get_competency_by_id(*id)?,
            LookupToken::OutOfRangeId(_) => None,
            LookupToken::Name(title) => self.repo.get_competency_by_title(title)?,
        };
        debug!(
            "event=resolve module=service kind=competency by={} found={}",
            token_mode(token),
            competency.is_some()
        );
        Ok(competency)
    }

    /// Parses raw input with `LookupToken::parse` and resolves it as a student.
    pub fn resolve_student_input(&self, raw: &str) -> RepoResult<Option<Student>> {
        self.resolve_student(&LookupToken::parse(raw))
    }

    /// Parses raw input with `LookupToken::parse` and resolves it as a competency.
    pub fn resolve_competency_input(&self, raw: &str) -> RepoResult<Option<Competency>> {
        self.resolve_competency(&LookupToken::parse(raw))
    }
}

fn token_mode(token: &LookupToken) -> &'static str {
    if token.is_id() {
        "id"
    } else {
        "name"
    }
}
