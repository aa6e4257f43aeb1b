//! Core use-case services.
//!
//! # Responsibility
//! - Turn user tokens into entities and grades into reports.
//! - Keep the shell decoupled from storage details.

pub mod report_service;
pub mod resolver;
