//! Command-line flags.

use clap::Parser;
use std::io;
use std::path::PathBuf;

/// Student competency gradebook backed by a local SQLite file.
#[derive(Parser, Debug)]
#[command(name = "gradebook", version, about, long_about = None)]
pub struct Args {
    /// SQLite database file; created on first use
    #[arg(long, env = "GRADEBOOK_DB", default_value = "student_records.db")]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults to debug in debug builds, info otherwise
    #[arg(long, env = "GRADEBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files; logging stays off when unset
    #[arg(long, env = "GRADEBOOK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print student reports as JSON instead of the text layout
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Log directory made absolute against the working directory.
    pub fn absolute_log_dir(&self) -> io::Result<Option<PathBuf>> {
        match &self.log_dir {
            Some(dir) if dir.is_absolute() => Ok(Some(dir.clone())),
            Some(dir) => Ok(Some(std::env::current_dir()?.join(dir))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "gradebook",
            "--db",
            "/tmp/class.db",
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert_eq!(args.db, PathBuf::from("/tmp/class.db"));
        assert_eq!(args.log_level.as_deref(), Some("warn"));
        assert!(!args.json);

        let args = Args::try_parse_from(["gradebook", "--json"]).unwrap();
        assert!(args.json);
    }

    #[test]
    fn relative_log_dir_is_anchored_to_working_directory() {
        let args = Args::try_parse_from(["gradebook", "--log-dir", "logs"]).unwrap();
        let dir = args.absolute_log_dir().unwrap().unwrap();
        assert!(dir.is_absolute());
        assert!(dir.ends_with("logs"));
    }
}
