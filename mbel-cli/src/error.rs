//! CLI error type and exit codes.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no memory-bank files found in {0}")]
    EmptyMemoryBank(PathBuf),

    #[error("--{flag} is required for {action}")]
    MissingFlag {
        flag: &'static str,
        action: &'static str,
    },
}

impl CliError {
    /// All CLI failures exit with 2; `check` reserves 1 for documents with
    /// error-severity diagnostics.
    pub fn exit_code(&self) -> i32 {
        2
    }
}
