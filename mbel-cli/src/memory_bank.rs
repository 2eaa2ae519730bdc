//! Memory-bank file discovery.
//!
//! The core never touches the filesystem; this is the CLI-side glue that
//! finds and concatenates the bank files before handing one source string
//! to the parser.

use crate::error::CliError;
use std::fs;
use std::path::{Path, PathBuf};

/// Well-known bank files, loaded first when present.
const KNOWN_FILES: &[&str] = &[
    "systemPatterns.mbel.md",
    "activeContext.mbel.md",
    "progress.mbel.md",
];

/// Read every memory-bank file under `dir` into one source string.
/// Well-known files come first, then any other `*.mbel` / `*.mbel.md`
/// files in name order.
pub fn load(dir: &Path) -> Result<String, CliError> {
    let mut sources: Vec<String> = Vec::new();
    let mut loaded: Vec<PathBuf> = Vec::new();

    for name in KNOWN_FILES {
        let path = dir.join(name);
        if path.is_file() {
            sources.push(read(&path)?);
            loaded.push(path);
        }
    }

    let mut extra: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| CliError::FileRead {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_bank_file(path) && !loaded.contains(path))
        .collect();
    extra.sort();

    for path in extra {
        sources.push(read(&path)?);
        loaded.push(path);
    }

    if sources.is_empty() {
        return Err(CliError::EmptyMemoryBank(dir.to_path_buf()));
    }
    tracing::debug!(files = loaded.len(), "memory bank loaded");
    Ok(sources.join("\n"))
}

/// Read a single file.
pub fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn is_bank_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".mbel") || name.ends_with(".mbel.md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_known_files_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("zz.mbel"), "z::1").unwrap();
        fs::write(dir.path().join("progress.mbel.md"), "p::1").unwrap();
        let source = load(dir.path()).unwrap();
        let p = source.find("p::1").unwrap();
        let z = source.find("z::1").unwrap();
        assert!(p < z);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(dir.path()),
            Err(CliError::EmptyMemoryBank(_))
        ));
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "hi").unwrap();
        fs::write(dir.path().join("bank.mbel"), "a::1").unwrap();
        let source = load(dir.path()).unwrap();
        assert!(!source.contains("hi"));
        assert!(source.contains("a::1"));
    }
}
