//! `mbel merge <target> <delta>...` - print the merged text.
//!
//! The merge itself is pure; writing the result back is left to the caller
//! (`mbel merge a.mbel.md delta.txt > a.mbel.md.new`).

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::memory_bank;
use mbel_merge::{aggregate, merge_delta, InsertionPoint};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct MergeReport {
    target: String,
    merged: String,
    insertions: Vec<InsertionPoint>,
    duplicates: Vec<String>,
    conflicts: Vec<mbel_merge::TaskConflict>,
}

pub fn run(target: &Path, deltas: &[PathBuf], format: OutputFormat) -> Result<i32, CliError> {
    let mut content = memory_bank::read(target)?;
    let delta_texts: Vec<String> = deltas
        .iter()
        .map(|path| memory_bank::read(path))
        .collect::<Result<_, _>>()?;

    let borrowed: Vec<&str> = delta_texts.iter().map(String::as_str).collect();
    let report_conflicts = aggregate(&borrowed).conflicts;

    let mut insertions = Vec::new();
    let mut duplicates = Vec::new();
    for (path, delta) in deltas.iter().zip(&delta_texts) {
        let outcome = merge_delta(&content, delta);
        if outcome.duplicate {
            duplicates.push(path.display().to_string());
        }
        insertions.push(outcome.insertion);
        content = outcome.merged;
    }

    match format {
        OutputFormat::Text => print!("{content}"),
        OutputFormat::Json => {
            let report = MergeReport {
                target: target.display().to_string(),
                merged: content,
                insertions,
                duplicates,
                conflicts: report_conflicts,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).expect("report is serializable")
            );
        }
    }
    Ok(0)
}
