//! `mbel impact <file>` - change-impact analysis from the memory bank.

use crate::error::CliError;
use crate::memory_bank;
use mbel_query::QueryEngine;
use mbel_syntax::parse;
use std::path::Path;

pub fn run(file: &str, mb: &Path) -> Result<i32, CliError> {
    let source = memory_bank::load(mb)?;
    let result = parse(&source);
    let engine = QueryEngine::build_from_document(&result.document);

    let impact = engine.get_impact_analysis(&[file.to_string()]);
    println!(
        "{}",
        serde_json::to_string_pretty(&impact).expect("impact is serializable")
    );
    Ok(0)
}
