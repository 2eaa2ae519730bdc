//! `mbel check <file>` - validate one memory-bank file.

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::memory_bank;
use mbel_analyzer::Analyzer;
use mbel_core::{Diagnostic, Severity};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    valid: bool,
    file: String,
    errors: Vec<&'a Diagnostic>,
    warnings: Vec<&'a Diagnostic>,
}

pub fn run(file: &Path, format: OutputFormat) -> Result<i32, CliError> {
    let source = memory_bank::read(file)?;
    let analysis = Analyzer::new().analyze_text(&source);

    let (errors, warnings): (Vec<&Diagnostic>, Vec<&Diagnostic>) = analysis
        .diagnostics
        .iter()
        .partition(|d| d.severity == Severity::Error);
    let report = CheckReport {
        valid: errors.is_empty(),
        file: file.display().to_string(),
        errors,
        warnings,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).expect("report is serializable"));
        }
        OutputFormat::Text => print_text(&report),
    }

    Ok(if report.valid { 0 } else { 1 })
}

fn print_text(report: &CheckReport) {
    if report.valid && report.warnings.is_empty() {
        println!("{}: ok", report.file);
        return;
    }
    for diagnostic in report.errors.iter().chain(report.warnings.iter()) {
        println!(
            "{}:{}:{}: {} [{}] {}",
            report.file,
            diagnostic.range.start.line,
            diagnostic.range.start.column,
            severity_label(diagnostic.severity),
            diagnostic.code,
            diagnostic.message
        );
    }
    println!(
        "{}: {} error(s), {} warning(s)",
        report.file,
        report.errors.len(),
        report.warnings.len()
    );
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Information => "info",
        Severity::Hint => "hint",
    }
}
