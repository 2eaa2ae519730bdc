//! Command line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mbel", version, about = "Query and validate MBEL memory banks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a memory-bank file and report diagnostics
    Check {
        /// File to validate
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show what editing a source file would affect
    Impact {
        /// Source file path as recorded in the memory bank
        file: String,
        /// Memory-bank directory
        #[arg(long = "mb", default_value = "memory-bank")]
        mb: PathBuf,
    },
    /// Show the work context for a feature
    Context {
        /// Feature or task name
        feature: String,
        #[arg(long, value_enum, default_value_t = ContextMode::Summary)]
        mode: ContextMode,
        /// Memory-bank directory
        #[arg(long = "mb", default_value = "memory-bank")]
        mb: PathBuf,
    },
    /// Print the notation reference
    Grammar {
        #[arg(long, value_enum, default_value_t = GrammarFormat::Bnf)]
        format: GrammarFormat,
    },
    /// Simulate a dependency-graph change without touching any file
    Simulate {
        #[arg(long, value_enum)]
        action: SimulateAction,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        feature: Option<String>,
        /// Comma-separated dependency names for add-feature
        #[arg(long = "depends-on", value_delimiter = ',')]
        depends_on: Vec<String>,
        /// Memory-bank directory
        #[arg(long = "mb", default_value = "memory-bank")]
        mb: PathBuf,
    },
    /// Fold delta snippets into a target file and print the merged text
    Merge {
        /// Target memory-bank file
        target: PathBuf,
        /// Delta snippet files, applied in order
        #[arg(required = true)]
        deltas: Vec<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextMode {
    Summary,
    Full,
    Compact,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrammarFormat {
    Bnf,
    Examples,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum SimulateAction {
    AddDep,
    RemoveDep,
    AddFeature,
    RemoveFeature,
}
