mod cli;
mod commands;
mod error;
mod memory_bank;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Check { file, format } => commands::check::run(&file, format),
        Command::Impact { file, mb } => commands::impact::run(&file, &mb),
        Command::Context { feature, mode, mb } => commands::context::run(&feature, mode, &mb),
        Command::Grammar { format } => Ok(commands::grammar::run(format)),
        Command::Simulate {
            action,
            from,
            to,
            feature,
            depends_on,
            mb,
        } => commands::simulate::run(action, from, to, feature, depends_on, &mb),
        Command::Merge {
            target,
            deltas,
            format,
        } => commands::merge::run(&target, &deltas, format),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("mbel: {error}");
            std::process::exit(error.exit_code());
        }
    }
}
