//! `mbel context <feature>` - work context for one feature.

use crate::cli::ContextMode;
use crate::error::CliError;
use crate::memory_bank;
use mbel_query::{QueryEngine, WorkContext};
use mbel_syntax::parse;
use std::path::Path;

pub fn run(feature: &str, mode: ContextMode, mb: &Path) -> Result<i32, CliError> {
    let source = memory_bank::load(mb)?;
    let result = parse(&source);
    let engine = QueryEngine::build_from_document(&result.document);

    let Some(context) = engine.get_work_context(feature) else {
        println!("feature '{feature}' is not in the memory bank");
        return Ok(0);
    };

    match mode {
        ContextMode::Compact => print_compact(&context),
        ContextMode::Summary => print_summary(&context, false),
        ContextMode::Full => print_summary(&context, true),
    }
    Ok(0)
}

fn print_compact(context: &WorkContext) {
    println!(
        "{} files={} tests={} deps={} dependents={} risk={:?}",
        context.feature.name,
        context.feature.files.len(),
        context.feature.tests.len(),
        context.dependencies.direct.len(),
        context.dependents.len(),
        context.risk
    );
}

fn print_summary(context: &WorkContext, full: bool) {
    println!("# {}", context.feature.name);
    print_list("files", &context.feature.files);
    print_list("tests", &context.feature.tests);
    if let Some(ep) = &context.feature.entry_point {
        let mut entry = ep.file.clone();
        if let Some(symbol) = &ep.symbol {
            entry.push_str(&format!(":{symbol}"));
        }
        if let Some(line) = ep.line {
            entry.push_str(&format!(":{line}"));
        }
        println!("entry point: {entry}");
    }
    if let Some(why) = &context.feature.why {
        println!("why: {why}");
    }
    print_list("depends on", &context.dependencies.direct);
    if full {
        print_list("transitive", &context.dependencies.transitive);
    }
    print_list("dependents", &context.dependents);
    if !context.decisions.is_empty() {
        let names: Vec<String> = context
            .decisions
            .iter()
            .map(|d| format!("{} ({})", d.name, d.date))
            .collect();
        print_list("decisions", &names);
    }
    if full {
        for heat in &context.heat {
            match &heat.caution {
                Some(caution) => println!("heat: {:?} {} - {}", heat.heat_type, heat.path, caution),
                None => println!("heat: {:?} {}", heat.heat_type, heat.path),
            }
        }
    }
    println!("risk: {:?}", context.risk);
}

fn print_list(label: &str, items: &[String]) {
    if !items.is_empty() {
        println!("{label}: {}", items.join(", "));
    }
}
