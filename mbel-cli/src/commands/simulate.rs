//! `mbel simulate` - what-if analysis on the dependency graph.

use crate::cli::SimulateAction;
use crate::error::CliError;
use crate::memory_bank;
use mbel_query::{QueryEngine, SimulationOp};
use mbel_syntax::parse;
use std::path::Path;

#[allow(clippy::too_many_arguments)]
pub fn run(
    action: SimulateAction,
    from: Option<String>,
    to: Option<String>,
    feature: Option<String>,
    depends_on: Vec<String>,
    mb: &Path,
) -> Result<i32, CliError> {
    let op = build_op(action, from, to, feature, depends_on)?;

    let source = memory_bank::load(mb)?;
    let result = parse(&source);
    let engine = QueryEngine::build_from_document(&result.document);

    let simulation = engine.simulate(op);
    println!(
        "{}",
        serde_json::to_string_pretty(&simulation).expect("simulation is serializable")
    );
    Ok(0)
}

fn build_op(
    action: SimulateAction,
    from: Option<String>,
    to: Option<String>,
    feature: Option<String>,
    depends_on: Vec<String>,
) -> Result<SimulationOp, CliError> {
    let require = |value: Option<String>, flag: &'static str, action: &'static str| {
        value.ok_or(CliError::MissingFlag { flag, action })
    };

    Ok(match action {
        SimulateAction::AddDep => SimulationOp::AddDep {
            from: require(from, "from", "add-dep")?,
            to: require(to, "to", "add-dep")?,
        },
        SimulateAction::RemoveDep => SimulationOp::RemoveDep {
            from: require(from, "from", "remove-dep")?,
            to: require(to, "to", "remove-dep")?,
        },
        SimulateAction::AddFeature => SimulationOp::AddFeature {
            name: require(feature, "feature", "add-feature")?,
            depends_on,
        },
        SimulateAction::RemoveFeature => SimulationOp::RemoveFeature {
            name: require(feature, "feature", "remove-feature")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_dep_requires_both_endpoints() {
        let err = build_op(SimulateAction::AddDep, Some("A".into()), None, None, vec![]);
        assert!(matches!(
            err,
            Err(CliError::MissingFlag { flag: "to", .. })
        ));
    }

    #[test]
    fn add_feature_takes_dependency_list() {
        let op = build_op(
            SimulateAction::AddFeature,
            None,
            None,
            Some("New".into()),
            vec!["A".into(), "B".into()],
        )
        .unwrap();
        assert_eq!(
            op,
            SimulationOp::AddFeature {
                name: "New".into(),
                depends_on: vec!["A".into(), "B".into()],
            }
        );
    }
}
