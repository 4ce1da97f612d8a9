use std::fmt::Display;
use std::str::FromStr;

use serde::Serialize;

use crate::config::RuntimeConfig;
use crate::data::{load_roster, validate_roster, Roster, SkillCategory, ValidationSeverity, SKILL_COUNT};
use crate::error::VoyageError;
use crate::optimizer::{
    compare_strategies, optimize_scenario, overskill_advice, rebalance_skills,
    OptimizationScenario, RebalanceOptions, Strategy,
};
use crate::parallel::CancellationToken;
use crate::voyage::{
    format_duration, quick_estimate, ExtendAggregator, SimulationConfig, VoyageEstimate,
    DEFAULT_EXTENDS,
};

const USAGE: &str = "usage: voyager <estimate|quick|optimize|compare|rebalance>";
const ESTIMATE_USAGE: &str =
    "usage: voyager estimate <ps> <ss> <o1> <o2> <o3> <o4> <pool> [extends] [sims] [seed] [--table] [--pool-now <am>] [--elapsed <hours>]";
const QUICK_USAGE: &str = "usage: voyager quick <ps> <ss> <o1> <o2> <o3> <o4> <pool>";
const OPTIMIZE_USAGE: &str =
    "usage: voyager optimize <roster.json> <primary> <secondary> <pool> [strategy]";
const COMPARE_USAGE: &str = "usage: voyager compare <roster.json> <primary> <secondary> <pool>";
const REBALANCE_USAGE: &str =
    "usage: voyager rebalance <ps> <ss> <o1> <o2> <o3> <o4> <pool> [increment]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Estimate,
    Quick,
    Optimize,
    Compare,
    Rebalance,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("estimate") => Some(Command::Estimate),
        Some("quick") => Some(Command::Quick),
        Some("optimize") => Some(Command::Optimize),
        Some("compare") => Some(Command::Compare),
        Some("rebalance") => Some(Command::Rebalance),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Estimate) => handle_estimate(args),
        Some(Command::Quick) => handle_quick(args),
        Some(Command::Optimize) => handle_optimize(args),
        Some(Command::Compare) => handle_compare(args),
        Some(Command::Rebalance) => handle_rebalance(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_estimate(args: &[String]) -> i32 {
    let positional = positional_args(args);
    let Some((skills, pool)) = parse_skills_and_pool(positional, ESTIMATE_USAGE) else {
        return 2;
    };
    let Ok(current_pool) = flag_value::<u32>(args, "--pool-now", ESTIMATE_USAGE) else {
        return 2;
    };
    let Ok(elapsed_hours) = flag_value::<f64>(args, "--elapsed", ESTIMATE_USAGE) else {
        return 2;
    };
    let runtime = RuntimeConfig::from_env();
    let extends = parse_arg(positional.get(9), "extends", DEFAULT_EXTENDS);
    let sims = parse_arg(positional.get(10), "sims", runtime.sims);
    let seed = parse_arg(positional.get(11), "seed", runtime.seed);
    let as_table = args.iter().any(|arg| arg == "--table");

    // Ordered input, so the category labels only name the first two slots.
    let mut config = SimulationConfig::from_ordered(SkillCategory::Command, SkillCategory::Science, skills, pool)
        .with_extends(extends)
        .with_sims(sims)
        .with_seed(seed);
    if let Some(current_pool) = current_pool {
        config = config.with_current_pool(current_pool);
    }
    if let Some(elapsed_hours) = elapsed_hours {
        config = config.with_elapsed_hours(elapsed_hours);
    }
    let estimate = ExtendAggregator::new(config)
        .and_then(|aggregator| aggregator.run_parallel(&runtime.worker_pool(), &CancellationToken::new()));
    let estimate = match estimate {
        Ok(estimate) => estimate,
        Err(err) => return fail("estimate", &err),
    };

    if as_table {
        print_estimate_table(&estimate);
        0
    } else {
        emit_json(&estimate, "estimate")
    }
}

fn print_estimate_table(estimate: &VoyageEstimate) {
    println!("extend\tmedian\t90%\t99%\tcheckpoint\tchance\trefill_cost");
    for leg in &estimate.extends {
        println!(
            "{}\t{}\t{}\t{}\t{}h\t{}%\t{}",
            leg.extend,
            format_duration(leg.result),
            format_duration(leg.safe_result),
            format_duration(leg.safer_result),
            leg.last_checkpoint,
            leg.checkpoint_chance,
            leg.refill_cost
        );
    }
    println!(
        "20h voyage: {} refills costing {}",
        estimate.long_voyage_refills, estimate.long_voyage_refill_cost
    );
}

fn handle_quick(args: &[String]) -> i32 {
    let Some((skills, pool)) = parse_skills_and_pool(args, QUICK_USAGE) else {
        return 2;
    };
    match quick_estimate(skills, pool) {
        Ok(estimate) => emit_json(&estimate, "estimate"),
        Err(err) => fail("quick estimate", &err),
    }
}

fn handle_optimize(args: &[String]) -> i32 {
    let Some((path, mut scenario)) = parse_roster_scenario(args, OPTIMIZE_USAGE) else {
        return 2;
    };
    if let Some(raw) = args.get(6) {
        match raw.parse::<Strategy>() {
            Ok(strategy) => scenario.strategy = strategy,
            Err(err) => {
                eprintln!("{err}\n{OPTIMIZE_USAGE}");
                return 2;
            }
        }
    }
    let Some(roster) = load_checked_roster(path) else {
        return 1;
    };

    let optimized = match optimize_scenario(&roster, &scenario) {
        Ok(optimized) => optimized,
        Err(err) => return fail("optimization", &err),
    };
    eprint!("{}", optimized.lineup);

    let summary = optimized.summary(scenario.primary, scenario.secondary);
    let ordered = summary
        .skill_totals
        .ordered_for(scenario.primary, scenario.secondary);
    let payload = serde_json::json!({
        "lineup": summary,
        "overskill": overskill_advice(ordered, optimized.estimate.median_hours()),
    });
    emit_json(&payload, "optimization result")
}

fn handle_compare(args: &[String]) -> i32 {
    let Some((path, scenario)) = parse_roster_scenario(args, COMPARE_USAGE) else {
        return 2;
    };
    let Some(roster) = load_checked_roster(path) else {
        return 1;
    };
    match compare_strategies(&roster, &scenario) {
        Ok(comparison) => emit_json(&comparison, "strategy comparison"),
        Err(err) => fail("comparison", &err),
    }
}

fn handle_rebalance(args: &[String]) -> i32 {
    let Some((skills, pool)) = parse_skills_and_pool(args, REBALANCE_USAGE) else {
        return 2;
    };
    let defaults = RebalanceOptions::default();
    let options = RebalanceOptions {
        increment: parse_arg(args.get(9), "increment", defaults.increment),
        ..defaults
    };
    let config = SimulationConfig::from_ordered(SkillCategory::Command, SkillCategory::Science, skills, pool);

    match rebalance_skills(&config, &options) {
        Ok(result) => {
            let payload = serde_json::json!({
                "original": result.original.ordered_for(config.primary, config.secondary),
                "suggested": result.suggested.ordered_for(config.primary, config.secondary),
                "original_hours": result.original_hours,
                "suggested_hours": result.suggested_hours,
                "gain_hours": result.gain(),
                "transfers": result.transfers,
            });
            emit_json(&payload, "rebalance result")
        }
        Err(err) => fail("rebalance", &err),
    }
}

fn parse_skills_and_pool(args: &[String], usage: &str) -> Option<([u32; SKILL_COUNT], u32)> {
    let mut skills = [0u32; SKILL_COUNT];
    for (slot, value) in skills.iter_mut().enumerate() {
        *value = required(args, 2 + slot, "skill", usage)?;
    }
    let pool = required(args, 8, "pool", usage)?;
    Some((skills, pool))
}

fn parse_roster_scenario<'a>(
    args: &'a [String],
    usage: &str,
) -> Option<(&'a str, OptimizationScenario)> {
    let Some(path) = args.get(2) else {
        eprintln!("{usage}");
        return None;
    };
    let primary: SkillCategory = required(args, 3, "primary skill", usage)?;
    let secondary: SkillCategory = required(args, 4, "secondary skill", usage)?;
    let start_pool = required(args, 5, "pool", usage)?;
    let runtime = RuntimeConfig::from_env();
    let scenario = OptimizationScenario {
        sims: runtime.sims,
        seed: runtime.seed,
        workers: Some(runtime.workers),
        ..OptimizationScenario::new(primary, secondary, start_pool)
    };
    Some((path.as_str(), scenario))
}

fn load_checked_roster(path: &str) -> Option<Roster> {
    let roster = match load_roster(path) {
        Ok(roster) => roster,
        Err(err) => {
            eprintln!("{err}");
            return None;
        }
    };
    let report = validate_roster(&roster);
    for diagnostic in &report.diagnostics {
        if diagnostic.severity != ValidationSeverity::Info {
            eprintln!("- {diagnostic}");
        }
    }
    if report.has_errors() {
        eprintln!(
            "roster validation failed: {} error(s)",
            report.count(ValidationSeverity::Error)
        );
        return None;
    }
    Some(roster)
}

fn required<T>(args: &[String], index: usize, name: &str, usage: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = args.get(index) else {
        eprintln!("{usage}");
        return None;
    };
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("invalid {name} '{raw}': {err}\n{usage}");
            None
        }
    }
}

/// Arguments before the first `--` flag.
fn positional_args(args: &[String]) -> &[String] {
    let end = args
        .iter()
        .position(|arg| arg.starts_with("--"))
        .unwrap_or(args.len());
    &args[..end]
}

/// Value following `flag`, if present. A missing or unparsable value is a
/// usage error.
fn flag_value<T>(args: &[String], flag: &str, usage: &str) -> Result<Option<T>, ()>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(index) = args.iter().position(|arg| arg == flag) else {
        return Ok(None);
    };
    required(args, index + 1, flag, usage).map(Some).ok_or(())
}

fn parse_arg<T>(raw: Option<&String>, name: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    raw.filter(|value| !value.starts_with("--"))
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw.filter(|value| !value.starts_with("--")) {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn emit_json<T: Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn fail(what: &str, err: &VoyageError) -> i32 {
    eprintln!("{what} failed: {err}");
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command(&args(&["voyager", "quick"])), Some(Command::Quick));
        assert_eq!(parse_command(&args(&["voyager", "compare"])), Some(Command::Compare));
        assert_eq!(parse_command(&args(&["voyager", "serve"])), None);
        assert_eq!(parse_command(&args(&["voyager"])), None);
    }

    #[test]
    fn flags_end_positional_arguments() {
        let raw = args(&[
            "voyager", "estimate", "1", "2", "3", "4", "5", "6", "2700", "--pool-now", "100",
            "--elapsed", "2.5",
        ]);
        assert_eq!(positional_args(&raw).len(), 9);
        assert_eq!(flag_value::<u32>(&raw, "--pool-now", ESTIMATE_USAGE), Ok(Some(100)));
        assert_eq!(flag_value::<f64>(&raw, "--elapsed", ESTIMATE_USAGE), Ok(Some(2.5)));
        assert_eq!(flag_value::<u32>(&raw, "--table", ESTIMATE_USAGE), Ok(None));

        let dangling = args(&["voyager", "estimate", "--elapsed"]);
        assert_eq!(flag_value::<f64>(&dangling, "--elapsed", ESTIMATE_USAGE), Err(()));
    }

    #[test]
    fn skills_and_pool_are_required() {
        let full = args(&["voyager", "quick", "1", "2", "3", "4", "5", "6", "2700"]);
        assert_eq!(
            parse_skills_and_pool(&full, QUICK_USAGE),
            Some(([1, 2, 3, 4, 5, 6], 2700))
        );
        let short = args(&["voyager", "quick", "1", "2", "3"]);
        assert_eq!(parse_skills_and_pool(&short, QUICK_USAGE), None);
        let bad = args(&["voyager", "quick", "1", "2", "x", "4", "5", "6", "2700"]);
        assert_eq!(parse_skills_and_pool(&bad, QUICK_USAGE), None);
    }

    #[test]
    fn optional_args_skip_flags_and_fall_back() {
        let table = "--table".to_string();
        let junk = "many".to_string();
        let three = "3".to_string();
        assert_eq!(parse_arg(Some(&table), "extends", 2usize), 2);
        assert_eq!(parse_arg(Some(&junk), "extends", 2usize), 2);
        assert_eq!(parse_arg(Some(&three), "extends", 2usize), 3);
        assert_eq!(parse_arg(None, "extends", 2usize), 2);
    }

    #[test]
    fn roster_scenario_parses_categories() {
        let raw = args(&["voyager", "compare", "crew.json", "eng", "medicine", "2500"]);
        let (path, scenario) = parse_roster_scenario(&raw, COMPARE_USAGE).expect("valid scenario");
        assert_eq!(path, "crew.json");
        assert_eq!(scenario.primary, SkillCategory::Engineering);
        assert_eq!(scenario.secondary, SkillCategory::Medicine);
        assert_eq!(scenario.start_pool, 2500);
    }
}
