//! Run one voyage estimate sequentially and once in parallel, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup [sims]

use std::time::Instant;

use voyager::config::RuntimeConfig;
use voyager::data::SkillCategory;
use voyager::parallel::CancellationToken;
use voyager::voyage::{ExtendAggregator, SimulationConfig, VoyageEstimate};

fn main() {
    let runtime = RuntimeConfig::from_env();
    let sims = std::env::args()
        .nth(1)
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(20_000);
    let config = SimulationConfig::from_ordered(
        SkillCategory::Security,
        SkillCategory::Engineering,
        [13_000, 12_000, 6_000, 5_500, 5_000, 4_500],
        2700,
    )
    .with_extends(2)
    .with_sims(sims)
    .with_seed(12345);

    let aggregator = match ExtendAggregator::new(config) {
        Ok(aggregator) => aggregator,
        Err(err) => {
            eprintln!("invalid benchmark configuration: {err}");
            std::process::exit(1);
        }
    };
    let cancel = CancellationToken::new();

    println!("Voyage estimate: {sims} trials, 2 extensions");
    println!();

    let t0 = Instant::now();
    let sequential = aggregator.run_sequential(&cancel);
    let elapsed_seq = t0.elapsed();
    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    println!(
        "Sequential:  {:.2} ms  ({:.1} trials/s)",
        seq_ms,
        sims as f64 / elapsed_seq.as_secs_f64()
    );

    let t0 = Instant::now();
    let parallel = aggregator.run_parallel(&runtime.worker_pool(), &cancel);
    let elapsed_par = t0.elapsed();
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!(
        "Parallel:    {:.2} ms  ({:.1} trials/s)",
        par_ms,
        sims as f64 / elapsed_par.as_secs_f64()
    );

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    match (sequential, parallel) {
        (Ok(a), Ok(b)) => report_match(&a, &b),
        (Err(err), _) | (_, Err(err)) => eprintln!("run failed: {err}"),
    }
}

fn report_match(sequential: &VoyageEstimate, parallel: &VoyageEstimate) {
    if sequential == parallel {
        println!("(Results match sequential vs parallel)");
    } else {
        println!("WARNING: sequential and parallel estimates differ");
    }
}
