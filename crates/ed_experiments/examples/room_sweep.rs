//! Example: how many rooms does a day at a given arrival rate need?
//!
//! Sweeps room count against arrival spacing, prints the outcome of every run
//! and writes the results next to the working directory.
//!
//! Run with: cargo run -p ed_experiments --example room_sweep

use ed_core::scenario::TriagePolicyKind;
use ed_experiments::{export_to_csv, export_to_json, run_parallel_experiments, ParameterSpace};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let space = ParameterSpace::grid()
        .room_count(vec![2, 3, 4, 5, 6, 8])
        .arrival_interval_mins(vec![2, 3, 5])
        .triage_policy(vec![
            TriagePolicyKind::Cyclic,
            TriagePolicyKind::Random { seed: 7 },
        ]);

    let parameter_sets = space.generate();
    println!("Running {} simulations in parallel...", parameter_sets.len());
    let results = run_parallel_experiments(parameter_sets.clone(), None)?;

    println!(
        "\n{:>5} {:>8} {:>8} {:>10} {:>9} {:>8} {:>12}",
        "rooms", "interval", "policy", "discharged", "abandoned", "deceased", "p90 wait min"
    );
    for (set, result) in parameter_sets.iter().zip(&results) {
        let policy = match set.params.triage_policy {
            TriagePolicyKind::Cyclic => "cyclic",
            TriagePolicyKind::Random { .. } => "random",
        };
        println!(
            "{:>5} {:>8} {:>8} {:>10} {:>9} {:>8} {:>12.1}",
            set.params.room_count,
            set.arrival_interval_mins(),
            policy,
            result.discharged,
            result.abandoned,
            result.deceased,
            result.p90_wait_ms / 60_000.0,
        );
    }

    export_to_json(&results, "room_sweep.json")?;
    export_to_csv(&results, &parameter_sets, "room_sweep.csv")?;
    println!("\nWrote room_sweep.json and room_sweep.csv");
    Ok(())
}
