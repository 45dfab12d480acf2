//! Run one default day in the emergency department and print the outcome.
//!
//! Run with: cargo run -p ed_core --example emergency_run
//! Set `RUST_LOG=ed_core=debug` to see every processed event.

use ed_core::clock::format_time_of_day;
use ed_core::simulation::Simulator;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut simulator = Simulator::default();
    let generated = match simulator.init() {
        Ok(generated) => generated,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    let (report, trace) = match simulator.run_traced() {
        Ok(result) => result,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            std::process::exit(1);
        }
    };

    let params = simulator.params();
    println!(
        "--- Emergency department ({} rooms, {} patients, {} - {}) ---",
        params.room_count,
        generated,
        format_time_of_day(params.window_start_ms),
        format_time_of_day(params.window_end_ms),
    );
    println!("Events processed: {}", trace.len());
    println!("{report}");

    if let Some(telemetry) = simulator.telemetry() {
        let waits: Vec<u64> = telemetry.discharges.iter().map(|r| r.waiting_time()).collect();
        if !waits.is_empty() {
            let avg_secs = waits.iter().sum::<u64>() as f64 / waits.len() as f64 / 1000.0;
            println!("Average wait before admission: {:.1} min", avg_secs / 60.0);
        }
    }

    println!("\nFirst events:");
    for line in trace.lines().into_iter().take(20) {
        println!("  {line}");
    }
}
