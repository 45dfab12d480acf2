//! Parallel simulation execution using rayon.

use ed_core::error::SimulationError;
use ed_core::simulation::Simulator;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("run {run_id} failed: {source}")]
    Simulation {
        run_id: usize,
        #[source]
        source: SimulationError,
    },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Run a single simulation with the given parameter set.
///
/// Creates a fresh simulator, runs it to completion and extracts metrics.
pub fn run_single_simulation(param_set: &ParameterSet) -> Result<SimulationResult, SimulationError> {
    let mut simulator = Simulator::new(param_set.params.clone());
    simulator.init()?;
    let report = simulator.run()?;
    let telemetry = simulator.telemetry().ok_or(SimulationError::NotInitialized)?;
    debug!(run_id = param_set.run_id, %report, "run finished");
    Ok(SimulationResult::from_run(&report, telemetry))
}

/// Run multiple simulations in parallel with a progress bar.
///
/// Results come back in the same order as `parameter_sets`. `num_threads`
/// defaults to rayon's choice.
pub fn run_parallel_experiments(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
) -> Result<Vec<SimulationResult>, ExperimentError> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Run multiple simulations in parallel with optional progress bar.
///
/// The first failing run aborts the sweep.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<SimulationResult>, ExperimentError> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
        bar.set_style(style);
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;
    info!(runs = total, threads = pool.current_num_threads(), "starting sweep");

    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_simulation(param_set).map_err(|source| {
                    ExperimentError::Simulation {
                        run_id: param_set.run_id,
                        source,
                    }
                });
                if let Some(progress_bar) = &pb {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, _>>()
    });

    if let Some(progress_bar) = &pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSpace;
    use ed_core::error::ConfigError;
    use ed_core::scenario::SimulationParams;

    #[test]
    fn test_single_simulation() {
        let sets = ParameterSpace::grid()
            .room_count(vec![2])
            .patient_count(vec![20])
            .generate();
        let result = run_single_simulation(&sets[0]).expect("run");

        assert_eq!(result.patients_total, 20);
        assert_eq!(
            result.discharged + result.abandoned + result.deceased,
            result.patients_total
        );
        assert!(result.events_processed > 0);
    }

    #[test]
    fn test_parallel_matches_sequential_order() {
        let sets = ParameterSpace::grid()
            .room_count(vec![1, 3])
            .patient_count(vec![10, 30])
            .generate();
        let sequential: Vec<SimulationResult> = sets
            .iter()
            .map(|set| run_single_simulation(set).expect("run"))
            .collect();

        let parallel = run_parallel_experiments_with_progress(sets, Some(2), false).expect("sweep");

        assert_eq!(parallel.len(), 4);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_invalid_set_fails_the_sweep() {
        let mut sets = ParameterSpace::grid().room_count(vec![1, 2]).generate();
        sets[1].params = SimulationParams::default().with_room_count(0);

        let error = run_parallel_experiments_with_progress(sets, Some(1), false)
            .expect_err("room count 0 is invalid");
        match error {
            ExperimentError::Simulation { run_id, source } => {
                assert_eq!(run_id, 1);
                assert_eq!(
                    source,
                    SimulationError::Config(ConfigError::NonPositiveRoomCount)
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
