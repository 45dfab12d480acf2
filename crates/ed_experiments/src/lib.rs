//! Parallel parameter sweeps over the emergency department simulation.
//!
//! Each parameter set runs in its own world on a rayon pool; nothing is shared
//! between runs, so results are identical to running them one by one.
//!
//! # Quick Start
//!
//! ```no_run
//! use ed_experiments::{export_to_csv, run_parallel_experiments, ParameterSpace};
//!
//! let space = ParameterSpace::grid()
//!     .room_count(vec![3, 5, 7])
//!     .arrival_interval_mins(vec![3, 5]);
//! let parameter_sets = space.generate();
//! let results = run_parallel_experiments(parameter_sets.clone(), None).unwrap();
//! export_to_csv(&results, &parameter_sets, "sweep.csv").unwrap();
//! ```
//!
//! - [`parameters`]: grid search and random sampling of parameter sets
//! - [`runner`]: single and parallel execution
//! - [`metrics`]: per-run summary metrics
//! - [`export`]: JSON and CSV output

pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;

pub use export::{export_to_csv, export_to_json};
pub use metrics::SimulationResult;
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::{run_parallel_experiments, run_single_simulation, ExperimentError};
