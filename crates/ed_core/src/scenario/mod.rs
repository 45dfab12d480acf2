//! Scenario setup: run parameters and the world builder that seeds arrivals.
//!
//! Patients are generated at a fixed spacing inside the arrival window; each
//! gets an entity up front and an ARRIVAL event at its arrival time.

mod build;
mod params;

pub use build::build_scenario;
pub use params::{CareProtocol, SeverityDurations, SimulationParams};
pub use crate::triage::TriagePolicyKind;
