pub mod clock;
pub mod ecs;
pub mod error;
pub mod queue;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod systems;
pub mod telemetry;
pub mod trace;
pub mod triage;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
