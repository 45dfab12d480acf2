use ed_core::scenario::TriagePolicyKind;

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

const HEADER: [&str; 20] = [
    "experiment_id",
    "run_id",
    "room_count",
    "patient_count",
    "arrival_interval_mins",
    "triage_policy",
    "triage_seed",
    "patients_total",
    "discharged",
    "abandoned",
    "deceased",
    "escalated",
    "discharge_rate",
    "avg_wait_ms",
    "median_wait_ms",
    "p90_wait_ms",
    "avg_time_to_admission_ms",
    "events_processed",
    "final_time_ms",
    "window_start_ms",
];

pub(crate) fn export_to_csv_impl(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(HEADER)?;

    for (result, param_set) in results.iter().zip(parameter_sets) {
        let params = &param_set.params;
        let (policy, seed) = match params.triage_policy {
            TriagePolicyKind::Cyclic => ("cyclic", String::new()),
            TriagePolicyKind::Random { seed } => ("random", seed.to_string()),
        };

        let row = [
            param_set.experiment_id.clone(),
            param_set.run_id.to_string(),
            params.room_count.to_string(),
            params.patient_count.to_string(),
            param_set.arrival_interval_mins().to_string(),
            policy.to_string(),
            seed,
            result.patients_total.to_string(),
            result.discharged.to_string(),
            result.abandoned.to_string(),
            result.deceased.to_string(),
            result.escalated.to_string(),
            result.discharge_rate.to_string(),
            result.avg_wait_ms.to_string(),
            result.median_wait_ms.to_string(),
            result.p90_wait_ms.to_string(),
            result.avg_time_to_admission_ms.to_string(),
            result.events_processed.to_string(),
            result.final_time_ms.to_string(),
            params.window_start_ms.to_string(),
        ];
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
