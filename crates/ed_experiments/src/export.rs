//! Result export: JSON for whole result sets, CSV with parameters alongside.

use std::path::Path;

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export simulation results to JSON format.
///
/// Writes a pretty-printed array with one object per result.
///
/// # Errors
///
/// Returns an error if `results` is empty, or if file creation or
/// serialization fails.
pub fn export_to_json(
    results: &[SimulationResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Export simulation results with parameters to CSV format.
///
/// One row per run; `results[i]` is paired with `parameter_sets[i]`.
///
/// # Errors
///
/// Returns an error if `results` is empty, the two slices differ in length,
/// or file creation or CSV writing fails.
pub fn export_to_csv(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    writer_utils::ensure_same_length(results, parameter_sets)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::sample_result;
    use crate::parameters::ParameterSpace;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_to_json() {
        let results = vec![sample_result(8), sample_result(6)];

        let file = NamedTempFile::new().unwrap();
        export_to_json(&results, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
        assert_eq!(parsed[0]["discharged"], 8);
        assert!(contents.contains("p90_wait_ms"));
    }

    #[test]
    fn test_export_to_csv() {
        let sets = ParameterSpace::grid().room_count(vec![2, 4]).generate();
        let results = vec![sample_result(5), sample_result(9)];

        let file = NamedTempFile::new().unwrap();
        export_to_csv(&results, &sets, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("experiment_id,run_id,room_count,"));
        assert!(lines[1].starts_with("grid_0,0,2,"));
        assert!(lines[2].starts_with("grid_1,1,4,"));
    }

    #[test]
    fn test_export_rejects_empty_and_mismatched_input() {
        let file = NamedTempFile::new().unwrap();
        assert!(export_to_json(&[], file.path()).is_err());

        let sets = ParameterSpace::grid().generate();
        assert!(export_to_csv(&[], &sets, file.path()).is_err());
        let results = vec![sample_result(1), sample_result(2)];
        assert!(export_to_csv(&results, &sets, file.path()).is_err());
    }
}
