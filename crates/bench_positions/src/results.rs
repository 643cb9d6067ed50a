//! Bench episode results and success-rate summaries

use crate::{
    constants::RESULTS_HEADER,
    error::{PlacementError, Result},
    geometry::PlacementPair,
};
use csv::{ReaderBuilder, Trim};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};

/// One evaluated episode, as recorded by the test bench
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EpisodeResult {
    /// 0-based row in the positions CSV
    pub position_num: usize,
    #[serde(deserialize_with = "de_success")]
    pub success: bool,
    pub inference_time: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub yolo_predicted_class: Option<String>,
    #[serde(default)]
    pub yolo_confidence: Option<f64>,
}

fn de_success<'de, D: serde::Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    let raw = String::deserialize(d)?;
    match raw.trim() {
        "1" | "true" | "True" => Ok(true),
        "0" | "false" | "False" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected 0 or 1 for success, got '{other}'"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub successes: usize,
    /// fraction in [0, 1]
    pub success_rate: f64,
    /// seconds, summed over every episode
    pub total_inference_time: f64,
    pub average_inference_time: f64,
}

/// A placement together with how its episode went
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub pair: PlacementPair,
    pub success: bool,
}

pub fn read_results(path: &Path) -> Result<Vec<EpisodeResult>> {
    let file = File::open(path).map_err(|e| PlacementError::OpenFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_results_from_reader(file)
}

pub fn read_results_from_reader<R: Read>(reader: R) -> Result<Vec<EpisodeResult>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?;
    for required in &RESULTS_HEADER[..3] {
        if !headers.iter().any(|h| h == *required) {
            return Err(PlacementError::CsvHeader(format!(
                "Missing '{}' column",
                required
            )));
        }
    }

    let mut results = Vec::new();
    for record in rdr.deserialize() {
        results.push(record?);
    }
    Ok(results)
}

pub fn summarize(results: &[EpisodeResult]) -> Summary {
    let total = results.len();
    let successes = results.iter().filter(|r| r.success).count();
    if total == 0 {
        return Summary {
            total,
            successes,
            success_rate: 0.0,
            total_inference_time: 0.0,
            average_inference_time: 0.0,
        };
    }

    let total_time: f64 = results.iter().map(|r| r.inference_time).sum();
    Summary {
        total,
        successes,
        success_rate: successes as f64 / total as f64,
        total_inference_time: total_time,
        average_inference_time: total_time / total as f64,
    }
}

/// Pairs each result with its placement; results pointing past the end of
/// `positions` are skipped.
pub fn join_with_positions(results: &[EpisodeResult], positions: &[PlacementPair]) -> Vec<Outcome> {
    results
        .iter()
        .filter_map(|r| match positions.get(r.position_num) {
            Some(pair) => Some(Outcome {
                pair: pair.clone(),
                success: r.success,
            }),
            None => {
                warn!(
                    "Result for position {} has no matching placement ({} loaded)",
                    r.position_num,
                    positions.len()
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TIMESTAMP_FORMAT;
    use crate::geometry::Placement;
    use chrono::NaiveDateTime;

    const SAMPLE: &str = "\
position_num,success,inference_time,comment,yolo_predicted_class,yolo_confidence
0,1,12.50,,success,0.9731
1,0,20.00,dropped block,failure,0.8812
2,1,9.50,,,
";

    #[test]
    fn test_read_results() {
        let results = read_results_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert_eq!(results[1].comment, "dropped block");
        assert_eq!(results[1].yolo_predicted_class.as_deref(), Some("failure"));
        assert_eq!(results[2].yolo_predicted_class, None);
        assert_eq!(results[2].yolo_confidence, None);
    }

    #[test]
    fn test_read_results_rejects_bad_success() {
        let data = "position_num,success,inference_time\n0,maybe,1.0\n";
        assert!(read_results_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_read_results_missing_column() {
        let data = "position_num,inference_time\n0,1.0\n";
        let err = read_results_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, PlacementError::CsvHeader(_)));
    }

    #[test]
    fn test_summarize() {
        let results = read_results_from_reader(SAMPLE.as_bytes()).unwrap();
        let summary = summarize(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.successes, 2);
        assert!((summary.success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((summary.total_inference_time - 42.0).abs() < 1e-9);
        assert!((summary.average_inference_time - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_json_fields() {
        let results = read_results_from_reader(SAMPLE.as_bytes()).unwrap();
        let json = serde_json::to_value(summarize(&results)).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["total_inference_time"], 42.0);
        assert_eq!(json["average_inference_time"], 14.0);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.total_inference_time, 0.0);
        assert_eq!(summary.average_inference_time, 0.0);
    }

    #[test]
    fn test_join_skips_missing_positions() {
        let results = read_results_from_reader(SAMPLE.as_bytes()).unwrap();
        let ts = NaiveDateTime::parse_from_str("2025-10-20 10:00:00", TIMESTAMP_FORMAT).unwrap();
        let positions = vec![
            PlacementPair::new(ts, Placement::new(1, 1), Placement::new(2, 2)),
            PlacementPair::new(ts, Placement::new(3, 3), Placement::new(4, 4)),
        ];

        let outcomes = join_with_positions(&results, &positions);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
        assert_eq!(outcomes[1].pair.cup, Placement::new(3, 3));
    }
}
