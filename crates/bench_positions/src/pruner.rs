use crate::{
    constants::TIMESTAMP_FORMAT,
    error::Result,
    geometry::PlacementPair,
    prompt::ConfirmationPrompt,
    store::{read_positions, rewrite_positions},
};
use itertools::Itertools;
use log::{debug, info};
use std::{collections::BTreeSet, path::Path};

/// Indices of records that repeat an earlier record within `tolerance`
/// on all four coordinates. The earlier record is always the one kept.
pub fn find_duplicates(records: &[PlacementPair], tolerance: i32) -> BTreeSet<usize> {
    (0..records.len())
        .tuple_combinations::<(usize, usize)>()
        .filter(|&(i, j)| records[i].is_near(&records[j], tolerance))
        .map(|(_, j)| j)
        .collect()
}

pub fn remove_indices(records: &[PlacementPair], remove: &BTreeSet<usize>) -> Vec<PlacementPair> {
    records
        .iter()
        .enumerate()
        .filter(|(i, _)| !remove.contains(i))
        .map(|(_, r)| r.clone())
        .collect()
}

/// Result of an interactive prune
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    NothingToPrune { total: usize },
    Declined { candidates: Vec<usize> },
    Pruned { removed: usize, remaining: usize },
}

/// Human-readable listing of the rows that would be deleted
pub fn describe_candidates(records: &[PlacementPair], indices: &BTreeSet<usize>) -> String {
    let mut out = format!(
        "{:>5}  {:<19}  {:>5}  {:>5}  {:>7}  {:>7}\n",
        "row", "timestamp", "cup_x", "cup_y", "block_x", "block_y"
    );
    for (i, r) in indices.iter().filter_map(|&i| records.get(i).map(|r| (i, r))) {
        out.push_str(&format!(
            "{:>5}  {:<19}  {:>5}  {:>5}  {:>7}  {:>7}\n",
            i,
            r.timestamp.format(TIMESTAMP_FORMAT),
            r.cup.x,
            r.cup.y,
            r.block.x,
            r.block.y
        ));
    }
    out
}

/// Finds near-duplicate rows in the positions CSV at `path` and, once
/// `prompt` confirms, rewrites the file without them.
pub fn prune_positions(
    path: &Path,
    tolerance: i32,
    prompt: &mut dyn ConfirmationPrompt,
) -> Result<PruneOutcome> {
    let records = read_positions(path)?;
    let duplicates = find_duplicates(&records, tolerance);

    info!("Total rows in dataset: {}", records.len());
    info!(
        "Rows within {} px of an earlier row on every coordinate: {}",
        tolerance,
        duplicates.len()
    );

    if duplicates.is_empty() {
        return Ok(PruneOutcome::NothingToPrune {
            total: records.len(),
        });
    }

    let message = format!(
        "Rows that would be deleted:\n{}\nDo you want to delete these rows? (yes/no): ",
        describe_candidates(&records, &duplicates)
    );

    if !prompt.ask(&message)? {
        debug!("prune declined, {} unchanged", path.display());
        return Ok(PruneOutcome::Declined {
            candidates: duplicates.into_iter().collect(),
        });
    }

    let kept = remove_indices(&records, &duplicates);
    rewrite_positions(path, &kept)?;
    Ok(PruneOutcome::Pruned {
        removed: duplicates.len(),
        remaining: kept.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Placement;
    use crate::prompt::AutoConfirm;
    use crate::store::{PositionsWriter, read_positions_from_reader};
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn pair(cx: i32, cy: i32, bx: i32, by: i32) -> PlacementPair {
        let ts = NaiveDateTime::parse_from_str("2025-10-20 10:00:00", TIMESTAMP_FORMAT).unwrap();
        PlacementPair::new(ts, Placement::new(cx, cy), Placement::new(bx, by))
    }

    /// Records every question and answers from a script
    struct ScriptedPrompt {
        answers: Vec<bool>,
        asked: Vec<String>,
    }

    impl ConfirmationPrompt for ScriptedPrompt {
        fn ask(&mut self, message: &str) -> Result<bool> {
            self.asked.push(message.to_string());
            Ok(self.answers.remove(0))
        }
    }

    #[test]
    fn test_flags_later_near_duplicate() {
        let records = vec![pair(100, 100, 300, 100), pair(105, 102, 303, 99)];
        let flagged = find_duplicates(&records, 20);
        assert_eq!(flagged.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_one_far_coordinate_is_not_duplicate() {
        let records = vec![pair(100, 100, 300, 100), pair(105, 102, 303, 130)];
        assert!(find_duplicates(&records, 20).is_empty());
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let records = vec![pair(0, 0, 0, 0), pair(20, 20, 20, 20)];
        assert_eq!(find_duplicates(&records, 20).len(), 1);
        assert!(find_duplicates(&records, 19).is_empty());
    }

    #[test]
    fn test_earlier_record_covers_both_neighbors() {
        // B and C are 30 apart from each other but both within 15 of A
        let records = vec![
            pair(100, 100, 100, 100),
            pair(85, 100, 100, 100),
            pair(115, 100, 100, 100),
        ];
        let flagged = find_duplicates(&records, 15);
        assert_eq!(flagged.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_pruning_is_idempotent() {
        let records: Vec<PlacementPair> = (0..40)
            .map(|i| {
                let v = (i * 37) % 200;
                pair(v, (i * 13) % 90, 400 - v, (i * 7) % 60)
            })
            .collect();
        let flagged = find_duplicates(&records, 20);
        assert!(!flagged.is_empty());

        let kept = remove_indices(&records, &flagged);
        assert!(find_duplicates(&kept, 20).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(find_duplicates(&[], 20).is_empty());
    }

    fn write_positions(path: &Path, records: &[PlacementPair]) {
        let mut writer = PositionsWriter::create(path).unwrap();
        for r in records {
            writer.write_pair(r).unwrap();
        }
    }

    #[test]
    fn test_prune_positions_confirmed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("object_positions.csv");
        write_positions(
            &path,
            &[
                pair(100, 100, 300, 100),
                pair(105, 102, 303, 99),
                pair(400, 300, 150, 350),
            ],
        );

        let mut prompt = ScriptedPrompt {
            answers: vec![true],
            asked: Vec::new(),
        };
        let outcome = prune_positions(&path, 20, &mut prompt).unwrap();
        assert_eq!(
            outcome,
            PruneOutcome::Pruned {
                removed: 1,
                remaining: 2
            }
        );
        assert_eq!(prompt.asked.len(), 1);
        assert!(prompt.asked[0].contains("(yes/no)"));

        let stored = read_positions(&path).unwrap();
        assert_eq!(stored, vec![pair(100, 100, 300, 100), pair(400, 300, 150, 350)]);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("timestamp,cup_x,cup_y,block_x,block_y\n"));
    }

    #[test]
    fn test_prune_positions_declined_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("object_positions.csv");
        write_positions(&path, &[pair(100, 100, 300, 100), pair(105, 102, 303, 99)]);
        let before = std::fs::read_to_string(&path).unwrap();

        let mut prompt = AutoConfirm::with_writer(false, Vec::new());
        let outcome = prune_positions(&path, 20, &mut prompt).unwrap();
        assert_eq!(outcome, PruneOutcome::Declined { candidates: vec![1] });
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_auto_confirmed_prune_lists_deleted_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("object_positions.csv");
        write_positions(
            &path,
            &[pair(100, 100, 300, 100), pair(105, 102, 303, 99)],
        );

        let mut prompt = AutoConfirm::with_writer(true, Vec::new());
        let outcome = prune_positions(&path, 20, &mut prompt).unwrap();
        assert_eq!(
            outcome,
            PruneOutcome::Pruned {
                removed: 1,
                remaining: 1
            }
        );

        let shown = String::from_utf8(prompt.writer().clone()).unwrap();
        assert!(shown.starts_with("Rows that would be deleted:\n"));
        assert!(shown.contains("    1  2025-10-20 10:00:00    105    102      303       99\n"));
        assert!(shown.ends_with("(yes/no): yes\n"));
    }

    #[test]
    fn test_describe_candidates_table() {
        let records = vec![pair(100, 100, 300, 100), pair(105, 102, 303, 99)];
        let listing = describe_candidates(&records, &BTreeSet::from([1]));
        assert_eq!(
            listing,
            concat!(
                "  row  timestamp            cup_x  cup_y  block_x  block_y\n",
                "    1  2025-10-20 10:00:00    105    102      303       99\n",
            )
        );
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let data = "timestamp,cup_x,cup_y,block_x,block_y\n\
                    2025-10-20 10:00:00,2147483647,0,0,0\n\
                    2025-10-20 10:00:01,-5,0,0,0\n\
                    2025-10-20 10:00:02,-2147483648,0,0,0\n";
        let records = read_positions_from_reader(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert!(find_duplicates(&records, 20).is_empty());
        assert_eq!(
            find_duplicates(&records, i32::MAX).into_iter().collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[test]
    fn test_prune_positions_nothing_to_do_does_not_prompt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("object_positions.csv");
        write_positions(&path, &[pair(100, 100, 300, 100), pair(400, 300, 150, 350)]);

        let mut prompt = ScriptedPrompt {
            answers: Vec::new(),
            asked: Vec::new(),
        };
        let outcome = prune_positions(&path, 20, &mut prompt).unwrap();
        assert_eq!(outcome, PruneOutcome::NothingToPrune { total: 2 });
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_prune_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let mut prompt = AutoConfirm::with_writer(true, std::io::sink());
        let result = prune_positions(&dir.path().join("nope.csv"), 20, &mut prompt);
        assert!(result.is_err());
    }
}
