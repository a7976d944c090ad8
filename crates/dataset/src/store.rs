//! Checkpoint snapshots.
//!
//! The pipeline writes two recovery checkpoints as JSON: the resolved
//! rating rows after the bulk resolution stage, and the full dataset after
//! enrichment. Resuming from a snapshot is a manual, out-of-band operation;
//! [`read_checkpoint`] exists for that and for tests, not for any automated
//! resume path.

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// File name of the snapshot written after bulk rating resolution
pub const RATINGS_SNAPSHOT: &str = "ratings.json";

/// File name of the snapshot written after user enrichment
pub const DATASET_SNAPSHOT: &str = "dataset.json";

/// Serialize `value` to `<dir>/<name>`, creating `dir` if needed.
///
/// Returns the path the snapshot was written to.
pub fn write_checkpoint<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    let file = fs::File::create(&path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, value)?;
    Ok(path)
}

/// Load a snapshot previously written by [`write_checkpoint`]
pub fn read_checkpoint<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RatingRow;
    use std::env;

    fn scratch_dir(name: &str) -> PathBuf {
        env::temp_dir().join(format!("dataset-store-{}-{}", name, std::process::id()))
    }

    fn sample_rows() -> Vec<RatingRow> {
        vec![RatingRow {
            game_id: 174430,
            position: 42,
            rating: 9.0,
            username: "meeplequeen".to_string(),
            name: "Gloomhaven".to_string(),
            year_published: 2017,
            weight: 3.86,
            owners: 68123,
            average_rating: 8.74,
        }]
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let dir = scratch_dir("round-trip");
        let rows = sample_rows();

        let path = write_checkpoint(&dir, RATINGS_SNAPSHOT, &rows).unwrap();
        let loaded: Vec<RatingRow> = read_checkpoint(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].game_id, rows[0].game_id);
        assert_eq!(loaded[0].username, rows[0].username);
        assert_eq!(loaded[0].rating, rows[0].rating);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_checkpoint_creates_directory() {
        let dir = scratch_dir("mkdir").join("nested");
        let path = write_checkpoint(&dir, DATASET_SNAPSHOT, &sample_rows()).unwrap();
        assert!(path.exists());
        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }
}
