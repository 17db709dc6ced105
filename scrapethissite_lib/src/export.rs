//! JSON output files: write, read back, and verify.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ScrapeError;
use crate::validation;

/// Writes `records` as an indented JSON array to `output_dir/file_name`,
/// creating the directory if needed. Returns the file path.
pub fn write_json<T: Serialize>(
    records: &[T],
    output_dir: &Path,
    file_name: &str,
) -> Result<PathBuf, ScrapeError> {
    let file_name = validation::validate_file_name(file_name)?;
    tracing::info!(
        "Storing {} records as JSON in {}",
        records.len(),
        output_dir.join(file_name).display()
    );

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(path)
}

/// Reads a JSON array written by [`write_json`].
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ScrapeError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Checks that the file exists and is not empty; returns its size in bytes.
pub fn verify_output(path: &Path) -> Result<u64, ScrapeError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(ScrapeError::OutputMissing(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScrapeError::OutputMissing(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    if metadata.len() == 0 {
        return Err(ScrapeError::OutputEmpty(path.to_path_buf()));
    }
    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HockeyTeamRecord, OscarFilmRecord};

    fn hockey_rows() -> Vec<HockeyTeamRecord> {
        vec![
            HockeyTeamRecord {
                capture_time: 1_700_000_000,
                team_name: "Buffalo Sabres".into(),
                year: "1990".into(),
                win_percentage: "0.388".into(),
            },
            HockeyTeamRecord {
                capture_time: 1_700_000_001,
                team_name: "Quebec Nordiques".into(),
                year: "1990".into(),
                win_percentage: "0.2".into(),
            },
        ]
    }

    #[test]
    fn creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("output");
        let path = write_json(&hockey_rows(), &dir, "hockey-team-data.json").unwrap();
        assert!(dir.is_dir());
        assert_eq!(path, dir.join("hockey-team-data.json"));
    }

    #[test]
    fn reuses_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        write_json(&hockey_rows(), tmp.path(), "first.json").unwrap();
        write_json(&hockey_rows(), tmp.path(), "second.json").unwrap();
        assert!(tmp.path().join("first.json").is_file());
        assert!(tmp.path().join("second.json").is_file());
    }

    #[test]
    fn round_trip_reproduces_records() {
        let tmp = tempfile::tempdir().unwrap();
        let films = vec![OscarFilmRecord {
            capture_time: 1_700_000_000,
            year: "2015".into(),
            title: "Spotlight".into(),
            nomination_count: "6".into(),
            award_count: "2".into(),
            is_winner: true,
        }];
        let path = write_json(&films, tmp.path(), "oscar-winner-data.json").unwrap();
        let back: Vec<OscarFilmRecord> = read_json(&path).unwrap();
        assert_eq!(back, films);
    }

    #[test]
    fn output_is_indented_array() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_json(&hockey_rows(), tmp.path(), "h.json").unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"captureTime\""));
    }

    #[test]
    fn empty_list_still_verifies() {
        let tmp = tempfile::tempdir().unwrap();
        let empty: Vec<HockeyTeamRecord> = Vec::new();
        let path = write_json(&empty, tmp.path(), "empty.json").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
        assert!(verify_output(&path).unwrap() > 0);
    }

    #[test]
    fn overwrites_previous_contents() {
        let tmp = tempfile::tempdir().unwrap();
        write_json(&hockey_rows(), tmp.path(), "h.json").unwrap();
        let path = write_json(&hockey_rows()[..1], tmp.path(), "h.json").unwrap();
        let back: Vec<HockeyTeamRecord> = read_json(&path).unwrap();
        assert_eq!(back.len(), 1);
    }

    #[test]
    fn rejects_unsafe_file_names() {
        let tmp = tempfile::tempdir().unwrap();
        let err = write_json(&hockey_rows(), tmp.path(), "../out.json").unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidInput(_)));
    }

    #[test]
    fn verify_reports_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = verify_output(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ScrapeError::OutputMissing(_)));
    }

    #[test]
    fn verify_reports_directory_as_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let err = verify_output(tmp.path()).unwrap_err();
        assert!(matches!(err, ScrapeError::OutputMissing(_)));
    }

    #[test]
    fn verify_reports_empty_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("blank.json");
        std::fs::write(&path, "").unwrap();
        let err = verify_output(&path).unwrap_err();
        assert!(matches!(err, ScrapeError::OutputEmpty(_)));
        assert_eq!(err.to_string(), format!("'{}' file is empty", path.display()));
    }
}
