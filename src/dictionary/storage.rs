//! Reading and writing data dictionary files.

use super::model::DataDictionary;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the uploaded table's stem for the exported dictionary.
pub const ANNOTATED_SUFFIX: &str = "_annotated.json";

/// `participants.tsv` -> `participants_annotated.json`.
pub fn annotated_file_name(uploaded_file_name: &str) -> String {
    let stem = Path::new(uploaded_file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("data_dictionary");
    format!("{stem}{ANNOTATED_SUFFIX}")
}

/// Write `dictionary` to `dir` under the name derived from the uploaded table.
///
/// Returns the path of the written file.
pub fn save_dictionary(
    dictionary: &DataDictionary,
    dir: &Path,
    uploaded_file_name: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(annotated_file_name(uploaded_file_name));
    write_dictionary(dictionary, &path)?;
    Ok(path)
}

pub fn write_dictionary(dictionary: &DataDictionary, path: &Path) -> Result<()> {
    let json = dictionary
        .to_json_pretty()
        .context("Failed to serialize data dictionary")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write data dictionary: {}", path.display()))?;
    tracing::info!(
        "Wrote data dictionary with {} column(s) to {}",
        dictionary.entries.len(),
        path.display()
    );
    Ok(())
}

/// Raw JSON of a dictionary file, for validation before decoding.
pub fn load_dictionary_value(path: &Path) -> Result<Value> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data dictionary: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Data dictionary is not valid JSON: {}", path.display()))
}

pub fn load_dictionary(path: &Path) -> Result<DataDictionary> {
    let value = load_dictionary_value(path)?;
    DataDictionary::from_value(value)
        .with_context(|| format!("Unexpected data dictionary shape: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::model::DictionaryEntry;
    use tempfile::tempdir;

    fn dictionary() -> DataDictionary {
        let mut dict = DataDictionary::default();
        dict.entries.insert(
            "age".to_owned(),
            DictionaryEntry {
                description: Some("Age".to_owned()),
                units: Some("years".to_owned()),
                ..DictionaryEntry::default()
            },
        );
        dict
    }

    #[test]
    fn test_annotated_file_name() {
        assert_eq!(
            annotated_file_name("participants.tsv"),
            "participants_annotated.json"
        );
        assert_eq!(annotated_file_name("study.v2.tsv"), "study.v2_annotated.json");
        assert_eq!(annotated_file_name(""), "data_dictionary_annotated.json");
    }

    #[test]
    fn test_save_and_load_dictionary() -> Result<()> {
        let temp_dir = tempdir()?;
        let out = temp_dir.path().join("out");

        let path = save_dictionary(&dictionary(), &out, "participants.tsv")?;
        assert_eq!(path, out.join("participants_annotated.json"));

        let loaded = load_dictionary(&path)?;
        assert_eq!(loaded, dictionary());
        Ok(())
    }

    #[test]
    fn test_invalid_json_reports_path() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{not json")?;

        let err = load_dictionary_value(&path).expect_err("invalid JSON");
        assert!(format!("{err:#}").contains("broken.json"));
        Ok(())
    }

    #[test]
    fn test_load_keeps_column_order() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut dict = DataDictionary::default();
        for name in ["participant_id", "sex", "age"] {
            dict.entries.insert(name.to_owned(), DictionaryEntry::default());
        }
        let path = save_dictionary(&dict, temp_dir.path(), "participants.tsv")?;

        let loaded = load_dictionary(&path)?;
        let names: Vec<&str> = loaded.entries.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["participant_id", "sex", "age"]);

        let value = load_dictionary_value(&path)?;
        let names: Vec<&str> = value
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["participant_id", "sex", "age"]);
        Ok(())
    }
}
