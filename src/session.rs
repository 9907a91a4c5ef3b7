//! Saved annotation session.
//!
//! A session is the uploaded table's columns plus the name of the vocabulary
//! configuration they are annotated against. The CLI keeps it in a JSON file
//! between invocations.

use crate::columns::{ColumnStore, DataTable};
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// File name of the uploaded table, used to name the exported dictionary
    pub table_file_name: String,
    /// Vocabulary configuration the columns are annotated against
    pub config: String,
    pub columns: ColumnStore,
}

impl Session {
    /// Start a session from a TSV file.
    pub fn from_table(path: &Path, config: &str) -> Result<Self> {
        let table = DataTable::from_path(path)
            .with_context(|| format!("Failed to read data table: {}", path.display()))?;
        let table_file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_owned();
        tracing::debug!("Starting session for {table_file_name} against {config}");
        Ok(Self {
            table_file_name,
            config: config.to_owned(),
            columns: table.to_columns(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse session file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize session")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write session file: {}", path.display()))
    }

    /// Resolve a column given either its id or its name.
    pub fn resolve_column(&self, id_or_name: &str) -> Option<&str> {
        self.columns
            .get(id_or_name)
            .or_else(|| self.columns.find_by_name(id_or_name))
            .map(|c| c.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_session_from_table_and_back() -> Result<()> {
        let temp_dir = tempdir()?;
        let table = temp_dir.path().join("participants.tsv");
        std::fs::write(&table, "participant_id\tage\nsub-01\t30\nsub-02\t41\n")?;

        let session = Session::from_table(&table, "Neurobagel")?;
        assert_eq!(session.table_file_name, "participants.tsv");
        assert_eq!(session.columns.len(), 2);
        assert_eq!(session.resolve_column("age"), Some("2"));
        assert_eq!(session.resolve_column("1"), Some("1"));
        assert_eq!(session.resolve_column("height"), None);

        let path = temp_dir.path().join("session.json");
        session.save(&path)?;
        assert_eq!(Session::load(&path)?, session);
        Ok(())
    }

    #[test]
    fn test_ragged_table_is_rejected() -> Result<()> {
        let temp_dir = tempdir()?;
        let table = temp_dir.path().join("bad.tsv");
        std::fs::write(&table, "a\tb\n1\n")?;
        assert!(Session::from_table(&table, "Neurobagel").is_err());
        Ok(())
    }
}
