//! Tab-separated data tables and column initialization.

use super::model::Column;
use super::store::ColumnStore;
use crate::error::{AnnotatorError, Result, ResultExt as _};
use std::io::Read;
use std::path::Path;

/// A parsed data table: a header row plus raw cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Parse tab-separated text. Cells are kept verbatim (no quoting, no trimming).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut tsv = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = tsv.headers()?.iter().map(str::to_owned).collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(AnnotatorError::Table("table has no header row".to_owned()));
        }

        let mut rows = Vec::new();
        for record in tsv.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_owned).collect());
        }

        tracing::info!("Parsed table with {} columns and {} rows", headers.len(), rows.len());
        Ok(Self { headers, rows })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open data table {}", path.display()))?;
        Self::from_reader(file)
    }

    pub fn to_columns(&self) -> ColumnStore {
        initialize_columns(&self.headers, &self.rows)
    }
}

/// One unannotated column per header, in header order, with ids `"1"`, `"2"`, ...
pub fn initialize_columns(headers: &[String], rows: &[Vec<String>]) -> ColumnStore {
    let columns = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let all_values = rows
                .iter()
                .map(|row| row.get(index).cloned().unwrap_or_default())
                .collect();
            Column::new((index + 1).to_string(), header.clone(), all_values)
        })
        .collect();
    ColumnStore::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_columns() {
        let table = DataTable::from_reader(
            "participant_id\tage\tsex\nsub-01\t30\tM\nsub-02\tN/A\tF\n".as_bytes(),
        )
        .expect("valid table");
        let store = table.to_columns();

        let ids: Vec<&str> = store.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(store.column("2").name, "age");
        assert_eq!(store.column("2").all_values, vec!["30", "N/A"]);
        assert!(store.iter().all(|c| c.data_type.is_none() && c.levels.is_none()));
    }

    #[test]
    fn test_cells_are_kept_verbatim() {
        let table = DataTable::from_reader("name\n\"quoted\"\n  padded \n".as_bytes())
            .expect("valid table");
        assert_eq!(table.rows, vec![vec!["\"quoted\""], vec!["  padded "]]);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let result = DataTable::from_reader("a\tb\n1\t2\t3\n".as_bytes());
        assert!(matches!(result, Err(AnnotatorError::Table(_))));
    }
}
