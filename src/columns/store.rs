//! Snapshot-style column store.
//!
//! Every update returns a new [`ColumnStore`]; the previous snapshot stays
//! valid, so callers can keep it for undo or diffing. Each column carries a
//! revision counter that is bumped on every update, which lets concurrent
//! editors detect that they are working from a stale snapshot.

use super::model::{Column, ColumnId};
use crate::error::{AnnotatorError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Columns keyed by id, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStore {
    columns: IndexMap<ColumnId, Column>,
    #[serde(default)]
    revisions: IndexMap<ColumnId, u64>,
}

impl ColumnStore {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns: columns.into_iter().map(|c| (c.id.clone(), c)).collect(),
            revisions: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Column> {
        self.columns.get(id)
    }

    /// Column by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the store; callers only hold ids they got from it.
    pub fn column(&self, id: &str) -> &Column {
        self.columns
            .get(id)
            .unwrap_or_else(|| panic!("column {id} does not exist in the store"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Columns in header order, as an owned list.
    pub fn to_vec(&self) -> Vec<Column> {
        self.columns.values().cloned().collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.values().find(|c| c.name == name)
    }

    /// Number of updates applied to the column so far.
    pub fn revision(&self, id: &str) -> u64 {
        self.revisions.get(id).copied().unwrap_or(0)
    }

    /// Apply a transition to one column and return the new snapshot.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the store.
    pub fn update<F>(&self, id: &str, transition: F) -> Self
    where
        F: FnOnce(&Column) -> Column,
    {
        let before = self.column(id);
        let after = transition(before);
        assert_eq!(
            after.id, before.id,
            "transitions must not change the column id"
        );

        let changed = changed_fields(before, &after);
        if !changed.is_empty() {
            tracing::debug!("Column {id} ({}) changed: {changed:?}", before.name);
        }

        let mut next = self.clone();
        next.columns.insert(id.to_owned(), after);
        *next.revisions.entry(id.to_owned()).or_insert(0) += 1;
        next
    }

    /// Like [`Self::update`], but only if the column is still at `expected` revision.
    pub fn update_if_revision<F>(&self, id: &str, expected: u64, transition: F) -> Result<Self>
    where
        F: FnOnce(&Column) -> Column,
    {
        let actual = self.revision(id);
        if actual != expected {
            return Err(AnnotatorError::StaleRevision {
                column: id.to_owned(),
                expected,
                actual,
            });
        }
        Ok(self.update(id, transition))
    }

    /// Replace every column at once (e.g. after importing a data dictionary).
    ///
    /// Columns whose content changed get their revision bumped.
    pub fn replace_all(&self, columns: Vec<Column>) -> Self {
        let mut next = Self::new(columns);
        for (id, column) in &next.columns {
            let previous = self.revision(id);
            let bump = u64::from(self.get(id) != Some(column));
            next.revisions.insert(id.clone(), previous + bump);
        }
        next
    }
}

/// Annotation fields of a [`Column`], in the order transitions touch them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnField {
    StandardizedVariable,
    IsPartOf,
    DataType,
    Levels,
    Units,
    MissingValues,
    Format,
    Description,
}

/// Fields that differ between two versions of a column, in canonical order.
pub fn changed_fields(before: &Column, after: &Column) -> Vec<ColumnField> {
    let checks = [
        (
            ColumnField::StandardizedVariable,
            before.standardized_variable != after.standardized_variable,
        ),
        (ColumnField::IsPartOf, before.is_part_of != after.is_part_of),
        (ColumnField::DataType, before.data_type != after.data_type),
        (ColumnField::Levels, before.levels != after.levels),
        (ColumnField::Units, before.units != after.units),
        (
            ColumnField::MissingValues,
            before.missing_values != after.missing_values,
        ),
        (ColumnField::Format, before.format != after.format),
        (ColumnField::Description, before.description != after.description),
    ];
    checks
        .into_iter()
        .filter_map(|(field, changed)| changed.then_some(field))
        .collect()
}
