//! Grouping multi-column measure columns into collections.
//!
//! Each group corresponds to one prospective instance of the measure (e.g. one
//! assessment tool) and lists the columns assigned to it. Columns that have
//! not been assigned yet end up in a final ungrouped bucket.

use crate::columns::{Column, ColumnId};
use crate::vocabulary::VocabularyRegistry;
use serde::Serialize;

/// Columns assigned to one collection term, or to none (`term == None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionGroup {
    pub term: Option<String>,
    pub columns: Vec<ColumnId>,
}

/// Group the columns mapped to `variable_id` by collection term.
///
/// Order: every collection term of the variable (even when empty), then terms
/// that were assigned without being seeded, then the ungrouped bucket if any
/// column is left in it. Membership in a term the registry does not know
/// counts as ungrouped.
pub fn group_multi_column_measure_columns<'a, I>(
    columns: I,
    variable_id: &str,
    registry: &VocabularyRegistry,
) -> Vec<CollectionGroup>
where
    I: IntoIterator<Item = &'a Column>,
{
    let mut groups: Vec<CollectionGroup> = registry
        .terms_for(variable_id)
        .into_iter()
        .filter(|t| t.is_collection)
        .map(|t| CollectionGroup {
            term: Some(t.id.clone()),
            columns: Vec::new(),
        })
        .collect();
    let mut ungrouped = Vec::new();

    for column in columns
        .into_iter()
        .filter(|c| c.standardized_variable.as_deref() == Some(variable_id))
    {
        let term = column
            .is_part_of
            .as_ref()
            .and_then(|membership| membership.term())
            .filter(|id| registry.term(id).is_some());

        let Some(term) = term else {
            ungrouped.push(column.id.clone());
            continue;
        };

        if let Some(group) = groups.iter_mut().find(|g| g.term.as_deref() == Some(term)) {
            group.columns.push(column.id.clone());
        } else {
            groups.push(CollectionGroup {
                term: Some(term.to_owned()),
                columns: vec![column.id.clone()],
            });
        }
    }

    if !ungrouped.is_empty() {
        groups.push(CollectionGroup {
            term: None,
            columns: ungrouped,
        });
    }
    groups
}
