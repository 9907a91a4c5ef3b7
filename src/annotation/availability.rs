//! Which variables can still be picked for a column.

use crate::columns::Column;
use crate::vocabulary::{StandardizedVariable, VocabularyRegistry};
use serde::Serialize;

/// Whether `variable_id` may be assigned to the column being edited.
///
/// Single-column variables become unavailable once another column holds them;
/// the column identified by `editing` does not count, so re-selecting its own
/// variable stays possible. Every other variable is always available.
pub fn is_single_column_variable_available<'a, I>(
    variable_id: &str,
    columns: I,
    registry: &VocabularyRegistry,
    editing: Option<&str>,
) -> bool
where
    I: IntoIterator<Item = &'a Column>,
{
    let single_column = registry
        .get_variable(variable_id)
        .is_some_and(StandardizedVariable::is_single_column);
    if !single_column {
        return true;
    }

    !columns.into_iter().any(|c| {
        c.standardized_variable.as_deref() == Some(variable_id) && Some(c.id.as_str()) != editing
    })
}

/// A selectable variable for the column being edited.
#[derive(Debug, Clone, Serialize)]
pub struct VariableOption<'a> {
    pub variable: &'a StandardizedVariable,
    pub disabled: bool,
}

/// Every variable in vocabulary order, flagged when it cannot be picked.
pub fn variable_options<'a>(
    columns: &[Column],
    registry: &'a VocabularyRegistry,
    editing: Option<&str>,
) -> Vec<VariableOption<'a>> {
    registry
        .variables()
        .map(|variable| VariableOption {
            variable,
            disabled: !is_single_column_variable_available(
                &variable.id,
                columns,
                registry,
                editing,
            ),
        })
        .collect()
}
