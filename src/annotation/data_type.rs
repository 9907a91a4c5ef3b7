//! Data type transitions.

use crate::columns::{Column, DataType, Level, Levels};

/// Set a column's data type and keep `levels`, `units` and `format` consistent.
///
/// - categorical: keeps existing levels so re-applying the type does not
///   discard edits, otherwise creates an empty level per distinct value that
///   is not flagged missing; drops units.
/// - continuous: keeps existing units, otherwise starts from `""`; drops levels.
/// - `None`: drops both.
///
/// `format` only survives on continuous columns.
pub fn apply_data_type(column: &Column, data_type: Option<DataType>) -> Column {
    let mut next = column.clone();
    match data_type {
        Some(DataType::Categorical) => {
            if next.levels.is_none() {
                next.levels = Some(initial_levels(column));
            }
            next.units = None;
        }
        Some(DataType::Continuous) => {
            if next.units.is_none() {
                next.units = Some(String::new());
            }
            next.levels = None;
        }
        None => {
            next.levels = None;
            next.units = None;
        }
    }
    if data_type != Some(DataType::Continuous) {
        next.format = None;
    }
    next.data_type = data_type;
    next
}

/// One empty level per distinct non-missing value, in first-seen order.
pub fn initial_levels(column: &Column) -> Levels {
    column
        .unique_values()
        .into_iter()
        .filter(|value| !column.is_missing(value))
        .map(|value| (value.to_owned(), Level::default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> Column {
        Column::new(
            "1",
            "sex",
            ["M", "F", "M", "N/A"].map(str::to_owned).to_vec(),
        )
    }

    #[test]
    fn test_categorical_initializes_levels_in_first_seen_order() {
        let next = apply_data_type(&column(), Some(DataType::Categorical));
        let keys: Vec<&str> = next
            .levels
            .as_ref()
            .map(|l| l.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["M", "F", "N/A"]);
        assert_eq!(next.units, None);
        assert_eq!(next.data_type, Some(DataType::Categorical));
    }

    #[test]
    fn test_reapplying_categorical_keeps_level_edits() {
        let mut categorical = apply_data_type(&column(), Some(DataType::Categorical));
        if let Some(level) = categorical.levels.as_mut().and_then(|l| l.get_mut("M")) {
            level.description = "Male".to_owned();
        }

        let again = apply_data_type(&categorical, Some(DataType::Categorical));
        assert_eq!(again.levels, categorical.levels);

        let continuous = apply_data_type(&categorical, Some(DataType::Continuous));
        assert_eq!(continuous.levels, None);
        assert_eq!(continuous.units.as_deref(), Some(""));
    }

    #[test]
    fn test_continuous_keeps_units() {
        let mut continuous = apply_data_type(&column(), Some(DataType::Continuous));
        continuous.units = Some("years".to_owned());
        let again = apply_data_type(&continuous, Some(DataType::Continuous));
        assert_eq!(again.units.as_deref(), Some("years"));
    }

    #[test]
    fn test_clearing_type_drops_levels_units_and_format() {
        let mut continuous = apply_data_type(&column(), Some(DataType::Continuous));
        continuous.format = Some("nb:FromFloat".to_owned());
        let cleared = apply_data_type(&continuous, None);
        assert_eq!(cleared.data_type, None);
        assert_eq!(cleared.units, None);
        assert_eq!(cleared.levels, None);
        assert_eq!(cleared.format, None);
    }

    #[test]
    fn test_missing_values_are_not_levels() {
        let mut col = column();
        col.missing_values.push("N/A".to_owned());
        let next = apply_data_type(&col, Some(DataType::Categorical));
        assert!(next.levels.as_ref().is_some_and(|l| !l.contains_key("N/A")));
    }
}
