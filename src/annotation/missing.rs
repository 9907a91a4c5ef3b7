//! Missing-value bookkeeping.

use crate::columns::Column;

/// Flag or unflag a raw value as a non-response.
///
/// Flagging removes the value from `levels`; unflagging puts it back with an
/// empty annotation, provided the value was actually observed in the column.
/// Levels are only touched on categorical columns. Applying the same call
/// twice leaves the column unchanged.
pub fn set_level_missing(column: &Column, value: &str, is_missing: bool) -> Column {
    let mut next = column.clone();
    if is_missing {
        if !next.is_missing(value) {
            next.missing_values.push(value.to_owned());
        }
        if let Some(levels) = next.levels.as_mut() {
            levels.shift_remove(value);
        }
    } else {
        next.missing_values.retain(|v| v != value);
        let observed = column.all_values.iter().any(|v| v == value);
        if observed && let Some(levels) = next.levels.as_mut() {
            levels.entry(value.to_owned()).or_default();
        }
    }
    next
}
