use crate::model::{ImportBatch, Price, Unit, ValidatedImportRow};
use crate::select::SelectedRow;

/// Placeholder strings that exported sheets use for "no unit". Compared
/// case-insensitively after trimming.
const UNIT_SENTINELS: &[&str] = &["null", "undefined", "(none)", "none"];

/// Classify a final unit cell. Blocking-invalid when the cell is missing,
/// empty, a bare number, or one of the known placeholder strings.
pub fn validate_unit(unit: Option<&str>) -> Unit {
    let Some(raw) = unit else {
        return Unit::Invalid;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Unit::Invalid;
    }
    let lower = trimmed.to_lowercase();
    if UNIT_SENTINELS.contains(&lower.as_str()) {
        return Unit::Invalid;
    }
    if trimmed.parse::<f64>().is_ok() {
        return Unit::Invalid;
    }
    Unit::Known(trimmed.to_string())
}

/// Final price rule: missing, non-finite, or non-positive coerces to 0
/// with the warning flag set. Warning only, the batch stays admissible.
pub fn validate_price(price: Price) -> (f64, bool) {
    match price.known() {
        Some(v) if v.is_finite() && v > 0.0 => (v, false),
        _ => (0.0, true),
    }
}

/// Apply the per-row rules to a resolved group winner.
pub fn validate_row(selected: SelectedRow) -> ValidatedImportRow {
    let final_unit = validate_unit(selected.row.unit.as_deref());
    let (final_price, has_zero_price) = validate_price(selected.row.price);

    ValidatedImportRow {
        row_number: selected.row.row_number,
        canonical_code: selected.row.canonical_code,
        catalog_name: selected.row.catalog_name,
        class: selected.row.class,
        final_price,
        has_invalid_unit: final_unit == Unit::Invalid,
        final_unit,
        final_currency: selected.row.currency,
        normalized_price: selected.row.normalized_price,
        is_duplicate_group: selected.is_duplicate_group,
        superseded_rows: selected.superseded_rows,
        low_confidence: selected.row.low_confidence,
        has_zero_price,
    }
}

/// Assemble the batch. One invalid unit anywhere makes the whole batch
/// inadmissible; zero-price warnings do not.
pub fn build_batch(rows: Vec<ValidatedImportRow>) -> ImportBatch {
    let admissible = rows.iter().all(|r| !r.has_invalid_unit);
    ImportBatch { rows, admissible }
}
