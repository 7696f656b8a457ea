use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::group;
use crate::model::{
    ImportInput, ImportMeta, ImportResult, OutcomeRecord, PricedRow, RowOutcome,
};
use crate::normalize::canonical_code;
use crate::price::normalize_price;
use crate::report::compute_summary;
use crate::select::select_winner;
use crate::transform::build_plan;
use crate::validate::{build_batch, validate_row};

/// Run one import: normalize identifiers, resolve against the catalog,
/// convert prices to the comparison basis, group duplicates, pick winners,
/// validate, and build the replace plan. Pure over its inputs; every
/// external fetch happened before this call and the only write happens
/// after it, so an aborted run leaves no partial effects.
pub fn run(config: &ImportConfig, input: &ImportInput) -> Result<ImportResult, ImportError> {
    if input.rows.is_empty() {
        return Err(ImportError::EmptyInput);
    }
    let base = input.rates.base_currency();
    if !base.eq_ignore_ascii_case(config.base_currency.trim()) {
        return Err(ImportError::ConfigValidation(format!(
            "rates table is based on '{base}' but the config says '{}'",
            config.base_currency
        )));
    }

    let mut outcomes: Vec<OutcomeRecord> = Vec::new();
    let mut priced: Vec<PricedRow> = Vec::new();

    for raw in &input.rows {
        let canonical = canonical_code(&raw.code).to_string();

        let Some(entry) = input.catalog.resolve(&canonical) else {
            outcomes.push(OutcomeRecord {
                row_number: raw.row_number,
                canonical_code: canonical.clone(),
                outcome: RowOutcome::RejectedUnresolvedCode,
                detail: format!(
                    "no catalog entry for code '{canonical}' (source code '{}')",
                    raw.code
                ),
            });
            continue;
        };

        // Class check runs before grouping so a mislabeled row can never
        // win a duplicate group.
        if !config.class.matches_label(&raw.class_label) {
            outcomes.push(OutcomeRecord {
                row_number: raw.row_number,
                canonical_code: canonical.clone(),
                outcome: RowOutcome::RejectedWrongClass,
                detail: format!(
                    "source label '{}' does not belong to a {} import",
                    raw.class_label, config.class
                ),
            });
            continue;
        }
        if entry.class != config.class {
            outcomes.push(OutcomeRecord {
                row_number: raw.row_number,
                canonical_code: canonical.clone(),
                outcome: RowOutcome::RejectedWrongClass,
                detail: format!(
                    "catalog classifies '{canonical}' as {}, import targets {}",
                    entry.class, config.class
                ),
            });
            continue;
        }

        // Currency resolution. An empty cell means the sheet already
        // quotes the base currency; an unknown code is an unresolved
        // reference and excludes the row.
        let currency = raw
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let rate = match currency {
            None => 1.0,
            Some(code) => match input.rates.rate_to_base(code) {
                Some(rate) => rate,
                None => {
                    outcomes.push(OutcomeRecord {
                        row_number: raw.row_number,
                        canonical_code: canonical.clone(),
                        outcome: RowOutcome::RejectedUnresolvedCode,
                        detail: format!(
                            "no {base} rate for currency '{code}' in period {}",
                            input.rates.period()
                        ),
                    });
                    continue;
                }
            },
        };

        let np = normalize_price(raw.price, rate, raw.unit.as_deref(), entry);
        priced.push(PricedRow {
            row_number: raw.row_number,
            canonical_code: canonical,
            original_code: raw.code.clone(),
            name: raw.name.clone(),
            unit: raw.unit.clone(),
            currency: raw.currency.clone(),
            price: raw.price,
            class: entry.class,
            catalog_name: entry.name.clone(),
            normalized_price: np.value,
            low_confidence: np.low_confidence,
        });
    }

    let mut validated = Vec::new();
    for code_group in group::group_by_code(priced) {
        let selected = select_winner(code_group);
        for &superseded in &selected.superseded_rows {
            outcomes.push(OutcomeRecord {
                row_number: superseded,
                canonical_code: selected.row.canonical_code.clone(),
                outcome: RowOutcome::SupersededByDuplicateWinner,
                detail: format!("row {} won the duplicate group", selected.row.row_number),
            });
        }

        let raw_unit = selected.row.unit.clone();
        let row = validate_row(selected);

        let (outcome, mut detail) = if row.has_invalid_unit {
            let detail = match raw_unit.as_deref().map(str::trim) {
                Some(u) if !u.is_empty() => format!("unit '{u}' is not usable"),
                _ => "unit cell is empty".to_string(),
            };
            (RowOutcome::BlockedInvalidUnit, detail)
        } else if row.has_zero_price {
            (
                RowOutcome::WarningZeroPrice,
                "price missing or non-positive, imported as 0".to_string(),
            )
        } else if row.is_duplicate_group {
            (
                RowOutcome::ImportedAsDuplicateWinner,
                format!("superseded rows {:?}", row.superseded_rows),
            )
        } else {
            (RowOutcome::Imported, String::new())
        };
        if row.low_confidence {
            if !detail.is_empty() {
                detail.push_str("; ");
            }
            detail.push_str("density unavailable, cross-dimension conversion skipped");
        }

        outcomes.push(OutcomeRecord {
            row_number: row.row_number,
            canonical_code: row.canonical_code.clone(),
            outcome,
            detail,
        });
        validated.push(row);
    }

    let batch = build_batch(validated);
    let summary = compute_summary(&outcomes, &batch);
    let plan = build_plan(&batch, &input.master, config.class, &config.submitted_by);

    outcomes.sort_by_key(|o| o.row_number);

    Ok(ImportResult {
        meta: ImportMeta {
            config_name: config.name.clone(),
            class: config.class,
            base_currency: base.to_string(),
            period: config.period.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        outcomes,
        batch,
        plan,
    })
}
