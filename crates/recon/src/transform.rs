use serde::{Deserialize, Serialize};

use crate::model::{ImportBatch, MaterialClass, Unit};

// ---------------------------------------------------------------------------
// Master snapshot
// ---------------------------------------------------------------------------

/// One record of the current price master, as the delete-set computation
/// sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterRecord {
    pub code: String,
    pub class: MaterialClass,
    pub price: Option<f64>,
    pub previous_price: Option<f64>,
}

impl MasterRecord {
    /// Records with every price field null are placeholders, not data to
    /// replace.
    pub fn has_price_data(&self) -> bool {
        self.price.is_some() || self.previous_price.is_some()
    }
}

// ---------------------------------------------------------------------------
// Persistence shape
// ---------------------------------------------------------------------------

/// The persisted shape of one admitted row. `price` is always a concrete
/// number here; the coercion happened in validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportRecord {
    pub code: String,
    pub class_code: &'static str,
    pub name: String,
    pub unit: Option<String>,
    pub price: f64,
    pub currency: Option<String>,
    pub submitted_by: String,
    /// Comparison-basis price that decided the selection. Audit only.
    pub normalized_price: f64,
    pub was_duplicate: bool,
}

/// Delete-then-insert instruction set for the persistence sink. The sink
/// must apply it as one logical unit.
#[derive(Debug, Clone, Serialize)]
pub struct ImportPlan {
    pub records: Vec<ImportRecord>,
    /// Canonical codes to delete from the master before insertion.
    pub delete_codes: Vec<String>,
}

/// Target-class master codes holding real price data. All-null placeholder
/// records stay untouched even when an imported row shares their code.
pub fn delete_set(master: &[MasterRecord], class: MaterialClass) -> Vec<String> {
    master
        .iter()
        .filter(|m| m.class == class && m.has_price_data())
        .map(|m| m.code.clone())
        .collect()
}

/// Map the batch to the persistence shape plus its delete-set. Rows flagged
/// with an invalid unit are not mapped; when any exist the batch is
/// inadmissible and the sink refuses the plan anyway.
pub fn build_plan(
    batch: &ImportBatch,
    master: &[MasterRecord],
    class: MaterialClass,
    submitted_by: &str,
) -> ImportPlan {
    let records = batch
        .rows
        .iter()
        .filter(|r| !r.has_invalid_unit)
        .map(|r| ImportRecord {
            code: r.canonical_code.clone(),
            class_code: class.class_code(),
            name: r.catalog_name.clone(),
            unit: match &r.final_unit {
                Unit::Known(u) => Some(u.clone()),
                Unit::Invalid => None,
            },
            price: r.final_price,
            currency: r.final_currency.clone(),
            submitted_by: submitted_by.to_string(),
            normalized_price: r.normalized_price,
            was_duplicate: r.is_duplicate_group,
        })
        .collect();

    ImportPlan {
        records,
        delete_codes: delete_set(master, class),
    }
}
