use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSnapshot;
use crate::rates::RateTable;
use crate::transform::{ImportPlan, MasterRecord};

// ---------------------------------------------------------------------------
// Material class
// ---------------------------------------------------------------------------

/// Material class an import run targets. The price master stores the
/// two-letter code, the source sheets carry free-form labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialClass {
    Raw,
    Packaging,
}

impl MaterialClass {
    /// Fixed two-letter code used by the price master.
    pub fn class_code(&self) -> &'static str {
        match self {
            Self::Raw => "RM",
            Self::Packaging => "PM",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "raw" | "rm" => Some(Self::Raw),
            "packaging" | "pm" => Some(Self::Packaging),
            _ => None,
        }
    }

    /// Whether a free-form source label ("Raw Material", "PM", "packaging")
    /// names this class.
    pub fn matches_label(&self, label: &str) -> bool {
        let lower = label.trim().to_lowercase();
        match self {
            Self::Raw => lower == "rm" || lower.contains("raw"),
            Self::Packaging => lower == "pm" || lower.contains("pack"),
        }
    }
}

impl std::fmt::Display for MaterialClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Packaging => write!(f, "packaging"),
        }
    }
}

// ---------------------------------------------------------------------------
// Present-or-absent field types
// ---------------------------------------------------------------------------

/// A purchase price cell. `Unset` covers empty, unparsable, and non-finite
/// source values; every consumer matches on this instead of re-deriving
/// its own emptiness rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Known(f64),
    Unset,
}

impl Price {
    pub fn from_opt(v: Option<f64>) -> Self {
        match v {
            Some(x) if x.is_finite() => Self::Known(x),
            _ => Self::Unset,
        }
    }

    pub fn known(self) -> Option<f64> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unset => None,
        }
    }

    /// A price the master can accept without the zero-price coercion.
    pub fn is_importable(self) -> bool {
        matches!(self, Self::Known(v) if v.is_finite() && v > 0.0)
    }
}

/// A validated final unit. `Invalid` is the blocking case of the unit rule;
/// it serializes as null so the persisted shape never carries a sentinel
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Unit {
    Known(String),
    Invalid,
}

impl Unit {
    pub fn known(&self) -> Option<&str> {
        match self {
            Self::Known(u) => Some(u),
            Self::Invalid => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline rows
// ---------------------------------------------------------------------------

/// A single row as read from the source workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawMaterialRow {
    /// 1-based position in the source sheet (header row = 1), kept for
    /// error reporting back to the spreadsheet owner.
    pub row_number: u32,
    pub class_label: String,
    pub code: String,
    /// Display name from the sheet; informational only, the catalog name
    /// is what gets persisted.
    pub name: String,
    pub unit: Option<String>,
    pub currency: Option<String>,
    pub price: Price,
}

/// A row that survived identifier normalization, catalog resolution, the
/// class check, and price normalization to the comparison basis.
#[derive(Debug, Clone, Serialize)]
pub struct PricedRow {
    pub row_number: u32,
    pub canonical_code: String,
    pub original_code: String,
    pub name: String,
    pub unit: Option<String>,
    pub currency: Option<String>,
    pub price: Price,
    pub class: MaterialClass,
    pub catalog_name: String,
    /// Price in base currency per base unit. Comparison only, never
    /// persisted as the row's price.
    pub normalized_price: f64,
    /// Set when a cross-dimension unit conversion was needed but the
    /// catalog had no usable density.
    pub low_confidence: bool,
}

/// Group winner (or singleton) with final import values and validation
/// flags. `final_price` is already coerced: a non-positive or missing
/// source price became 0 with `has_zero_price` set.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedImportRow {
    pub row_number: u32,
    pub canonical_code: String,
    pub catalog_name: String,
    pub class: MaterialClass,
    pub final_price: f64,
    pub final_unit: Unit,
    pub final_currency: Option<String>,
    pub normalized_price: f64,
    pub is_duplicate_group: bool,
    /// Row numbers this winner superseded (empty for singletons).
    pub superseded_rows: Vec<u32>,
    pub low_confidence: bool,
    pub has_invalid_unit: bool,
    pub has_zero_price: bool,
}

/// The reconciled batch. `admissible` is false as soon as one row carries
/// an invalid unit; an inadmissible batch must never reach the master.
#[derive(Debug, Clone, Serialize)]
pub struct ImportBatch {
    pub rows: Vec<ValidatedImportRow>,
    pub admissible: bool,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowOutcome {
    Imported,
    ImportedAsDuplicateWinner,
    SupersededByDuplicateWinner,
    WarningZeroPrice,
    BlockedInvalidUnit,
    RejectedWrongClass,
    RejectedUnresolvedCode,
}

impl std::fmt::Display for RowOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imported => write!(f, "imported"),
            Self::ImportedAsDuplicateWinner => write!(f, "imported-as-duplicate-winner"),
            Self::SupersededByDuplicateWinner => write!(f, "superseded-by-duplicate-winner"),
            Self::WarningZeroPrice => write!(f, "warning-zero-price"),
            Self::BlockedInvalidUnit => write!(f, "blocked-invalid-unit"),
            Self::RejectedWrongClass => write!(f, "rejected-wrong-class"),
            Self::RejectedUnresolvedCode => write!(f, "rejected-unresolved-code"),
        }
    }
}

/// Per-row outcome record. Every source row produces exactly one.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRecord {
    pub row_number: u32,
    pub canonical_code: String,
    pub outcome: RowOutcome,
    /// The specific rule or decision, worded for whoever has to fix the
    /// source spreadsheet.
    pub detail: String,
}

// ---------------------------------------------------------------------------
// Summary + Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub imported: usize,
    pub duplicate_winners: usize,
    pub superseded: usize,
    pub zero_price_warnings: usize,
    pub blocked_invalid_unit: usize,
    pub rejected_wrong_class: usize,
    pub rejected_unresolved: usize,
    pub low_confidence: usize,
    pub admissible: bool,
    pub outcome_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportMeta {
    pub config_name: String,
    pub class: MaterialClass,
    pub base_currency: String,
    pub period: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub meta: ImportMeta,
    pub summary: ImportSummary,
    pub outcomes: Vec<OutcomeRecord>,
    pub batch: ImportBatch,
    pub plan: ImportPlan,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-loaded inputs for one import run. All external fetches happen
/// before this is built; the engine itself never touches IO.
pub struct ImportInput {
    pub rows: Vec<RawMaterialRow>,
    pub catalog: CatalogSnapshot,
    pub rates: RateTable,
    pub master: Vec<MasterRecord>,
}
