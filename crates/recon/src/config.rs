use serde::Deserialize;

use crate::error::ImportError;
use crate::model::MaterialClass;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// One import run, loaded from a `.import.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    pub name: String,
    /// Material class this run targets; rows labeled otherwise are
    /// rejected per-row.
    pub class: MaterialClass,
    pub base_currency: String,
    /// Rate period identifier the rates snapshot must be filtered to.
    pub period: String,
    pub submitted_by: String,
    pub files: FileRefs,
    #[serde(default)]
    pub columns: ColumnMapping,
}

/// Input file references, resolved relative to the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRefs {
    /// Rows workbook: .csv/.tsv or .xlsx/.xls/.xlsb/.ods.
    pub rows: String,
    pub catalog: String,
    pub rates: String,
    /// SQLite price master. Optional: without it the run is analysis-only.
    #[serde(default)]
    pub master: Option<String>,
    /// Worksheet name when `rows` is a workbook; first sheet otherwise.
    #[serde(default)]
    pub sheet: Option<String>,
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Header names of the rows file. Defaults cover sheets exported with
/// canonical headers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub class_label: String,
    pub code: String,
    pub name: String,
    pub unit: String,
    pub currency: String,
    pub price: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            class_label: "class".into(),
            code: "code".into(),
            name: "name".into(),
            unit: "unit".into(),
            currency: "currency".into(),
            price: "price".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ImportConfig {
    pub fn from_toml(input: &str) -> Result<Self, ImportError> {
        let config: ImportConfig =
            toml::from_str(input).map_err(|e| ImportError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ImportError> {
        if self.name.trim().is_empty() {
            return Err(ImportError::ConfigValidation("name must not be empty".into()));
        }
        if self.base_currency.trim().is_empty() {
            return Err(ImportError::ConfigValidation(
                "base_currency must not be empty".into(),
            ));
        }
        if self.period.trim().is_empty() {
            return Err(ImportError::ConfigValidation("period must not be empty".into()));
        }
        if self.submitted_by.trim().is_empty() {
            return Err(ImportError::ConfigValidation(
                "submitted_by must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
