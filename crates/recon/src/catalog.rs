use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::MaterialClass;

// ---------------------------------------------------------------------------
// Units of account
// ---------------------------------------------------------------------------

/// Physical dimension a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Mass,
    Volume,
}

/// Base unit a catalog entry prices against. This carries the entry's
/// expected dimension for the cross-dimension price step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseUnit {
    Kilogram,
    Liter,
}

impl BaseUnit {
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Kilogram => Dimension::Mass,
            Self::Liter => Dimension::Volume,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilo" => Some(Self::Kilogram),
            "l" | "lt" | "ltr" | "liter" | "litre" => Some(Self::Liter),
            _ => None,
        }
    }
}

impl std::fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kilogram => write!(f, "kg"),
            Self::Liter => write!(f, "l"),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One material in the external catalog snapshot (read-only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: String,
    pub name: String,
    pub class: MaterialClass,
    pub base_unit: BaseUnit,
    /// Mass per volume. `None` when the catalog has no usable value;
    /// loaders map absent and non-positive source values here.
    pub density: Option<f64>,
}

impl CatalogEntry {
    /// Density usable for a cross-dimension conversion.
    pub fn usable_density(&self) -> Option<f64> {
        self.density.filter(|d| d.is_finite() && *d > 0.0)
    }
}

/// Catalog snapshot keyed by code. Built once per run, never refreshed
/// mid-run.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    entries: HashMap<String, CatalogEntry>,
}

impl CatalogSnapshot {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.code.clone(), e)).collect(),
        }
    }

    /// Exact, case-sensitive code lookup.
    pub fn resolve(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str) -> CatalogEntry {
        CatalogEntry {
            code: code.into(),
            name: format!("Material {code}"),
            class: MaterialClass::Raw,
            base_unit: BaseUnit::Kilogram,
            density: None,
        }
    }

    #[test]
    fn resolve_is_exact_and_case_sensitive() {
        let snapshot = CatalogSnapshot::new([entry("130"), entry("AB-12")]);
        assert!(snapshot.resolve("130").is_some());
        assert!(snapshot.resolve("ab-12").is_none());
        assert!(snapshot.resolve("130.000").is_none());
    }

    #[test]
    fn base_unit_parsing() {
        assert_eq!(BaseUnit::parse("KG"), Some(BaseUnit::Kilogram));
        assert_eq!(BaseUnit::parse(" ltr "), Some(BaseUnit::Liter));
        assert_eq!(BaseUnit::parse("pcs"), None);
    }

    #[test]
    fn usable_density_filters_junk() {
        let mut e = entry("1");
        assert_eq!(e.usable_density(), None);
        e.density = Some(0.0);
        assert_eq!(e.usable_density(), None);
        e.density = Some(0.91);
        assert_eq!(e.usable_density(), Some(0.91));
    }
}
