use std::path::Path;

use pricebook_recon::catalog::{BaseUnit, CatalogEntry, CatalogSnapshot};
use pricebook_recon::model::MaterialClass;
use pricebook_recon::rates::RateTable;

use crate::error::IoError;
use crate::rows::{read_file_as_utf8, sniff_delimiter};

/// Load the catalog snapshot CSV: `code,name,class,base_unit,density`.
/// Density may be empty; non-positive values also load as unknown, the
/// engine treats both the same way.
pub fn load_catalog(path: &Path) -> Result<CatalogSnapshot, IoError> {
    let file = path.display().to_string();
    let content = read_file_as_utf8(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(&content))
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::Read { file: file.clone(), message: e.to_string() })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, IoError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| IoError::MissingColumn {
                file: file.clone(),
                column: name.into(),
            })
    };

    let code_idx = idx("code")?;
    let name_idx = idx("name")?;
    let class_idx = idx("class")?;
    let base_unit_idx = idx("base_unit")?;
    let density_idx = idx("density")?;

    let mut entries = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| IoError::Read { file: file.clone(), message: e.to_string() })?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

        let code = cell(code_idx);
        if code.is_empty() {
            continue;
        }

        let bad = |field: &str, value: &str| IoError::BadValue {
            file: file.clone(),
            record: code.clone(),
            field: field.into(),
            value: value.into(),
        };

        let class_raw = cell(class_idx);
        let class = MaterialClass::parse(&class_raw).ok_or_else(|| bad("class", &class_raw))?;

        let base_unit_raw = cell(base_unit_idx);
        let base_unit =
            BaseUnit::parse(&base_unit_raw).ok_or_else(|| bad("base_unit", &base_unit_raw))?;

        let density_raw = cell(density_idx);
        let density = if density_raw.is_empty() {
            None
        } else {
            let value: f64 = density_raw
                .parse()
                .map_err(|_| bad("density", &density_raw))?;
            (value.is_finite() && value > 0.0).then_some(value)
        };

        entries.push(CatalogEntry {
            code,
            name: cell(name_idx),
            class,
            base_unit,
            density,
        });
    }

    if entries.is_empty() {
        return Err(IoError::Empty { file });
    }
    Ok(CatalogSnapshot::new(entries))
}

/// Load the currency-rate snapshot CSV for one period:
/// `currency,rate_to_base`. Rates must be positive numbers.
pub fn load_rates(path: &Path, base_currency: &str, period: &str) -> Result<RateTable, IoError> {
    let file = path.display().to_string();
    let content = read_file_as_utf8(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(&content))
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::Read { file: file.clone(), message: e.to_string() })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, IoError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| IoError::MissingColumn {
                file: file.clone(),
                column: name.into(),
            })
    };

    let currency_idx = idx("currency")?;
    let rate_idx = idx("rate_to_base")?;

    let mut rates = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| IoError::Read { file: file.clone(), message: e.to_string() })?;
        let currency = record.get(currency_idx).unwrap_or("").trim().to_string();
        if currency.is_empty() {
            continue;
        }

        let rate_raw = record.get(rate_idx).unwrap_or("").trim().to_string();
        let rate: f64 = rate_raw.parse().map_err(|_| IoError::BadValue {
            file: file.clone(),
            record: currency.clone(),
            field: "rate_to_base".into(),
            value: rate_raw.clone(),
        })?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(IoError::BadValue {
                file: file.clone(),
                record: currency,
                field: "rate_to_base".into(),
                value: rate_raw,
            });
        }

        rates.push((currency, rate));
    }

    Ok(RateTable::new(base_currency, period, rates))
}
