use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use pricebook_recon::config::ColumnMapping;
use pricebook_recon::model::{Price, RawMaterialRow};

use crate::error::IoError;

/// Load the rows workbook. Excel formats go through calamine, everything
/// else is treated as delimited text.
pub fn load_rows(
    path: &Path,
    columns: &ColumnMapping,
    sheet: Option<&str>,
) -> Result<Vec<RawMaterialRow>, IoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xls" | "xlsb" | "ods" => load_rows_workbook(path, columns, sheet),
        _ => {
            let content = read_file_as_utf8(path)?;
            let delimiter = sniff_delimiter(&content);
            load_rows_csv(&content, delimiter, columns, &path.display().to_string())
        }
    }
}

/// Read a file and convert to UTF-8 if needed (handles Windows-1252
/// exports from Excel).
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |e: String| IoError::Read {
        file: path.display().to_string(),
        message: e,
    };

    let mut file = std::fs::File::open(path).map_err(|e| read_err(e.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| read_err(e.to_string()))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines. The delimiter producing the most consistent field
/// count (>1 field) wins; comma is the fallback.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Parse delimited rows text. The header line is sheet row 1, so the first
/// data record is row 2.
pub fn load_rows_csv(
    content: &str,
    delimiter: u8,
    columns: &ColumnMapping,
    file: &str,
) -> Result<Vec<RawMaterialRow>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::Read { file: file.into(), message: e.to_string() })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, IoError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| IoError::MissingColumn {
                file: file.into(),
                column: name.into(),
            })
    };

    let class_idx = idx(&columns.class_label)?;
    let code_idx = idx(&columns.code)?;
    let name_idx = idx(&columns.name)?;
    let unit_idx = idx(&columns.unit)?;
    let currency_idx = idx(&columns.currency)?;
    let price_idx = idx(&columns.price)?;

    let mut rows = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| IoError::Read { file: file.into(), message: e.to_string() })?;
        let row_number = i as u32 + 2;

        let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let code = cell(code_idx);
        if code.is_empty() {
            return Err(IoError::BadValue {
                file: file.into(),
                record: format!("row {row_number}"),
                field: "code".into(),
                value: String::new(),
            });
        }

        rows.push(RawMaterialRow {
            row_number,
            class_label: cell(class_idx),
            code,
            name: cell(name_idx),
            unit: non_empty(cell(unit_idx)),
            currency: non_empty(cell(currency_idx)),
            price: Price::from_opt(parse_price(&cell(price_idx))),
        });
    }

    if rows.is_empty() {
        return Err(IoError::Empty { file: file.into() });
    }
    Ok(rows)
}

fn load_rows_workbook(
    path: &Path,
    columns: &ColumnMapping,
    sheet: Option<&str>,
) -> Result<Vec<RawMaterialRow>, IoError> {
    let file = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|e| IoError::Read {
        file: file.clone(),
        message: e.to_string(),
    })?;

    let sheet_name = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(IoError::UnknownSheet { file, sheet: name.into() });
            }
            name.to_string()
        }
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IoError::Empty { file: file.clone() })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::Read { file: file.clone(), message: e.to_string() })?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| IoError::Empty { file: file.clone() })?
        .iter()
        .map(|c| cell_text(c))
        .collect();

    let idx = |name: &str| -> Result<usize, IoError> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| IoError::MissingColumn {
                file: file.clone(),
                column: name.into(),
            })
    };

    let class_idx = idx(&columns.class_label)?;
    let code_idx = idx(&columns.code)?;
    let name_idx = idx(&columns.name)?;
    let unit_idx = idx(&columns.unit)?;
    let currency_idx = idx(&columns.currency)?;
    let price_idx = idx(&columns.price)?;

    // Worksheet ranges start at the first used cell; keep row numbers true
    // to the sheet so error reports point at the right row.
    let first_sheet_row = range.start().map(|(r, _)| r).unwrap_or(0) + 1;

    let mut rows = Vec::new();

    for (i, cells) in rows_iter.enumerate() {
        let row_number = first_sheet_row + i as u32 + 1;
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        let text = |idx: usize| cells.get(idx).map(cell_text).unwrap_or_default().trim().to_string();

        let code = text(code_idx);
        if code.is_empty() {
            return Err(IoError::BadValue {
                file: file.clone(),
                record: format!("row {row_number}"),
                field: "code".into(),
                value: String::new(),
            });
        }

        rows.push(RawMaterialRow {
            row_number,
            class_label: text(class_idx),
            code,
            name: text(name_idx),
            unit: non_empty(text(unit_idx)),
            currency: non_empty(text(currency_idx)),
            price: Price::from_opt(cell_price(cells.get(price_idx))),
        });
    }

    if rows.is_empty() {
        return Err(IoError::Empty { file });
    }
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(v) => {
            // Codes like 130.000 keep their text form when Excel stored
            // them as text; numeric cells format without a trailing .0
            if v.fract() == 0.0 {
                format!("{}", *v as i64)
            } else {
                v.to_string()
            }
        }
        Data::Int(v) => v.to_string(),
        other => other.to_string(),
    }
}

fn cell_price(cell: Option<&Data>) -> Option<f64> {
    match cell? {
        Data::Float(v) => Some(*v),
        Data::Int(v) => Some(*v as f64),
        Data::String(s) => parse_price(s),
        _ => None,
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
