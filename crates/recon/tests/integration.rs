use pricebook_recon::catalog::{BaseUnit, CatalogEntry, CatalogSnapshot};
use pricebook_recon::model::{ImportInput, MaterialClass, Price, RawMaterialRow, RowOutcome};
use pricebook_recon::rates::RateTable;
use pricebook_recon::transform::MasterRecord;
use pricebook_recon::{run, ImportConfig};

fn config() -> ImportConfig {
    ImportConfig::from_toml(
        r#"
name = "Integration Test"
class = "raw"
base_currency = "IDR"
period = "2026-08"
submitted_by = "admin"

[files]
rows = "rows.csv"
catalog = "catalog.csv"
rates = "rates.csv"
"#,
    )
    .unwrap()
}

fn raw(row_number: u32, code: &str, price: Option<f64>, currency: Option<&str>, unit: Option<&str>) -> RawMaterialRow {
    RawMaterialRow {
        row_number,
        class_label: "Raw Material".into(),
        code: code.into(),
        name: format!("Source name {code}"),
        unit: unit.map(str::to_string),
        currency: currency.map(str::to_string),
        price: Price::from_opt(price),
    }
}

fn entry(code: &str) -> CatalogEntry {
    CatalogEntry {
        code: code.into(),
        name: format!("Material {code}"),
        class: MaterialClass::Raw,
        base_unit: BaseUnit::Kilogram,
        density: Some(1.0),
    }
}

fn input(rows: Vec<RawMaterialRow>, catalog: Vec<CatalogEntry>) -> ImportInput {
    ImportInput {
        rows,
        catalog: CatalogSnapshot::new(catalog),
        rates: RateTable::new("IDR", "2026-08", [("USD".to_string(), 15000.0)]),
        master: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn suffixed_codes_group_together() {
    // "100.000" and "100.001" are the same logical material.
    let rows = vec![
        raw(2, "100.000", Some(10.0), None, Some("kg")),
        raw(3, "100.001", Some(12.0), None, Some("kg")),
    ];
    let result = run(&config(), &input(rows, vec![entry("100")])).unwrap();

    assert_eq!(result.batch.rows.len(), 1);
    let winner = &result.batch.rows[0];
    assert_eq!(winner.canonical_code, "100");
    assert!(winner.is_duplicate_group);
    assert_eq!(winner.row_number, 3);
    assert_eq!(winner.superseded_rows, vec![2]);
}

#[test]
fn duplicate_resolution_compares_in_base_currency() {
    // 10 USD at 15000 = 150000 IDR beats 95000 IDR, even though 95000
    // is the bigger face number.
    let rows = vec![
        raw(2, "X", Some(10.0), Some("USD"), Some("kg")),
        raw(3, "X", Some(95000.0), Some("IDR"), Some("kg")),
    ];
    let result = run(&config(), &input(rows, vec![entry("X")])).unwrap();

    let winner = &result.batch.rows[0];
    assert_eq!(winner.row_number, 2);
    assert_eq!(winner.normalized_price, 150_000.0);
    // The imported value stays in the winner's own currency and unit.
    assert_eq!(winner.final_price, 10.0);
    assert_eq!(winner.final_currency.as_deref(), Some("USD"));

    let outcome = result.outcomes.iter().find(|o| o.row_number == 2).unwrap();
    assert_eq!(outcome.outcome, RowOutcome::ImportedAsDuplicateWinner);
    let loser = result.outcomes.iter().find(|o| o.row_number == 3).unwrap();
    assert_eq!(loser.outcome, RowOutcome::SupersededByDuplicateWinner);
}

#[test]
fn numeric_unit_blocks_the_whole_batch() {
    let rows = vec![
        raw(2, "100", Some(10.0), None, Some("kg")),
        raw(3, "200", Some(20.0), None, Some("5")),
        raw(4, "300", Some(30.0), None, Some("kg")),
    ];
    let result = run(
        &config(),
        &input(rows, vec![entry("100"), entry("200"), entry("300")]),
    )
    .unwrap();

    assert!(!result.batch.admissible);
    assert!(!result.summary.admissible);
    assert_eq!(result.summary.blocked_invalid_unit, 1);
    let blocked = result.outcomes.iter().find(|o| o.row_number == 3).unwrap();
    assert_eq!(blocked.outcome, RowOutcome::BlockedInvalidUnit);
    assert!(blocked.detail.contains("'5'"));
    // The plan must not carry the blocked row.
    assert_eq!(result.plan.records.len(), 2);
}

#[test]
fn zero_and_missing_prices_warn_but_do_not_block() {
    let rows = vec![
        raw(2, "100", Some(0.0), None, Some("kg")),
        raw(3, "200", None, None, Some("kg")),
        raw(4, "300", Some(30.0), None, Some("kg")),
    ];
    let result = run(
        &config(),
        &input(rows, vec![entry("100"), entry("200"), entry("300")]),
    )
    .unwrap();

    assert!(result.batch.admissible);
    assert_eq!(result.summary.zero_price_warnings, 2);
    for rn in [2u32, 3] {
        let o = result.outcomes.iter().find(|o| o.row_number == rn).unwrap();
        assert_eq!(o.outcome, RowOutcome::WarningZeroPrice);
        let row = result.batch.rows.iter().find(|r| r.row_number == rn).unwrap();
        assert!(row.has_zero_price);
        assert_eq!(row.final_price, 0.0);
    }
}

#[test]
fn all_null_master_record_stays_out_of_the_delete_set() {
    let rows = vec![
        raw(2, "100", Some(10.0), None, Some("kg")),
        raw(3, "200", Some(20.0), None, Some("kg")),
    ];
    let mut run_input = input(rows, vec![entry("100"), entry("200")]);
    run_input.master = vec![
        // Placeholder: code matches an imported row but has no price data.
        MasterRecord {
            code: "100".into(),
            class: MaterialClass::Raw,
            price: None,
            previous_price: None,
        },
        MasterRecord {
            code: "200".into(),
            class: MaterialClass::Raw,
            price: Some(19.0),
            previous_price: None,
        },
        // Other class is never touched by a raw import.
        MasterRecord {
            code: "900".into(),
            class: MaterialClass::Packaging,
            price: Some(5.0),
            previous_price: None,
        },
    ];
    let result = run(&config(), &run_input).unwrap();

    assert_eq!(result.plan.delete_codes, vec!["200"]);
    assert_eq!(result.plan.records.len(), 2);
}

// ---------------------------------------------------------------------------
// Exclusions
// ---------------------------------------------------------------------------

#[test]
fn unresolved_code_is_excluded_and_reported() {
    let rows = vec![
        raw(2, "100", Some(10.0), None, Some("kg")),
        raw(3, "999", Some(20.0), None, Some("kg")),
    ];
    let result = run(&config(), &input(rows, vec![entry("100")])).unwrap();

    assert_eq!(result.batch.rows.len(), 1);
    let o = result.outcomes.iter().find(|o| o.row_number == 3).unwrap();
    assert_eq!(o.outcome, RowOutcome::RejectedUnresolvedCode);
    assert!(o.detail.contains("999"));
    assert!(result.batch.admissible, "exclusions do not block the rest");
}

#[test]
fn missing_currency_rate_is_excluded_and_reported() {
    let rows = vec![
        raw(2, "100", Some(10.0), Some("EUR"), Some("kg")),
        raw(3, "200", Some(20.0), Some("USD"), Some("kg")),
    ];
    let result = run(&config(), &input(rows, vec![entry("100"), entry("200")])).unwrap();

    assert_eq!(result.batch.rows.len(), 1);
    assert_eq!(result.batch.rows[0].row_number, 3);
    let o = result.outcomes.iter().find(|o| o.row_number == 2).unwrap();
    assert_eq!(o.outcome, RowOutcome::RejectedUnresolvedCode);
    assert!(o.detail.contains("EUR"));
}

#[test]
fn wrong_class_label_is_a_per_row_rejection() {
    let mut mislabeled = raw(3, "200", Some(20.0), None, Some("kg"));
    mislabeled.class_label = "Packaging Material".into();
    let rows = vec![raw(2, "100", Some(10.0), None, Some("kg")), mislabeled];
    let result = run(&config(), &input(rows, vec![entry("100"), entry("200")])).unwrap();

    assert_eq!(result.batch.rows.len(), 1);
    assert!(result.batch.admissible);
    let o = result.outcomes.iter().find(|o| o.row_number == 3).unwrap();
    assert_eq!(o.outcome, RowOutcome::RejectedWrongClass);
}

#[test]
fn catalog_class_mismatch_is_a_per_row_rejection() {
    let mut packaging_entry = entry("200");
    packaging_entry.class = MaterialClass::Packaging;
    let rows = vec![
        raw(2, "100", Some(10.0), None, Some("kg")),
        raw(3, "200", Some(20.0), None, Some("kg")),
    ];
    let result = run(&config(), &input(rows, vec![entry("100"), packaging_entry])).unwrap();

    let o = result.outcomes.iter().find(|o| o.row_number == 3).unwrap();
    assert_eq!(o.outcome, RowOutcome::RejectedWrongClass);
    assert!(o.detail.contains("catalog"));
}

// ---------------------------------------------------------------------------
// Reporting invariants
// ---------------------------------------------------------------------------

#[test]
fn every_source_row_gets_exactly_one_outcome() {
    let mut wrong_class = raw(6, "400", Some(5.0), None, Some("kg"));
    wrong_class.class_label = "PM".into();
    let rows = vec![
        raw(2, "100.000", Some(10.0), None, Some("kg")),
        raw(3, "100.001", Some(12.0), None, Some("kg")),
        raw(4, "999", Some(1.0), None, Some("kg")),
        raw(5, "200", Some(0.0), None, Some("kg")),
        wrong_class,
        raw(7, "300", Some(3.0), Some("CHF"), Some("kg")),
    ];
    let result = run(
        &config(),
        &input(
            rows,
            vec![entry("100"), entry("200"), entry("300"), entry("400")],
        ),
    )
    .unwrap();

    let numbers: Vec<u32> = result.outcomes.iter().map(|o| o.row_number).collect();
    assert_eq!(numbers, vec![2, 3, 4, 5, 6, 7], "one outcome per row, sorted");
    assert_eq!(result.summary.total_rows, 6);
}

#[test]
fn low_confidence_cross_dimension_is_surfaced_not_blocking() {
    // Priced per kg against a liter-based entry with no density.
    let mut liter_entry = entry("100");
    liter_entry.base_unit = BaseUnit::Liter;
    liter_entry.density = None;
    let rows = vec![raw(2, "100", Some(10.0), None, Some("kg"))];
    let result = run(&config(), &input(rows, vec![liter_entry])).unwrap();

    assert!(result.batch.admissible);
    assert!(result.batch.rows[0].low_confidence);
    assert_eq!(result.summary.low_confidence, 1);
    let o = &result.outcomes[0];
    assert!(o.detail.contains("density unavailable"));
}

#[test]
fn meta_reflects_the_run() {
    let rows = vec![raw(2, "100", Some(10.0), None, Some("kg"))];
    let result = run(&config(), &input(rows, vec![entry("100")])).unwrap();
    assert_eq!(result.meta.config_name, "Integration Test");
    assert_eq!(result.meta.class, MaterialClass::Raw);
    assert_eq!(result.meta.base_currency, "IDR");
    assert_eq!(result.meta.period, "2026-08");
    assert!(!result.meta.engine_version.is_empty());
}

#[test]
fn empty_input_is_an_error() {
    let err = run(&config(), &input(Vec::new(), vec![entry("100")])).unwrap_err();
    assert!(err.to_string().contains("no data rows"));
}
