use std::collections::HashMap;

use crate::model::{ImportBatch, ImportSummary, OutcomeRecord, RowOutcome};

/// Compute summary statistics from the per-row outcomes and the batch.
pub fn compute_summary(outcomes: &[OutcomeRecord], batch: &ImportBatch) -> ImportSummary {
    let mut outcome_counts: HashMap<String, usize> = HashMap::new();
    let mut imported = 0;
    let mut duplicate_winners = 0;
    let mut superseded = 0;
    let mut zero_price_warnings = 0;
    let mut blocked_invalid_unit = 0;
    let mut rejected_wrong_class = 0;
    let mut rejected_unresolved = 0;

    for o in outcomes {
        *outcome_counts.entry(o.outcome.to_string()).or_insert(0) += 1;

        match o.outcome {
            RowOutcome::Imported => imported += 1,
            RowOutcome::ImportedAsDuplicateWinner => duplicate_winners += 1,
            RowOutcome::SupersededByDuplicateWinner => superseded += 1,
            RowOutcome::WarningZeroPrice => zero_price_warnings += 1,
            RowOutcome::BlockedInvalidUnit => blocked_invalid_unit += 1,
            RowOutcome::RejectedWrongClass => rejected_wrong_class += 1,
            RowOutcome::RejectedUnresolvedCode => rejected_unresolved += 1,
        }
    }

    ImportSummary {
        total_rows: outcomes.len(),
        imported,
        duplicate_winners,
        superseded,
        zero_price_warnings,
        blocked_invalid_unit,
        rejected_wrong_class,
        rejected_unresolved,
        low_confidence: batch.rows.iter().filter(|r| r.low_confidence).count(),
        admissible: batch.admissible,
        outcome_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(row_number: u32, outcome: RowOutcome) -> OutcomeRecord {
        OutcomeRecord {
            row_number,
            canonical_code: "100".into(),
            outcome,
            detail: String::new(),
        }
    }

    #[test]
    fn summary_counts() {
        let outcomes = vec![
            outcome(2, RowOutcome::Imported),
            outcome(3, RowOutcome::ImportedAsDuplicateWinner),
            outcome(4, RowOutcome::SupersededByDuplicateWinner),
            outcome(5, RowOutcome::WarningZeroPrice),
            outcome(6, RowOutcome::RejectedUnresolvedCode),
            outcome(7, RowOutcome::RejectedUnresolvedCode),
        ];
        let batch = ImportBatch { rows: Vec::new(), admissible: true };
        let summary = compute_summary(&outcomes, &batch);
        assert_eq!(summary.total_rows, 6);
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.duplicate_winners, 1);
        assert_eq!(summary.superseded, 1);
        assert_eq!(summary.zero_price_warnings, 1);
        assert_eq!(summary.rejected_unresolved, 2);
        assert_eq!(summary.outcome_counts["rejected-unresolved-code"], 2);
        assert!(summary.admissible);
    }
}
