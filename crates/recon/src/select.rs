use crate::group::CodeGroup;
use crate::model::PricedRow;

/// A group reduced to its single representative row. The winner keeps its
/// own unconverted purchase values; normalization only decided who won.
#[derive(Debug, Clone)]
pub struct SelectedRow {
    pub row: PricedRow,
    pub is_duplicate_group: bool,
    /// Row numbers of the group members the winner superseded.
    pub superseded_rows: Vec<u32>,
}

/// Pick the group's winner: the row with the strictly greatest normalized
/// price. The scan runs in source order with a strict `>` comparison, so
/// on exact ties the earliest row wins. Singleton groups pass through.
pub fn select_winner(group: CodeGroup) -> SelectedRow {
    let is_duplicate_group = group.is_duplicate();
    let mut rows = group.rows;

    let mut winner = 0;
    for (i, row) in rows.iter().enumerate().skip(1) {
        if row.normalized_price > rows[winner].normalized_price {
            winner = i;
        }
    }

    let superseded_rows: Vec<u32> = rows
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != winner)
        .map(|(_, r)| r.row_number)
        .collect();

    SelectedRow {
        row: rows.swap_remove(winner),
        is_duplicate_group,
        superseded_rows,
    }
}
