use std::collections::HashMap;

use crate::model::PricedRow;

/// Rows sharing one canonical code, in source order.
#[derive(Debug, Clone)]
pub struct CodeGroup {
    pub canonical_code: String,
    pub rows: Vec<PricedRow>,
}

impl CodeGroup {
    /// Size > 1 means the sheet listed the same logical material more than
    /// once and the group needs a winner.
    pub fn is_duplicate(&self) -> bool {
        self.rows.len() > 1
    }
}

/// Partition priced rows by canonical code. Group keys keep first-seen
/// order and rows keep source order within each group, so results are
/// reproducible from the same input sequence.
pub fn group_by_code(rows: Vec<PricedRow>) -> Vec<CodeGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<CodeGroup> = Vec::new();

    for row in rows {
        match index.get(&row.canonical_code) {
            Some(&i) => groups[i].rows.push(row),
            None => {
                index.insert(row.canonical_code.clone(), groups.len());
                groups.push(CodeGroup {
                    canonical_code: row.canonical_code.clone(),
                    rows: vec![row],
                });
            }
        }
    }

    groups
}
