use std::collections::HashMap;

use super::model::{SurveyRow, SurveyTable};

// ---------------------------------------------------------------------------
// RowIndex – O(1) joins of curated labels against loaded rows
// ---------------------------------------------------------------------------

/// Lookup tables over one [`SurveyTable`], built once per load.
///
/// When several rows share a key the first one in file order wins.
#[derive(Debug, Clone, Default)]
pub struct RowIndex {
    /// breakdown → purpose → row position
    by_pair: HashMap<String, HashMap<String, usize>>,
    /// purpose → row position, ignoring the breakdown
    by_purpose: HashMap<String, usize>,
}

impl RowIndex {
    pub fn build(table: &SurveyTable) -> Self {
        let mut index = RowIndex::default();
        for (pos, row) in table.rows.iter().enumerate() {
            let Some(purpose) = row.purpose() else {
                continue;
            };
            index.by_purpose.entry(purpose.to_string()).or_insert(pos);
            if let Some(breakdown) = row.breakdown() {
                index
                    .by_pair
                    .entry(breakdown.to_string())
                    .or_default()
                    .entry(purpose.to_string())
                    .or_insert(pos);
            }
        }
        index
    }

    /// First row matching both breakdown and purpose.
    pub fn find<'t>(&self, table: &'t SurveyTable, breakdown: &str, purpose: &str) -> Option<&'t SurveyRow> {
        let pos = *self.by_pair.get(breakdown)?.get(purpose)?;
        table.rows.get(pos)
    }

    /// First row matching the purpose, whatever its breakdown.
    pub fn find_purpose<'t>(&self, table: &'t SurveyTable, purpose: &str) -> Option<&'t SurveyRow> {
        table.rows.get(*self.by_purpose.get(purpose)?)
    }

    /// Value of `year` for (breakdown, purpose).
    ///
    /// A missing row counts as `0`, while a present row whose cell holds no
    /// data stays `None`. Charts rely on that difference.
    pub fn value_or_zero(&self, table: &SurveyTable, breakdown: &str, purpose: &str, year: &str) -> Option<f64> {
        match self.find(table, breakdown, purpose) {
            Some(row) => row.value(year),
            None => Some(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SurveyTable {
        let rows: Vec<SurveyRow> = [
            ("Males", "Using e-mail", "80"),
            ("Males", "Using e-mail", "10"),
            ("Females", "Using e-mail", "."),
            ("Females", "Internet Banking via website or app", "61"),
        ]
        .into_iter()
        .map(|(b, p, v)| [("Breakdowns", b), ("Purposes", p), ("2024", v)].into_iter().collect::<SurveyRow>())
        .collect();
        SurveyTable::new(vec![], rows)
    }

    #[test]
    fn first_match_wins() {
        let t = table();
        let index = RowIndex::build(&t);
        assert_eq!(index.value_or_zero(&t, "Males", "Using e-mail", "2024"), Some(80.0));
        assert_eq!(
            index.find_purpose(&t, "Using e-mail").and_then(|r| r.breakdown()),
            Some("Males")
        );
    }

    #[test]
    fn missing_row_is_zero_but_unparseable_cell_is_none() {
        let t = table();
        let index = RowIndex::build(&t);
        assert_eq!(index.value_or_zero(&t, "Males", "Internet Banking via website or app", "2024"), Some(0.0));
        assert_eq!(index.value_or_zero(&t, "Females", "Using e-mail", "2024"), None);
        assert_eq!(index.value_or_zero(&t, "Nobody", "Using e-mail", "2024"), Some(0.0));
    }
}
