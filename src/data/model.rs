use std::collections::{BTreeMap, HashSet};

use super::normalize::normalize_cell;

/// Column holding the demographic / geographic breakdown of a row.
pub const BREAKDOWNS_COLUMN: &str = "Breakdowns";
/// Column holding the survey question (internet usage purpose).
pub const PURPOSES_COLUMN: &str = "Purposes";

// ---------------------------------------------------------------------------
// SurveyRow – one parsed CSV record
// ---------------------------------------------------------------------------

/// A single survey record: column name → raw cell text.
///
/// Columns missing from a short record are simply absent from `cells`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyRow {
    pub cells: BTreeMap<String, String>,
}

impl SurveyRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn breakdown(&self) -> Option<&str> {
        self.get(BREAKDOWNS_COLUMN)
    }

    pub fn purpose(&self) -> Option<&str> {
        self.get(PURPOSES_COLUMN)
    }

    /// Normalised numeric value of the given column (`None` = no data).
    pub fn value(&self, column: &str) -> Option<f64> {
        normalize_cell(self.get(column))
    }
}

impl<K, V> FromIterator<(K, V)> for SurveyRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        SurveyRow {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// SurveyTable – all rows of one source
// ---------------------------------------------------------------------------

/// Rows of one survey source, in file order, plus the header column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyTable {
    pub columns: Vec<String>,
    pub rows: Vec<SurveyRow>,
}

impl SurveyTable {
    pub fn new(columns: Vec<String>, rows: Vec<SurveyRow>) -> Self {
        SurveyTable { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct `Breakdowns` values in order of first appearance.
    pub fn breakdowns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(SurveyRow::breakdown)
            .filter(|b| seen.insert(*b))
            .collect()
    }

    /// Year columns of the first row, ascending.
    ///
    /// Only column names made of exactly four ASCII digits qualify.
    pub fn year_columns(&self) -> Vec<&str> {
        let Some(first) = self.rows.first() else {
            return Vec::new();
        };
        let mut years: Vec<&str> = first
            .cells
            .keys()
            .map(String::as_str)
            .filter(|k| is_year_column(k))
            .collect();
        years.sort_unstable();
        years
    }

    /// All rows belonging to a breakdown, in file order.
    pub fn rows_for<'a>(&'a self, breakdown: &'a str) -> impl Iterator<Item = &'a SurveyRow> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.breakdown() == Some(breakdown))
    }
}

fn is_year_column(name: &str) -> bool {
    name.len() == 4 && name.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> SurveyRow {
        cells.iter().copied().collect()
    }

    #[test]
    fn breakdowns_keep_first_appearance_order() {
        let table = SurveyTable::new(
            vec![],
            vec![
                row(&[("Breakdowns", "25-34"), ("Purposes", "a")]),
                row(&[("Breakdowns", "16-24"), ("Purposes", "a")]),
                row(&[("Breakdowns", "25-34"), ("Purposes", "b")]),
                row(&[("Breakdowns", "65-74"), ("Purposes", "a")]),
            ],
        );
        assert_eq!(table.breakdowns(), vec!["25-34", "16-24", "65-74"]);
    }

    #[test]
    fn year_columns_are_four_digit_and_ascending() {
        let table = SurveyTable::new(
            vec![],
            vec![row(&[
                ("Breakdowns", "All"),
                ("Purposes", "a"),
                ("2024", "1"),
                ("2019", "2"),
                ("202", "3"),
                ("20a4", "4"),
                ("2021", "5"),
            ])],
        );
        assert_eq!(table.year_columns(), vec!["2019", "2021", "2024"]);
    }

    #[test]
    fn empty_table_has_no_axis() {
        let table = SurveyTable::default();
        assert!(table.is_empty());
        assert!(table.year_columns().is_empty());
        assert!(table.breakdowns().is_empty());
    }

    #[test]
    fn missing_cell_reads_as_no_data() {
        let r = row(&[("Purposes", "a"), ("2024", ".")]);
        assert_eq!(r.value("2024"), None);
        assert_eq!(r.value("2023"), None);
    }
}
