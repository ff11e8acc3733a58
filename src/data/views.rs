use log::debug;

use super::index::RowIndex;
use super::model::SurveyTable;
use crate::chart::{ChartData, Paint, Series};
use crate::color::PurposePalette;
use crate::config::BreakdownLabel;

// ---------------------------------------------------------------------------
// Pair view – two fixed breakdowns against the curated purposes
// ---------------------------------------------------------------------------

/// One series per breakdown in `pair`, one value per curated purpose.
///
/// Values come from the `year` column. A (breakdown, purpose) pair with no
/// row shows as `0`; a row whose cell holds no data shows as `None`.
pub fn breakdown_pair_view(
    table: &SurveyTable,
    index: &RowIndex,
    pair: &[BreakdownLabel],
    purposes: &[String],
    year: &str,
    palette: &PurposePalette,
) -> ChartData {
    let series = pair
        .iter()
        .enumerate()
        .map(|(i, side)| {
            let values = purposes
                .iter()
                .map(|purpose| index.value_or_zero(table, &side.breakdown, purpose, year))
                .collect();
            Series::new(&side.label, values, Paint::Solid(palette.color(i)))
        })
        .collect();

    ChartData {
        labels: purposes.to_vec(),
        series,
    }
}

// ---------------------------------------------------------------------------
// Grouped view – every observed breakdown as a category
// ---------------------------------------------------------------------------

/// Categories are the table's breakdowns in order of first appearance; one
/// series per purpose, with the same lookup-or-zero rule as the pair view.
pub fn grouped_view(
    table: &SurveyTable,
    index: &RowIndex,
    purposes: &[String],
    year: &str,
    palette: &PurposePalette,
) -> ChartData {
    let categories = table.breakdowns();
    let series = purposes
        .iter()
        .map(|purpose| {
            let values = categories
                .iter()
                .map(|category| index.value_or_zero(table, category, purpose, year))
                .collect();
            Series::new(purpose, values, Paint::Solid(palette.color_for(purpose)))
        })
        .collect();

    ChartData {
        labels: categories.into_iter().map(str::to_string).collect(),
        series,
    }
}

// ---------------------------------------------------------------------------
// Top-N view – the highest purposes of each breakdown
// ---------------------------------------------------------------------------

/// The leading purposes of one breakdown (region), highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTop {
    pub region: String,
    pub entries: Vec<(String, f64)>,
}

impl RegionTop {
    /// Region name without its parenthesised qualifier.
    pub fn title(&self) -> &str {
        short_title(&self.region)
    }

    /// Doughnut data: one slice per entry, coloured by purpose.
    pub fn chart_data(&self, palette: &PurposePalette) -> ChartData {
        let colors = self
            .entries
            .iter()
            .map(|(purpose, _)| palette.color_for(purpose))
            .collect();
        let values = self.entries.iter().map(|(_, v)| Some(*v)).collect();
        ChartData {
            labels: self.entries.iter().map(|(p, _)| p.clone()).collect(),
            series: vec![Series::new(self.title(), values, Paint::PerPoint(colors))],
        }
    }
}

/// `"Northern and Western (NUTS 2)"` → `"Northern and Western"`.
pub fn short_title(region: &str) -> &str {
    region.split('(').next().unwrap_or(region).trim()
}

/// For each breakdown, its `n` highest-valued rows in `year`, descending.
///
/// Rows without data are skipped; breakdowns left with nothing (including
/// every breakdown when `n` is 0) are omitted.
/// Ties keep file order.
pub fn top_n_view(table: &SurveyTable, year: &str, n: usize) -> Vec<RegionTop> {
    table
        .breakdowns()
        .into_iter()
        .filter_map(|region| {
            let mut entries: Vec<(String, f64)> = table
                .rows_for(region)
                .filter_map(|row| Some((row.purpose()?.to_string(), row.value(year)?)))
                .collect();
            entries.sort_by(|a, b| b.1.total_cmp(&a.1));
            entries.truncate(n);
            if entries.is_empty() {
                debug!("{region}: no usable values for {year}");
                return None;
            }
            Some(RegionTop {
                region: region.to_string(),
                entries,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Trend view – curated purposes across every year column
// ---------------------------------------------------------------------------

/// Year axis from the first row's four-digit columns, ascending; one series
/// per purpose, taken from the first row with that purpose.
///
/// Years without data stay `None` and the series spans the gap. A purpose
/// with no row at all yields an all-`None` series.
pub fn trend_view(
    table: &SurveyTable,
    index: &RowIndex,
    purposes: &[String],
    palette: &PurposePalette,
) -> ChartData {
    let years = table.year_columns();
    let series = purposes
        .iter()
        .map(|purpose| {
            let values = match index.find_purpose(table, purpose) {
                Some(row) => years.iter().map(|year| row.value(year)).collect(),
                None => vec![None; years.len()],
            };
            Series::new(purpose, values, Paint::Solid(palette.color_for(purpose))).spanning_gaps()
        })
        .collect();

    ChartData {
        labels: years.into_iter().map(str::to_string).collect(),
        series,
    }
}
