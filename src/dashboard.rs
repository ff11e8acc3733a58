use log::{debug, info};

use crate::chart::{ChartKind, ChartOptions, ChartSink, ChartSpec};
use crate::color::PurposePalette;
use crate::config::{DashboardConfig, Source};
use crate::data::index::RowIndex;
use crate::data::model::SurveyTable;
use crate::data::views::{breakdown_pair_view, grouped_view, top_n_view, trend_view};

pub const GENDER_TARGET: &str = "genderChart";
pub const AGE_TARGET: &str = "ageChart";
pub const HEATMAP_TARGET: &str = "heatmapChart";
pub const TREND_TARGET: &str = "trendChart";
pub const REGION_CONTAINER: &str = "regionCharts";

const HEATMAP_TITLE: &str = "Internet Usage by Age Group (Top 5 Purposes)";

/// Build the charts fed by `source` and hand them to `sink`.
///
/// An empty table renders nothing. Returns the number of charts rendered.
pub fn render_source(
    source: Source,
    table: &SurveyTable,
    config: &DashboardConfig,
    palette: &PurposePalette,
    sink: &mut impl ChartSink,
) -> usize {
    if table.is_empty() {
        debug!("{source}: no rows, nothing to render");
        return 0;
    }

    let index = RowIndex::build(table);
    let year = config.latest_year.as_str();
    let purposes = &config.curated_purposes;

    let charts = match source {
        Source::Gender => {
            let data = breakdown_pair_view(table, &index, &config.gender_pair, purposes, year, palette);
            vec![ChartSpec::new(GENDER_TARGET, ChartKind::Bar, data).with_options(ChartOptions {
                horizontal: true,
                ..Default::default()
            })]
        }
        Source::Age => {
            let stacked = grouped_view(table, &index, purposes, year, palette);
            let heatmap = grouped_view(table, &index, config.heatmap_purposes(), year, palette);
            vec![
                ChartSpec::new(AGE_TARGET, ChartKind::Bar, stacked).with_options(ChartOptions {
                    stacked: true,
                    ..Default::default()
                }),
                ChartSpec::new(HEATMAP_TARGET, ChartKind::Bar, heatmap).with_options(ChartOptions {
                    title: Some(HEATMAP_TITLE.to_string()),
                    ..Default::default()
                }),
            ]
        }
        Source::Overtime => {
            let data = trend_view(table, &index, purposes, palette);
            vec![ChartSpec::new(TREND_TARGET, ChartKind::Line, data)]
        }
        Source::Geography => {
            sink.clear_container(REGION_CONTAINER);
            top_n_view(table, year, config.top_n)
                .into_iter()
                .enumerate()
                .map(|(i, top)| {
                    ChartSpec::new(
                        format!("{REGION_CONTAINER}/{i}"),
                        ChartKind::Doughnut,
                        top.chart_data(palette),
                    )
                    .with_options(ChartOptions {
                        title: Some(top.title().to_string()),
                        ..Default::default()
                    })
                })
                .collect()
        }
    };

    let rendered = charts.len();
    for chart in charts {
        debug_assert!(chart.data.is_aligned(), "{} has misaligned series", chart.target);
        sink.render(chart);
    }
    info!("{source}: rendered {rendered} chart(s) from {} rows", table.len());
    rendered
}
