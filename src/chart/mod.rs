//! Chart descriptions and the dispatch seam between data and drawing.
//!
//! ```text
//!   data::views ──► ChartSpec ──► ChartSink::render
//!                                     │
//!                                     ▼
//!                              ChartBoard (held by the UI)
//!                                     │
//!                                     ▼
//!                              ui::plot draws each spec
//! ```

use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// How a series is coloured.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color32),
    /// One colour per value, e.g. the slices of a doughnut.
    PerPoint(Vec<Color32>),
}

impl Paint {
    pub fn color_at(&self, i: usize) -> Color32 {
        match self {
            Paint::Solid(c) => *c,
            Paint::PerPoint(colors) => colors.get(i).copied().unwrap_or(Color32::GRAY),
        }
    }
}

/// One named sequence of values plotted against the chart's label axis.
///
/// `None` is "no data" and is kept distinct from `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub paint: Paint,
    /// Draw lines across `None` values instead of breaking them.
    pub span_gaps: bool,
}

impl Series {
    pub fn new(label: impl Into<String>, values: Vec<Option<f64>>, paint: Paint) -> Self {
        Series {
            label: label.into(),
            values,
            paint,
            span_gaps: false,
        }
    }

    pub fn spanning_gaps(mut self) -> Self {
        self.span_gaps = true;
        self
    }
}

/// A label axis and the series aligned to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    /// Every series has exactly one value per label.
    pub fn is_aligned(&self) -> bool {
        self.series.iter().all(|s| s.values.len() == self.labels.len())
    }
}

// ---------------------------------------------------------------------------
// ChartSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Doughnut,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartOptions {
    /// Bars grow along x, categories run down the y axis.
    pub horizontal: bool,
    pub stacked: bool,
    pub title: Option<String>,
}

/// Everything needed to draw one chart into one display region.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Display region id, e.g. `genderChart` or `regionCharts/2`.
    pub target: String,
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartSpec {
    pub fn new(target: impl Into<String>, kind: ChartKind, data: ChartData) -> Self {
        ChartSpec {
            target: target.into(),
            kind,
            data,
            options: ChartOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    /// Container part of the target (`regionCharts` for `regionCharts/2`).
    pub fn container(&self) -> Option<&str> {
        self.target.split_once('/').map(|(container, _)| container)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Receiver of prepared charts.
pub trait ChartSink {
    /// Show `spec` in its target region, replacing whatever was there.
    fn render(&mut self, spec: ChartSpec);

    /// Remove every chart created inside `container`.
    fn clear_container(&mut self, container: &str);
}

/// The charts currently on screen, in the order they were first rendered.
#[derive(Debug, Clone, Default)]
pub struct ChartBoard {
    charts: Vec<ChartSpec>,
}

impl ChartBoard {
    pub fn get(&self, target: &str) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.target == target)
    }

    /// Charts living inside `container`, in creation order.
    pub fn in_container<'a>(&'a self, container: &'a str) -> impl Iterator<Item = &'a ChartSpec> + 'a {
        self.charts
            .iter()
            .filter(move |c| c.container() == Some(container))
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn clear(&mut self) {
        self.charts.clear();
    }
}

impl ChartSink for ChartBoard {
    fn render(&mut self, spec: ChartSpec) {
        match self.charts.iter_mut().find(|c| c.target == spec.target) {
            Some(existing) => *existing = spec,
            None => self.charts.push(spec),
        }
    }

    fn clear_container(&mut self, container: &str) {
        self.charts.retain(|c| c.container() != Some(container));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(target: &str) -> ChartSpec {
        ChartSpec::new(target, ChartKind::Bar, ChartData::default())
    }

    #[test]
    fn render_replaces_existing_target() {
        let mut board = ChartBoard::default();
        board.render(spec("genderChart"));
        board.render(spec("ageChart"));
        board.render(spec("genderChart").with_options(ChartOptions {
            horizontal: true,
            ..Default::default()
        }));

        assert_eq!(board.len(), 2);
        assert!(board.get("genderChart").unwrap().options.horizontal);
    }

    #[test]
    fn clear_container_only_drops_its_children() {
        let mut board = ChartBoard::default();
        board.render(spec("trendChart"));
        board.render(spec("regionCharts/0"));
        board.render(spec("regionCharts/1"));

        assert_eq!(board.in_container("regionCharts").count(), 2);
        board.clear_container("regionCharts");
        assert_eq!(board.in_container("regionCharts").count(), 0);
        assert!(board.get("trendChart").is_some());
    }

    #[test]
    fn per_point_paint_falls_back_to_gray() {
        let paint = Paint::PerPoint(vec![Color32::RED]);
        assert_eq!(paint.color_at(0), Color32::RED);
        assert_eq!(paint.color_at(3), Color32::GRAY);
    }
}
