use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, Pos2, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::chart::{ChartKind, ChartSpec, Series};

const CHART_HEIGHT: f32 = 320.0;
const DOUGHNUT_SIZE: f32 = 180.0;
/// Width of one category group on the category axis.
const GROUP_WIDTH: f64 = 0.8;
/// Angular step used to approximate doughnut arcs.
const ARC_STEP: f32 = 0.05;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Draw one chart description.
pub fn chart(ui: &mut Ui, spec: &ChartSpec) {
    if let Some(title) = &spec.options.title {
        ui.strong(title);
    }
    match spec.kind {
        ChartKind::Bar => bar_chart(ui, spec),
        ChartKind::Line => line_chart(ui, spec),
        ChartKind::Doughnut => doughnut_chart(ui, spec),
    }
}

/// Axis text for a category position; blank between categories.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn category_formatter(labels: &[String]) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    let labels = labels.to_vec();
    move |mark: GridMark, _range: &RangeInclusive<f64>| category_label(&labels, mark.value)
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => "no data".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, spec: &ChartSpec) {
    let data = &spec.data;
    let horizontal = spec.options.horizontal;
    let stacked = spec.options.stacked;
    let n_series = data.series.len().max(1);
    let bar_width = if stacked {
        GROUP_WIDTH
    } else {
        GROUP_WIDTH / n_series as f64
    };

    let mut plot = Plot::new(&spec.target)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false);
    plot = if horizontal {
        plot.y_axis_formatter(category_formatter(&data.labels))
    } else {
        plot.x_axis_formatter(category_formatter(&data.labels))
    };

    plot.show(ui, |plot_ui| {
        let mut charts: Vec<BarChart> = Vec::with_capacity(data.series.len());
        for (s, series) in data.series.iter().enumerate() {
            let offset = if stacked {
                0.0
            } else {
                (s as f64 - (n_series as f64 - 1.0) / 2.0) * bar_width
            };

            // Stacking pairs bars by position, so every category gets a bar
            // even when it has no data.
            let bars: Vec<Bar> = series
                .values
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    let category = data.labels.get(i).map(String::as_str).unwrap_or("");
                    Bar::new(i as f64 + offset, value.unwrap_or(0.0))
                        .width(bar_width)
                        .fill(series.paint.color_at(i))
                        .name(format!("{}\n{category}: {}", series.label, format_value(*value)))
                })
                .collect();

            let mut chart = BarChart::new(bars)
                .name(&series.label)
                .color(series.paint.color_at(0));
            if horizontal {
                chart = chart.horizontal();
            }
            if stacked {
                let below: Vec<&BarChart> = charts.iter().collect();
                chart = chart.stack_on(&below);
            }
            charts.push(chart);
        }

        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

/// Polyline pieces of a series.
///
/// With `span_gaps` the line runs straight across missing values; without
/// it the line breaks at every gap.
pub fn line_segments(series: &Series) -> Vec<Vec<[f64; 2]>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, value) in series.values.iter().enumerate() {
        match value {
            Some(v) => current.push([i as f64, *v]),
            None if series.span_gaps => {}
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn line_chart(ui: &mut Ui, spec: &ChartSpec) {
    Plot::new(&spec.target)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_formatter(category_formatter(&spec.data.labels))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for series in &spec.data.series {
                let color = series.paint.color_at(0);
                for segment in line_segments(series) {
                    let points: PlotPoints = segment.into_iter().collect();
                    plot_ui.line(
                        Line::new(points)
                            .name(&series.label)
                            .color(color)
                            .width(2.0),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Doughnuts
// ---------------------------------------------------------------------------

/// Start and end angle of each slice, clockwise from twelve o'clock.
///
/// Missing and negative values get an empty slice.
pub fn slice_angles(values: &[Option<f64>]) -> Vec<(f32, f32)> {
    let clean: Vec<f64> = values.iter().map(|v| v.unwrap_or(0.0).max(0.0)).collect();
    let total: f64 = clean.iter().sum();
    let mut start = -FRAC_PI_2;
    clean
        .iter()
        .map(|v| {
            let sweep = if total > 0.0 {
                (v / total) as f32 * TAU
            } else {
                0.0
            };
            let slice = (start, start + sweep);
            start += sweep;
            slice
        })
        .collect()
}

fn on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + egui::vec2(angle.cos(), angle.sin()) * radius
}

fn doughnut_chart(ui: &mut Ui, spec: &ChartSpec) {
    let Some(series) = spec.data.series.first() else {
        return;
    };

    let (rect, _) = ui.allocate_exact_size(egui::vec2(DOUGHNUT_SIZE, DOUGHNUT_SIZE), Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let outer = rect.width() / 2.0 - 4.0;
    let inner = outer * 0.55;

    for (i, (start, end)) in slice_angles(&series.values).into_iter().enumerate() {
        if end <= start {
            continue;
        }
        let color = series.paint.color_at(i);
        let steps = ((end - start) / ARC_STEP).ceil().max(1.0) as usize;
        let step = (end - start) / steps as f32;
        for k in 0..steps {
            let a0 = start + step * k as f32;
            let a1 = a0 + step;
            let quad = vec![
                on_circle(center, outer, a0),
                on_circle(center, outer, a1),
                on_circle(center, inner, a1),
                on_circle(center, inner, a0),
            ];
            painter.add(Shape::convex_polygon(quad, color, Stroke::NONE));
        }
    }

    for (i, label) in spec.data.labels.iter().enumerate() {
        let value = series.values.get(i).copied().flatten();
        ui.horizontal(|ui| {
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), Sense::hover());
            ui.painter().rect_filled(swatch, 2.0, series.paint.color_at(i));
            ui.small(format!("{label}: {}", format_value(value)));
        });
    }
}

/// Placeholder for a chart that is not available.
pub fn placeholder(ui: &mut Ui, text: &str) {
    ui.add_space(8.0);
    ui.label(egui::RichText::new(text).italics().color(Color32::GRAY));
    ui.add_space(8.0);
}
