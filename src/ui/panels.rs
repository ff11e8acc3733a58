use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::Source;
use crate::dashboard::{AGE_TARGET, GENDER_TARGET, HEATMAP_TARGET, REGION_CONTAINER, TREND_TARGET};
use crate::state::{AppState, LoadStatus};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Left side panel – source status
// ---------------------------------------------------------------------------

/// Render the left panel: where the data comes from and how loading went.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Sources");
    ui.separator();

    ui.label(format!("Base: {}", state.config.base));
    ui.label(format!("Year: {}", state.config.latest_year));
    ui.add_space(4.0);

    for source in Source::ALL {
        let file = state.config.sources.file_for(source);
        let (text, color) = match state.status.get(&source) {
            None => ("not loaded".to_string(), Color32::GRAY),
            Some(LoadStatus::Pending) => ("loading…".to_string(), Color32::GRAY),
            Some(LoadStatus::Loaded { rows, charts }) => {
                (format!("{rows} rows, {charts} chart(s)"), Color32::DARK_GREEN)
            }
            Some(LoadStatus::Empty) => ("no data".to_string(), Color32::RED),
        };
        ui.horizontal(|ui: &mut Ui| {
            ui.strong(file);
            ui.label(RichText::new(text).color(color));
        });
    }

    ui.separator();
    ui.strong("Purposes");
    for purpose in &state.config.curated_purposes {
        ui.label(RichText::new(purpose).color(state.palette.color_for(purpose)));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Data", |ui: &mut Ui| {
            if ui.button("Reload").clicked() {
                let ctx = ui.ctx().clone();
                state.start_loading(move || ctx.request_repaint());
                ui.close_menu();
            }
        });

        ui.separator();

        if state.is_loading() {
            ui.spinner();
            ui.label("Loading sources…");
        } else {
            ui.label(format!("{} chart(s)", state.board.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – the charts
// ---------------------------------------------------------------------------

pub fn charts_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            section(ui, state, "Internet usage by gender", Source::Gender, &[GENDER_TARGET]);
            section(ui, state, "Internet usage by age group", Source::Age, &[AGE_TARGET, HEATMAP_TARGET]);
            section(ui, state, "Trends over time", Source::Overtime, &[TREND_TARGET]);

            ui.heading("Top purposes by region");
            ui.separator();
            let mut regions = state.board.in_container(REGION_CONTAINER).peekable();
            if regions.peek().is_none() {
                plot::placeholder(ui, missing_text(state, Source::Geography));
            } else {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    for spec in regions {
                        ui.vertical(|ui: &mut Ui| plot::chart(ui, spec));
                    }
                });
            }
        });
}

fn section(ui: &mut Ui, state: &AppState, heading: &str, source: Source, targets: &[&str]) {
    ui.heading(heading);
    ui.separator();
    for target in targets {
        match state.board.get(target) {
            Some(spec) => plot::chart(ui, spec),
            None => plot::placeholder(ui, missing_text(state, source)),
        }
        ui.add_space(12.0);
    }
}

fn missing_text(state: &AppState, source: Source) -> &'static str {
    match state.status.get(&source) {
        Some(LoadStatus::Pending) => "Loading…",
        _ => "No data available.",
    }
}
