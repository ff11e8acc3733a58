use std::time::Duration;

use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct NetUseApp {
    pub state: AppState,
}

impl NetUseApp {
    /// Create the app and start loading every source right away.
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        let ctx = cc.egui_ctx.clone();
        state.start_loading(move || ctx.request_repaint());
        Self { state }
    }
}

impl eframe::App for NetUseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_loads();
        if self.state.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: sources ----
        egui::SidePanel::left("source_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::charts_panel(ui, &self.state);
        });
    }
}
