use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CatalogDashboardApp {
    pub state: AppState,
}

impl CatalogDashboardApp {
    /// Build the app and open the startup snapshot. A failed load leaves the
    /// window usable; the error is shown in the status line.
    pub fn new(config: DashboardConfig) -> Self {
        let startup_path = config.data_path.clone();
        let mut state = AppState::new(config);
        if let Err(e) = state.open(&startup_path) {
            log::warn!("Starting without data: {e}");
        }
        Self { state }
    }
}

impl eframe::App for CatalogDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs + charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    charts::dashboard(ui, &self.state);
                });
        });
    }
}
