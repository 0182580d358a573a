use catalog_dashboard::app::CatalogDashboardApp;
use catalog_dashboard::config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Catalog Dashboard – Movies & TV Shows",
        options,
        Box::new(|_cc| Ok(Box::new(CatalogDashboardApp::new(config)))),
    )
}
