use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Clone what we need so we can mutate state inside the widgets.
    let (Some(options), Some(selection)) = (state.options.clone(), state.selection.clone())
    else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Content type ----
            ui.strong("Content Type");
            for content_type in &options.content_types {
                let mut checked = selection.content_types.contains(content_type);
                let text = RichText::new(content_type.label())
                    .color(state.colors.color_for(*content_type));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_content_type(*content_type);
                }
            }
            ui.separator();

            // ---- Year range ----
            ui.strong("Year Added Range");
            let (min_year, max_year) = options.year_bounds;
            let (mut low, mut high) = selection.year_range;
            let from = ui.add(Slider::new(&mut low, min_year..=max_year).text("from"));
            let to = ui.add(Slider::new(&mut high, min_year..=max_year).text("to"));
            if from.changed() || to.changed() {
                state.set_year_range(low, high);
            }
            ui.separator();

            // ---- Countries (collapsible) ----
            let n_selected = selection.countries.len();
            let header = if n_selected == 0 {
                format!("Country (Top {})  – all", state.config.country_options)
            } else {
                format!(
                    "Country (Top {})  ({n_selected} selected)",
                    state.config.country_options
                )
            };
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("countries")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    if ui
                        .add_enabled(n_selected > 0, egui::Button::new("Clear").small())
                        .clicked()
                    {
                        state.clear_countries();
                    }
                    ui.weak("Nothing selected = no country filtering");

                    for country in &options.countries {
                        let mut checked = selection.countries.contains(country);
                        if ui.checkbox(&mut checked, country).changed() {
                            state.toggle_country(country);
                        }
                    }
                });

            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Reset filters").clicked() {
                    state.reset_filters();
                }
                if ui.button("Show everything").clicked() {
                    state.select_everything();
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Export views…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(path)) = (&state.dataset, &state.source_path) {
            ui.label(format!(
                "{}: {} titles loaded, {} match",
                path.display(),
                ds.len(),
                state.views.kpis.total
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open catalog")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Errors are already logged and shown in the status line.
        let _ = state.open(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let default_name = state
        .source_path
        .as_ref()
        .and_then(|p| p.file_stem())
        .map(|stem| format!("{}_dashboard.json", stem.to_string_lossy()))
        .unwrap_or_else(|| "dashboard.json".to_string());

    let file: Option<PathBuf> = rfd::FileDialog::new()
        .set_title("Export dashboard views")
        .set_file_name(default_name)
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.export_views(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
