use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::color::SeriesColors;
use crate::config::DashboardConfig;
use crate::data::aggregate::DashboardViews;
use crate::data::error::{DataLoadError, EmptyAggregationError};
use crate::data::filter::{apply, FilterSelection};
use crate::data::loader::DatasetCache;
use crate::data::model::{ContentType, Dataset};
use crate::data::options::{derive_options, FilterOptions};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Every snapshot opened so far, parsed once each.
    cache: DatasetCache,

    /// Path of the snapshot currently shown.
    pub source_path: Option<PathBuf>,

    /// Current snapshot (None until a file loads).
    pub dataset: Option<Arc<Dataset>>,

    /// Filter domain of the current snapshot.
    pub options: Option<FilterOptions>,

    /// What the user has selected in the side panel.
    pub selection: Option<FilterSelection>,

    /// Aggregates of the current selection (cached until the next change).
    pub views: DashboardViews,

    pub colors: SeriesColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
            source_path: None,
            dataset: None,
            options: None,
            selection: None,
            views: DashboardViews::default(),
            colors: SeriesColors::default(),
            status_message: None,
        }
    }

    /// Open a snapshot (from the cache when already parsed) and show it.
    pub fn open(&mut self, path: &Path) -> Result<(), DataLoadError> {
        if self.cache.contains(path) {
            log::debug!("{} was parsed before; reusing it", path.display());
        }
        match self.cache.get_or_load(path) {
            Ok(dataset) => {
                self.set_dataset(path.to_path_buf(), dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Ingest a snapshot: derive its filter domain and default selection.
    pub fn set_dataset(&mut self, path: PathBuf, dataset: Arc<Dataset>) {
        let options = derive_options(&dataset, self.config.country_options);
        self.selection = Some(FilterSelection::defaults(
            &options,
            self.config.default_start_year,
        ));
        log::info!(
            "Showing {} titles from {} (years {}–{}, {} country options)",
            dataset.len(),
            path.display(),
            options.year_bounds.0,
            options.year_bounds.1,
            options.countries.len()
        );

        self.options = Some(options);
        self.dataset = Some(dataset);
        self.source_path = Some(path);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `views` after a selection change.
    pub fn refilter(&mut self) {
        let (Some(dataset), Some(selection)) = (&self.dataset, &self.selection) else {
            return;
        };
        match apply(dataset, selection) {
            Ok(view) => {
                if view.is_empty() {
                    log::debug!("No titles match the filters");
                } else {
                    log::debug!("{} of {} titles match the filters", view.len(), dataset.len());
                }
                self.views = DashboardViews::compute(&view, &self.config.limits);
                self.status_message = None;
            }
            Err(e) => {
                // Previous views stay on screen.
                log::error!("Rejected selection: {e}");
                self.status_message = Some(format!("Invalid selection: {e}"));
            }
        }
    }

    pub fn toggle_content_type(&mut self, content_type: ContentType) {
        if let Some(sel) = &mut self.selection {
            sel.toggle_content_type(content_type);
            self.refilter();
        }
    }

    pub fn toggle_country(&mut self, country: &str) {
        if let Some(sel) = &mut self.selection {
            sel.toggle_country(country);
            self.refilter();
        }
    }

    pub fn clear_countries(&mut self) {
        if let Some(sel) = &mut self.selection {
            sel.countries.clear();
            self.refilter();
        }
    }

    pub fn set_year_range(&mut self, low: i32, high: i32) {
        let (Some(sel), Some(opts)) = (&mut self.selection, &self.options) else {
            return;
        };
        if sel.year_range != (low, high) {
            sel.set_year_range(low, high, opts.year_bounds);
            self.refilter();
        }
    }

    /// Every type, every year, no country restriction.
    pub fn select_everything(&mut self) {
        if let Some(opts) = &self.options {
            self.selection = Some(FilterSelection::everything(opts));
            self.refilter();
        }
    }

    /// Back to the startup selection of the current snapshot.
    pub fn reset_filters(&mut self) {
        if let Some(opts) = &self.options {
            self.selection = Some(FilterSelection::defaults(
                opts,
                self.config.default_start_year,
            ));
            self.refilter();
        }
    }

    /// Write the current selection and its aggregates to a JSON file.
    pub fn export_views(&self, path: &Path) -> Result<()> {
        let selection = self.selection.as_ref().context("no dataset loaded")?;
        if self.views.is_empty() {
            return Err(EmptyAggregationError).context("nothing to export");
        }

        let report = ExportReport {
            source: self
                .source_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            selection,
            views: &self.views,
        };
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &report).context("writing export JSON")?;
        writer.flush().context("flushing export JSON")?;

        log::info!("Exported dashboard views to {}", path.display());
        Ok(())
    }
}

#[derive(Serialize)]
struct ExportReport<'a> {
    source: String,
    selection: &'a FilterSelection,
    views: &'a DashboardViews,
}
