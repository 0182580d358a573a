use std::path::PathBuf;

use crate::data::aggregate::AggregateLimits;
use crate::data::options::DEFAULT_COUNTRY_OPTIONS;

/// Fixed settings of the dashboard. There is no config file or CLI; the
/// values live here so the rest of the code does not hard-code them.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Snapshot opened at startup, relative to the working directory.
    pub data_path: PathBuf,
    /// Lower bound of the initial year range (clamped to the data).
    pub default_start_year: i32,
    /// How many countries the country filter offers.
    pub country_options: usize,
    pub limits: AggregateLimits,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("netflix_titles.csv"),
            default_start_year: 2015,
            country_options: DEFAULT_COUNTRY_OPTIONS,
            limits: AggregateLimits::default(),
            window_size: [1400.0, 900.0],
            min_window_size: [800.0, 500.0],
        }
    }
}
