//! Movie / TV catalog dashboard.
//!
//! The `data` module is the whole filtering-and-aggregation pipeline and has
//! no UI dependency; `state`, `ui` and `app` put an egui front on it.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
