//! egui rendering. Everything here reads from / writes to [`AppState`](crate::state::AppState);
//! no data processing happens in this layer.

pub mod charts;
pub mod panels;
