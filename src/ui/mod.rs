//! egui panels of the figure viewer.

pub mod panels;
pub mod plot;
