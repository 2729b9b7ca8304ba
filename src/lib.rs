//! Daily sea-surface-temperature analysis: load a satellite export, convert
//! it to Celsius, export the cleaned table, compute descriptive statistics,
//! fit a linear trend, run the Mann–Kendall test and render four figures.

pub mod analysis;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod plot;

pub use error::{Result, SstError};
