/// Visualizer: four standard figures rendered to RGB rasters.
///
/// ```text
///   SstSeries + Summary
///        │
///        ▼
///   ┌──────────┐   axis     day-number x axis, yearly ticks, y ranges
///   │  render   │◄─ boxplot  per-year quartiles / whiskers / outliers
///   └──────────┘
///        │
///        ▼
///   Figure (RGB8 buffer) ──► viewer texture  |  PNG via `save_png`
/// ```

pub mod axis;
pub mod boxplot;
pub mod figure;
pub mod render;

pub use figure::{save_all, Figure, FigureKind};
pub use render::render_all;
