use std::fmt;
use std::path::{Path, PathBuf};

use log::info;

use super::axis::YRange;
use crate::error::{Result, SstError};

/// Raster resolution of every figure.
pub const DPI: u32 = 100;

// ---------------------------------------------------------------------------
// FigureKind – the four standard views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FigureKind {
    Scatter,
    Mean,
    Regression,
    Boxplot,
}

impl FigureKind {
    pub const ALL: [FigureKind; 4] = [
        FigureKind::Scatter,
        FigureKind::Mean,
        FigureKind::Regression,
        FigureKind::Boxplot,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FigureKind::Scatter => "Daily sea surface temperature",
            FigureKind::Mean => "Daily SST and mean",
            FigureKind::Regression => "Daily SST and linear trend",
            FigureKind::Boxplot => "SST distribution per year",
        }
    }

    /// Default file name when saved.
    pub fn file_name(self) -> &'static str {
        match self {
            FigureKind::Scatter => "sst_scatter.png",
            FigureKind::Mean => "sst_mean.png",
            FigureKind::Regression => "sst_regression.png",
            FigureKind::Boxplot => "sst_boxplot.png",
        }
    }

    /// Figure size in inches.
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            FigureKind::Boxplot => (10.0, 6.0),
            _ => (12.0, 6.0),
        }
    }

    pub fn pixel_size(self) -> (u32, u32) {
        let (w, h) = self.size_inches();
        (
            (w * DPI as f64).round() as u32,
            (h * DPI as f64).round() as u32,
        )
    }

    pub fn y_range(self) -> YRange {
        match self {
            FigureKind::Scatter => YRange::Auto,
            FigureKind::Mean => YRange::Fixed(17.0, 25.0),
            FigureKind::Regression => YRange::Data,
            FigureKind::Boxplot => YRange::Fixed(0.0, 30.0),
        }
    }
}

impl fmt::Display for FigureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FigureKind::Scatter => "Scatter",
            FigureKind::Mean => "Mean",
            FigureKind::Regression => "Regression",
            FigureKind::Boxplot => "Boxplot",
        };
        write!(f, "{label}")
    }
}

// ---------------------------------------------------------------------------
// Legend text
// ---------------------------------------------------------------------------

pub fn mean_legend(mean: f64) -> String {
    format!("Mean: {mean:.2} °C")
}

pub fn regression_legend(slope: f64, intercept: f64) -> String {
    let sign = if intercept < 0.0 { '-' } else { '+' };
    format!("y = {slope:.6}x {sign} {:.2}", intercept.abs())
}

// ---------------------------------------------------------------------------
// Figure – a rendered RGB raster
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Figure {
    pub kind: FigureKind,
    pub width: u32,
    pub height: u32,
    /// Packed RGB8, row-major, `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

impl fmt::Debug for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Figure")
            .field("kind", &self.kind)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Figure {
    /// Encode the raster as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )
        .map_err(|e| SstError::Render {
            figure: self.kind.to_string(),
            message: e.to_string(),
        })?;
        info!("Saved {} figure to {}", self.kind, path.display());
        Ok(())
    }
}

/// Save every figure under its default file name inside `dir`.
pub fn save_all(figures: &[Figure], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    figures
        .iter()
        .map(|fig| {
            let path = dir.join(fig.kind.file_name());
            fig.save_png(&path)?;
            Ok(path)
        })
        .collect()
}
