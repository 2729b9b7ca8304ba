use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui;

use sst_trends::config::PipelineConfig;
use sst_trends::pipeline::{self, Analysis};
use sst_trends::plot::{Figure, FigureKind};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Settings used for the current run and any re-run from "Open…".
    pub config: PipelineConfig,

    /// Result of the last successful run.
    pub analysis: Option<Analysis>,

    /// Rendered figures of `analysis`.
    pub figures: Vec<Figure>,

    /// Figure shown in the central panel.
    pub selected: FigureKind,

    /// GPU textures, uploaded on first display.
    textures: BTreeMap<FigureKind, egui::TextureHandle>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            analysis: None,
            figures: Vec::new(),
            selected: FigureKind::Scatter,
            textures: BTreeMap::new(),
            status_message: None,
        }
    }

    /// Ingest a finished run and drop textures of the previous one.
    pub fn set_analysis(&mut self, analysis: Analysis, figures: Vec<Figure>) {
        self.analysis = Some(analysis);
        self.figures = figures;
        self.textures.clear();
        self.status_message = None;
    }

    /// Re-run the whole pipeline on another input file.
    pub fn load_input(&mut self, path: &Path) -> Result<()> {
        let mut config = self.config.clone();
        config.input = path.to_path_buf();

        let analysis = pipeline::analyze(&config)
            .with_context(|| format!("analysing {}", path.display()))?;
        let figures = pipeline::render_figures(&analysis, &config).context("rendering figures")?;

        self.config = config;
        self.set_analysis(analysis, figures);
        Ok(())
    }

    /// Write all figures as PNG into `dir`.
    pub fn save_figures(&self, dir: &Path) -> Result<usize> {
        let paths = sst_trends::plot::save_all(&self.figures, dir)
            .with_context(|| format!("saving figures to {}", dir.display()))?;
        Ok(paths.len())
    }

    pub fn figure(&self, kind: FigureKind) -> Option<&Figure> {
        self.figures.iter().find(|f| f.kind == kind)
    }

    /// Texture for a figure, uploading it on first use.
    pub fn texture(&mut self, ctx: &egui::Context, kind: FigureKind) -> Option<egui::TextureHandle> {
        if let Some(handle) = self.textures.get(&kind) {
            return Some(handle.clone());
        }
        let figure = self.figure(kind)?;
        let image = egui::ColorImage::from_rgb(
            [figure.width as usize, figure.height as usize],
            &figure.pixels,
        );
        let handle = ctx.load_texture(figure.kind.file_name(), image, egui::TextureOptions::LINEAR);
        self.textures.insert(kind, handle.clone());
        Some(handle)
    }
}
