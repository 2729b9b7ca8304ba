use log::info;

use crate::analysis::{descriptive::Descriptive, mann_kendall, regression, Summary};
use crate::config::{CadenceMode, PipelineConfig};
use crate::data::cadence::{self, CadenceIssue};
use crate::data::model::SstSeries;
use crate::data::{export, loader, normalize};
use crate::error::{Result, SstError};
use crate::plot::{self, Figure};

// ---------------------------------------------------------------------------
// One analysis run: load → normalize → export → statistics
// ---------------------------------------------------------------------------

/// Output of the numeric pipeline steps.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub series: SstSeries,
    pub summary: Summary,
    pub cadence_issues: Vec<CadenceIssue>,
}

/// Run every step except rendering. The first failure aborts the run.
pub fn analyze(config: &PipelineConfig) -> Result<Analysis> {
    let observations = loader::load_file(&config.input, config.comment)?;
    let series = normalize::normalize(&observations)?;
    if series.is_empty() {
        return Err(SstError::EmptySeries);
    }

    let cadence_issues = match config.cadence {
        CadenceMode::Off => Vec::new(),
        CadenceMode::Warn => cadence::enforce_cadence(&series, false)?,
        CadenceMode::Strict => cadence::enforce_cadence(&series, true)?,
    };

    export::write_normalized(&series, &config.output)?;

    let summary = summarize(&series, config.alpha)?;
    info!(
        "{} records over {} year(s), trend {}",
        series.len(),
        summary.descriptive.year_count,
        summary.mann_kendall.trend
    );

    if let Some(path) = &config.report {
        summary.write_json(path)?;
    }

    Ok(Analysis {
        series,
        summary,
        cadence_issues,
    })
}

/// Descriptive statistics, the OLS trend and the Mann–Kendall test.
pub fn summarize(series: &SstSeries, alpha: f64) -> Result<Summary> {
    let descriptive = Descriptive::compute(series)?;
    let regression = regression::fit_series(series)?;
    let mann_kendall = mann_kendall::original_test(&series.celsius(), alpha)?;
    Ok(Summary {
        descriptive,
        regression,
        mann_kendall,
    })
}

/// Render the four figures and, when configured, save them.
pub fn render_figures(analysis: &Analysis, config: &PipelineConfig) -> Result<Vec<Figure>> {
    let figures = plot::render_all(&analysis.series, &analysis.summary)?;
    if let Some(dir) = &config.figures_dir {
        plot::save_all(&figures, dir)?;
    }
    Ok(figures)
}
