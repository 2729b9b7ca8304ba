use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::analysis::mann_kendall::DEFAULT_ALPHA;
use crate::data::export::DEFAULT_OUTPUT;

/// Input file analysed when none is given.
pub const DEFAULT_INPUT: &str = "sst_timeseries.csv";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Daily sea-surface-temperature trend analysis.
#[derive(Debug, Parser)]
#[command(name = "sst-trends", version, about)]
pub struct Cli {
    /// Delimited export with `time` and `analysed_sst` columns.
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Lines starting with this character are skipped.
    #[arg(long, default_value_t = '#', value_parser = parse_comment)]
    pub comment: char,

    /// Where the normalized CSV is written.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Save the four figures as PNG into this directory.
    #[arg(long)]
    pub figures_dir: Option<PathBuf>,

    /// Write the summary statistics as JSON to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Significance level of the Mann-Kendall test.
    #[arg(long, default_value_t = DEFAULT_ALPHA, value_parser = parse_alpha)]
    pub alpha: f64,

    /// How to treat deviations from one record per day.
    #[arg(long, value_enum, default_value_t = CadenceMode::Off)]
    pub cadence: CadenceMode,

    /// Print the summary and exit without opening the figure viewer.
    #[arg(long)]
    pub no_viewer: bool,
}

fn parse_comment(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!("expected a single ASCII character, got '{s}'")),
    }
}

fn parse_alpha(s: &str) -> Result<f64, String> {
    let alpha: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if alpha > 0.0 && alpha < 1.0 {
        Ok(alpha)
    } else {
        Err(format!("alpha must be in (0, 1), got {alpha}"))
    }
}

/// Daily cadence validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CadenceMode {
    /// Accept the series as is.
    Off,
    /// Log gaps, duplicate days and reversals.
    Warn,
    /// Fail on any gap, duplicate day or reversal.
    Strict,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub comment: u8,
    pub output: PathBuf,
    pub figures_dir: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub alpha: f64,
    pub cadence: CadenceMode,
    pub viewer: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input: PathBuf::from(DEFAULT_INPUT),
            comment: b'#',
            output: PathBuf::from(DEFAULT_OUTPUT),
            figures_dir: None,
            report: None,
            alpha: DEFAULT_ALPHA,
            cadence: CadenceMode::Off,
            viewer: true,
        }
    }
}

impl From<Cli> for PipelineConfig {
    fn from(cli: Cli) -> Self {
        PipelineConfig {
            input: cli.input,
            // parse_comment only admits ASCII.
            comment: cli.comment as u8,
            output: cli.output,
            figures_dir: cli.figures_dir,
            report: cli.report,
            alpha: cli.alpha,
            cadence: cli.cadence,
            viewer: !cli.no_viewer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let cli = Cli::try_parse_from(["sst-trends"]).unwrap();
        assert_eq!(PipelineConfig::from(cli), PipelineConfig::default());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "sst-trends",
            "data/monterey.tsv",
            "--comment",
            ";",
            "-o",
            "out.csv",
            "--figures-dir",
            "figs",
            "--report",
            "summary.json",
            "--alpha",
            "0.01",
            "--cadence",
            "strict",
            "--no-viewer",
        ])
        .unwrap();
        let config = PipelineConfig::from(cli);
        assert_eq!(config.input, PathBuf::from("data/monterey.tsv"));
        assert_eq!(config.comment, b';');
        assert_eq!(config.output, PathBuf::from("out.csv"));
        assert_eq!(config.figures_dir, Some(PathBuf::from("figs")));
        assert_eq!(config.report, Some(PathBuf::from("summary.json")));
        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.cadence, CadenceMode::Strict);
        assert!(!config.viewer);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["sst-trends", "--comment", "##"]).is_err());
        assert!(Cli::try_parse_from(["sst-trends", "--alpha", "1.5"]).is_err());
    }
}
