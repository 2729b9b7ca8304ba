use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;

use sst_trends::config::DEFAULT_INPUT;
use sst_trends::data::loader::{SST_COLUMN, TIME_COLUMN};

/// Write a synthetic single-pixel daily SST export.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Destination file.
    #[arg(default_value = DEFAULT_INPUT)]
    output: PathBuf,

    /// First day of the series (YYYY-MM-DD).
    #[arg(long, default_value = "2015-01-01")]
    start: NaiveDate,

    /// Number of daily rows.
    #[arg(long, default_value_t = 3650)]
    days: u32,

    /// Warming rate in Kelvin per year.
    #[arg(long, default_value_t = 0.03)]
    trend: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const LATITUDE: f64 = 38.125;
const LONGITUDE: f64 = 15.625;
const MEAN_KELVIN: f64 = 292.0;
const SEASONAL_AMPLITUDE: f64 = 4.5;
const NOISE_KELVIN: f64 = 0.35;

/// Seasonal cycle peaking in mid-August plus a linear trend.
fn daily_kelvin(day: u32, trend_per_year: f64, rng: &mut SimpleRng) -> f64 {
    let phase = 2.0 * std::f64::consts::PI * (f64::from(day) - 135.0) / 365.25;
    MEAN_KELVIN
        + SEASONAL_AMPLITUDE * phase.sin()
        + trend_per_year * f64::from(day) / 365.25
        + rng.gauss(0.0, NOISE_KELVIN)
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut file = std::io::BufWriter::new(file);

    // Preamble in the style of a gridded-product export.
    writeln!(file, "# synthetic analysed_sst, single pixel ({LATITUDE}, {LONGITUDE})")?;
    writeln!(file, "# units: kelvin, daily at 09:00 UTC")?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record([TIME_COLUMN, "latitude", "longitude", SST_COLUMN])?;
    for day in 0..args.days {
        let date = args.start + Duration::days(i64::from(day));
        let kelvin = daily_kelvin(day, args.trend, &mut rng);
        writer.write_record([
            format!("{date}T09:00:00.000000Z"),
            LATITUDE.to_string(),
            LONGITUDE.to_string(),
            format!("{kelvin:.3}"),
        ])?;
    }
    writer.flush()?;

    println!(
        "Wrote {} daily rows starting {} to {}",
        args.days,
        args.start,
        args.output.display()
    );
    Ok(())
}
