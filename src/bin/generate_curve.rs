//! Writes a synthetic IntCal-style calibration curve (and optionally a
//! small table of sample ages) for demos and manual testing.
//!
//! The curve is NOT a real calibration: radiocarbon age is a smooth
//! function of calendar age with a few wiggles and a little noise.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(name = "generate_curve")]
struct Args {
    /// Output curve file.
    #[arg(long, short, default_value = "intcal20.14c")]
    output: PathBuf,

    /// Calendar-age step between curve points, in years.
    #[arg(long, default_value_t = 5.0)]
    step: f64,

    /// Oldest calendar age to tabulate.
    #[arg(long, default_value_t = 55_000.0)]
    max_cal_bp: f64,

    /// Also write this many random sample ages to the given file.
    #[arg(long, requires = "samples_output")]
    samples: Option<usize>,

    #[arg(long)]
    samples_output: Option<PathBuf>,

    #[arg(long, default_value_t = 42)]
    seed: u64,
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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

/// Radiocarbon age for a calendar age: the 14C year runs short by a few
/// percent, plus plateaus ("wiggles") of a few hundred years.
fn c14_for(cal_bp: f64) -> f64 {
    let drift = 0.93 * cal_bp;
    let wiggle = 120.0 * (cal_bp / 850.0).sin() + 40.0 * (cal_bp / 210.0).sin();
    (drift + wiggle).max(0.0)
}

/// Uncertainty grows with age.
fn sigma_for(cal_bp: f64) -> f64 {
    8.0 + cal_bp * 0.004
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut out = std::io::BufWriter::new(file);
    writeln!(out, "# Synthetic calibration curve (not IntCal20)")?;
    writeln!(out, "# seed={}, step={}", args.seed, args.step)?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["CAL BP", "14C age", "Sigma", "Delta 14C", "Sigma"])?;

    let mut rows = 0usize;
    let mut cal_bp = 0.0;
    while cal_bp <= args.max_cal_bp {
        let sigma = sigma_for(cal_bp);
        let c14 = c14_for(cal_bp) + rng.gauss(0.0, sigma * 0.1);
        // Δ14C follows from the offset between radiocarbon and calendar age.
        let delta = ((-c14 / 8033.0).exp() / (-cal_bp / 8267.0).exp() - 1.0) * 1000.0;
        writer.write_record([
            format!("{cal_bp}"),
            format!("{:.0}", c14.max(0.0)),
            format!("{sigma:.0}"),
            format!("{delta:.1}"),
            format!("{:.1}", sigma * 0.12),
        ])?;
        rows += 1;
        cal_bp += args.step;
    }
    writer.flush()?;
    info!("Wrote {rows} curve points to {}", args.output.display());

    if let (Some(n), Some(path)) = (args.samples, &args.samples_output) {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        writer.write_record(["sample_id", "C14_age"])?;
        let top = c14_for(args.max_cal_bp);
        for i in 0..n {
            let age = (rng.next_f64() * top * 1.1).round();
            writer.write_record([format!("S{:03}", i + 1), format!("{age}")])?;
        }
        writer.flush()?;
        info!("Wrote {n} sample ages to {}", path.display());
    }

    Ok(())
}
