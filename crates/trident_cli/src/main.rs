//! Trident EQ command line
//!
//! Offline inspection of an EQ setting: print its response curve, measure
//! what it does to a test tone, or write a state file.

use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use trident_core::{
    EngineConfig, EqProcessor, EqState, ParameterId, ParameterStore, ResponseSampler,
};
use trident_dsp::{magnitude_to_db, Slope};

#[derive(Parser, Debug)]
#[command(author, version, about = "Trident three-band EQ")]
struct Cli {
    /// Path to engine config JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the magnitude response
    Curve {
        #[command(flatten)]
        state: StateArgs,

        /// Number of points (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// Print pixel coordinates instead of frequency/dB pairs
        #[arg(long, default_value_t = false)]
        pixels: bool,

        /// Display height for --pixels (overrides config)
        #[arg(long)]
        height: Option<f32>,
    },

    /// Run a sine through the EQ and report its steady-state gain
    Tone {
        #[command(flatten)]
        state: StateArgs,

        /// Tone frequency in Hz
        #[arg(long, default_value_t = 1000.0)]
        frequency: f32,

        /// Seconds of audio to render
        #[arg(long, default_value_t = 1.0)]
        seconds: f32,
    },

    /// List parameters with their ranges and current values
    Params {
        #[command(flatten)]
        state: StateArgs,
    },

    /// Write a state file
    Save {
        #[command(flatten)]
        state: StateArgs,

        /// Output path
        #[arg(value_name = "OUT")]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct StateArgs {
    /// EQ state JSON to start from
    #[arg(long)]
    state: Option<PathBuf>,

    /// Parameter override, e.g. --set "Peak Gain=6"
    #[arg(long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,
}

impl StateArgs {
    fn build_store(&self) -> Result<Arc<ParameterStore>> {
        let store = Arc::new(ParameterStore::new());
        if let Some(path) = &self.state {
            let state = EqState::load(path)
                .with_context(|| format!("loading state {}", path.display()))?;
            store.apply_state(&state);
        }
        for entry in &self.overrides {
            let Some((name, value)) = entry.split_once('=') else {
                bail!("expected NAME=VALUE, got {:?}", entry);
            };
            let value: f32 = value
                .trim()
                .parse()
                .with_context(|| format!("bad value in {:?}", entry))?;
            store.set_by_name(name.trim(), value)?;
            debug!("Override {} = {}", name.trim(), value);
        }
        Ok(store)
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn print_curve(store: Arc<ParameterStore>, config: &EngineConfig, pixels: bool) -> Result<()> {
    let sampler = ResponseSampler::from_config(store, config);
    if !sampler.tick() {
        bail!("response could not be computed at {} Hz", config.sample_rate);
    }

    if pixels {
        for (x, y) in sampler.pixel_path(config.curve_height) {
            println!("{:.0}\t{:.2}", x, y);
        }
    } else {
        for point in sampler.curve() {
            println!("{:.2}\t{:.3}", point.frequency_hz, point.magnitude_db);
        }
    }
    Ok(())
}

fn rms(samples: &[f32]) -> f64 {
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len().max(1) as f64).sqrt()
}

fn measure_tone(
    store: Arc<ParameterStore>,
    config: &EngineConfig,
    frequency: f32,
    seconds: f32,
) -> Result<()> {
    let sample_rate = config.sample_rate as f32;
    if !(frequency > 0.0 && frequency < sample_rate / 2.0) {
        bail!("tone frequency must be between 0 and {} Hz", sample_rate / 2.0);
    }
    let len = (sample_rate * seconds.max(0.01)) as usize;

    let mut processor = EqProcessor::new(store);
    processor.prepare(sample_rate, config.max_block_size)?;

    let input: Vec<f32> = (0..len)
        .map(|i| (2.0 * PI * frequency * i as f32 / sample_rate).sin())
        .collect();
    let mut left = input.clone();
    let mut right = input.clone();

    for (l, r) in left
        .chunks_mut(config.max_block_size)
        .zip(right.chunks_mut(config.max_block_size))
    {
        processor.process_block(l, r);
    }

    // Skip the first half as settling time
    let settled = len / 2;
    let gain = rms(&left[settled..]) / rms(&input[settled..]);
    info!(
        "Rendered {} samples at {} Hz in blocks of {}",
        len, sample_rate, config.max_block_size
    );
    println!("{:.1} Hz: {:+.3} dB", frequency, magnitude_to_db(gain));
    Ok(())
}

fn print_params(store: &ParameterStore) {
    for id in ParameterId::ALL {
        let range = id.range();
        let value = store.get(id);
        let shown = if id.is_slope() {
            Slope::from_ordinal_clamped(value).label().to_string()
        } else {
            format!("{}", value)
        };
        println!(
            "{:<14} {:>10}  [{} .. {}] step {} default {}",
            id.name(),
            shown,
            range.min,
            range.max,
            range.interval,
            range.default
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trident=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Curve {
            state,
            width,
            pixels,
            height,
        } => {
            if let Some(width) = width {
                config.curve_width = width;
            }
            if let Some(height) = height {
                config.curve_height = height;
            }
            config.validate()?;
            print_curve(state.build_store()?, &config, pixels)?;
        }
        Command::Tone {
            state,
            frequency,
            seconds,
        } => measure_tone(state.build_store()?, &config, frequency, seconds)?,
        Command::Params { state } => {
            let store = state.build_store()?;
            print_params(&store);
        }
        Command::Save { state, out } => {
            let store = state.build_store()?;
            store
                .capture_state()
                .save(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Saved {}", out.display());
        }
    }
    Ok(())
}
