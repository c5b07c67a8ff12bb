use clap::Parser;
use scintiloc::io::{load_calibration_samples, read_event_data, write_estimated_events};
use scintiloc::{BasisSpec, CalibrationFunction, CameraGeometry, Estimator, SearchConfig};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "ScintiLoc CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GeometryJson {
    channels: usize,
    samples_per_axis: usize,
    pitch_mm: f64,
}

impl Default for GeometryJson {
    fn default() -> Self {
        let geometry = CameraGeometry::default();
        Self {
            channels: geometry.channels,
            samples_per_axis: geometry.samples_per_axis,
            pitch_mm: geometry.pitch_mm,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SplineJson {
    order: usize,
    subdiv: usize,
}

impl Default for SplineJson {
    fn default() -> Self {
        Self {
            order: 3,
            subdiv: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SearchJson {
    grid_size: usize,
    contraction: f64,
    iterations: usize,
}

impl Default for SearchJson {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            grid_size: search.grid_size,
            contraction: search.contraction,
            iterations: search.iterations,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigJson {
    mdrf: PathBuf,
    thresh: PathBuf,
    gains: PathBuf,
    events: PathBuf,
    output: PathBuf,
    #[serde(default)]
    geometry: GeometryJson,
    #[serde(default)]
    spline: SplineJson,
    #[serde(default)]
    search: SearchJson,
    #[serde(default)]
    parallel: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if cli.print_example {
        print!("{EXAMPLE_JSON}");
        return Ok(());
    }
    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let raw = fs::read_to_string(&cli.config)?;
    let config: ConfigJson = serde_json::from_str(&raw)?;
    let geometry = CameraGeometry {
        channels: config.geometry.channels,
        samples_per_axis: config.geometry.samples_per_axis,
        pitch_mm: config.geometry.pitch_mm,
    };
    let spec = BasisSpec::new(config.spline.order, config.spline.subdiv)?;

    let samples =
        load_calibration_samples(&config.mdrf, &config.thresh, &config.gains, &geometry)?;
    let calib = CalibrationFunction::fit(&samples, spec)?;
    tracing::info!(channels = samples.num_channels(), "calibration fitted");

    let events = read_event_data(&config.events, geometry.channels)?;
    println!("Number of events: {}.", events.len());

    let estimator = Estimator::new(calib)
        .with_geometry(geometry)
        .with_search(SearchConfig {
            grid_size: config.search.grid_size,
            contraction: config.search.contraction,
            iterations: config.search.iterations,
        });

    let start = Instant::now();
    let estimated = if config.parallel {
        estimator.estimate_batch_par(&events)
    } else {
        estimator.estimate_batch(&events)
    };
    let elapsed = start.elapsed().as_secs_f64();
    println!(
        "Elapsed time: {elapsed:.3} s ({:.0} events/s).",
        estimated.len() as f64 / elapsed
    );

    write_estimated_events(&config.output, &estimated)?;
    let valid = estimated.iter().filter(|event| event.valid).count();
    println!(
        "Wrote {} estimates ({valid} valid) to {}.",
        estimated.len(),
        config.output.display()
    );
    Ok(())
}
