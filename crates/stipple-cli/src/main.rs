//! Command-line front end: builds `NoiseParameters` from a JSON document
//! and/or flags, generates the image and writes it to disk.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use stipple_core::{Color, FractalType, NoiseParameters, NoiseType, NormalizationMode, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Largest accepted edge length, in pixels.
const MAX_DIMENSION: i64 = 2048;

#[derive(Parser, Debug)]
#[command(name = "stipple", version, about = "Render deterministic procedural noise textures")]
struct Args {
    /// JSON parameter document; flags below override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (default: noise-<seed>.<ext> in the current directory).
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION))]
    width: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION))]
    height: Option<u32>,

    /// Seed (default: derived from the current time).
    #[arg(long)]
    seed: Option<u32>,

    #[arg(long)]
    frequency: Option<f64>,

    #[arg(long)]
    amplitude: Option<f64>,

    /// gradient | simplex | perlin | worley | cellular | white | value
    #[arg(long = "noise")]
    noise_type: Option<NoiseType>,

    /// none | fbm | billow | ridged | turbulence | iq
    #[arg(long = "fractal")]
    fractal_type: Option<FractalType>,

    /// Distort sample coordinates before evaluating the noise.
    #[arg(long)]
    domain_warp: bool,

    /// Turn domain warp off even if the config enables it.
    #[arg(long, conflicts_with = "domain_warp")]
    no_domain_warp: bool,

    #[arg(long)]
    octaves: Option<u32>,

    #[arg(long)]
    persistence: Option<f64>,

    #[arg(long)]
    lacunarity: Option<f64>,

    /// Low end of the colour ramp, e.g. "#203040".
    #[arg(long)]
    background: Option<Color>,

    /// png | jpeg | webp (default: inferred from --out, else png)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Compression factor in [0, 1] for lossy formats.
    #[arg(long)]
    quality: Option<f32>,

    /// approximate | exact
    #[arg(long, value_parser = parse_normalization)]
    normalization: Option<NormalizationMode>,

    /// Print the effective parameters as JSON and exit.
    #[arg(long)]
    print_params: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_normalization(s: &str) -> Result<NormalizationMode, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "approximate" => Ok(NormalizationMode::Approximate),
        "exact" => Ok(NormalizationMode::Exact),
        other => Err(format!("unknown normalization '{other}' (expected approximate or exact)")),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Seed for requests that don't name one. Only the caller reads the clock.
fn time_seed() -> u32 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    (millis % 100_000) as u32
}

fn load_base(config: Option<&Path>) -> Result<(NoiseParameters, bool)> {
    match config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            let doc: serde_json::Value = serde_json::from_str(&json)
                .with_context(|| format!("parse config '{}'", path.display()))?;
            let has_seed = doc.get("seed").is_some();
            let params: NoiseParameters = serde_json::from_value(doc)
                .with_context(|| format!("invalid parameters in '{}'", path.display()))?;
            Ok((params, has_seed))
        }
        None => Ok((NoiseParameters::default(), false)),
    }
}

/// Overlay the flags that were given onto `base`.
fn resolve(args: &Args, mut params: NoiseParameters, seed_given: bool) -> NoiseParameters {
    if let Some(v) = args.width { params.width = v; }
    if let Some(v) = args.height { params.height = v; }
    if let Some(v) = args.frequency { params.frequency = v; }
    if let Some(v) = args.amplitude { params.amplitude = v; }
    if let Some(v) = args.noise_type { params.noise_type = v; }
    if let Some(v) = args.fractal_type { params.fractal_type = v; }
    if args.domain_warp { params.domain_warp = true; }
    if args.no_domain_warp { params.domain_warp = false; }
    if let Some(v) = args.octaves { params.octaves = v; }
    if let Some(v) = args.persistence { params.persistence = v; }
    if let Some(v) = args.lacunarity { params.lacunarity = v; }
    if let Some(v) = args.background { params.background_color = v; }
    if let Some(v) = args.quality { params.quality = v; }
    if let Some(v) = args.normalization { params.normalization = v; }

    params.seed = match args.seed {
        Some(seed) => seed,
        None if seed_given => params.seed,
        None => time_seed(),
    };

    params.output_format = match (args.format, &args.out) {
        (Some(format), _) => format,
        (None, Some(out)) => out
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .unwrap_or(params.output_format),
        (None, None) => params.output_format,
    };
    params
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let (base, seed_given) = load_base(args.config.as_deref())?;
    let params = resolve(&args, base, seed_given);

    if args.print_params {
        println!("{}", params.to_json_pretty()?);
        return Ok(());
    }

    let image = stipple_core::generate(&params).context("generate noise image")?;

    let out = args.out.clone().unwrap_or_else(|| PathBuf::from(params.suggested_file_name()));
    fs::write(&out, &image.bytes).with_context(|| format!("write '{}'", out.display()))?;
    tracing::info!(
        path = %out.display(),
        seed = params.seed,
        width = image.width,
        height = image.height,
        format = image.mime_type(),
        bytes = image.len(),
        "wrote image"
    );
    Ok(())
}
