//! Diagnostic gallery: one PNG per noise type × fractal type.
//! Not part of the engine; used to eyeball changes to kernels or transforms.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use stipple_core::{render, Color, FractalType, NoiseParameters, NoiseType};

#[derive(Parser, Debug)]
#[command(name = "gallery", about = "Render every noise/fractal combination to PNG")]
struct Args {
    /// Output directory (created if absent).
    #[arg(short, long, default_value = "data/gallery")]
    output: PathBuf,

    /// Edge length of each tile in pixels.
    #[arg(long, default_value = "256")]
    size: u32,

    #[arg(long, default_value = "42")]
    seed: u32,

    /// Also render a domain-warped variant of each tile.
    #[arg(long)]
    warp: bool,

    /// Background colour for the low end of the ramp.
    #[arg(long, default_value = "#000000")]
    background: Color,
}

/// Frequency that gives each kernel a readable amount of detail at `size`.
fn showcase_frequency(noise_type: NoiseType, fractal_type: FractalType, base: &NoiseParameters) -> f64 {
    match noise_type {
        // White noise reads its table at normalized coordinates, so the
        // highest octave must still stay inside [0, 1).
        NoiseType::White if fractal_type == FractalType::None => 1.0,
        NoiseType::White => 1.0 / base.lacunarity.powi(base.octaves.saturating_sub(1) as i32),
        NoiseType::Value => 8.0,
        _ => 4.0,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    fs::create_dir_all(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;

    let warp_modes: &[bool] = if args.warp { &[false, true] } else { &[false] };

    for noise_type in NoiseType::ALL {
        for fractal_type in FractalType::ALL {
            for &domain_warp in warp_modes {
                let base = NoiseParameters::default();
                let params = NoiseParameters {
                    width: args.size,
                    height: args.size,
                    seed: args.seed,
                    frequency: showcase_frequency(noise_type, fractal_type, &base),
                    noise_type,
                    fractal_type,
                    domain_warp,
                    background_color: args.background,
                    ..base
                };
                let raster = render(&params)
                    .with_context(|| format!("render {noise_type}/{fractal_type}"))?;

                let suffix = if domain_warp { "-warp" } else { "" };
                let path = args.output.join(format!("{noise_type}-{fractal_type}{suffix}.png"));
                raster
                    .save(&path)
                    .with_context(|| format!("failed to save {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
        }
    }

    println!("Done.");
    Ok(())
}
