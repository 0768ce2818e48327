//! vcamframe CLI
//!
//! Command-line interface for inspecting bitmaps and running them through the
//! frame adaptation pipeline.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use vcamframe::{
    conversion_targets, AdapterConfig, AspectRatio, Frame, FrameAdapter, PixelFormat, Resolution,
    Scaling, VideoFormat,
};

#[derive(Parser)]
#[command(name = "vcamframe")]
#[command(about = "Virtual camera frame engine - Scale, Adjust, Convert")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pixel formats and the conversions available from each
    Formats,

    /// Show the dimensions and format of a bitmap
    Info {
        /// Bitmap file (24 or 32-bit)
        input: PathBuf,
    },

    /// Adapt a bitmap to another format and size, writing the raw frame
    Convert {
        /// Bitmap file (24 or 32-bit)
        input: PathBuf,

        /// Output pixel format (e.g. rgb24, yuy2, nv12)
        #[arg(short, long, default_value = "rgb24")]
        format: PixelFormat,

        /// Output size (e.g. 1280x720), defaults to the bitmap size
        #[arg(short, long)]
        size: Option<Resolution>,

        /// Scaling mode (fast, linear)
        #[arg(long)]
        scaling: Option<Scaling>,

        /// Aspect ratio mode (ignore, keep, expanding)
        #[arg(short, long)]
        aspect: Option<AspectRatio>,

        /// Adapter configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Raw output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vcamframe=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Formats => cmd_formats(),
        Commands::Info { input } => cmd_info(input),
        Commands::Convert {
            input,
            format,
            size,
            scaling,
            aspect,
            config,
            output,
        } => cmd_convert(input, format, size, scaling, aspect, config, output),
    }
}

fn cmd_formats() -> anyhow::Result<()> {
    println!("{:<8} {:>10} {:>5}  Converts to", "Format", "FourCC", "Bits");

    for format in PixelFormat::ALL {
        let targets: Vec<String> = conversion_targets(format)
            .iter()
            .map(|f| f.to_string())
            .collect();

        println!(
            "{:<8} 0x{:08X} {:>5}  {}",
            format.name(),
            format.fourcc(),
            format.bits_per_pixel(),
            if targets.is_empty() {
                "-".to_string()
            } else {
                targets.join(", ")
            }
        );
    }

    Ok(())
}

fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    let frame = Frame::from_file(&input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Format: {}", frame.pixel_format());
    println!("Resolution: {}", frame.format().resolution());
    println!("Size: {} bytes", frame.data().len());

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_convert(
    input: PathBuf,
    format: PixelFormat,
    size: Option<Resolution>,
    scaling: Option<Scaling>,
    aspect: Option<AspectRatio>,
    config: Option<PathBuf>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let frame = Frame::from_file(&input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let mut adapter_config = match config {
        Some(path) => AdapterConfig::load(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => AdapterConfig::default(),
    };

    if let Some(scaling) = scaling {
        adapter_config = adapter_config.with_scaling(scaling);
    }

    if let Some(aspect) = aspect {
        adapter_config = adapter_config.with_aspect_ratio(aspect);
    }

    let size = size.unwrap_or_else(|| frame.format().resolution());
    let target = VideoFormat::new(format, size.width, size.height);

    tracing::info!("Adapting {} to {}", frame.format(), target);

    let adapted = FrameAdapter::new(adapter_config).apply(&frame, &target);

    if adapted.is_empty() {
        anyhow::bail!("Can't adapt {} to {}", frame.format(), target);
    }

    std::fs::write(&output, adapted.data())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({} bytes) to {}",
        target,
        adapted.data().len(),
        output.display()
    );

    Ok(())
}
