//! pixarena CLI - apply one transform to an image file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pixarena::io::{CodecOptions, DEFAULT_JPEG_QUALITY};
use pixarena::{AllocMode, DEFAULT_ARENA_CAPACITY, Operation, RunConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Invert, scale or rotate an image using an arena or the heap for pixels.
#[derive(Parser)]
#[command(name = "pixarena")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Where pixel buffers are allocated
    #[arg(short, long, value_enum, default_value_t = Mode::Arena)]
    mode: Mode,

    /// Arena size in bytes; accepts K, M and G suffixes
    #[arg(long, value_parser = parse_size, default_value_t = DEFAULT_ARENA_CAPACITY)]
    arena_size: usize,

    /// JPEG quality for .jpg/.jpeg outputs (1-100)
    #[arg(
        long,
        default_value_t = DEFAULT_JPEG_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    jpeg_quality: u8,

    /// Input image (PNG, JPEG or binary PNM)
    input: PathBuf,

    /// Output image; the format follows the extension (PNG by default)
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// One pre-reserved linear arena
    #[value(alias = "buddy")]
    Arena,
    /// Per-buffer heap allocation
    #[value(alias = "no-buddy")]
    Heap,
}

#[derive(Subcommand)]
enum Command {
    /// Invert every sample (255 - v)
    #[command(alias = "invertir")]
    Invert,

    /// Scale by a positive factor with bilinear interpolation
    #[command(alias = "escalar")]
    Scale {
        /// Scale factor (> 0)
        factor: f32,
    },

    /// Rotate by an angle in degrees with bilinear interpolation
    #[command(alias = "rotar")]
    Rotate {
        /// Angle in degrees
        #[arg(allow_negative_numbers = true)]
        angle: f64,

        /// Sample value for pixels outside the rotated image
        #[arg(long, default_value_t = 0)]
        fill: u8,
    },
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        let operation = match self.command {
            Command::Invert => Operation::Invert,
            Command::Scale { factor } => Operation::Scale { factor },
            Command::Rotate { angle, fill } => Operation::Rotate { angle, fill },
        };
        let mode = match self.mode {
            Mode::Arena => AllocMode::Arena,
            Mode::Heap => AllocMode::Heap,
        };
        RunConfig::new(&self.input, &self.output, operation)
            .mode(mode)
            .arena_capacity(self.arena_size)
            .codec_options(CodecOptions::default().jpeg_quality(self.jpeg_quality))
    }
}

/// Parse a byte count such as `4096`, `64K`, `128M` or `1G`.
fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let (digits, shift) = match s.char_indices().last() {
        Some((i, 'k' | 'K')) => (&s[..i], 10),
        Some((i, 'm' | 'M')) => (&s[..i], 20),
        Some((i, 'g' | 'G')) => (&s[..i], 30),
        _ => (s, 0),
    };
    let value: usize = digits
        .trim()
        .parse()
        .map_err(|_| format!("invalid size: {:?}", s))?;
    value
        .checked_mul(1usize << shift)
        .ok_or_else(|| format!("size too large: {:?}", s))
}

fn setup_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stdout),
        )
        .try_init()
        .context("Failed to initialize tracing subscriber")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let config = cli.run_config();
    let report = pixarena::run(&config)
        .with_context(|| format!("could not process {}", config.input.display()))?;

    info!("{} -> {} ({})", report.before, report.after, report.operation);
    info!("processing time: {} ms", report.elapsed.as_millis());
    if let Some(arena) = report.arena {
        info!(
            "arena: {} of {} bytes used in {} allocations",
            arena.used, arena.capacity, arena.allocations
        );
    }
    info!(path = %config.output.display(), "done");
    Ok(())
}
