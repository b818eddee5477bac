//! Load, transform, save
//!
//! [`run`] performs one invocation of the tool: it optionally reserves an
//! [`Arena`], loads the input, logs its geometry, applies exactly one
//! [`Operation`] and saves the result. The arena lives only for the
//! duration of the run and every buffer of the image is carved from it.

use pixarena_core::{AllocStrategy, Arena, Codec, DEFAULT_ARENA_CAPACITY, Image, ImageInfo};
use pixarena_io::{CodecOptions, FileCodec};
use pixarena_transform::{TransformError, TransformResult, rotate, scale, validate_scale_factor};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, info_span};

/// The single transform applied by a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Replace every sample `v` with `255 - v`
    Invert,
    /// Bilinear scale by a positive factor
    Scale { factor: f32 },
    /// Bilinear rotation by `angle` degrees, uncovered pixels set to `fill`
    Rotate { angle: f64, fill: u8 },
}

impl Operation {
    /// Reject parameters that can never succeed, before anything is
    /// allocated.
    pub fn validate(&self) -> TransformResult<()> {
        match *self {
            Operation::Invert => Ok(()),
            Operation::Scale { factor } => validate_scale_factor(factor),
            Operation::Rotate { angle, .. } if !angle.is_finite() => {
                Err(TransformError::InvalidParameters(format!(
                    "rotation angle must be finite, got {}",
                    angle
                )))
            }
            Operation::Rotate { .. } => Ok(()),
        }
    }

    /// Apply the operation to a loaded image.
    pub fn apply(&self, image: &mut Image<'_>) -> TransformResult<()> {
        match *self {
            Operation::Invert => {
                if !image.is_loaded() {
                    return Err(pixarena_core::Error::NotLoaded.into());
                }
                image.invert();
                Ok(())
            }
            Operation::Scale { factor } => scale(image, factor),
            Operation::Rotate { angle, fill } => rotate(image, angle, fill),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Invert => write!(f, "invert"),
            Operation::Scale { factor } => write!(f, "scale x{}", factor),
            Operation::Rotate { angle, fill } => write!(f, "rotate {} deg (fill {})", angle, fill),
        }
    }
}

/// Where the image's buffers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocMode {
    /// One pre-reserved linear arena for the whole run
    #[default]
    Arena,
    /// Ordinary heap allocation per buffer
    Heap,
}

impl fmt::Display for AllocMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocMode::Arena => write!(f, "arena"),
            AllocMode::Heap => write!(f, "heap"),
        }
    }
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub operation: Operation,
    pub mode: AllocMode,
    /// Arena size in bytes (ignored in heap mode)
    pub arena_capacity: usize,
    pub codec: CodecOptions,
}

impl RunConfig {
    /// Arena mode with the default 128 MiB arena and default codec options.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        operation: Operation,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            operation,
            mode: AllocMode::default(),
            arena_capacity: DEFAULT_ARENA_CAPACITY,
            codec: CodecOptions::default(),
        }
    }

    pub fn mode(mut self, mode: AllocMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn arena_capacity(mut self, capacity: usize) -> Self {
        self.arena_capacity = capacity;
        self
    }

    pub fn codec_options(mut self, options: CodecOptions) -> Self {
        self.codec = options;
        self
    }
}

/// Arena statistics at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaUsage {
    pub capacity: usize,
    pub used: usize,
    pub allocations: usize,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: AllocMode,
    pub operation: Operation,
    /// Geometry after loading
    pub before: ImageInfo,
    /// Geometry after the transform
    pub after: ImageInfo,
    /// Wall time from arena creation to the end of the save
    pub elapsed: Duration,
    /// Present in arena mode
    pub arena: Option<ArenaUsage>,
}

/// Errors from a run, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum RunError {
    /// The operation's parameters were rejected before any allocation
    #[error("invalid operation: {0}")]
    InvalidOperation(#[source] TransformError),

    #[error("failed to load '{path}': {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: pixarena_core::Error,
    },

    #[error("{operation} failed: {source}")]
    Transform {
        operation: Operation,
        #[source]
        source: TransformError,
    },

    #[error("failed to save '{path}': {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: pixarena_core::Error,
    },
}

/// Run with the file codec configured in `config`.
pub fn run(config: &RunConfig) -> Result<RunReport, RunError> {
    run_with_codec(config, &FileCodec::with_options(config.codec))
}

/// Run with an explicit codec.
pub fn run_with_codec<C: Codec + ?Sized>(
    config: &RunConfig,
    codec: &C,
) -> Result<RunReport, RunError> {
    config
        .operation
        .validate()
        .map_err(RunError::InvalidOperation)?;

    let span = info_span!("run", mode = %config.mode, operation = %config.operation);
    let _enter = span.enter();

    let start = Instant::now();
    match config.mode {
        AllocMode::Heap => {
            info!("allocation mode: heap");
            let (before, after) = process(config, codec, AllocStrategy::Heap)?;
            Ok(RunReport {
                mode: config.mode,
                operation: config.operation,
                before,
                after,
                elapsed: start.elapsed(),
                arena: None,
            })
        }
        AllocMode::Arena => {
            info!(capacity = config.arena_capacity, "allocation mode: arena");
            let arena = Arena::new(config.arena_capacity);
            let (before, after) = process(config, codec, AllocStrategy::Arena(&arena))?;
            Ok(RunReport {
                mode: config.mode,
                operation: config.operation,
                before,
                after,
                elapsed: start.elapsed(),
                arena: Some(ArenaUsage {
                    capacity: arena.capacity(),
                    used: arena.used(),
                    allocations: arena.allocation_count(),
                }),
            })
        }
    }
}

fn process<C: Codec + ?Sized>(
    config: &RunConfig,
    codec: &C,
    strategy: AllocStrategy<'_>,
) -> Result<(ImageInfo, ImageInfo), RunError> {
    let mut image = Image::with_strategy(&config.input, strategy);
    image.load(codec).map_err(|source| RunError::Load {
        path: config.input.clone(),
        source,
    })?;
    let before = image.info();
    info!(path = %config.input.display(), "{}", before);

    config
        .operation
        .apply(&mut image)
        .map_err(|source| RunError::Transform {
            operation: config.operation,
            source,
        })?;
    let after = image.info();

    image
        .save(codec, &config.output)
        .map_err(|source| RunError::Save {
            path: config.output.clone(),
            source,
        })?;
    Ok((before, after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixarena_core::Error;

    #[test]
    fn test_operation_validate() {
        assert!(Operation::Invert.validate().is_ok());
        assert!(Operation::Scale { factor: 0.5 }.validate().is_ok());
        assert!(Operation::Scale { factor: 0.0 }.validate().is_err());
        assert!(Operation::Scale { factor: -2.0 }.validate().is_err());
        assert!(
            Operation::Rotate {
                angle: f64::INFINITY,
                fill: 0
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_invert_requires_loaded_image() {
        let mut image = Image::new("nothing.png");
        assert!(matches!(
            Operation::Invert.apply(&mut image),
            Err(TransformError::Core(Error::NotLoaded))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Operation::Invert.to_string(), "invert");
        assert_eq!(Operation::Scale { factor: 1.5 }.to_string(), "scale x1.5");
        assert_eq!(AllocMode::Heap.to_string(), "heap");
    }

    #[test]
    fn test_config_defaults() {
        let config = RunConfig::new("a.png", "b.png", Operation::Invert);
        assert_eq!(config.mode, AllocMode::Arena);
        assert_eq!(config.arena_capacity, DEFAULT_ARENA_CAPACITY);
        let config = config.mode(AllocMode::Heap).arena_capacity(64);
        assert_eq!(config.mode, AllocMode::Heap);
        assert_eq!(config.arena_capacity, 64);
    }
}
