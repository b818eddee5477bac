//! In-memory codec
//!
//! Lets tests drive [`Image::load`](pixarena_core::Image::load) and
//! [`Image::save`](pixarena_core::Image::save) without touching the file
//! system.

use pixarena_core::{Codec, DecodedImage, Error, RawImage, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A [`Codec`] that stores "files" in a map keyed by path.
#[derive(Debug, Default)]
pub struct MemoryCodec {
    files: RefCell<HashMap<PathBuf, DecodedImage>>,
}

impl MemoryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `image` as the content of `path`.
    pub fn insert(&self, path: impl Into<PathBuf>, image: DecodedImage) {
        self.files.borrow_mut().insert(path.into(), image);
    }

    /// Content last written to (or inserted at) `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<DecodedImage> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl Codec for MemoryCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        self.get(path).ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            ))
        })
    }

    fn encode(&self, path: &Path, image: RawImage<'_>) -> Result<()> {
        self.insert(
            path,
            DecodedImage {
                width: image.width,
                height: image.height,
                channels: image.channels,
                data: image.data.to_vec(),
            },
        );
        Ok(())
    }
}
