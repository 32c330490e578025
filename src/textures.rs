//! Sprite resolution.
//!
//! The engine never decodes pixels; it only needs an opaque handle for the
//! renderer and the sprite's pixel width for size normalization. A
//! [`SpriteSource`] provides both. [`ImageSpriteSource`] reads image headers
//! from disk with the `image` crate.
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use crate::error::TextureError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Opaque reference the renderer uses to bind the sprite texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub u64);

/// A resolved sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub handle: SpriteHandle,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Resolves sprite references to handles and dimensions.
pub trait SpriteSource {
    /// Resolve `src` (a path or identifier).
    fn load(&mut self, src: &str) -> Result<Sprite, TextureError>;
}

/// Reads sprite dimensions from image files under a root directory.
///
/// Leading `/` in a reference is relative to the root, so `"/smoke.png"`
/// resolves to `<root>/smoke.png`. Each distinct path keeps the same handle
/// across loads.
#[derive(Debug, Clone)]
pub struct ImageSpriteSource {
    root: PathBuf,
    handles: HashMap<PathBuf, SpriteHandle>,
}

impl ImageSpriteSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            handles: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for a sprite reference.
    pub fn resolve(&self, src: &str) -> PathBuf {
        self.root.join(src.trim_start_matches('/'))
    }
}

impl SpriteSource for ImageSpriteSource {
    fn load(&mut self, src: &str) -> Result<Sprite, TextureError> {
        let path = self.resolve(src);
        let (width, height) = image::image_dimensions(&path)?;
        if width == 0 {
            return Err(TextureError::Empty(src.to_owned()));
        }
        let next = SpriteHandle(self.handles.len() as u64);
        let handle = *self.handles.entry(path).or_insert(next);
        Ok(Sprite {
            handle,
            width,
            height,
        })
    }
}

/// In-memory sprite table, for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSpriteSource {
    sprites: HashMap<String, Sprite>,
}

impl StaticSpriteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sprite reference with its dimensions.
    pub fn with_sprite(mut self, src: impl Into<String>, width: u32, height: u32) -> Self {
        let handle = SpriteHandle(self.sprites.len() as u64);
        self.sprites.insert(
            src.into(),
            Sprite {
                handle,
                width,
                height,
            },
        );
        self
    }
}

impl SpriteSource for StaticSpriteSource {
    fn load(&mut self, src: &str) -> Result<Sprite, TextureError> {
        let sprite = self.sprites.get(src).cloned().ok_or_else(|| {
            TextureError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no sprite registered as `{src}`"),
            ))
        })?;
        if sprite.width == 0 {
            return Err(TextureError::Empty(src.to_owned()));
        }
        Ok(sprite)
    }
}
