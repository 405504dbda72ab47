//! Decoded image buffers and a texture cache.
//!
//! The renderer never decodes files itself. It consumes `ImageData`
//! (width, height, channel count and interleaved 8-bit bytes), which is
//! produced here through the `image` crate or supplied directly by a caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while building texture data.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Missing texture data: {0}")]
    MissingTextureData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported channel count: {0} (expected 3 or 4)")]
    UnsupportedFormat(u8),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded 8-bit image, row-major with row 0 at the top.
#[derive(Clone, Debug)]
pub struct ImageData {
    width: u32,
    height: u32,
    channels: u8,
    bytes: Vec<u8>,
}

impl ImageData {
    /// Wrap an already decoded buffer.
    ///
    /// Fails fast on an absent or truncated buffer so sampling can never read
    /// past the end of the data.
    pub fn from_raw(width: u32, height: u32, channels: u8, bytes: Vec<u8>) -> TextureResult<Self> {
        if channels != 3 && channels != 4 {
            return Err(TextureError::UnsupportedFormat(channels));
        }
        if width == 0 || height == 0 || bytes.is_empty() {
            return Err(TextureError::MissingTextureData(format!(
                "empty {}x{} buffer",
                width, height
            )));
        }

        let expected = width as usize * height as usize * channels as usize;
        if bytes.len() < expected {
            return Err(TextureError::MissingTextureData(format!(
                "buffer holds {} bytes, {}x{}x{} needs {}",
                bytes.len(),
                width,
                height,
                channels,
                expected
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            bytes,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel (3 or 4).
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// RGB bytes of the pixel at column `x`, row `y` (top-down).
    ///
    /// Coordinates are clamped to the image, alpha is ignored.
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let stride = self.channels as usize;
        let idx = (y * self.width as usize + x) * stride;
        [self.bytes[idx], self.bytes[idx + 1], self.bytes[idx + 2]]
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Cache for decoded texture images.
///
/// Images are decoded on first request and shared through `Arc` afterwards.
pub struct TextureCache {
    /// Cached images by the path they were requested with
    images: HashMap<String, Arc<ImageData>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image from file, using the cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<ImageData>> {
        if let Some(image) = self.images.get(path) {
            return Ok(image.clone());
        }

        let full_path = self.resolve_path(path);
        let image = Arc::new(load_image(&full_path)?);
        self.images.insert(path.to_string(), image.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}x{}, {:.1} KB)",
            path,
            image.width(),
            image.height(),
            image.channels(),
            image.size_bytes() as f32 / 1024.0
        );

        Ok(image)
    }

    /// Insert an already decoded image under `path`.
    pub fn insert(&mut self, path: impl Into<String>, image: ImageData) -> Arc<ImageData> {
        let image = Arc::new(image);
        self.images.insert(path.into(), image.clone());
        image
    }

    /// Check whether `path` exists, either cached or on disk.
    pub fn is_available(&self, path: &str) -> bool {
        self.images.contains_key(path) || self.resolve_path(path).is_file()
    }

    /// Get the number of cached images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image file into 8-bit RGB, or RGBA when it carries alpha.
pub fn load_image(path: &Path) -> TextureResult<ImageData> {
    let img = image::open(path)?;

    if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        ImageData::from_raw(width, height, 4, rgba.into_raw())
    } else {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        ImageData::from_raw(width, height, 3, rgb.into_raw())
    }
}
