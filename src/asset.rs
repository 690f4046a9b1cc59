use crate::error::{ForgeError, Result};
use base64::{engine::general_purpose, Engine as _};
use image::{ImageFormat, ImageReader, RgbaImage};
use std::path::Path;

/// A decoded raster held in RGBA. Every image entering the pipeline is
/// normalized through this type so compositing and text drawing never have
/// to branch on pixel format.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pixels: RgbaImage,
}

impl ImageAsset {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let decoded = ImageReader::open(path)
            .map_err(ForgeError::Io)?
            .decode()
            .map_err(|e| ForgeError::Image(format!("Failed to decode {}: {}", path.display(), e)))?;
        Ok(Self {
            pixels: decoded.to_rgba8(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| ForgeError::Image(format!("Failed to decode image bytes: {}", e)))?;
        Ok(Self {
            pixels: decoded.to_rgba8(),
        })
    }

    /// Decode a base64 payload, tolerating `data:image/...;base64,` prefixes.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let raw = match encoded.split_once(',') {
            Some((head, rest)) if head.starts_with("data:") => rest,
            _ => encoded,
        };
        let bytes = general_purpose::STANDARD
            .decode(raw.trim())
            .map_err(|e| ForgeError::Image(format!("Invalid base64 image payload: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.pixels
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| ForgeError::Image(format!("Failed to write {}: {}", path.display(), e)))
    }
}
