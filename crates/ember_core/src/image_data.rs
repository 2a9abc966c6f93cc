//! Decoded image pixel buffers for image textures.
//!
//! Pixels are stored as linear RGB floats so the renderer can use them as
//! albedo directly. Lookups use integer pixel coordinates and clamp to the
//! image edges.

use std::path::Path;

use ember_math::Vec3;

use crate::Result;

/// A decoded RGB image in linear space.
#[derive(Clone, Debug, Default)]
pub struct ImageData {
    width: u32,
    height: u32,
    /// Row-major, top row first
    pixels: Vec<[f32; 3]>,
}

impl ImageData {
    /// Build an image from 8-bit sRGB bytes (3 bytes per pixel, row-major).
    ///
    /// Returns an empty image when the buffer is shorter than
    /// `width * height * 3`.
    pub fn from_srgb8(width: u32, height: u32, bytes: &[u8]) -> Self {
        let expected = width as usize * height as usize * 3;
        if bytes.len() < expected {
            log::warn!(
                "Image buffer too short: {} bytes for {}x{}",
                bytes.len(),
                width,
                height
            );
            return Self::default();
        }

        let pixels = bytes[..expected]
            .chunks_exact(3)
            .map(|p| [srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])])
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Load an image file (any format the `image` crate decodes).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        log::debug!("Loaded image: {} ({}x{})", path.display(), width, height);

        Ok(Self::from_srgb8(width, height, rgb.as_raw()))
    }

    /// Decode an in-memory encoded image (PNG, JPEG, ...).
    pub fn from_memory(data: &[u8]) -> Result<Self> {
        let rgb = image::load_from_memory(data)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self::from_srgb8(width, height, rgb.as_raw()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when there are no pixels to sample.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Pixel at integer coordinates, clamped to the image edges.
    ///
    /// Returns magenta for an empty image.
    pub fn pixel(&self, x: i64, y: i64) -> Vec3 {
        if self.is_empty() {
            return Vec3::new(1.0, 0.0, 1.0);
        }

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let [r, g, b] = self.pixels[y * self.width as usize + x];
        Vec3::new(r, g, b)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
