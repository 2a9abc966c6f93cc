//! Textures: pure functions of (u, v, point) to color.

use std::path::Path;
use std::sync::Arc;

use crate::perlin::Perlin;
use crate::Color;
use ember_core::ImageData;
use ember_math::{Interval, Vec3};
use rand::RngCore;

/// Returned by image textures whose image is missing.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3D checker pattern alternating two textures by the parity of the
/// floored, scaled coordinates.
#[derive(Clone)]
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    /// `scale` is the edge length of one checker cell.
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let x = (self.inv_scale * p.x).floor() as i64;
        let y = (self.inv_scale * p.y).floor() as i64;
        let z = (self.inv_scale * p.z).floor() as i64;

        if (x + y + z).rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Nearest-pixel lookup into a decoded image.
///
/// A texture without a usable image renders as bright cyan instead of
/// failing, so a missing asset is obvious in the output.
#[derive(Clone)]
pub struct ImageTexture {
    image: Option<Arc<ImageData>>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image: Some(image) }
    }

    /// Load an image from disk, falling back to the missing-texture color.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match ImageData::load(path) {
            Ok(image) => Self::new(Arc::new(image)),
            Err(err) => {
                log::warn!("Could not load texture image {}: {}", path.display(), err);
                Self::missing()
            }
        }
    }

    /// A texture with no image at all.
    pub fn missing() -> Self {
        Self { image: None }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let image = match &self.image {
            Some(image) if !image.is_empty() => image,
            _ => return MISSING_TEXTURE_COLOR,
        };

        // Clamp input coords to [0, 1], flip v to image coordinates
        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v);

        let i = (u * image.width() as f32) as i64;
        let j = (v * image.height() as f32) as i64;
        image.pixel(i, j)
    }
}

/// Smooth Perlin noise remapped to gray levels in [0, 1].
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        Color::splat(0.5) * (1.0 + self.noise.noise(self.scale * p))
    }
}

/// Marble veins: a sine along z phase-shifted by turbulence.
pub struct MarbleTexture {
    noise: Perlin,
    scale: f32,
}

impl MarbleTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for MarbleTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turbulence(p, 7);
        Color::splat(0.5) * (1.0 + phase.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EVEN: Color = Color::new(0.2, 0.3, 0.1);
    const ODD: Color = Color::new(0.9, 0.9, 0.9);

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::from_rgb(1.0, 0.5, 0.0);
        assert_eq!(tex.value(0.3, 0.7, Vec3::new(5.0, 6.0, 7.0)), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_flips_across_one_cell() {
        let scale = 0.32;
        let tex = CheckerTexture::from_colors(scale, EVEN, ODD);
        let p = Vec3::new(0.1, 0.1, 0.1);
        let base = tex.value(0.0, 0.0, p);

        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let moved = tex.value(0.0, 0.0, p + axis * scale);
            assert_ne!(base, moved);
            assert!(moved == EVEN || moved == ODD);

            let back = tex.value(0.0, 0.0, p - axis * scale);
            assert_eq!(back, moved);
        }
    }

    #[test]
    fn test_checker_parity_continues_through_origin() {
        let tex = CheckerTexture::from_colors(1.0, EVEN, ODD);

        assert_eq!(tex.value(0.0, 0.0, Vec3::splat(0.5)), EVEN);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(-0.5, 0.5, 0.5)), ODD);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(-0.5, -0.5, 0.5)), EVEN);
        assert_eq!(tex.value(0.0, 0.0, Vec3::splat(-0.5)), ODD);
    }

    #[test]
    fn test_checker_is_deterministic() {
        let tex = CheckerTexture::from_colors(0.5, EVEN, ODD);
        let p = Vec3::new(1.23, -4.56, 7.89);
        let first = tex.value(0.1, 0.2, p);
        for _ in 0..10 {
            assert_eq!(tex.value(0.1, 0.2, p), first);
        }
    }

    #[test]
    fn test_missing_image_is_cyan() {
        let tex = ImageTexture::missing();
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE_COLOR);

        let tex = ImageTexture::open("no/such/texture.jpg");
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE_COLOR);

        let tex = ImageTexture::new(Arc::new(ImageData::default()));
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE_COLOR);
    }

    #[test]
    fn test_image_lookup_flips_v() {
        // 1x2 image: top row white, bottom row black
        let image = ImageData::from_srgb8(1, 2, &[255, 255, 255, 0, 0, 0]);
        let tex = ImageTexture::new(Arc::new(image));

        // v = 1 is the top of the image
        assert!((tex.value(0.5, 0.9, Vec3::ZERO) - Color::ONE).length() < 1e-4);
        assert_eq!(tex.value(0.5, 0.1, Vec3::ZERO), Color::ZERO);

        // Out of range coords clamp instead of failing
        assert_eq!(tex.value(-3.0, -3.0, Vec3::ZERO), Color::ZERO);
        assert!((tex.value(3.0, 3.0, Vec3::ZERO) - Color::ONE).length() < 1e-4);
    }

    #[test]
    fn test_noise_texture_follows_scaled_perlin() {
        let tex = NoiseTexture::new(4.0, &mut StdRng::seed_from_u64(15));
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(15));

        for i in 0..50 {
            let p = Vec3::new(i as f32 * 0.31, 1.0 - i as f32 * 0.07, i as f32 * 0.13);
            let expected = 0.5 * (1.0 + perlin.noise(p * 4.0));
            let c = tex.value(0.0, 0.0, p);
            assert!((c.x - expected).abs() < 1e-6);
            assert_eq!(c, Color::splat(c.x));
        }
    }

    #[test]
    fn test_marble_texture_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(15);
        let tex = MarbleTexture::new(4.0, &mut rng);

        for i in 0..100 {
            let c = tex.value(0.0, 0.0, Vec3::splat(i as f32 * 0.17));
            assert!(c.x >= -1e-6 && c.x <= 1.0 + 1e-6);
            assert_eq!(c.x, c.y);
        }
    }

    #[test]
    fn test_noise_texture_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(15);
        let tex = NoiseTexture::new(4.0, &mut rng);

        for i in 0..100 {
            let c = tex.value(0.0, 0.0, Vec3::splat(i as f32 * 0.17));
            assert!(c.x >= 0.0 && c.x <= 1.0 + 1e-6);
            assert_eq!(c.x, c.y);
        }
    }
}
