//! Textures map a surface position to a color.

use std::sync::Arc;

use crate::{Color, RenderResult};
use orrery_core::ImageData;
use orrery_math::Vec3;

/// Trait for anything that can be sampled for a color at a hit point.
pub trait Texture: Send + Sync {
    /// Color at texture coordinates `(u, v)` and world-space point `p`.
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A texture with the same color everywhere.
#[derive(Debug, Clone)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// A 3D checkerboard in world space.
///
/// The sign of `sin(x) * sin(y) * sin(z)` picks the sub-texture, so cells
/// flip every `PI` units along each axis regardless of UV layout.
#[derive(Clone)]
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = p.x.sin() * p.y.sin() * p.z.sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Nearest-neighbour lookup into a decoded image.
///
/// Texture `v` runs bottom-up while image rows run top-down, so `v` is
/// flipped before indexing.
#[derive(Clone)]
pub struct ImageTexture {
    image: Arc<ImageData>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image }
    }

    /// Build from a raw decoded buffer, failing fast when it is empty or short.
    pub fn from_raw(width: u32, height: u32, channels: u8, bytes: Vec<u8>) -> RenderResult<Self> {
        let image = ImageData::from_raw(width, height, channels, bytes)?;
        Ok(Self::new(Arc::new(image)))
    }

    /// Pixel indices for `(u, v)`, clamped to the image.
    fn texel(&self, u: f32, v: f32) -> (u32, u32) {
        let nx = self.image.width() as f32;
        let ny = self.image.height() as f32;
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        // Float to int casts saturate, negatives land on 0
        let i = ((u * nx) as u32).min(self.image.width() - 1);
        let j = (((1.0 - v) * ny - 0.001) as u32).min(self.image.height() - 1);
        (i, j)
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let (i, j) = self.texel(u, v);
        let [r, g, b] = self.image.rgb(i, j);
        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderError;
    use orrery_core::TextureError;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn checker() -> CheckerTexture {
        CheckerTexture::new(
            Arc::new(SolidColor::new(Color::ONE)),
            Arc::new(SolidColor::new(Color::ZERO)),
        )
    }

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::new(Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.value(0.3, 0.9, Vec3::new(5.0, -2.0, 1.0)), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_flips_across_multiples_of_pi() {
        let tex = checker();
        let base = Vec3::new(FRAC_PI_2, FRAC_PI_2, FRAC_PI_2);

        for axis in 0..3 {
            let mut before = base;
            let mut after = base;
            before[axis] = PI - 0.1;
            after[axis] = PI + 0.1;
            assert_ne!(
                tex.value(0.0, 0.0, before),
                tex.value(0.0, 0.0, after),
                "axis {axis} should flip at PI"
            );

            before[axis] = 2.0 * PI - 0.1;
            after[axis] = 2.0 * PI + 0.1;
            assert_ne!(tex.value(0.0, 0.0, before), tex.value(0.0, 0.0, after));
        }
    }

    #[test]
    fn test_checker_ignores_uv() {
        let tex = checker();
        let p = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(tex.value(0.0, 0.0, p), tex.value(0.9, 0.1, p));
        assert_eq!(tex.value(0.0, 0.0, p), Color::ONE);
    }

    #[test]
    fn test_checker_nests() {
        let inner: Arc<dyn Texture> = Arc::new(checker());
        let outer = CheckerTexture::new(inner.clone(), inner);
        let p = Vec3::new(-1.0, 1.0, 1.0);
        assert_eq!(outer.value(0.0, 0.0, p), Color::ZERO);
    }

    fn quad() -> ImageTexture {
        // Top row: red, green. Bottom row: blue, white.
        #[rustfmt::skip]
        let bytes = vec![
            255, 0, 0,    0, 255, 0,
            0, 0, 255,    255, 255, 255,
        ];
        ImageTexture::from_raw(2, 2, 3, bytes).unwrap()
    }

    #[test]
    fn test_image_v_is_flipped() {
        let tex = quad();
        // High v samples the top row of the image
        assert_eq!(tex.value(0.1, 0.9, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.9, 0.9, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
        // Low v samples the bottom row
        assert_eq!(tex.value(0.1, 0.1, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
        assert_eq!(tex.value(0.9, 0.1, Vec3::ZERO), Color::ONE);
    }

    #[test]
    fn test_image_edges_are_clamped() {
        let tex = quad();
        assert_eq!(tex.texel(1.0, 1.0), (1, 0));
        assert_eq!(tex.texel(0.0, 0.0), (0, 1));
        assert_eq!(tex.texel(-3.0, 7.0), (0, 0));
        assert_eq!(tex.texel(f32::NAN, f32::NAN), (0, 0));
    }

    #[test]
    fn test_image_missing_data_fails_fast() {
        let err = ImageTexture::from_raw(16, 16, 3, Vec::new()).err().unwrap();
        assert!(matches!(
            err,
            RenderError::Texture(TextureError::MissingTextureData(_))
        ));
    }
}
