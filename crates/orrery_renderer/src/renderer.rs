//! Core ray tracing integrator.
//!
//! Implements recursive light transport with:
//! - An explicit bounce cap threaded through every call
//! - A sky gradient for rays that escape the scene
//! - Jittered multi-sampling, gamma-2 correction and 8-bit quantization

use crate::{gen_f32, Camera, Color, Hittable, Ray};
use bytemuck::{Pod, Zeroable};
use orrery_math::{Interval, Vec3};
use rand::RngCore;

/// Default bounce cap for a primary ray.
pub const DEFAULT_MAX_DEPTH: u32 = 50;

/// Where inside a pixel each sample is taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Jitter {
    /// Uniform random offset in [0, 1) on both axes
    Random,
    /// Same offset for every sample, useful for reproducible tests
    Fixed(f32),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of scatter bounces per primary ray
    pub max_depth: u32,
    /// Lower bound of every hit query, keeps bounced rays off their origin
    pub t_min: f32,
    /// Worker threads for the parallel path (None = available parallelism)
    pub threads: Option<usize>,
    /// Render rows on a thread pool instead of one after another
    pub parallel: bool,
    /// Base seed, combined with the row index for each row's generator
    pub seed: u64,
    /// Sample placement inside each pixel
    pub jitter: Jitter,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 50,
            max_depth: DEFAULT_MAX_DEPTH,
            t_min: 0.001,
            threads: None,
            parallel: true,
            seed: 0,
            jitter: Jitter::Random,
        }
    }
}

/// Compute the color seen by a ray.
///
/// `depth` counts bounces taken so far. A surface may scatter only while
/// `depth < config.max_depth`. When the path ends on a surface, the result
/// is the direction of its emitted color, not its magnitude, which keeps
/// capped-out paths from blowing up.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(rec) = world.hit(ray, Interval::new(config.t_min, f32::MAX)) else {
        return sky_gradient(ray);
    };

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);

    if depth < config.max_depth {
        if let Some(result) = rec.material.scatter(ray, &rec, rng) {
            let incoming = ray_color(&result.scattered, world, depth + 1, config, rng);
            return emitted + result.attenuation * incoming;
        }
    }

    emitted.normalize_or_zero()
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// An 8-bit RGB pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Gamma-correct a linear color and quantize it to 8 bits per channel.
pub fn color_to_rgb8(color: Color) -> Rgb8 {
    let quantize = |c: f32| (255.999 * Interval::UNIT.clamp(linear_to_gamma(c))) as u8;
    Rgb8::new(quantize(color.x), quantize(color.y), quantize(color.z))
}

/// Render a single pixel with multi-sampling.
///
/// `row` counts from the bottom of the image. Returns the averaged linear
/// color, before gamma.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    col: u32,
    row: u32,
    width: u32,
    height: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let (du, dv) = match config.jitter {
            Jitter::Random => (gen_f32(rng), gen_f32(rng)),
            Jitter::Fixed(offset) => (offset, offset),
        };
        let u = (col as f32 + du) / width as f32;
        let v = (row as f32 + dv) / height as f32;

        let ray = camera.get_ray(u, v);
        pixel_color += ray_color(&ray, world, 0, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// A rendered image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgb8>,
}

impl Image {
    /// Assemble rows rendered bottom-up into a top-down image.
    ///
    /// `rows[0]` is the bottom row of the view.
    pub fn from_rows(width: u32, rows: Vec<Vec<Rgb8>>) -> Self {
        let height = rows.len() as u32;
        let mut pixels = Vec::with_capacity(width as usize * rows.len());
        for row in rows.into_iter().rev() {
            debug_assert_eq!(row.len(), width as usize);
            pixels.extend(row);
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at column `x`, row `y` (top-down).
    pub fn get(&self, x: u32, y: u32) -> Rgb8 {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    /// Interleaved RGB bytes, ready for a display surface.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Average color in [0, 1], for quick diagnostics.
    pub fn mean_color(&self) -> Vec3 {
        if self.pixels.is_empty() {
            return Vec3::ZERO;
        }

        let sum = self.pixels.iter().fold(Vec3::ZERO, |acc, p| {
            acc + Vec3::new(p.r as f32, p.g as f32, p.b as f32)
        });
        sum / (self.pixels.len() as f32 * 255.0)
    }
}
