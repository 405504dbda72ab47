//! Orrery Renderer - CPU Ray Tracing
//!
//! A recursive Monte Carlo ray tracer over a linear list of spheres, with
//! textured diffuse surfaces, emitters and a light-bending lens material.
//! Rows are rendered independently on a rayon pool and assembled in order.

mod camera;
mod error;
mod hittable;
mod material;
mod renderer;
mod rows;
mod scene;
mod sphere;
mod texture;
mod world;

pub use camera::{Camera, CameraMove, DEFAULT_MOVE_STEP};
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, Primitive};
pub use material::{Color, DiffuseLight, Lambertian, Material, ScatterResult, Schwarzschild};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render_pixel, sky_gradient, Image, Jitter,
    RenderConfig, Rgb8, DEFAULT_MAX_DEPTH,
};
pub use rows::{render, render_parallel, render_row, render_sequential};
pub use scene::Scene;
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture};
pub use world::{build_world, World};

/// Re-export Vec3 and common math types from orrery_math
pub use orrery_math::{Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Draw a uniform float in [0, 1).
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
