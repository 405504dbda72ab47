//! Material trait for surface scattering.

use std::sync::Arc;

use crate::{gen_f32, hittable::HitRecord, Ray, Texture};
use orrery_math::Vec3;
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a ray continuing past a surface.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel factor applied to the light carried back along `scattered`
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the path ends here (absorbed or emitter).
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material sampling `albedo` for its color.
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        // Cosine-weighted bounce around the normal
        let mut scatter_direction = rec.normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Diffuse light emitter.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light. Channels above 1 read as brighter light.
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }
}

/// A transparent surface that bends passing light toward the sphere's
/// center, a cheap stand-in for lensing around a compact mass.
///
/// With unit incoming direction `d` and outward normal `n`, the component of
/// `n` perpendicular to the ray is `n_perp = n - (n . d) d`, whose length is
/// the sine of the incidence angle. The ray continues from the hit point
/// along `normalize(d - strength * n_perp)`. Since `d . n_perp == 0`, the
/// unnormalized vector is never shorter than 1, so the result is always
/// finite and the bend angle is at most `atan(strength)`.
#[derive(Debug, Clone, Copy)]
pub struct Schwarzschild {
    strength: f32,
}

impl Schwarzschild {
    /// Create a lens with the given bending strength. Negative or
    /// non-finite strengths bend nothing.
    pub fn new(strength: f32) -> Self {
        let strength = if strength.is_finite() { strength.max(0.0) } else { 0.0 };
        Self { strength }
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Unit direction after passing the surface with normal `normal`.
    pub fn bend(&self, direction: Vec3, normal: Vec3) -> Vec3 {
        let d = direction.normalize_or_zero();
        if d == Vec3::ZERO {
            return direction;
        }

        let n_perp = normal - normal.dot(d) * d;
        (d - self.strength * n_perp).normalize()
    }
}

impl Material for Schwarzschild {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, self.bend(ray_in.direction(), rec.normal)),
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Uniform random point inside the unit sphere.
fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling from the enclosing cube
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
