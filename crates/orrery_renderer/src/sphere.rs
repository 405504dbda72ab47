//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray, RenderError, RenderResult,
};
use orrery_math::{Interval, Vec3};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Rejects zero, negative and non-finite radii.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> RenderResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(RenderError::InvalidGeometry { radius });
        }

        Ok(Self {
            center,
            radius,
            material,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // phi: angle around Y from +X, theta: latitude
        let phi = p.z.atan2(p.x);
        let theta = p.y.clamp(-1.0, 1.0).asin();

        let u = 1.0 - (phi + PI) / (2.0 * PI);
        let v = (theta + PI / 2.0) / PI;
        (u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
    }

    fn record<'a>(&'a self, ray: &Ray, t: f32) -> HitRecord<'a> {
        let p = ray.at(t);
        let normal = (p - self.center) / self.radius;
        let (u, v) = Self::get_sphere_uv(normal);

        HitRecord {
            p,
            normal,
            material: self.material.as_ref(),
            u,
            v,
            t,
            front_face: ray.direction().dot(normal) < 0.0,
        }
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        // a*t^2 + 2*b*t + c = 0
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Near root first, far root when the near one is out of range
        let near = (-b - sqrtd) / a;
        if ray_t.surrounds(near) {
            return Some(self.record(ray, near));
        }

        let far = (-b + sqrtd) / a;
        if ray_t.surrounds(far) {
            return Some(self.record(ray, far));
        }

        None
    }
}
