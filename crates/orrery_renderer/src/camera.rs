//! Camera for ray generation.

use std::str::FromStr;

use crate::{Ray, RenderError};
use orrery_math::Vec3;

/// Distance a single camera move travels.
pub const DEFAULT_MOVE_STEP: f32 = 0.1;

/// Pinhole camera mapping normalized image coordinates to world rays.
///
/// The basis is recomputed whenever the placement changes, so a camera can
/// be moved freely between render passes.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,   // Vertical field of view in degrees
    aspect: f32, // Width over height

    // Cached computed values (set by update_basis())
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a new camera at the origin looking down -Z.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            aspect: 4.0 / 3.0,
            lower_left: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        };
        camera.update_basis();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.update_basis();
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aspect: f32) -> Self {
        self.vfov = vfov;
        self.aspect = aspect;
        self.update_basis();
        self
    }

    pub fn look_from(&self) -> Vec3 {
        self.look_from
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Move the eye point, keeping the target.
    pub fn set_look_from(&mut self, look_from: Vec3) {
        self.look_from = look_from;
        self.update_basis();
    }

    /// Move the target, keeping the eye point.
    pub fn set_look_at(&mut self, look_at: Vec3) {
        self.look_at = look_at;
        self.update_basis();
    }

    /// Update aspect ratio (e.g., on window resize)
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_basis();
    }

    /// Apply one navigation step of `step` world units.
    pub fn apply_move(&mut self, mv: CameraMove, step: f32) {
        let delta = mv.direction() * step;
        if mv.moves_eye() {
            self.look_from += delta;
        }
        self.look_at += delta;
        self.update_basis();
    }

    /// Generate the ray through image-plane point `(s, t)`.
    ///
    /// `(0, 0)` is the lower-left corner, `(1, 1)` the upper-right. The
    /// direction is left unnormalized.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        let target = self.lower_left + s * self.horizontal + t * self.vertical;
        Ray::new(self.look_from, target - self.look_from)
    }

    /// Recompute the orthonormal basis and image plane.
    fn update_basis(&mut self) {
        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect * half_height;

        // Degenerate placements keep the previous orientation
        self.w = (self.look_from - self.look_at)
            .try_normalize()
            .unwrap_or(self.w);
        self.u = self
            .vup
            .cross(self.w)
            .try_normalize()
            .unwrap_or_else(|| self.w.any_orthonormal_vector());
        self.v = self.w.cross(self.u);

        self.lower_left = self.look_from - half_width * self.u - half_height * self.v - self.w;
        self.horizontal = 2.0 * half_width * self.u;
        self.vertical = 2.0 * half_height * self.v;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Discrete navigation steps driven by the display's key input.
///
/// The first six translate the whole camera, the `Look*` moves only shift
/// the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMove {
    Right,
    Left,
    Forward,
    Back,
    Rise,
    Sink,
    LookRight,
    LookLeft,
    LookForward,
    LookBack,
}

impl CameraMove {
    pub const ALL: [CameraMove; 10] = [
        CameraMove::Right,
        CameraMove::Left,
        CameraMove::Forward,
        CameraMove::Back,
        CameraMove::Rise,
        CameraMove::Sink,
        CameraMove::LookRight,
        CameraMove::LookLeft,
        CameraMove::LookForward,
        CameraMove::LookBack,
    ];

    /// Unit world-space direction of the move.
    pub fn direction(self) -> Vec3 {
        match self {
            CameraMove::Right | CameraMove::LookRight => Vec3::X,
            CameraMove::Left | CameraMove::LookLeft => Vec3::NEG_X,
            CameraMove::Forward | CameraMove::LookForward => Vec3::NEG_Z,
            CameraMove::Back | CameraMove::LookBack => Vec3::Z,
            CameraMove::Rise => Vec3::Y,
            CameraMove::Sink => Vec3::NEG_Y,
        }
    }

    /// Whether the eye point travels along with the target.
    pub fn moves_eye(self) -> bool {
        !matches!(
            self,
            CameraMove::LookRight
                | CameraMove::LookLeft
                | CameraMove::LookForward
                | CameraMove::LookBack
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            CameraMove::Right => "right",
            CameraMove::Left => "left",
            CameraMove::Forward => "forward",
            CameraMove::Back => "back",
            CameraMove::Rise => "rise",
            CameraMove::Sink => "sink",
            CameraMove::LookRight => "look-right",
            CameraMove::LookLeft => "look-left",
            CameraMove::LookForward => "look-forward",
            CameraMove::LookBack => "look-back",
        }
    }
}

impl FromStr for CameraMove {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CameraMove::ALL
            .into_iter()
            .find(|mv| mv.name() == wanted)
            .ok_or_else(|| RenderError::UnknownCameraMove(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_camera() -> Camera {
        Camera::new()
            .with_position(Vec3::new(4.0, 7.0, 3.0), Vec3::new(4.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 800.0 / 600.0)
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = reference_camera();

        for axis in [camera.u, camera.v, camera.w] {
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
        assert!(camera.u.dot(camera.v).abs() < 1e-5);
        assert!(camera.u.dot(camera.w).abs() < 1e-5);
        assert!(camera.v.dot(camera.w).abs() < 1e-5);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = reference_camera();
        let ray = camera.get_ray(0.5, 0.5);

        assert_eq!(ray.origin(), camera.look_from());
        let expected = (camera.look_at() - camera.look_from()).normalize();
        assert!((ray.direction().normalize() - expected).length() < 1e-5);
    }

    #[test]
    fn test_corners_follow_fov() {
        // 90 degree vfov with square aspect puts the plane corners at +-1
        let camera = Camera::new().with_lens(90.0, 1.0);

        let lower_left = camera.get_ray(0.0, 0.0).direction();
        assert!((lower_left - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);

        let upper_right = camera.get_ray(1.0, 1.0).direction();
        assert!((upper_right - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_aspect_widens_horizontally() {
        let camera = Camera::new().with_lens(90.0, 2.0);
        let right_edge = camera.get_ray(1.0, 0.5).direction();
        assert!((right_edge - Vec3::new(2.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_set_look_at_recomputes_basis() {
        let mut camera = Camera::new();
        camera.set_look_at(Vec3::X);

        let ray = camera.get_ray(0.5, 0.5);
        assert!((ray.direction().normalize() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_set_look_from_recomputes_basis() {
        let mut camera = Camera::new();
        camera.set_look_from(Vec3::new(0.0, 0.0, 5.0));

        let ray = camera.get_ray(0.5, 0.5);
        assert_eq!(ray.origin(), Vec3::new(0.0, 0.0, 5.0));
        assert!((ray.direction().normalize() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_degenerate_placement_stays_finite() {
        let mut camera = Camera::new();
        camera.set_look_at(camera.look_from());
        assert!(camera.get_ray(0.3, 0.7).direction().is_finite());

        // Looking straight along the up vector
        let camera = Camera::new().with_position(Vec3::ZERO, Vec3::Y, Vec3::Y);
        assert!(camera.get_ray(0.3, 0.7).direction().is_finite());
    }

    #[test]
    fn test_translating_moves_both_points() {
        let mut camera = reference_camera();
        camera.apply_move(CameraMove::Forward, DEFAULT_MOVE_STEP);

        assert!((camera.look_from() - Vec3::new(4.0, 7.0, 2.9)).length() < 1e-6);
        assert!((camera.look_at() - Vec3::new(4.0, 0.0, -1.1)).length() < 1e-6);

        camera.apply_move(CameraMove::Rise, 1.0);
        assert!((camera.look_from().y - 8.0).abs() < 1e-6);
        assert!((camera.look_at().y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_look_moves_only_target() {
        let mut camera = reference_camera();
        let before = camera.look_from();
        camera.apply_move(CameraMove::LookLeft, 0.5);

        assert_eq!(camera.look_from(), before);
        assert!((camera.look_at() - Vec3::new(3.5, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_move_names_round_trip() {
        for mv in CameraMove::ALL {
            assert_eq!(mv.name().parse::<CameraMove>().unwrap(), mv);
        }
        assert_eq!(" Look-Back ".parse::<CameraMove>().unwrap(), CameraMove::LookBack);
        assert!(matches!(
            "jump".parse::<CameraMove>(),
            Err(RenderError::UnknownCameraMove(name)) if name == "jump"
        ));
    }
}
