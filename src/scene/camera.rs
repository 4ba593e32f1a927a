//! Viewing geometry: the fixed perspective camera and the accumulated
//! free rotation applied to the whole scene.

use glam::{Mat3, Vec3};

/// Radians of scene rotation per pointer pixel.
pub const ROTATE_SENSITIVITY: f64 = 0.01;

/// Free two-axis rotation, accumulated without bound or wraparound;
/// only the rendered orientation matters, not the numeric value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    /// Folds a pointer delta into the rotation. Horizontal movement spins
    /// about the vertical axis, vertical movement tilts.
    pub fn apply_delta(&mut self, dx: f64, dy: f64) {
        self.yaw += (dx * ROTATE_SENSITIVITY) as f32;
        self.pitch += (dy * ROTATE_SENSITIVITY) as f32;
    }

    pub fn rotation(&self) -> Mat3 {
        Mat3::from_rotation_x(self.pitch) * Mat3::from_rotation_y(self.yaw)
    }
}

/// Perspective camera on the +Z axis looking at the origin. The scene
/// rotates; the camera never moves.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub distance: f32,
    pub fov_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            distance: 10.0,
            fov_y: 45f32.to_radians(),
        }
    }
}

impl Camera {
    /// World point -> view space (camera at origin, looking down -Z).
    pub fn to_view(&self, orientation: &Orientation, p: Vec3) -> Vec3 {
        let mut v = orientation.rotation() * p;
        v.z -= self.distance;
        v
    }

    /// View point -> (screen x, screen y, pixels per world unit at that
    /// depth). `None` for points at or behind the eye.
    pub fn project(&self, v: Vec3, width: f64, height: f64) -> Option<(f64, f64, f64)> {
        if v.z >= -0.1 {
            return None;
        }
        let f = 1.0 / (self.fov_y * 0.5).tan();
        let aspect = (width / height.max(1.0)) as f32;
        let ndc_x = f / aspect * v.x / -v.z;
        let ndc_y = f * v.y / -v.z;
        let sx = (ndc_x as f64 * 0.5 + 0.5) * width;
        let sy = (0.5 - ndc_y as f64 * 0.5) * height;
        let scale = (f / -v.z) as f64 * height * 0.5;
        Some((sx, sy, scale))
    }

    /// Casts a ray through a canvas pixel, expressed in scene (pre-rotation)
    /// coordinates so it can be intersected directly against entities.
    pub fn ray(
        &self,
        orientation: &Orientation,
        px: f64,
        py: f64,
        width: f64,
        height: f64,
    ) -> (Vec3, Vec3) {
        let nx = (2.0 * px / width.max(1.0) - 1.0) as f32;
        let ny = (1.0 - 2.0 * py / height.max(1.0)) as f32;
        let t = (self.fov_y * 0.5).tan();
        let aspect = (width / height.max(1.0)) as f32;
        let dir_view = Vec3::new(nx * t * aspect, ny * t, -1.0).normalize();
        let inv = orientation.rotation().transpose();
        let origin = inv * Vec3::new(0.0, 0.0, self.distance);
        (origin, (inv * dir_view).normalize())
    }
}
