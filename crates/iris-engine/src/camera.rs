//! 2D pan/zoom camera.
//!
//! The render core only consumes [`Camera::view_projection`]; how pan and zoom
//! are driven (mouse, keys, CLI flags) is up to the host. One camera is passed
//! explicitly into each render call, so several cameras can coexist.
//!
//! World space: +X right, +Y up, one unit = half the viewport height at zoom 1.

use glam::{Mat4, Vec2, Vec3};

pub const MIN_ZOOM: f32 = 0.05;
pub const MAX_ZOOM: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World-space point shown at the viewport center.
    pub position: Vec2,
    pub zoom: f32,
    /// Viewport width / height.
    pub aspect_ratio: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            aspect_ratio: 1.0,
        }
    }

    /// Matrix that leaves positions untouched (no pan, zoom or aspect fix).
    pub fn identity_matrix() -> Mat4 {
        Mat4::IDENTITY
    }

    /// Updates the aspect ratio from a viewport size in pixels.
    ///
    /// A zero width or height (minimized window) leaves the previous aspect in place.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if height > 0 && width > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Orthographic projection of the view; maps world space to clip space.
    pub fn view_projection(&self) -> Mat4 {
        let projection =
            Mat4::orthographic_rh(-self.aspect_ratio, self.aspect_ratio, -1.0, 1.0, -1.0, 1.0);

        let view = Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0))
            * Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0));

        projection * view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
