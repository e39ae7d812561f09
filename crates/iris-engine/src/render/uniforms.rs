use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use super::{ConfigError, ImageScale};

/// Uniform block read by the image vertex shader (binding 0).
///
/// Layout: `mat4x4<f32>` (64 bytes, column-major) + `vec2<f32>` (8 bytes),
/// padded to 80 bytes because a WGSL uniform struct is sized to a multiple of
/// its 16-byte alignment.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub image_scale: [f32; 2],
    pub _pad: [f32; 2],
}

/// Size in bytes of [`Uniforms`] as seen by the GPU.
pub const UNIFORMS_SIZE: u64 = std::mem::size_of::<Uniforms>() as u64;

const _: () = assert!(UNIFORMS_SIZE == 80);
const _: () = assert!(UNIFORMS_SIZE % 16 == 0);

pub(crate) const UNIFORMS_MIN_BINDING_SIZE: NonZeroU64 = match NonZeroU64::new(UNIFORMS_SIZE) {
    Some(size) => size,
    None => panic!("Uniforms must not be zero-sized"),
};

impl Uniforms {
    pub fn new(view_proj: Mat4, image_scale: ImageScale) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            image_scale: image_scale.to_array(),
            _pad: [0.0; 2],
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }

    /// CPU mirror of the image vertex stage:
    /// `view_proj * vec4(local * image_scale, 0, 1)`.
    pub fn clip_position(&self, local: [f32; 2]) -> Vec4 {
        let scaled = [local[0] * self.image_scale[0], local[1] * self.image_scale[1]];
        self.view_proj() * Vec4::new(scaled[0], scaled[1], 0.0, 1.0)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Usage a buffer needs to back binding 0: the pass rewrites it every frame
/// through `Queue::write_buffer`.
pub const UNIFORM_BUFFER_USAGE: wgpu::BufferUsages =
    wgpu::BufferUsages::UNIFORM.union(wgpu::BufferUsages::COPY_DST);

/// Checks that a host-provided buffer can back binding 0.
pub fn validate_uniform_buffer(buffer: &wgpu::Buffer) -> Result<(), ConfigError> {
    check_uniform_buffer(buffer.size(), buffer.usage())
}

fn check_uniform_buffer(size: u64, usage: wgpu::BufferUsages) -> Result<(), ConfigError> {
    if !usage.contains(UNIFORM_BUFFER_USAGE) {
        return Err(ConfigError::MissingUniformUsage(usage));
    }
    if size < UNIFORMS_SIZE {
        return Err(ConfigError::UniformSizeMismatch {
            expected: UNIFORMS_SIZE,
            actual: size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::geometry::QUAD_VERTICES;

    fn scale(x: f32, y: f32) -> ImageScale {
        ImageScale::new(x, y).unwrap()
    }

    #[test]
    fn layout_is_80_bytes_with_trailing_pad() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 80);
        assert_eq!(std::mem::offset_of!(Uniforms, view_proj), 0);
        assert_eq!(std::mem::offset_of!(Uniforms, image_scale), 64);
        assert_eq!(std::mem::offset_of!(Uniforms, _pad), 72);
        assert_eq!(UNIFORMS_MIN_BINDING_SIZE.get(), 80);
    }

    #[test]
    fn matrix_is_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(2.0, 3.0, 0.0));
        let u = Uniforms::new(m, ImageScale::UNIT);
        // Translation lives in the fourth column.
        assert_eq!(u.view_proj[3], [2.0, 3.0, 0.0, 1.0]);

        let floats: &[f32] = bytemuck::cast_slice(u.as_bytes());
        assert_eq!(&floats[12..16], &[2.0, 3.0, 0.0, 1.0]);
        assert_eq!(&floats[18..20], &[0.0, 0.0]);
    }

    #[test]
    fn identity_transform_passes_positions_through() {
        let u = Uniforms::new(Mat4::IDENTITY, ImageScale::UNIT);
        for v in QUAD_VERTICES {
            let clip = u.clip_position(v.position);
            assert_eq!(clip, Vec4::new(v.position[0], v.position[1], 0.0, 1.0));
        }
    }

    fn extent(u: &Uniforms) -> (f32, f32) {
        let xs: Vec<f32> = QUAD_VERTICES.iter().map(|v| u.clip_position(v.position).x).collect();
        let ys: Vec<f32> = QUAD_VERTICES.iter().map(|v| u.clip_position(v.position).y).collect();
        let span = |s: &[f32]| {
            s.iter().copied().fold(f32::MIN, f32::max) - s.iter().copied().fold(f32::MAX, f32::min)
        };
        (span(&xs), span(&ys))
    }

    #[test]
    fn aspect_scale_doubles_width_only() {
        let u = Uniforms::new(Mat4::IDENTITY, scale(2.0, 1.0));
        let (w, h) = extent(&u);
        assert_eq!(w, 2.0);
        assert_eq!(h, 1.0);

        // UVs are untouched by the scale: corners keep their texels.
        let top_left = u.clip_position([-0.5, 0.5]);
        assert_eq!((top_left.x, top_left.y), (-1.0, 0.5));
        assert_eq!(QUAD_VERTICES[0].uv, [0.0, 0.0]);
    }

    #[test]
    fn four_by_three_scenario() {
        // 800x600 viewport, identity camera, 4:3 source.
        let u = Uniforms::new(Mat4::IDENTITY, scale(1.333, 1.0));
        let (w, h) = extent(&u);
        assert!((w / h - 1.333).abs() < 1e-6);

        // With an aspect-correcting camera the quad is 1.333:1 on screen too.
        let mut cam = crate::camera::Camera::new();
        cam.set_viewport_size(800, 600);
        let u = Uniforms::new(cam.view_projection(), scale(1.333, 1.0));
        let (w_ndc, h_ndc) = extent(&u);
        let (w_px, h_px) = (w_ndc * 400.0, h_ndc * 300.0);
        assert!((w_px / h_px - 1.333).abs() < 1e-4);
    }

    #[test]
    fn uniform_buffer_of_exact_size_is_accepted() {
        assert_eq!(check_uniform_buffer(80, UNIFORM_BUFFER_USAGE), Ok(()));
        assert_eq!(check_uniform_buffer(256, UNIFORM_BUFFER_USAGE), Ok(()));
    }

    #[test]
    fn short_uniform_buffer_is_rejected() {
        assert_eq!(
            check_uniform_buffer(79, UNIFORM_BUFFER_USAGE),
            Err(ConfigError::UniformSizeMismatch {
                expected: 80,
                actual: 79
            })
        );
        assert_eq!(
            check_uniform_buffer(64, UNIFORM_BUFFER_USAGE),
            Err(ConfigError::UniformSizeMismatch {
                expected: 80,
                actual: 64
            })
        );
    }

    #[test]
    fn uniform_buffer_usage_is_checked() {
        let storage = wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST;
        assert_eq!(
            check_uniform_buffer(80, storage),
            Err(ConfigError::MissingUniformUsage(storage))
        );

        // Not writable from the queue.
        let read_only = wgpu::BufferUsages::UNIFORM;
        assert_eq!(
            check_uniform_buffer(80, read_only),
            Err(ConfigError::MissingUniformUsage(read_only))
        );
    }
}
