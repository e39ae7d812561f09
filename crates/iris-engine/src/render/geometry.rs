//! Constant vertex tables for both passes.
//!
//! The shaders index these by `vertex_index`; the WGSL arrays are generated
//! from the tables below, so there is one ordering to keep stable. Positions
//! and UVs are paired per vertex: reordering one without the other changes
//! which corner of the quad gets which texel.
//!
//! Conventions: local/NDC space is +Y up; UV origin is the image's top-left.

/// One entry of the quad table.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadVertex {
    /// Local position on the unit quad centered at the origin.
    pub position: [f32; 2],
    /// Texture coordinate, `[0, 1]` on both axes.
    pub uv: [f32; 2],
}

impl QuadVertex {
    const fn new(position: [f32; 2], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }
}

/// Half-extent of the unit quad on each axis.
pub const QUAD_HALF_EXTENT: f32 = 0.5;

/// Number of vertices submitted for the image quad (two triangles, no index buffer).
pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Unit quad as two counter-clockwise triangles.
pub const QUAD_VERTICES: [QuadVertex; QUAD_VERTEX_COUNT as usize] = [
    QuadVertex::new([-0.5, 0.5], [0.0, 0.0]),
    QuadVertex::new([-0.5, -0.5], [0.0, 1.0]),
    QuadVertex::new([0.5, 0.5], [1.0, 0.0]),
    QuadVertex::new([0.5, 0.5], [1.0, 0.0]),
    QuadVertex::new([-0.5, -0.5], [0.0, 1.0]),
    QuadVertex::new([0.5, -0.5], [1.0, 1.0]),
];

/// Number of vertices submitted for the background.
pub const BACKGROUND_VERTEX_COUNT: u32 = 3;

/// Oversized triangle in NDC whose interior contains `[-1, 1] x [-1, 1]`.
///
/// Anchored at the bottom-left corner; the other two vertices reach 3.0 on
/// one axis so the hypotenuse passes through the top-right corner `(1, 1)`.
pub const BACKGROUND_TRIANGLE: [[f32; 2]; BACKGROUND_VERTEX_COUNT as usize] =
    [[-1.0, -1.0], [3.0, -1.0], [-1.0, 3.0]];

/// Returns the quad vertex for `index`, mirroring the vertex shader lookup.
#[inline]
pub fn quad_vertex(index: u32) -> Option<QuadVertex> {
    QUAD_VERTICES.get(index as usize).copied()
}

/// Axis-aligned bounds `(min, max)` of the quad positions.
pub fn quad_bounds() -> ([f32; 2], [f32; 2]) {
    QUAD_VERTICES.iter().fold(
        ([f32::INFINITY; 2], [f32::NEG_INFINITY; 2]),
        |(min, max), v| {
            (
                [min[0].min(v.position[0]), min[1].min(v.position[1])],
                [max[0].max(v.position[0]), max[1].max(v.position[1])],
            )
        },
    )
}

/// Twice the signed area of a triangle; positive when counter-clockwise (+Y up).
pub fn signed_area2(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}
