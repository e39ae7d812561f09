//! Iris engine crate.
//!
//! Owns the GPU runtime pieces and the image rendering core: procedural quad
//! geometry, the uniform layout shared with the shaders, and the two-pass draw
//! protocol (background, then one camera-transformed textured quad).

pub mod device;
pub mod window;
pub mod core;

pub mod camera;
pub mod logging;
pub mod paint;
pub mod render;
