//! GPU rendering subsystem.
//!
//! One frame is two passes on the same command encoder:
//! 1. [`BackgroundPass`] clears and covers the target with a constant color
//!    using one oversized triangle.
//! 2. [`ImagePass`] draws the unit quad scaled by the image aspect and
//!    transformed by the camera, sampling the bound texture.
//!
//! Neither pass consumes vertex buffers; positions and UVs come from the
//! constant tables in [`geometry`], indexed by `vertex_index` in the shaders.
//! All configuration errors surface as [`ConfigError`] before the first frame.

mod background;
mod common;
mod ctx;
mod error;
mod frame;
mod image;
mod offscreen;
mod scale;
mod shaders;
mod texture;
mod uniforms;

pub mod geometry;

pub use background::{BackgroundConfig, BackgroundPass};
pub use ctx::{RenderCtx, RenderTarget};
pub use error::ConfigError;
pub use frame::ImageViewRenderer;
pub use self::image::{ImageBinding, ImagePass, ImagePassConfig};
pub use offscreen::OffscreenTarget;
pub use scale::ImageScale;
pub use texture::{create_sampler, validate_texture, ImageTexture, SamplerConfig};
pub use uniforms::{validate_uniform_buffer, Uniforms, UNIFORMS_SIZE, UNIFORM_BUFFER_USAGE};
