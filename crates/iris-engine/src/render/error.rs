use thiserror::Error;

/// Setup-time configuration errors.
///
/// A pipeline/binding is either valid or not: these are returned before the
/// first frame and are never retried. Draw calls themselves cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("image scale must be finite and > 0 on both axes, got ({x}, {y})")]
    InvalidImageScale { x: f32, y: f32 },

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("image is {width}x{height}, device allows at most {max} per side")]
    TextureTooLarge { width: u32, height: u32, max: u32 },

    #[error("texture must be two-dimensional, got {0:?}")]
    NotTwoDimensional(wgpu::TextureDimension),

    #[error("texture must have exactly one array layer, got {0}")]
    LayeredTexture(u32),

    #[error("texture must be single-sampled, got {0} samples")]
    MultisampledTexture(u32),

    #[error("texture format {0:?} cannot be sampled with a filtering sampler")]
    UnsupportedTextureFormat(wgpu::TextureFormat),

    #[error("texture is missing TEXTURE_BINDING usage (has {0:?})")]
    MissingTextureBinding(wgpu::TextureUsages),

    #[error("uniform buffer is {actual} bytes, layout needs {expected}")]
    UniformSizeMismatch { expected: u64, actual: u64 },

    #[error("uniform buffer needs UNIFORM | COPY_DST usage (has {0:?})")]
    MissingUniformUsage(wgpu::BufferUsages),
}
