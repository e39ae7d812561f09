use ::image::{DynamicImage, RgbaImage};

use super::{ConfigError, ImageScale};

/// Sampler settings for the image pass. Filtering is the sampler's concern,
/// not the shader's.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplerConfig {
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub address_mode: wgpu::AddressMode,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            address_mode: wgpu::AddressMode::ClampToEdge,
        }
    }
}

impl SamplerConfig {
    /// Nearest-neighbour sampling, for pixel-exact zoom.
    pub fn nearest() -> Self {
        Self {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Self::default()
        }
    }
}

pub fn create_sampler(device: &wgpu::Device, config: &SamplerConfig) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("iris image sampler"),
        address_mode_u: config.address_mode,
        address_mode_v: config.address_mode,
        address_mode_w: config.address_mode,
        mag_filter: config.mag_filter,
        min_filter: config.min_filter,
        ..Default::default()
    })
}

/// Checks that `texture` can be bound at the image pass's texture slot.
pub fn validate_texture(texture: &wgpu::Texture) -> Result<(), ConfigError> {
    check_texture(
        texture.dimension(),
        texture.format(),
        texture.usage(),
        texture.size(),
        texture.sample_count(),
    )
}

fn check_texture(
    dimension: wgpu::TextureDimension,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
    size: wgpu::Extent3d,
    sample_count: u32,
) -> Result<(), ConfigError> {
    if dimension != wgpu::TextureDimension::D2 {
        return Err(ConfigError::NotTwoDimensional(dimension));
    }
    // The slot is `texture_2d<f32>`: a default view of a layered texture is
    // `D2Array` and of a multisampled one is multisampled.
    if size.depth_or_array_layers != 1 {
        return Err(ConfigError::LayeredTexture(size.depth_or_array_layers));
    }
    if sample_count != 1 {
        return Err(ConfigError::MultisampledTexture(sample_count));
    }
    if size.width == 0 || size.height == 0 {
        return Err(ConfigError::EmptyImage {
            width: size.width,
            height: size.height,
        });
    }
    if !usage.contains(wgpu::TextureUsages::TEXTURE_BINDING) {
        return Err(ConfigError::MissingTextureBinding(usage));
    }
    match format.sample_type(None, None) {
        Some(wgpu::TextureSampleType::Float { filterable: true }) => Ok(()),
        _ => Err(ConfigError::UnsupportedTextureFormat(format)),
    }
}

/// A decoded image uploaded as a sampled 2D texture (one mip level).
pub struct ImageTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl ImageTexture {
    /// Decoded bytes are sRGB-encoded; sampling returns linear values.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn from_dynamic(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DynamicImage,
    ) -> Result<Self, ConfigError> {
        Self::from_rgba8(device, queue, &image.to_rgba8())
    }

    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
    ) -> Result<Self, ConfigError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyImage { width, height });
        }

        let max = device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(ConfigError::TextureTooLarge { width, height, max });
        }

        let texture = Self::upload(device, queue, width, height, image.as_raw(), "iris image texture");
        log::info!("uploaded {width}x{height} image texture ({:?})", Self::FORMAT);
        Ok(texture)
    }

    /// 1x1 opaque white texture, for binding before any image is loaded.
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::upload(device, queue, 1, 1, &[255, 255, 255, 255], "iris placeholder texture")
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        rgba: &[u8],
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Aspect-preserving quad scale, longest side 1.0.
    pub fn image_scale(&self) -> Result<ImageScale, ConfigError> {
        ImageScale::fit(self.width, self.height)
    }
}
