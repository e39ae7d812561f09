use super::common::{begin_pass, create_pipeline};
use super::geometry::QUAD_VERTEX_COUNT;
use super::shaders::{self, SAMPLER_BINDING, TEXTURE_BINDING, UNIFORMS_BINDING};
use super::uniforms::UNIFORMS_MIN_BINDING_SIZE;
use super::{
    validate_texture, validate_uniform_buffer, ConfigError, ImageScale, RenderCtx, RenderTarget, Uniforms,
    UNIFORMS_SIZE, UNIFORM_BUFFER_USAGE,
};

/// Pipeline policy of the image pass that is not part of the draw contract.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImagePassConfig {
    /// Color blending against the background. `None` writes texels as-is.
    pub blend: Option<wgpu::BlendState>,
}

impl Default for ImagePassConfig {
    fn default() -> Self {
        Self {
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        }
    }
}

/// A texture + sampler bound against the pass's uniform buffer.
///
/// Holds handles only; the texture and sampler stay owned by the caller and
/// may be shared with other bindings.
pub struct ImageBinding {
    bind_group: wgpu::BindGroup,
    image_scale: ImageScale,
    size: (u32, u32),
}

impl ImageBinding {
    pub fn image_scale(&self) -> ImageScale {
        self.image_scale
    }

    /// Source texture size in texels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// Draws the unit quad scaled by `image_scale`, transformed by `view_proj`,
/// sampling the bound texture.
///
/// Bindings (group 0): uniforms at 0, texture view at 1, sampler at 2.
///
/// The pass has one uniform buffer, rewritten by every [`render`](Self::render),
/// and assumes a single frame in flight. With more frames in flight the caller
/// must not reuse that memory for frame N+1 before the GPU has read frame N;
/// give each in-flight frame its own pass built with
/// [`with_uniform_buffer`](Self::with_uniform_buffer).
pub struct ImagePass {
    config: ImagePassConfig,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    uniform_buffer: Option<wgpu::Buffer>,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl ImagePass {
    pub fn new(config: ImagePassConfig) -> Self {
        Self {
            config,
            bind_group_layout: None,
            uniform_buffer: None,
            pipeline_format: None,
            pipeline: None,
        }
    }

    /// Uses a host-owned uniform buffer instead of allocating one.
    ///
    /// The buffer needs [`UNIFORM_BUFFER_USAGE`] and at least
    /// [`UNIFORMS_SIZE`] bytes.
    pub fn with_uniform_buffer(config: ImagePassConfig, buffer: wgpu::Buffer) -> Result<Self, ConfigError> {
        validate_uniform_buffer(&buffer)?;
        Ok(Self {
            uniform_buffer: Some(buffer),
            ..Self::new(config)
        })
    }

    pub fn config(&self) -> ImagePassConfig {
        self.config
    }

    /// Layout entries of bind group 0.
    pub fn bind_group_layout_entries() -> [wgpu::BindGroupLayoutEntry; 3] {
        [
            wgpu::BindGroupLayoutEntry {
                binding: UNIFORMS_BINDING,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(UNIFORMS_MIN_BINDING_SIZE),
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: TEXTURE_BINDING,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: SAMPLER_BINDING,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ]
    }

    /// Validates `texture` and builds the bind group for it.
    ///
    /// All binding errors surface here, before any frame is drawn.
    pub fn bind(
        &mut self,
        device: &wgpu::Device,
        texture: &wgpu::Texture,
        sampler: &wgpu::Sampler,
        image_scale: ImageScale,
    ) -> Result<ImageBinding, ConfigError> {
        validate_texture(texture)?;

        let layout = self
            .bind_group_layout
            .get_or_insert_with(|| create_bind_group_layout(device));
        let uniform_buffer = self
            .uniform_buffer
            .get_or_insert_with(|| create_uniform_buffer(device));

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("iris image view"),
            dimension: Some(wgpu::TextureViewDimension::D2),
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("iris image bind group"),
            layout: &*layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: UNIFORMS_BINDING,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let size = texture.size();
        Ok(ImageBinding {
            bind_group,
            image_scale,
            size: (size.width, size.height),
        })
    }

    /// Uploads `uniforms`, then records the six-vertex quad draw onto `target`.
    ///
    /// The target is loaded, not cleared: run the background pass first.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        uniforms: &Uniforms,
        binding: &ImageBinding,
    ) {
        self.ensure_pipeline(ctx);

        // Queue writes land before any command buffer submitted after them.
        let uniform_buffer = self
            .uniform_buffer
            .get_or_insert_with(|| create_uniform_buffer(ctx.device));
        ctx.queue.write_buffer(uniform_buffer, 0, uniforms.as_bytes());

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = begin_pass(target, "iris image pass", wgpu::LoadOp::Load);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &binding.bind_group, &[]);
        rpass.draw(0..QUAD_VERTEX_COUNT, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.target_format) && self.pipeline.is_some() {
            return;
        }
        let layout = self
            .bind_group_layout
            .get_or_insert_with(|| create_bind_group_layout(ctx.device));

        log::debug!("building image pipeline for {:?}", ctx.target_format);

        // The layout is kept across format changes so existing bindings stay valid.
        self.pipeline = Some(create_pipeline(
            ctx.device,
            "iris image pipeline",
            shaders::image_source(),
            &[&*layout],
            ctx.target_format,
            self.config.blend,
        ));
        self.pipeline_format = Some(ctx.target_format);
    }
}

fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("iris image bgl"),
        entries: &ImagePass::bind_group_layout_entries(),
    })
}

fn create_uniform_buffer(device: &wgpu::Device) -> wgpu::Buffer {
    log::debug!("creating image uniform buffer ({UNIFORMS_SIZE} bytes)");
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("iris image uniforms"),
        size: UNIFORMS_SIZE,
        usage: UNIFORM_BUFFER_USAGE,
        mapped_at_creation: false,
    })
}

impl Default for ImagePass {
    fn default() -> Self {
        Self::new(ImagePassConfig::default())
    }
}
