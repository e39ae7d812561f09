use crate::camera::Camera;

use super::{
    create_sampler, BackgroundConfig, BackgroundPass, ConfigError, ImageBinding, ImagePass,
    ImagePassConfig, ImageScale, ImageTexture, RenderCtx, RenderTarget, SamplerConfig, Uniforms,
};

/// Runs the per-frame draw protocol for one image:
/// camera -> uniforms -> background pass -> image pass.
///
/// Without a bound image only the background is drawn.
pub struct ImageViewRenderer {
    background: BackgroundPass,
    image: ImagePass,
    sampler_config: SamplerConfig,
    sampler: Option<wgpu::Sampler>,
    binding: Option<ImageBinding>,
}

impl ImageViewRenderer {
    pub fn new(background: BackgroundConfig, image: ImagePassConfig, sampler: SamplerConfig) -> Self {
        Self {
            background: BackgroundPass::new(background),
            image: ImagePass::new(image),
            sampler_config: sampler,
            sampler: None,
            binding: None,
        }
    }

    pub fn background_mut(&mut self) -> &mut BackgroundPass {
        &mut self.background
    }

    /// Binds an uploaded image with its aspect-preserving scale.
    pub fn set_image(&mut self, device: &wgpu::Device, texture: &ImageTexture) -> Result<(), ConfigError> {
        let scale = texture.image_scale()?;
        let sampler = self
            .sampler
            .get_or_insert_with(|| create_sampler(device, &self.sampler_config));

        self.binding = Some(self.image.bind(device, texture.texture(), sampler, scale)?);
        let (w, h) = texture.size();
        log::info!("bound {w}x{h} image, scale {:?}", scale.to_array());
        Ok(())
    }

    /// Binds a host-owned texture and sampler with an explicit scale.
    pub fn set_texture(
        &mut self,
        device: &wgpu::Device,
        texture: &wgpu::Texture,
        sampler: &wgpu::Sampler,
        scale: ImageScale,
    ) -> Result<(), ConfigError> {
        self.binding = Some(self.image.bind(device, texture, sampler, scale)?);
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.binding = None;
    }

    pub fn has_image(&self) -> bool {
        self.binding.is_some()
    }

    /// Uniforms the next frame would upload for `camera`.
    pub fn uniforms(&self, camera: &Camera) -> Option<Uniforms> {
        self.binding
            .as_ref()
            .map(|b| Uniforms::new(camera.view_projection(), b.image_scale()))
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, camera: &Camera) {
        let uniforms = self.uniforms(camera);

        self.background.render(ctx, target);

        if let (Some(binding), Some(uniforms)) = (self.binding.as_ref(), uniforms) {
            self.image.render(ctx, target, &uniforms, binding);
        }
    }
}

impl Default for ImageViewRenderer {
    fn default() -> Self {
        Self::new(
            BackgroundConfig::default(),
            ImagePassConfig::default(),
            SamplerConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{GpuInit, HeadlessGpu};
    use crate::paint::Color;
    use crate::render::{OffscreenTarget, UNIFORM_BUFFER_USAGE};
    use ::image::{Rgba, RgbaImage};

    const BG: u8 = 13; // 0.051 * 255 on a UNORM target

    /// Hardware adapter first, then the software fallback (e.g. llvmpipe/WARP).
    fn headless() -> Option<HeadlessGpu> {
        let fallback = GpuInit {
            force_fallback_adapter: true,
            ..GpuInit::default()
        };

        let gpu = HeadlessGpu::new_blocking(GpuInit::default())
            .or_else(|_| HeadlessGpu::new_blocking(fallback));
        match gpu {
            Ok(gpu) => {
                let info = gpu.adapter_info();
                eprintln!("GPU test on {} ({:?})", info.name, info.backend);
                Some(gpu)
            }
            Err(e) => {
                eprintln!("skipping GPU test, no adapter: {e:#}");
                None
            }
        }
    }

    fn draw(gpu: &HeadlessGpu, renderer: &mut ImageViewRenderer, camera: &Camera, size: u32) -> RgbaImage {
        draw_as(gpu, renderer, camera, size, OffscreenTarget::DEFAULT_FORMAT)
    }

    fn draw_as(
        gpu: &HeadlessGpu,
        renderer: &mut ImageViewRenderer,
        camera: &Camera,
        size: u32,
        format: wgpu::TextureFormat,
    ) -> RgbaImage {
        let target = OffscreenTarget::new(gpu.device(), size, size, format).expect("offscreen target");

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("test") });
        {
            let ctx = target.render_ctx(gpu.device(), gpu.queue());
            let mut rt = RenderTarget::new(&mut encoder, target.view());
            renderer.render(&ctx, &mut rt, camera);
        }
        gpu.queue().submit(std::iter::once(encoder.finish()));

        target.read_pixels(gpu.device(), gpu.queue()).expect("readback")
    }

    fn near(a: u8, b: u8) -> bool {
        a.abs_diff(b) <= 1
    }

    #[test]
    fn uniforms_require_a_bound_image() {
        assert!(ImageViewRenderer::default().uniforms(&Camera::new()).is_none());
    }

    #[test]
    fn background_fills_every_pixel() {
        let Some(gpu) = headless() else { return };
        let mut renderer = ImageViewRenderer::default();

        let pixels = draw(&gpu, &mut renderer, &Camera::new(), 32);
        for px in pixels.pixels() {
            assert!(near(px[0], BG) && near(px[1], BG) && near(px[2], BG), "{px:?}");
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn backdrop_bytes_match_on_srgb_targets() {
        let Some(gpu) = headless() else { return };
        let mut renderer = ImageViewRenderer::default();

        let pixels = draw_as(&gpu, &mut renderer, &Camera::new(), 16, wgpu::TextureFormat::Rgba8UnormSrgb);
        let px = pixels.get_pixel(8, 8);
        assert!(near(px[0], BG) && near(px[1], BG) && near(px[2], BG), "{px:?}");

        renderer
            .background_mut()
            .set_color(Color::from_hex("#202020").unwrap());
        let pixels = draw_as(&gpu, &mut renderer, &Camera::new(), 16, wgpu::TextureFormat::Rgba8UnormSrgb);
        assert!(near(pixels.get_pixel(3, 3)[0], 0x20));
    }

    #[test]
    fn host_uniform_buffer_is_validated() {
        let Some(gpu) = headless() else { return };
        let buffer = |size, usage| {
            gpu.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("host uniforms"),
                size,
                usage,
                mapped_at_creation: false,
            })
        };

        let short = ImagePass::with_uniform_buffer(ImagePassConfig::default(), buffer(64, UNIFORM_BUFFER_USAGE));
        assert!(matches!(
            short,
            Err(ConfigError::UniformSizeMismatch { expected: 80, actual: 64 })
        ));

        let read_only = ImagePass::with_uniform_buffer(
            ImagePassConfig::default(),
            buffer(80, wgpu::BufferUsages::UNIFORM),
        );
        assert!(matches!(read_only, Err(ConfigError::MissingUniformUsage(_))));

        let ok = ImagePass::with_uniform_buffer(ImagePassConfig::default(), buffer(80, UNIFORM_BUFFER_USAGE));
        assert!(ok.is_ok());
    }

    #[test]
    fn background_color_is_configurable() {
        let Some(gpu) = headless() else { return };
        let mut renderer = ImageViewRenderer::default();
        renderer.background_mut().set_color(Color::rgb(1.0, 0.0, 0.0));

        let pixels = draw(&gpu, &mut renderer, &Camera::new(), 16);
        assert_eq!(pixels.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(pixels.get_pixel(15, 15).0, [255, 0, 0, 255]);
    }

    #[test]
    fn wide_image_keeps_its_aspect() {
        let Some(gpu) = headless() else { return };
        let red = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        let texture = ImageTexture::from_rgba8(gpu.device(), gpu.queue(), &red).unwrap();

        let mut renderer = ImageViewRenderer::default();
        renderer.set_image(gpu.device(), &texture).unwrap();

        // Scale (1, 0.5): the quad spans x in [-0.5, 0.5], y in [-0.25, 0.25].
        let pixels = draw(&gpu, &mut renderer, &Camera::new(), 64);
        assert_eq!(pixels.get_pixel(32, 32).0, [255, 0, 0, 255]);
        assert_eq!(pixels.get_pixel(18, 32).0, [255, 0, 0, 255]);
        assert!(near(pixels.get_pixel(32, 20)[0], BG), "above the quad");
        assert!(near(pixels.get_pixel(10, 32)[0], BG), "left of the quad");
    }

    #[test]
    fn top_left_texel_lands_top_left() {
        let Some(gpu) = headless() else { return };
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let texture = ImageTexture::from_rgba8(gpu.device(), gpu.queue(), &img).unwrap();

        let mut renderer = ImageViewRenderer::new(
            BackgroundConfig::default(),
            ImagePassConfig::default(),
            SamplerConfig::nearest(),
        );
        renderer.set_image(gpu.device(), &texture).unwrap();

        // Quad covers pixels 16..48 on a 64x64 target.
        let pixels = draw(&gpu, &mut renderer, &Camera::new(), 64);
        assert_eq!(pixels.get_pixel(20, 20).0, [255, 0, 0, 255]);
        assert_eq!(pixels.get_pixel(44, 20).0, [0, 255, 0, 255]);
        assert_eq!(pixels.get_pixel(20, 44).0, [0, 0, 255, 255]);
        assert_eq!(pixels.get_pixel(44, 44).0, [255, 255, 255, 255]);
    }

    #[test]
    fn placeholder_binds() {
        let Some(gpu) = headless() else { return };
        let texture = ImageTexture::placeholder(gpu.device(), gpu.queue());
        let mut renderer = ImageViewRenderer::default();
        renderer.set_image(gpu.device(), &texture).unwrap();
        assert!(renderer.has_image());

        let u = renderer.uniforms(&Camera::new()).unwrap();
        assert_eq!(u.image_scale, [1.0, 1.0]);

        renderer.clear_image();
        assert!(!renderer.has_image());
    }

    #[test]
    fn unusable_texture_is_rejected_before_drawing() {
        let Some(gpu) = headless() else { return };
        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("not sampleable"),
            size: wgpu::Extent3d {
                width: 2,
                height: 2,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let sampler = create_sampler(gpu.device(), &SamplerConfig::default());

        let mut renderer = ImageViewRenderer::default();
        let err = renderer
            .set_texture(gpu.device(), &texture, &sampler, ImageScale::UNIT)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingTextureBinding(_)));
        assert!(!renderer.has_image());
    }
}
