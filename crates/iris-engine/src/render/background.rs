use crate::paint::Color;

use super::common::{begin_pass, create_pipeline};
use super::geometry::BACKGROUND_VERTEX_COUNT;
use super::shaders;
use super::{RenderCtx, RenderTarget};

/// Themeable settings of the background pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BackgroundConfig {
    /// Fill color, default [`Color::BACKGROUND`] (0.051, 0.051, 0.051, 1.0).
    /// Channels are sRGB-encoded; the pass decodes them for sRGB targets.
    pub color: Color,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            color: Color::BACKGROUND,
        }
    }
}

/// Covers the whole target with a constant color.
///
/// Takes no uniforms or textures. The attachment is cleared to the same color
/// and then one oversized triangle is drawn, so the pass must run first: it has
/// no depth test and overwrites whatever the target held.
pub struct BackgroundPass {
    config: BackgroundConfig,
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl BackgroundPass {
    pub fn new(config: BackgroundConfig) -> Self {
        Self {
            config,
            pipeline_format: None,
            pipeline: None,
        }
    }

    pub fn config(&self) -> BackgroundConfig {
        self.config
    }

    /// Changes the fill color; the pipeline is rebuilt on the next render.
    pub fn set_color(&mut self, color: Color) {
        if color != self.config.color {
            self.config.color = color;
            self.pipeline = None;
        }
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.ensure_pipeline(ctx);
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let color = self.config.color.for_target(ctx.target_format);
        let mut rpass = begin_pass(target, "iris background pass", wgpu::LoadOp::Clear(color.to_wgpu()));
        rpass.set_pipeline(pipeline);
        rpass.draw(0..BACKGROUND_VERTEX_COUNT, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.target_format) && self.pipeline.is_some() {
            return;
        }

        log::debug!(
            "building background pipeline for {:?}, color {:?}",
            ctx.target_format,
            self.config.color
        );

        self.pipeline = Some(create_pipeline(
            ctx.device,
            "iris background pipeline",
            shaders::background_source(self.config.color.for_target(ctx.target_format)),
            &[],
            ctx.target_format,
            Some(wgpu::BlendState::REPLACE),
        ));
        self.pipeline_format = Some(ctx.target_format);
    }
}

impl Default for BackgroundPass {
    fn default() -> Self {
        Self::new(BackgroundConfig::default())
    }
}
