use anyhow::{Context, Result};
use ::image::RgbaImage;

use super::{ConfigError, RenderCtx};

/// Render target that can be read back to the CPU.
///
/// Rows of the readback buffer are padded to `COPY_BYTES_PER_ROW_ALIGNMENT`;
/// [`read_pixels`](Self::read_pixels) strips the padding again.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    readback: wgpu::Buffer,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
}

impl OffscreenTarget {
    pub const DEFAULT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Only 8-bit RGBA/BGRA formats are accepted so readback maps 1:1 to `RgbaImage`.
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyImage { width, height });
        }
        if !is_readable_format(format) {
            return Err(ConfigError::UnsupportedTextureFormat(format));
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("iris offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_bytes_per_row = padded_bytes_per_row(width);
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("iris offscreen readback"),
            size: u64::from(padded_bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Ok(Self {
            texture,
            view,
            readback,
            format,
            width,
            height,
            padded_bytes_per_row,
        })
    }

    /// Recreates the target at a new size. Returns `false` when nothing changed.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> Result<bool, ConfigError> {
        if (width, height) == (self.width, self.height) {
            return Ok(false);
        }
        *self = Self::new(device, width, height, self.format)?;
        Ok(true)
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn padded_bytes_per_row(&self) -> u32 {
        self.padded_bytes_per_row
    }

    pub fn render_ctx<'a>(&self, device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> RenderCtx<'a> {
        RenderCtx::new(device, queue, self.format, (self.width, self.height))
    }

    /// Copies the target into the readback buffer and waits for it.
    ///
    /// Blocks until the GPU has finished all submitted work.
    pub fn read_pixels(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<RgbaImage> {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("iris readback encoder"),
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = self.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("failed to poll device during readback")?;
        rx.recv()
            .context("readback callback was dropped")?
            .context("failed to map readback buffer")?;

        let pixels = {
            let mapped = slice.get_mapped_range();
            unpad_rows(&mapped, self.width, self.height, self.padded_bytes_per_row)
        };
        self.readback.unmap();

        let mut pixels = pixels;
        if matches!(
            self.format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        ) {
            for px in pixels.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }

        RgbaImage::from_raw(self.width, self.height, pixels)
            .context("readback size does not match target dimensions")
    }
}

fn is_readable_format(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Rgba8Unorm
            | wgpu::TextureFormat::Rgba8UnormSrgb
            | wgpu::TextureFormat::Bgra8Unorm
            | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

fn unpad_rows(data: &[u8], width: u32, height: u32, padded_bytes_per_row: u32) -> Vec<u8> {
    let row_bytes = (width * 4) as usize;
    let mut out = Vec::with_capacity(row_bytes * height as usize);
    for row in data.chunks(padded_bytes_per_row as usize).take(height as usize) {
        out.extend_from_slice(&row[..row_bytes]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_pad_to_256() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1200), 4864);
    }

    #[test]
    fn unpad_strips_row_tails() {
        let mut data = vec![0u8; 256 * 2];
        data[..4].copy_from_slice(&[1, 2, 3, 4]);
        data[256..260].copy_from_slice(&[5, 6, 7, 8]);
        assert_eq!(unpad_rows(&data, 1, 2, 256), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn readable_formats() {
        assert!(is_readable_format(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert!(!is_readable_format(wgpu::TextureFormat::Rgba16Float));
    }
}
