//! Iris - minimal GPU image viewer.
//!
//! Opens one window and draws a single image over a flat background through
//! the iris-engine render core.
//!
//! # Usage
//!
//! ```bash
//! iris photo.png
//! iris photo.png --zoom 2 --pan-x -0.25
//! iris photo.png --background '#202020' --nearest
//! ```
//!
//! # Keyboard Shortcuts
//!
//! - Right / Space: Next image in the directory
//! - Left: Previous image
//! - R: Rotate clockwise
//! - Shift+R: Rotate counter-clockwise
//! - ESC: Quit

mod gallery;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use image::DynamicImage;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use iris_engine::camera::Camera;
use iris_engine::core::{App, AppControl, FrameCtx};
use iris_engine::device::GpuInit;
use iris_engine::logging::{init_logging, LoggingConfig};
use iris_engine::paint::Color;
use iris_engine::render::{
    BackgroundConfig, ConfigError, ImagePassConfig, ImageTexture, ImageViewRenderer, SamplerConfig,
};
use iris_engine::window::{Runtime, RuntimeConfig};

use gallery::{Gallery, Rotation};

#[derive(Parser, Debug)]
#[command(name = "iris")]
#[command(author, version, about = "Iris - minimal GPU image viewer")]
struct Args {
    /// Image file to display (png, jpeg, bmp, gif, tiff, webp)
    path: PathBuf,

    /// Camera zoom (clamped to 0.05..=32)
    #[arg(long, default_value = "1.0")]
    zoom: f32,

    /// Horizontal camera position in world units
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pan_x: f32,

    /// Vertical camera position in world units
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pan_y: f32,

    /// Background color as #rrggbb or #rrggbbaa
    #[arg(long, value_parser = parse_color)]
    background: Option<Color>,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "1200")]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "800")]
    height: u32,

    /// Sample with nearest filtering instead of linear
    #[arg(long)]
    nearest: bool,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::from_hex(s).ok_or_else(|| format!("invalid color '{s}', expected #rrggbb or #rrggbbaa"))
}

impl Args {
    fn camera(&self) -> Camera {
        let mut camera = Camera::new();
        camera.set_zoom(self.zoom);
        camera.position = Vec2::new(self.pan_x, self.pan_y);
        camera
    }

    fn renderer(&self) -> ImageViewRenderer {
        let background = BackgroundConfig {
            color: self.background.unwrap_or(Color::BACKGROUND),
        };
        let sampler = if self.nearest {
            SamplerConfig::nearest()
        } else {
            SamplerConfig::default()
        };
        ImageViewRenderer::new(background, ImagePassConfig::default(), sampler)
    }
}

/// What a key press does.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Action {
    Exit,
    Next,
    Prev,
    RotateCw,
    RotateCcw,
}

fn key_action(code: KeyCode, shift: bool) -> Option<Action> {
    match code {
        KeyCode::Escape => Some(Action::Exit),
        KeyCode::ArrowRight | KeyCode::Space => Some(Action::Next),
        KeyCode::ArrowLeft => Some(Action::Prev),
        KeyCode::KeyR if shift => Some(Action::RotateCcw),
        KeyCode::KeyR => Some(Action::RotateCw),
        _ => None,
    }
}

/// Viewer state. Images are decoded on the event thread and uploaded on the
/// next frame, once a device exists.
struct Viewer {
    camera: Camera,
    renderer: ImageViewRenderer,
    gallery: Gallery,
    pending: Option<DynamicImage>,
    texture: Option<ImageTexture>,
    shift: bool,
    title_dirty: bool,
    error: Option<anyhow::Error>,
}

impl Viewer {
    fn new(args: &Args, gallery: Gallery, image: DynamicImage) -> Self {
        Self {
            camera: args.camera(),
            renderer: args.renderer(),
            gallery,
            pending: Some(image),
            texture: None,
            shift: false,
            title_dirty: true,
            error: None,
        }
    }

    fn title(&self) -> String {
        let name = self
            .gallery
            .current()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let rotation = self.gallery.rotation();
        let mut title = format!("iris - {name} ({}/{})", self.gallery.position(), self.gallery.len());
        if rotation != Rotation::None {
            title.push_str(&format!(" {}\u{b0}", rotation.degrees()));
        }
        title
    }

    /// Applies a navigation/rotation key and decodes the resulting file.
    fn apply(&mut self, action: Action) -> AppControl {
        match action {
            Action::Exit => return AppControl::Exit,
            Action::Next => {
                self.gallery.next();
            }
            Action::Prev => {
                self.gallery.prev();
            }
            Action::RotateCw => {
                self.gallery.rotate_cw();
            }
            Action::RotateCcw => {
                self.gallery.rotate_ccw();
            }
        }

        let Some(path) = self.gallery.current() else {
            return AppControl::Continue;
        };
        match gallery::load(path, self.gallery.rotation()) {
            Ok(image) => {
                self.pending = Some(image);
                self.title_dirty = true;
                AppControl::Redraw
            }
            Err(e) => {
                log::warn!("{e:#}");
                AppControl::Continue
            }
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> AppControl {
        if !self.renderer.has_image() {
            let placeholder = ImageTexture::placeholder(device, queue);
            if let Err(e) = self.renderer.set_image(device, &placeholder) {
                return self.upload_failed(e);
            }
        }

        let Some(image) = self.pending.take() else {
            return AppControl::Continue;
        };

        let bound = ImageTexture::from_dynamic(device, queue, &image)
            .and_then(|tex| self.renderer.set_image(device, &tex).map(|()| tex));

        match bound {
            Ok(tex) => {
                self.texture = Some(tex);
                AppControl::Continue
            }
            Err(e) => self.upload_failed(e),
        }
    }

    /// The first image is fatal; later ones keep the previous image on screen.
    fn upload_failed(&mut self, err: ConfigError) -> AppControl {
        if self.texture.is_some() {
            log::error!("cannot display image: {err}");
            return AppControl::Continue;
        }
        self.error = Some(anyhow::Error::new(err).context("cannot display image"));
        AppControl::Exit
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
                AppControl::Continue
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return AppControl::Continue;
                };
                match key_action(code, self.shift) {
                    Some(action) => self.apply(action),
                    None => AppControl::Continue,
                }
            }
            _ => AppControl::Continue,
        }
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        self.camera.set_viewport_size(size.width, size.height);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let needs_upload = self.pending.is_some() || !self.renderer.has_image();
        if needs_upload && self.upload(ctx.gpu.device(), ctx.gpu.queue()) == AppControl::Exit {
            return AppControl::Exit;
        }

        if self.title_dirty {
            ctx.window.set_title(&self.title());
            self.title_dirty = false;
        }

        let (w, h) = ctx.window.physical_size();
        self.camera.set_viewport_size(w, h);

        let (camera, renderer) = (&self.camera, &mut self.renderer);
        ctx.render(|rctx, target| {
            renderer.render(rctx, target, camera);
            AppControl::Continue
        })
    }

    fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let image = gallery::load(&args.path, Rotation::None)?;
    log::info!(
        "decoded {} ({}x{}, {:?})",
        args.path.display(),
        image.width(),
        image.height(),
        image.color()
    );

    let gallery = Gallery::open(&args.path).unwrap_or_else(|e| {
        log::warn!("browsing disabled: {e:#}");
        Gallery::from_files(Vec::new(), &args.path)
    });

    let config = RuntimeConfig {
        title: "iris".to_string(),
        initial_size: LogicalSize::new(f64::from(args.width), f64::from(args.height)),
    };

    let viewer = Viewer::new(&args, gallery, image);
    Runtime::run(config, GpuInit::default(), viewer)
}
