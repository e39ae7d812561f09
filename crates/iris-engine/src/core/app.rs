use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    /// Continue and schedule another frame.
    Redraw,
    Exit,
}

/// Application contract implemented by viewers.
pub trait App {
    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called after window creation and whenever the drawable size changes.
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Error that made the app exit, returned from `Runtime::run` once the
    /// loop has stopped.
    fn take_error(&mut self) -> Option<anyhow::Error> {
        None
    }
}
