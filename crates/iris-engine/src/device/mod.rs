//! GPU device + surface management.
//!
//! This module is responsible for:
//! - acquiring the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the window Surface, or running without one
//! - acquiring frames and mapping surface errors to loop actions
//!
//! Device loss and surface invalidation are reported upward; the render core
//! never retries.

mod adapter;
mod gpu;
mod headless;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use headless::HeadlessGpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
