//! Color values shared by the render passes and host configuration.

mod color;

pub use color::Color;
