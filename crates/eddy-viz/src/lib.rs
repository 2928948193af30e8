//! Rendering seam and frame-loop driver for eddy.
//!
//! The simulation core never draws; it exposes a flat position buffer. This
//! crate defines the [`PointRenderer`] contract that buffer is handed to,
//! a CPU [`SplatRenderer`] implementation with PNG export, and the
//! [`Viewer`] driver that runs the cooperative frame loop, sampling
//! external inputs ([`FrameInput`]) once per frame.

mod color;
mod driver;
mod render;
mod splat;

pub use color::{ColorError, Rgb};
pub use driver::{FrameInput, Viewer};
pub use render::{PointRenderer, PointStyle, RenderError};
pub use splat::SplatRenderer;
