//! The rendering collaborator contract.

use std::path::Path;

use thiserror::Error;

use crate::color::Rgb;

/// Per-frame point appearance, sampled from external UI state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    /// Particle color.
    pub color: Rgb,
    /// Point size in world units.
    pub size: f32,
    /// Additive blend weight per splatted point.
    pub opacity: f32,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            color: Rgb::from_hex(0x00FFFF),
            size: 0.1,
            opacity: 0.6,
        }
    }
}

/// Rendering failure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// PNG encode or write failure.
    #[error("image export: {0}")]
    Export(#[from] image::ImageError),
}

/// A renderer that turns the flat particle buffer into a visual frame.
///
/// This is the contract eddy assumes of its 3D collaborator: it consumes
/// the position buffer plus a color and point size each frame, and can
/// encode the current frame as a still image.
pub trait PointRenderer {
    /// Draws one frame from the flat positions (3 floats per point).
    fn draw(&mut self, positions: &[f32], style: &PointStyle);

    /// Encodes the most recently drawn frame as a PNG.
    fn export_png(&self, path: &Path) -> Result<(), RenderError>;
}
