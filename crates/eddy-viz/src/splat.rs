//! CPU point splatting.

use std::path::Path;

use crate::color::Rgb;
use crate::render::{PointRenderer, PointStyle, RenderError};

/// A CPU renderer that splats points into a pixel accumulator.
///
/// Points are projected orthographically onto the XY plane: world
/// [-extent, extent] maps to the viewport on both axes, y up. Each point
/// adds `opacity * color` to the pixels it covers, mirroring additive
/// blending; the accumulator is clamped at export.
#[derive(Debug, Clone)]
pub struct SplatRenderer {
    width: u32,
    height: u32,
    extent: f32,
    accum: Vec<[f32; 3]>,
}

impl SplatRenderer {
    /// Creates a renderer with the given viewport in pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            extent: 75.0,
            accum: vec![[0.0; 3]; (width * height) as usize],
        }
    }

    /// Sets the world half-extent mapped onto the viewport.
    pub fn with_extent(mut self, extent: f32) -> Self {
        self.extent = extent;
        self
    }

    /// Viewport dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The accumulated frame, row-major, one RGB triple per pixel.
    pub fn pixels(&self) -> &[[f32; 3]] {
        &self.accum
    }

    /// Reads the accumulated color at a pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        self.accum[(y * self.width + x) as usize]
    }

    fn clear(&mut self) {
        self.accum.fill([0.0; 3]);
    }

    fn splat(&mut self, px: i64, py: i64, radius: i64, color: Rgb, opacity: f32) {
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let x = px + dx;
                let y = py + dy;
                if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                    continue;
                }
                let pixel = &mut self.accum[(y as u32 * self.width + x as u32) as usize];
                pixel[0] += color.r * opacity;
                pixel[1] += color.g * opacity;
                pixel[2] += color.b * opacity;
            }
        }
    }
}

impl PointRenderer for SplatRenderer {
    fn draw(&mut self, positions: &[f32], style: &PointStyle) {
        self.clear();

        let pixels_per_unit = self.width as f32 / (2.0 * self.extent);
        // A size-0.1 point at the default viewport still covers one pixel
        let radius = ((style.size * pixels_per_unit).round() as i64).max(0);

        for p in positions.chunks_exact(3) {
            let sx = (p[0] / self.extent * 0.5 + 0.5) * self.width as f32;
            let sy = (-p[1] / self.extent * 0.5 + 0.5) * self.height as f32;
            self.splat(
                sx as i64,
                sy as i64,
                radius,
                style.color,
                style.opacity,
            );
        }
    }

    fn export_png(&self, path: &Path) -> Result<(), RenderError> {
        let mut img = image::RgbImage::new(self.width, self.height);
        for (i, pixel) in self.accum.iter().enumerate() {
            let x = i as u32 % self.width;
            let y = i as u32 / self.width;
            img.put_pixel(
                x,
                y,
                image::Rgb([
                    (pixel[0].clamp(0.0, 1.0) * 255.0) as u8,
                    (pixel[1].clamp(0.0, 1.0) * 255.0) as u8,
                    (pixel[2].clamp(0.0, 1.0) * 255.0) as u8,
                ]),
            );
        }
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> PointStyle {
        PointStyle {
            color: Rgb::new(0.0, 1.0, 1.0),
            size: 0.1,
            opacity: 0.6,
        }
    }

    #[test]
    fn test_origin_lands_in_viewport_center() {
        let mut renderer = SplatRenderer::new(64, 64).with_extent(10.0);
        renderer.draw(&[0.0, 0.0, 0.0], &style());

        let center = renderer.pixel(32, 32);
        assert!(center[1] > 0.0);
        assert!(center[2] > 0.0);
        assert_eq!(center[0], 0.0);
        assert_eq!(renderer.pixel(0, 0), [0.0; 3]);
    }

    #[test]
    fn test_positive_y_is_up() {
        let mut renderer = SplatRenderer::new(64, 64).with_extent(10.0);
        renderer.draw(&[0.0, 5.0, 0.0], &style());

        let (sum_top, sum_bottom): (f32, f32) = {
            let top: f32 = (0..32)
                .flat_map(|y| (0..64).map(move |x| (x, y)))
                .map(|(x, y)| renderer.pixel(x, y)[1])
                .sum();
            let bottom: f32 = (32..64)
                .flat_map(|y| (0..64).map(move |x| (x, y)))
                .map(|(x, y)| renderer.pixel(x, y)[1])
                .sum();
            (top, bottom)
        };
        assert!(sum_top > 0.0);
        assert_eq!(sum_bottom, 0.0);
    }

    #[test]
    fn test_overlapping_points_accumulate() {
        let mut renderer = SplatRenderer::new(64, 64).with_extent(10.0);
        let one_point = [0.0, 0.0, 0.0];
        let two_points = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0];

        renderer.draw(&one_point, &style());
        let single = renderer.pixel(32, 32)[1];

        renderer.draw(&two_points, &style());
        let double = renderer.pixel(32, 32)[1];

        assert!((double - 2.0 * single).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_view_points_are_clipped() {
        let mut renderer = SplatRenderer::new(64, 64).with_extent(10.0);
        renderer.draw(&[1000.0, -1000.0, 0.0], &style());
        assert!(renderer.pixels().iter().all(|p| *p == [0.0; 3]));
    }

    #[test]
    fn test_draw_clears_previous_frame() {
        let mut renderer = SplatRenderer::new(64, 64).with_extent(10.0);
        renderer.draw(&[0.0, 0.0, 0.0], &style());
        renderer.draw(&[5.0, 5.0, 0.0], &style());
        assert_eq!(renderer.pixel(32, 32), [0.0; 3]);
    }

    #[test]
    fn test_draw_is_deterministic() {
        let positions = [1.0, 2.0, 3.0, -4.0, 0.5, 0.0];
        let mut a = SplatRenderer::new(32, 32);
        let mut b = SplatRenderer::new(32, 32);
        a.draw(&positions, &style());
        b.draw(&positions, &style());
        assert_eq!(a.pixels(), b.pixels());
    }
}
