//! Flat particle position storage.

use glam::Vec3;

use crate::rng::SimRng;

/// A fixed-length buffer of 3D particle positions.
///
/// Positions are stored as a flat sequence of 3N floats; particle `i`
/// occupies slots `[3i, 3i+1, 3i+2]`. The buffer is created once and
/// mutated in place every frame; it is never resized.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffer {
    data: Vec<f32>,
    count: usize,
}

impl ParticleBuffer {
    /// Creates a zeroed buffer for `count` particles.
    pub fn new(count: usize) -> Self {
        Self {
            data: vec![0.0; count * 3],
            count,
        }
    }

    /// Number of particles.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The flat position data, 3 floats per particle.
    pub fn positions(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the flat position data.
    pub fn positions_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Reads particle `i` as a point.
    pub fn point(&self, i: usize) -> Vec3 {
        let idx = i * 3;
        Vec3::new(self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Writes particle `i` from a point.
    pub fn set_point(&mut self, i: usize, p: Vec3) {
        let idx = i * 3;
        self.data[idx] = p.x;
        self.data[idx + 1] = p.y;
        self.data[idx + 2] = p.z;
    }

    /// Fills every coordinate with a uniform random value in
    /// [-span/2, span/2).
    pub fn randomize(&mut self, rng: &mut SimRng, span: f32) {
        for slot in &mut self.data {
            *slot = rng.centered(span);
        }
    }
}
