//! Simulation tuning parameters.

use serde::{Deserialize, Serialize};

/// Fixed-at-startup simulation parameters.
///
/// Defaults are the values the visualizer ships with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of particles; fixes the buffer size for the process lifetime.
    pub particle_count: usize,
    /// Forward-Euler integration step for flow mode.
    pub dt: f32,
    /// Simulated-time increment per frame.
    pub clock_step: f32,
    /// Flow-mode divergence bound on |x|. Only x is guarded.
    pub x_bound: f32,
    /// Span of the initial randomize: coordinates in [-span/2, span/2).
    pub spawn_span: f32,
    /// Span used when the divergence guard re-seeds a particle's x.
    pub respawn_span: f32,
    /// Display multiplier applied to surface-mode samples.
    pub surface_scale: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: 20_000,
            dt: 0.005,
            clock_step: 0.01,
            x_bound: 100.0,
            spawn_span: 10.0,
            respawn_span: 5.0,
            surface_scale: 10.0,
        }
    }
}

impl SimConfig {
    /// Surface-mode grid resolution: floor(sqrt(N)).
    ///
    /// When `particle_count` is not a perfect square, the res*res grid
    /// covers only a prefix of the buffer.
    pub fn surface_resolution(&self) -> usize {
        (self.particle_count as f32).sqrt().floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SimConfig::default();
        assert_eq!(config.particle_count, 20_000);
        assert_eq!(config.dt, 0.005);
        assert_eq!(config.clock_step, 0.01);
        assert_eq!(config.x_bound, 100.0);
        assert_eq!(config.surface_scale, 10.0);
    }

    #[test]
    fn test_surface_resolution_floors() {
        let config = SimConfig {
            particle_count: 20_000,
            ..Default::default()
        };
        assert_eq!(config.surface_resolution(), 141);

        let config = SimConfig {
            particle_count: 9,
            ..Default::default()
        };
        assert_eq!(config.surface_resolution(), 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"particle_count": 500}"#).unwrap();
        assert_eq!(config.particle_count, 500);
        assert_eq!(config.dt, 0.005);
    }
}
