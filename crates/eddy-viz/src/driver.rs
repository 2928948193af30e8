//! Cooperative frame-loop driver.

use eddy_field::{FieldSource, Mode};
use eddy_sim::{AxisToggles, SimError, Simulation};

use crate::render::{PointRenderer, PointStyle};

/// External inputs sampled once per frame.
///
/// The stepper and renderer never consult ambient state; whatever UI layer
/// exists hands the current toggle and style values to [`Viewer::frame`]
/// through this struct.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Per-axis integration switches.
    pub axes: AxisToggles,
    /// Point color and size.
    pub style: PointStyle,
}

/// Owns the simulation and a renderer, and runs the frame loop.
///
/// Single-threaded and cooperative: one `frame` call is one display
/// refresh. The buffer has exactly one writer (the simulation) and one
/// reader (the renderer), serialized by the loop itself.
pub struct Viewer<R> {
    sim: Simulation,
    renderer: R,
}

impl<R: PointRenderer> Viewer<R> {
    /// Creates a viewer over a simulation and a renderer.
    pub fn new(sim: Simulation, renderer: R) -> Self {
        Self { sim, renderer }
    }

    /// Runs one frame: step the simulation, then draw the buffer.
    pub fn frame(&mut self, input: &FrameInput) -> Result<(), SimError> {
        self.sim.step(input.axes)?;
        self.renderer.draw(self.sim.positions(), &input.style);
        Ok(())
    }

    /// Runs `frames` frames, sampling inputs anew for each.
    pub fn run(
        &mut self,
        frames: u64,
        mut input: impl FnMut(u64) -> FrameInput,
    ) -> Result<(), SimError> {
        for frame in 0..frames {
            self.frame(&input(frame))?;
        }
        Ok(())
    }

    /// Replaces the field from new formula text.
    ///
    /// A rejected formula is reported to the user and swallowed; the prior
    /// field and mode stay active. This is the only error class that
    /// reaches the user at runtime.
    pub fn recompile(&mut self, source: &FieldSource) -> Option<Mode> {
        match self.sim.recompile(source) {
            Ok(mode) => Some(mode),
            Err(e) => {
                eprintln!("formula error: {e}");
                None
            }
        }
    }

    /// Loads a named preset, reporting failures like [`Viewer::recompile`].
    pub fn load_preset(&mut self, name: &str) -> Option<Mode> {
        match self.sim.load_preset(name) {
            Ok(mode) => Some(mode),
            Err(e) => {
                eprintln!("formula error: {e}");
                None
            }
        }
    }

    /// The simulation.
    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    /// Mutable access to the simulation.
    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splat::SplatRenderer;
    use eddy_expr_std::std_registry;
    use eddy_sim::SimConfig;

    fn viewer() -> Viewer<SplatRenderer> {
        let config = SimConfig {
            particle_count: 64,
            ..Default::default()
        };
        let sim = Simulation::new(config, std_registry()).unwrap().with_seed(7);
        Viewer::new(sim, SplatRenderer::new(32, 32).with_extent(10.0))
    }

    #[test]
    fn test_frame_steps_and_draws() {
        let mut v = viewer();
        v.frame(&FrameInput::default()).unwrap();

        assert_eq!(v.sim().clock().frame, 1);
        // Particles start in [-5, 5), well inside the 10-unit extent
        assert!(v.renderer().pixels().iter().any(|p| p[1] > 0.0));
    }

    #[test]
    fn test_run_samples_inputs_per_frame() {
        let mut v = viewer();
        let mut sampled = 0;
        v.run(5, |_| {
            sampled += 1;
            FrameInput::default()
        })
        .unwrap();
        assert_eq!(sampled, 5);
        assert_eq!(v.sim().clock().frame, 5);
    }

    #[test]
    fn test_rejected_recompile_keeps_previous_field() {
        let mut v = viewer();
        let before = v.sim().field().source().clone();

        let bad = FieldSource::new("10 * (y - x", "y", "z");
        assert_eq!(v.recompile(&bad), None);
        assert_eq!(v.sim().field().source(), &before);

        // The loop keeps running on the old field
        v.frame(&FrameInput::default()).unwrap();
    }

    #[test]
    fn test_preset_switch_changes_mode() {
        let mut v = viewer();
        assert_eq!(v.load_preset("sphere"), Some(Mode::Surface));
        assert_eq!(v.sim().mode(), Mode::Surface);
        assert_eq!(v.load_preset("missing"), None);
        assert_eq!(v.sim().mode(), Mode::Surface);
    }
}
