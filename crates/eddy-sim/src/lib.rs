//! Simulation stepper for eddy.
//!
//! Owns the flat particle buffer and, each frame, either integrates every
//! particle through the current formula field (flow mode) or resamples a
//! fixed parametric grid from it (surface mode). Mode transitions happen
//! only on successful recompilation; a failed recompile leaves the previous
//! field, mode, and buffer untouched.
//!
//! # Example
//!
//! ```ignore
//! use eddy_expr_std::std_registry;
//! use eddy_sim::{AxisToggles, SimConfig, Simulation};
//!
//! let mut sim = Simulation::new(SimConfig::default(), std_registry())?;
//! for _ in 0..600 {
//!     sim.step(AxisToggles::default())?;
//! }
//! let positions = sim.positions();
//! ```

mod buffer;
mod config;
mod rng;

pub use buffer::ParticleBuffer;
pub use config::SimConfig;
pub use rng::SimRng;

use eddy_expr::{EvalError, FunctionRegistry, Scope};
use eddy_field::{
    Axis, Clock, FieldError, FieldSource, Mode, PresetLibrary, VectorField,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the preset every simulation starts on.
pub const INITIAL_PRESET: &str = "lorenz";

/// Per-axis activity switches for flow integration.
///
/// Externally controlled and read once per step; an inactive axis is left
/// unmodified for that frame (its formula is not even evaluated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisToggles {
    /// Apply the x-component delta.
    pub x: bool,
    /// Apply the y-component delta.
    pub y: bool,
    /// Apply the z-component delta.
    pub z: bool,
}

impl Default for AxisToggles {
    fn default() -> Self {
        Self {
            x: true,
            y: true,
            z: true,
        }
    }
}

/// Errors surfaced by the simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// A preset name with no library entry.
    #[error("unknown preset: '{0}'")]
    UnknownPreset(String),

    /// A recompile was rejected; the previous field stays active.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A formula failed to evaluate mid-frame.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// The particle simulation: buffer, field, clock, and mode state machine.
pub struct Simulation {
    config: SimConfig,
    buffer: ParticleBuffer,
    field: VectorField,
    clock: Clock,
    rng: SimRng,
    registry: FunctionRegistry,
    presets: PresetLibrary,
}

impl Simulation {
    /// Creates a simulation on the initial preset with a randomized buffer.
    pub fn new(config: SimConfig, registry: FunctionRegistry) -> Result<Self, SimError> {
        let presets = PresetLibrary::builtin();
        let initial = presets
            .get(INITIAL_PRESET)
            .ok_or_else(|| SimError::UnknownPreset(INITIAL_PRESET.to_string()))?;
        let field = VectorField::compile(&initial.source, registry.clone())?;

        let mut rng = SimRng::default();
        let mut buffer = ParticleBuffer::new(config.particle_count);
        buffer.randomize(&mut rng, config.spawn_span);

        Ok(Self {
            config,
            buffer,
            field,
            clock: Clock::new().with_step(config.clock_step),
            rng,
            registry,
            presets,
        })
    }

    /// Re-seeds the RNG and re-randomizes the buffer from it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SimRng::new(seed);
        self.buffer
            .randomize(&mut self.rng, self.config.spawn_span);
        self
    }

    /// Replaces the field from new formula text.
    ///
    /// All-or-nothing: on any parse or probe failure the previous field,
    /// mode, and buffer remain exactly as they were and the error carries
    /// the user-facing formula message. On success the field is swapped
    /// wholesale and the buffer is re-seeded for the new mode - randomized
    /// for flow, fully resampled for surface.
    pub fn recompile(&mut self, source: &FieldSource) -> Result<Mode, SimError> {
        let field = VectorField::compile(source, self.registry.clone())?;
        self.field = field;

        let mode = self.field.mode();
        match mode {
            Mode::Flow => self.randomize_particles(),
            Mode::Surface => self.resample_surface()?,
        }
        Ok(mode)
    }

    /// Recompiles from a named preset in the library.
    pub fn load_preset(&mut self, name: &str) -> Result<Mode, SimError> {
        let source = self
            .presets
            .get(name)
            .ok_or_else(|| SimError::UnknownPreset(name.to_string()))?
            .source
            .clone();
        self.recompile(&source)
    }

    /// Advances the simulation by one frame.
    ///
    /// The clock ticks first, then the current mode runs: flow integrates
    /// every particle in place, surface resamples the grid so formulas
    /// using `t` animate. Evaluation cannot fail for a field that passed
    /// its compile probe.
    pub fn step(&mut self, axes: AxisToggles) -> Result<(), SimError> {
        self.clock.advance();
        match self.field.mode() {
            Mode::Flow => self.integrate_flow(axes),
            Mode::Surface => self.resample_surface(),
        }
    }

    /// One forward-Euler step over every particle.
    ///
    /// Each particle's scope is built from its position before any axis is
    /// applied, so axis updates within a frame do not feed each other.
    /// After the update, a particle whose |x| exceeds the bound gets its x
    /// re-seeded from the narrower respawn span; y and z are not guarded.
    fn integrate_flow(&mut self, axes: AxisToggles) -> Result<(), SimError> {
        let dt = self.config.dt;
        let x_bound = self.config.x_bound;
        let respawn_span = self.config.respawn_span;
        let t = self.clock.time;

        let Self {
            buffer, field, rng, ..
        } = self;

        for p in buffer.positions_mut().chunks_exact_mut(3) {
            let vars = [("x", p[0]), ("y", p[1]), ("z", p[2]), ("t", t)];
            let scope = Scope::new(&vars);

            if axes.x {
                p[0] += field.eval_axis(Axis::X, scope)? * dt;
            }
            if axes.y {
                p[1] += field.eval_axis(Axis::Y, scope)? * dt;
            }
            if axes.z {
                p[2] += field.eval_axis(Axis::Z, scope)? * dt;
            }

            if p[0].abs() > x_bound {
                p[0] = rng.centered(respawn_span);
            }
        }
        Ok(())
    }

    /// Samples the parametric grid into the front of the buffer.
    ///
    /// res = floor(sqrt(N)); u and v sweep [0, 2pi) in res steps, i outer
    /// and j inner, writing slot i*res + j. Slots beyond res*res keep
    /// their previous values.
    fn resample_surface(&mut self) -> Result<(), SimError> {
        let res = self.config.surface_resolution();
        let scale = self.config.surface_scale;
        let t = self.clock.time;

        let Self { buffer, field, .. } = self;
        let data = buffer.positions_mut();

        let mut slot = 0;
        for i in 0..res {
            let u = (i as f32 / res as f32) * std::f32::consts::TAU;
            for j in 0..res {
                let v = (j as f32 / res as f32) * std::f32::consts::TAU;
                let vars = [("u", u), ("v", v), ("t", t)];
                let sample = field.eval(Scope::new(&vars))?;

                data[slot] = sample.x * scale;
                data[slot + 1] = sample.y * scale;
                data[slot + 2] = sample.z * scale;
                slot += 3;
            }
        }
        Ok(())
    }

    /// Refills the whole buffer with uniform random positions.
    pub fn randomize_particles(&mut self) {
        let Self {
            buffer, rng, config, ..
        } = self;
        buffer.randomize(rng, config.spawn_span);
    }

    /// The flat particle positions, 3 floats per particle.
    pub fn positions(&self) -> &[f32] {
        self.buffer.positions()
    }

    /// The particle buffer.
    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    /// Mutable access to the particle buffer.
    pub fn buffer_mut(&mut self) -> &mut ParticleBuffer {
        &mut self.buffer
    }

    /// The current mode (a pure function of the active field's text).
    pub fn mode(&self) -> Mode {
        self.field.mode()
    }

    /// The active field.
    pub fn field(&self) -> &VectorField {
        &self.field
    }

    /// The simulated clock.
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// The simulation parameters.
    pub fn config(&self) -> SimConfig {
        self.config
    }

    /// The preset library.
    pub fn presets(&self) -> &PresetLibrary {
        &self.presets
    }

    /// Mutable access to the preset library.
    pub fn presets_mut(&mut self) -> &mut PresetLibrary {
        &mut self.presets
    }
}
