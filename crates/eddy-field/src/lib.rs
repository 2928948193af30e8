//! Formula-compiled vector fields for eddy.
//!
//! This crate turns three user-entered formula strings (one per output
//! axis) into a [`VectorField`]: an atomically-replaceable bundle of
//! compiled expressions plus the [`Mode`] derived from their text. It also
//! provides the [`Clock`] that drives the `t` variable and the builtin
//! [`PresetLibrary`].

mod clock;
mod presets;
mod vector_field;

pub use clock::Clock;
pub use presets::{Preset, PresetError, PresetLibrary};
pub use vector_field::{Axis, FieldError, FieldSource, Mode, VectorField};
