//! Builtin and user-loadable formula presets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vector_field::FieldSource;

/// A named bundle of axis formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Preset name used for lookup.
    pub name: String,
    /// The three axis formulas.
    #[serde(flatten)]
    pub source: FieldSource,
}

impl Preset {
    /// Creates a named preset.
    pub fn new(name: impl Into<String>, source: FieldSource) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

/// Error loading or saving a preset library.
#[derive(Debug, Error)]
pub enum PresetError {
    /// Malformed preset JSON.
    #[error("preset json: {0}")]
    Json(#[from] serde_json::Error),
}

/// An ordered collection of presets, searchable by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetLibrary {
    presets: Vec<Preset>,
}

impl Default for PresetLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetLibrary {
    /// Creates an empty library.
    pub fn empty() -> Self {
        Self {
            presets: Vec::new(),
        }
    }

    /// The builtin preset set.
    pub fn builtin() -> Self {
        let presets = vec![
            Preset::new(
                "lorenz",
                FieldSource::new("10 * (y - x)", "x * (28 - z) - y", "x * y - (8/3) * z"),
            ),
            Preset::new(
                "torus",
                FieldSource::new(
                    "(5 + 2 * cos(v)) * cos(u)",
                    "(5 + 2 * cos(v)) * sin(u)",
                    "2 * sin(v)",
                ),
            ),
            Preset::new(
                "sphere",
                FieldSource::new("5 * sin(u) * cos(v)", "5 * sin(u) * sin(v)", "5 * cos(u)"),
            ),
            Preset::new(
                "tornado",
                FieldSource::new("-y + 0.1 * x", "x + 0.1 * y", "0.5 * sin(t)"),
            ),
            Preset::new(
                "spiral",
                FieldSource::new("sin(t + u) * v", "cos(t + u) * v", "v * 0.1"),
            ),
        ];
        Self { presets }
    }

    /// Looks up a preset by name.
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Adds a preset, replacing any existing one with the same name.
    pub fn insert(&mut self, preset: Preset) {
        if let Some(existing) = self.presets.iter_mut().find(|p| p.name == preset.name) {
            *existing = preset;
        } else {
            self.presets.push(preset);
        }
    }

    /// Returns the preset names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    /// Returns the presets in order.
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Loads a library from JSON.
    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the library to pretty JSON.
    pub fn to_json(&self) -> Result<String, PresetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_field::{Mode, VectorField};
    use eddy_expr_std::std_registry;

    #[test]
    fn test_builtin_names() {
        let lib = PresetLibrary::builtin();
        let names: Vec<&str> = lib.names().collect();
        assert_eq!(names, vec!["lorenz", "torus", "sphere", "tornado", "spiral"]);
    }

    #[test]
    fn test_builtins_all_compile() {
        let lib = PresetLibrary::builtin();
        for preset in lib.presets() {
            VectorField::compile(&preset.source, std_registry())
                .unwrap_or_else(|e| panic!("{}: {e}", preset.name));
        }
    }

    #[test]
    fn test_builtin_modes() {
        let lib = PresetLibrary::builtin();
        let mode = |name: &str| Mode::detect(&lib.get(name).unwrap().source);
        assert_eq!(mode("lorenz"), Mode::Flow);
        assert_eq!(mode("tornado"), Mode::Flow);
        assert_eq!(mode("torus"), Mode::Surface);
        assert_eq!(mode("sphere"), Mode::Surface);
        assert_eq!(mode("spiral"), Mode::Surface);
    }

    #[test]
    fn test_insert_replaces_by_name() {
        let mut lib = PresetLibrary::empty();
        lib.insert(Preset::new("wave", FieldSource::new("y", "-x", "0")));
        lib.insert(Preset::new("wave", FieldSource::new("y", "-x", "1")));
        assert_eq!(lib.presets().len(), 1);
        assert_eq!(lib.get("wave").unwrap().source.z, "1");
    }

    #[test]
    fn test_json_roundtrip() {
        let lib = PresetLibrary::builtin();
        let json = lib.to_json().unwrap();
        let loaded = PresetLibrary::from_json(&json).unwrap();
        assert_eq!(loaded, lib);
    }

    #[test]
    fn test_json_shape_is_flat() {
        let lib = PresetLibrary::builtin();
        let json = lib.to_json().unwrap();
        // Each preset serializes as {name, x, y, z} with no nesting
        assert!(json.contains("\"name\": \"lorenz\""));
        assert!(json.contains("\"x\": \"10 * (y - x)\""));
    }

    #[test]
    fn test_user_library_from_json() {
        let json = r#"{"presets": [
            {"name": "drift", "x": "sin(t)", "y": "cos(t)", "z": "0"}
        ]}"#;
        let lib = PresetLibrary::from_json(json).unwrap();
        let preset = lib.get("drift").unwrap();
        assert_eq!(Mode::detect(&preset.source), Mode::Flow);
    }
}
