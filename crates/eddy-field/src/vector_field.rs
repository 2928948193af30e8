//! Compiled three-component vector fields.

use eddy_expr::{EvalError, Expr, FunctionRegistry, ParseError, Scope};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One output axis of a vector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All three axes in component order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Raw formula text for the three output axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSource {
    /// Formula for the x component.
    pub x: String,
    /// Formula for the y component.
    pub y: String,
    /// Formula for the z component.
    pub z: String,
}

impl FieldSource {
    /// Creates a source from the three per-axis formulas.
    pub fn new(
        x: impl Into<String>,
        y: impl Into<String>,
        z: impl Into<String>,
    ) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// Returns the formula text for one axis.
    pub fn axis(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    fn concat_lower(&self) -> String {
        let mut all = String::with_capacity(self.x.len() + self.y.len() + self.z.len());
        all.push_str(&self.x);
        all.push_str(&self.y);
        all.push_str(&self.z);
        all.to_lowercase()
    }
}

/// Simulation mode, a pure function of the formula text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Particles are advected through an (x, y, z, t) field each frame.
    Flow,
    /// A fixed grid is sampled from a (u, v, t) field.
    Surface,
}

impl Mode {
    /// Derives the mode from formula text.
    ///
    /// Purely textual: any `u` or `v` anywhere in the lower-cased
    /// concatenation of the three formulas selects [`Mode::Surface`].
    /// Identifiers that merely contain those letters (`blue`, a `tau()`
    /// call) false-positive; this imprecision is part of the contract.
    pub fn detect(source: &FieldSource) -> Mode {
        let all = source.concat_lower();
        if all.contains('u') || all.contains('v') {
            Mode::Surface
        } else {
            Mode::Flow
        }
    }

    /// The variable names a scope of this mode binds.
    pub fn scope_names(self) -> &'static [&'static str] {
        match self {
            Mode::Flow => &["x", "y", "z", "t"],
            Mode::Surface => &["u", "v", "t"],
        }
    }
}

/// Formula error reported to the user when a recompile is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// One axis failed to parse.
    #[error("{axis} formula: {source}")]
    Parse {
        /// The offending axis.
        axis: Axis,
        /// The parser diagnostic.
        source: ParseError,
    },

    /// One axis parsed but failed its probe evaluation.
    #[error("{axis} formula: {source}")]
    Probe {
        /// The offending axis.
        axis: Axis,
        /// The evaluation diagnostic.
        source: EvalError,
    },
}

/// Three compiled scalar expressions forming one vector-valued field.
///
/// A `VectorField` is immutable once built: compilation either yields a
/// complete replacement value or an error, so swapping fields is atomic by
/// construction and no frame can observe a half-updated field.
#[derive(Clone)]
pub struct VectorField {
    exprs: [Expr; 3],
    registry: FunctionRegistry,
    mode: Mode,
    source: FieldSource,
}

impl VectorField {
    /// Compiles the three axis formulas into a field.
    ///
    /// All-or-nothing: each formula is parsed, the mode is derived from the
    /// text, and each compiled expression is probe-evaluated once against
    /// the zero scope of that mode so unbound variables and unknown
    /// functions surface here rather than mid-frame.
    pub fn compile(
        source: &FieldSource,
        registry: FunctionRegistry,
    ) -> Result<Self, FieldError> {
        let mode = Mode::detect(source);

        let parse = |axis: Axis| {
            Expr::parse(source.axis(axis)).map_err(|e| FieldError::Parse { axis, source: e })
        };
        let exprs = [parse(Axis::X)?, parse(Axis::Y)?, parse(Axis::Z)?];

        let probe_vars: Vec<(&str, f32)> =
            mode.scope_names().iter().map(|n| (*n, 0.0)).collect();
        let probe = Scope::new(&probe_vars);
        for (axis, expr) in Axis::ALL.into_iter().zip(&exprs) {
            expr.eval(probe, &registry)
                .map_err(|e| FieldError::Probe { axis, source: e })?;
        }

        Ok(Self {
            exprs,
            registry,
            mode,
            source: source.clone(),
        })
    }

    /// The mode derived from this field's source text.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The formula text this field was compiled from.
    pub fn source(&self) -> &FieldSource {
        &self.source
    }

    /// Evaluates one component against the given scope.
    pub fn eval_axis(&self, axis: Axis, scope: Scope<'_>) -> Result<f32, EvalError> {
        let expr = match axis {
            Axis::X => &self.exprs[0],
            Axis::Y => &self.exprs[1],
            Axis::Z => &self.exprs[2],
        };
        expr.eval(scope, &self.registry)
    }

    /// Evaluates all three components against the given scope.
    ///
    /// Any single component failure invalidates the whole sample.
    pub fn eval(&self, scope: Scope<'_>) -> Result<Vec3, EvalError> {
        Ok(Vec3::new(
            self.eval_axis(Axis::X, scope)?,
            self.eval_axis(Axis::Y, scope)?,
            self.eval_axis(Axis::Z, scope)?,
        ))
    }
}

impl std::fmt::Debug for VectorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorField")
            .field("mode", &self.mode)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
