//! Per-pass configuration bundles.
//!
//! No ambient preference state: every entry point receives an explicit
//! context value. Contexts are immutable during a pass; a rule that needs
//! a different interpretation for a child derives a copy.

use calc_ast::ExprId;
use rustc_hash::FxHashMap;

/// Unit of trigonometric arguments. A half turn is π, 180 or 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Radian,
    Degree,
    Gradian,
}

impl AngleUnit {
    /// Rational half-turn value for exact-value tables (π itself is kept
    /// symbolic in radian mode).
    pub fn half_turn_divisor(self) -> i64 {
        match self {
            AngleUnit::Radian => 1,
            AngleUnit::Degree => 180,
            AngleUnit::Gradian => 200,
        }
    }

    /// Factor converting one unit of this kind into radians.
    pub fn radians_per_unit(self) -> f64 {
        match self {
            AngleUnit::Radian => 1.0,
            AngleUnit::Degree => std::f64::consts::PI / 180.0,
            AngleUnit::Gradian => std::f64::consts::PI / 200.0,
        }
    }
}

/// How complex-valued results are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComplexPolicy {
    /// Results leaving the real line become the `Nonreal` sentinel.
    #[default]
    Real,
    /// Complex results are kept in cartesian form.
    Cartesian,
}

/// Which form a reduction aims for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Canonical form for further computation.
    #[default]
    System,
    /// Display form: canonical reduction followed by beautification.
    User,
}

/// Floating width used by the approximation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    Single,
    #[default]
    Double,
}

/// Collaborator capability: resolve a symbol or user-function name to a
/// bound expression already living in the caller's arena. Detecting
/// circular definitions is the implementor's responsibility, not the
/// engine's.
pub trait SymbolContext {
    fn resolve(&self, name: &str) -> Option<ExprId>;
}

/// Every name unbound.
pub struct NoSymbols;

impl SymbolContext for NoSymbols {
    fn resolve(&self, _name: &str) -> Option<ExprId> {
        None
    }
}

/// Name → expression map, for tests and embedding hosts.
#[derive(Default)]
pub struct Bindings {
    map: FxHashMap<String, ExprId>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, expr: ExprId) {
        self.map.insert(name.to_string(), expr);
    }
}

impl SymbolContext for Bindings {
    fn resolve(&self, name: &str) -> Option<ExprId> {
        self.map.get(name).copied()
    }
}

/// Configuration for one reduction pass.
#[derive(Clone, Copy)]
pub struct ReductionContext<'a> {
    pub angle_unit: AngleUnit,
    pub complex_policy: ComplexPolicy,
    pub target: Target,
    pub precision: Precision,
    pub symbols: &'a dyn SymbolContext,
}

impl<'a> ReductionContext<'a> {
    pub fn new(symbols: &'a dyn SymbolContext) -> Self {
        Self {
            angle_unit: AngleUnit::default(),
            complex_policy: ComplexPolicy::default(),
            target: Target::default(),
            precision: Precision::default(),
            symbols,
        }
    }

    pub fn with_angle_unit(mut self, angle_unit: AngleUnit) -> Self {
        self.angle_unit = angle_unit;
        self
    }

    pub fn with_complex_policy(mut self, policy: ComplexPolicy) -> Self {
        self.complex_policy = policy;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }
}

/// Configuration for one approximation pass.
#[derive(Clone, Copy)]
pub struct ApproxContext<'a> {
    pub angle_unit: AngleUnit,
    pub complex_policy: ComplexPolicy,
    pub precision: Precision,
    pub symbols: &'a dyn SymbolContext,
}

impl<'a> ApproxContext<'a> {
    pub fn new(symbols: &'a dyn SymbolContext) -> Self {
        Self {
            angle_unit: AngleUnit::default(),
            complex_policy: ComplexPolicy::default(),
            precision: Precision::default(),
            symbols,
        }
    }

    pub fn with_angle_unit(mut self, angle_unit: AngleUnit) -> Self {
        self.angle_unit = angle_unit;
        self
    }

    pub fn with_complex_policy(mut self, policy: ComplexPolicy) -> Self {
        self.complex_policy = policy;
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}

impl<'a> From<&ReductionContext<'a>> for ApproxContext<'a> {
    fn from(rctx: &ReductionContext<'a>) -> Self {
        Self {
            angle_unit: rctx.angle_unit,
            complex_policy: rctx.complex_policy,
            precision: rctx.precision,
            symbols: rctx.symbols,
        }
    }
}
