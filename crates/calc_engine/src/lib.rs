pub mod approx;
pub mod beautify;
pub mod error;
pub mod nary;
pub mod numeric;
pub mod options;
pub mod reducer;
pub mod rule;
pub mod rules;
#[macro_use]
pub mod macros;

pub use approx::{approximate, approximate_real, Evaluation};
pub use error::EngineError;
pub use options::{
    AngleUnit, ApproxContext, Bindings, ComplexPolicy, NoSymbols, Precision, ReductionContext,
    SymbolContext, Target,
};
pub use reducer::Reducer;
pub use rule::{Rewrite, Rule};
