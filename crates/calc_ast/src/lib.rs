pub mod builtin;
pub mod context;
pub mod display;
pub mod error;
pub mod expression;
pub mod layout;
pub mod ordering;
pub mod symbol;
pub mod traversal;

pub use builtin::BuiltinFn;
pub use context::{Context, ExprId};
pub use display::{print_float, DisplayExpr, FloatDisplayMode};
pub use error::ArenaError;
pub use expression::{Constant, Expr, RelOp};
pub use ordering::{compare_expr, structural_eq};
pub use symbol::{SymbolId, SymbolTable};
pub use traversal::{contains_variable, count_nodes};
