use crate::options::ReductionContext;
use calc_ast::{Context, ExprId};

/// Result of one shallow rule application.
pub struct Rewrite {
    pub new_expr: ExprId,
    pub description: String,
}

impl Rewrite {
    pub fn new(new_expr: ExprId, description: impl Into<String>) -> Self {
        Rewrite {
            new_expr,
            description: description.into(),
        }
    }
}

/// A shallow rewrite rule: looks only at a node and its immediate
/// children, which the driver guarantees are already canonical.
///
/// Rules never signal errors. A domain problem is expressed by
/// rewriting to a sentinel node; a rule that cannot make progress
/// returns `None` and must do so for its own output (no rule may fire
/// on an already-canonical shape, or reduction would not terminate or
/// be idempotent).
pub trait Rule {
    fn name(&self) -> &'static str;

    fn apply(&self, ctx: &mut Context, expr: ExprId, rctx: &ReductionContext)
        -> Option<Rewrite>;

    /// Node kinds this rule targets; `None` means every kind.
    fn target_kinds(&self) -> Option<&'static [&'static str]> {
        None
    }
}
