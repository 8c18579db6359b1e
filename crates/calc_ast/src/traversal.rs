//! Iterative tree walks. Recursion-free so pathological nesting cannot
//! overflow the stack during analysis passes.

use crate::context::{Context, ExprId};
use crate::expression::Expr;

/// Number of nodes in the subtree, the root included.
pub fn count_nodes(ctx: &Context, root: ExprId) -> usize {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        count += 1;
        stack.extend(ctx.children(id));
    }
    count
}

/// Whether the subtree mentions the variable `name`.
pub fn contains_variable(ctx: &Context, root: ExprId, name: &str) -> bool {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if let Expr::Variable(sym) = ctx.get(id) {
            if ctx.sym_name(*sym) == name {
                return true;
            }
        }
        stack.extend(ctx.children(id));
    }
    false
}

/// Whether any node in the subtree satisfies `pred`.
pub fn any_node(ctx: &Context, root: ExprId, mut pred: impl FnMut(&Expr) -> bool) -> bool {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if pred(ctx.get(id)) {
            return true;
        }
        stack.extend(ctx.children(id));
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_nodes() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let two = ctx.num(2);
        let pow = ctx.add(Expr::Pow(x, two));
        let one = ctx.num(1);
        let sum = ctx.add(Expr::Add(pow, one));
        assert_eq!(count_nodes(&ctx, sum), 5);
    }

    #[test]
    fn test_contains_variable() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let three = ctx.num(3);
        let product = ctx.add(Expr::Mul(three, x));
        assert!(contains_variable(&ctx, product, "x"));
        assert!(!contains_variable(&ctx, product, "y"));
    }

    #[test]
    fn test_any_node() {
        let mut ctx = Context::new();
        let u = ctx.undef();
        let one = ctx.num(1);
        let sum = ctx.add(Expr::Add(one, u));
        assert!(any_node(&ctx, sum, |e| e.is_sentinel()));
        assert!(!any_node(&ctx, one, |e| e.is_sentinel()));
    }
}
