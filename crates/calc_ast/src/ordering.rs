//! Total order on expressions.
//!
//! Canonical sums and products sort their operands with `compare_expr`:
//! kind rank first, then value. Variables and function names compare by
//! resolved string so the order does not depend on interning history.

use crate::context::{Context, ExprId};
use crate::expression::{Constant, Expr};
use std::cmp::Ordering;

pub fn compare_expr(ctx: &Context, a: ExprId, b: ExprId) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let expr_a = ctx.get(a);
    let expr_b = ctx.get(b);

    let rank_a = rank(expr_a);
    let rank_b = rank(expr_b);
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }

    use Expr::*;
    match (expr_a, expr_b) {
        (Number(n1), Number(n2)) => n1.cmp(n2),
        (Constant(c1), Constant(c2)) => constant_rank(*c1).cmp(&constant_rank(*c2)),
        (Variable(v1), Variable(v2)) => ctx.sym_name(*v1).cmp(ctx.sym_name(*v2)),
        (Function(n1, args1), Function(n2, args2)) => {
            match ctx.sym_name(*n1).cmp(ctx.sym_name(*n2)) {
                Ordering::Equal => compare_slices(ctx, args1, args2),
                ord => ord,
            }
        }
        (List(i1), List(i2)) => compare_slices(ctx, i1, i2),
        (Pow(b1, e1), Pow(b2, e2)) => match compare_expr(ctx, *b1, *b2) {
            Ordering::Equal => compare_expr(ctx, *e1, *e2),
            ord => ord,
        },
        (Neg(e1), Neg(e2)) | (Percent(e1), Percent(e2)) => compare_expr(ctx, *e1, *e2),
        (Add(l1, r1), Add(l2, r2))
        | (Sub(l1, r1), Sub(l2, r2))
        | (Mul(l1, r1), Mul(l2, r2))
        | (Div(l1, r1), Div(l2, r2)) => compare_pairs(ctx, *l1, *r1, *l2, *r2),
        (Comparison(op1, l1, r1), Comparison(op2, l2, r2)) => {
            match (*op1 as u8).cmp(&(*op2 as u8)) {
                Ordering::Equal => compare_pairs(ctx, *l1, *r1, *l2, *r2),
                ord => ord,
            }
        }
        (Random, Random) | (Undefined, Undefined) | (Nonreal, Nonreal) => Ordering::Equal,
        _ => unreachable!("same rank implies same variant"),
    }
}

/// Structural equality: same shape and same payloads, ignoring ids.
pub fn structural_eq(ctx: &Context, a: ExprId, b: ExprId) -> bool {
    compare_expr(ctx, a, b) == Ordering::Equal
}

fn rank(expr: &Expr) -> u8 {
    use Expr::*;
    match expr {
        Number(_) => 0,
        Constant(_) => 1,
        Variable(_) => 2,
        Function(_, _) => 3,
        Random => 4,
        Percent(_) => 5,
        Neg(_) => 6,
        Pow(_, _) => 7,
        Mul(_, _) => 8,
        Div(_, _) => 9,
        Add(_, _) => 10,
        Sub(_, _) => 11,
        Comparison(_, _, _) => 12,
        List(_) => 13,
        Undefined => 14,
        Nonreal => 15,
    }
}

fn constant_rank(c: Constant) -> u8 {
    match c {
        Constant::Pi => 0,
        Constant::E => 1,
        Constant::I => 2,
        Constant::Infinity => 3,
    }
}

fn compare_slices(ctx: &Context, a: &[ExprId], b: &[ExprId]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match compare_expr(ctx, *x, *y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    a.len().cmp(&b.len())
}

fn compare_pairs(ctx: &Context, l1: ExprId, r1: ExprId, l2: ExprId, r2: ExprId) -> Ordering {
    match compare_expr(ctx, l1, l2) {
        Ordering::Equal => compare_expr(ctx, r1, r2),
        ord => ord,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_before_variables() {
        let mut ctx = Context::new();
        let n = ctx.num(5);
        let x = ctx.var("x");
        assert_eq!(compare_expr(&ctx, n, x), Ordering::Less);
    }

    #[test]
    fn test_numbers_by_value() {
        let mut ctx = Context::new();
        let a = ctx.rat(1, 2);
        let b = ctx.num(3);
        assert_eq!(compare_expr(&ctx, a, b), Ordering::Less);
    }

    #[test]
    fn test_variables_by_name_not_intern_order() {
        let mut ctx = Context::new();
        // "y" interned before "x": string order must still win.
        let y = ctx.var("y");
        let x = ctx.var("x");
        assert_eq!(compare_expr(&ctx, x, y), Ordering::Less);
    }

    #[test]
    fn test_structural_eq_distinct_ids() {
        let mut ctx = Context::new();
        let x1 = ctx.var("x");
        let x2 = ctx.var("x");
        let two = ctx.num(2);
        let p1 = ctx.add(Expr::Pow(x1, two));
        let two_b = ctx.num(2);
        let p2 = ctx.add(Expr::Pow(x2, two_b));
        assert_ne!(p1, p2);
        assert!(structural_eq(&ctx, p1, p2));
    }
}
