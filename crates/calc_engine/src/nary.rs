//! N-ary views over the binary `Add`/`Mul` chains.
//!
//! Canonical chains are left-nested with operands sorted by
//! `compare_expr`; these helpers flatten any nesting into an operand
//! list and rebuild the canonical shape.

use calc_ast::{Context, Expr, ExprId};
use num_rational::BigRational;
use num_traits::One;

/// Operands of an addition, flattening nested `Add` on both sides.
pub fn add_operands(ctx: &Context, id: ExprId) -> Vec<ExprId> {
    let mut out = Vec::new();
    let mut stack = vec![id];
    while let Some(e) = stack.pop() {
        match ctx.get(e) {
            Expr::Add(l, r) => {
                stack.push(*r);
                stack.push(*l);
            }
            _ => out.push(e),
        }
    }
    out
}

/// Operands of a multiplication, flattening nested `Mul` on both sides.
pub fn mul_operands(ctx: &Context, id: ExprId) -> Vec<ExprId> {
    let mut out = Vec::new();
    let mut stack = vec![id];
    while let Some(e) = stack.pop() {
        match ctx.get(e) {
            Expr::Mul(l, r) => {
                stack.push(*r);
                stack.push(*l);
            }
            _ => out.push(e),
        }
    }
    out
}

/// Left-nested sum of `operands`; empty folds to 0, singleton unwraps.
pub fn build_add(ctx: &mut Context, operands: &[ExprId]) -> ExprId {
    match operands.split_first() {
        None => ctx.num(0),
        Some((&first, rest)) => rest
            .iter()
            .fold(first, |acc, &t| ctx.add(Expr::Add(acc, t))),
    }
}

/// Left-nested product of `operands`; empty folds to 1, singleton unwraps.
pub fn build_mul(ctx: &mut Context, operands: &[ExprId]) -> ExprId {
    match operands.split_first() {
        None => ctx.num(1),
        Some((&first, rest)) => rest
            .iter()
            .fold(first, |acc, &f| ctx.add(Expr::Mul(acc, f))),
    }
}

/// Split an addend into its numeric coefficient and core factors.
/// `3` → (3, []); `2*x*y` → (2, [x, y]); `x` → (1, [x]).
pub fn split_coefficient(ctx: &Context, term: ExprId) -> (BigRational, Vec<ExprId>) {
    match ctx.get(term) {
        Expr::Number(n) => (n.clone(), Vec::new()),
        Expr::Mul(_, _) => {
            let factors = mul_operands(ctx, term);
            if let Expr::Number(n) = ctx.get(factors[0]) {
                let coeff = n.clone();
                (coeff, factors[1..].to_vec())
            } else {
                (BigRational::one(), factors)
            }
        }
        _ => (BigRational::one(), vec![term]),
    }
}

/// Split a factor into its base and numeric exponent.
/// `x^3` → (x, 3); `x^y` and plain `x` → (itself, 1).
pub fn split_exponent(ctx: &Context, factor: ExprId) -> (ExprId, BigRational) {
    if let Expr::Pow(base, exp) = ctx.get(factor) {
        if let Expr::Number(n) = ctx.get(*exp) {
            return (*base, n.clone());
        }
    }
    (factor, BigRational::one())
}
