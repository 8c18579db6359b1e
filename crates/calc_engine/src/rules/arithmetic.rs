//! Structural normalization and the canonical sum/product shape.
//!
//! Canonical form keeps only `Add`, `Mul`, `Pow` and leaves: subtraction
//! becomes addition of a (-1) multiple, division a product with a
//! negative power. Chains are flattened, constants folded, like terms
//! and like bases collected, and operands sorted, rebuilt left-nested.

use crate::define_rule;
use crate::nary::{
    add_operands, build_add, build_mul, mul_operands, split_coefficient, split_exponent,
};
use crate::rule::Rewrite;
use calc_ast::{compare_expr, structural_eq, traversal, Constant, Expr};
use num_rational::BigRational;
use num_traits::{One, Zero};

define_rule!(
    NormalizeRule,
    "Normalize Subtraction, Negation and Division",
    Some(&["Sub", "Neg", "Div"]),
    |ctx, expr, rctx| {
        match ctx.get(expr).clone() {
            Expr::Sub(l, r) => {
                let minus_one = ctx.num(-1);
                let negated = ctx.add(Expr::Mul(minus_one, r));
                let sum = ctx.add(Expr::Add(l, negated));
                Some(Rewrite::new(sum, "a - b = a + (-1)*b"))
            }
            Expr::Neg(e) => {
                let minus_one = ctx.num(-1);
                let product = ctx.add(Expr::Mul(minus_one, e));
                Some(Rewrite::new(product, "-a = (-1)*a"))
            }
            Expr::Div(l, r) => {
                if ctx.get(r).is_zero() {
                    let undef = ctx.undef();
                    return Some(Rewrite::new(undef, "division by zero"));
                }
                let minus_one = ctx.num(-1);
                let inverse = ctx.add(Expr::Pow(r, minus_one));
                let product = ctx.add(Expr::Mul(l, inverse));
                Some(Rewrite::new(product, "a / b = a * b^-1"))
            }
            _ => None,
        }
    }
);

define_rule!(
    CanonicalizeAddRule,
    "Canonicalize Sum",
    Some(&["Add"]),
    |ctx, expr, rctx| {
        let operands = add_operands(ctx, expr);

        let mut constant = BigRational::zero();
        let mut groups: Vec<(BigRational, Vec<calc_ast::ExprId>)> = Vec::new();
        for term in operands {
            let (coeff, core) = split_coefficient(ctx, term);
            if core.is_empty() {
                constant += coeff;
                continue;
            }
            match groups
                .iter_mut()
                .find(|(_, existing)| same_factors(ctx, existing, &core))
            {
                Some((total, _)) => *total += coeff,
                None => groups.push((coeff, core)),
            }
        }

        let mut terms = Vec::new();
        if !constant.is_zero() {
            terms.push(ctx.number(constant));
        }
        for (coeff, core) in groups {
            if coeff.is_zero() {
                // ∞ − ∞ and friends do not cancel.
                if core
                    .iter()
                    .any(|&f| traversal::any_node(ctx, f, is_infinity))
                {
                    let undef = ctx.undef();
                    return Some(Rewrite::new(undef, "∞ - ∞ is undefined"));
                }
                continue;
            }
            let mut factors = Vec::with_capacity(core.len() + 1);
            if !coeff.is_one() {
                factors.push(ctx.number(coeff));
            }
            factors.extend(core);
            terms.push(build_mul(ctx, &factors));
        }

        terms.sort_by(|&a, &b| compare_expr(ctx, a, b));
        let result = build_add(ctx, &terms);
        if structural_eq(ctx, expr, result) {
            return None;
        }
        Some(Rewrite::new(result, "flatten, fold and sort sum"))
    }
);

define_rule!(
    CanonicalizeMulRule,
    "Canonicalize Product",
    Some(&["Mul"]),
    |ctx, expr, rctx| {
        let operands = mul_operands(ctx, expr);

        let mut coefficient = BigRational::one();
        let mut groups: Vec<(calc_ast::ExprId, BigRational)> = Vec::new();
        for factor in operands {
            if let Expr::Number(n) = ctx.get(factor) {
                coefficient *= n;
                continue;
            }
            let (base, exp) = split_exponent(ctx, factor);
            match groups
                .iter_mut()
                .find(|(existing, _)| structural_eq(ctx, *existing, base))
            {
                Some((_, total)) => *total += exp,
                None => groups.push((base, exp)),
            }
        }

        if coefficient.is_zero() {
            // 0·∞ is indeterminate; plain products annihilate.
            if groups
                .iter()
                .any(|&(base, _)| traversal::any_node(ctx, base, is_infinity))
            {
                let undef = ctx.undef();
                return Some(Rewrite::new(undef, "0 * ∞ is undefined"));
            }
            let zero = ctx.num(0);
            if structural_eq(ctx, expr, zero) {
                return None;
            }
            return Some(Rewrite::new(zero, "x * 0 = 0"));
        }

        let mut factors = Vec::new();
        if !coefficient.is_one() {
            factors.push(ctx.number(coefficient));
        }
        for (base, exp) in groups {
            if exp.is_zero() {
                if traversal::any_node(ctx, base, is_infinity) {
                    let undef = ctx.undef();
                    return Some(Rewrite::new(undef, "∞ / ∞ is undefined"));
                }
                continue;
            }
            if exp.is_one() {
                factors.push(base);
            } else {
                let exp_id = ctx.number(exp);
                factors.push(ctx.add(Expr::Pow(base, exp_id)));
            }
        }

        factors.sort_by(|&a, &b| compare_expr(ctx, a, b));
        let result = build_mul(ctx, &factors);
        if structural_eq(ctx, expr, result) {
            return None;
        }
        Some(Rewrite::new(result, "flatten, fold and sort product"))
    }
);

fn is_infinity(e: &Expr) -> bool {
    matches!(e, Expr::Constant(Constant::Infinity))
}

fn same_factors(ctx: &calc_ast::Context, a: &[calc_ast::ExprId], b: &[calc_ast::ExprId]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(&x, &y)| structural_eq(ctx, x, y))
}
