//! Power identities and exact numeric power folding.

use crate::define_rule;
use crate::numeric::{as_i64, pow_rational, rational_root_exact};
use crate::options::ComplexPolicy;
use crate::rule::Rewrite;
use calc_ast::Expr;
use num_traits::{Signed, ToPrimitive};

define_rule!(
    PowZeroExponentRule,
    "Zero Exponent",
    Some(&["Pow"]),
    |ctx, expr, rctx| {
        if let Expr::Pow(base, exp) = ctx.get(expr).clone() {
            if ctx.get(exp).is_zero() {
                if ctx.get(base).is_zero() {
                    let undef = ctx.undef();
                    return Some(Rewrite::new(undef, "0^0 is undefined"));
                }
                let one = ctx.num(1);
                return Some(Rewrite::new(one, "x^0 = 1"));
            }
        }
        None
    }
);

define_rule!(
    PowOneExponentRule,
    "Unit Exponent",
    Some(&["Pow"]),
    |ctx, expr, rctx| {
        if let Expr::Pow(base, exp) = ctx.get(expr).clone() {
            if ctx.get(exp).is_one() {
                return Some(Rewrite::new(base, "x^1 = x"));
            }
        }
        None
    }
);

define_rule!(
    PowOneBaseRule,
    "Unit Base",
    Some(&["Pow"]),
    |ctx, expr, rctx| {
        if let Expr::Pow(base, _) = ctx.get(expr).clone() {
            if ctx.get(base).is_one() {
                let one = ctx.num(1);
                return Some(Rewrite::new(one, "1^x = 1"));
            }
        }
        None
    }
);

define_rule!(
    PowZeroBaseRule,
    "Zero Base",
    Some(&["Pow"]),
    |ctx, expr, rctx| {
        if let Expr::Pow(base, exp) = ctx.get(expr).clone() {
            if ctx.get(base).is_zero() {
                if let Expr::Number(e) = ctx.get(exp) {
                    if e.is_positive() {
                        let zero = ctx.num(0);
                        return Some(Rewrite::new(zero, "0^x = 0 for x > 0"));
                    }
                    // Negative exponent: 1/0.
                    let undef = ctx.undef();
                    return Some(Rewrite::new(undef, "0^x is undefined for x < 0"));
                }
            }
        }
        None
    }
);

define_rule!(
    /// Exact folding of rational^rational, including perfect roots.
    /// Inexact powers (2^(1/2)) stay symbolic; even roots of negative
    /// reals become the nonreal sentinel under the real policy.
    EvaluatePowerRule,
    "Evaluate Numeric Power",
    Some(&["Pow"]),
    |ctx, expr, rctx| {
        if let Expr::Pow(base, exp) = ctx.get(expr).clone() {
            let (b, e) = match (ctx.get(base), ctx.get(exp)) {
                (Expr::Number(b), Expr::Number(e)) => (b.clone(), e.clone()),
                _ => return None,
            };
            if e.is_integer() {
                let k = as_i64(&e)?;
                let folded = pow_rational(&b, k)?;
                let out = ctx.number(folded);
                return Some(Rewrite::new(out, "fold integer power"));
            }
            let q: u32 = e.denom().to_u32()?;
            let p = e.numer().to_i64()?;
            if b.is_negative() && q % 2 == 0 {
                if rctx.complex_policy == ComplexPolicy::Real {
                    let nonreal = ctx.nonreal();
                    return Some(Rewrite::new(nonreal, "even root of a negative real"));
                }
                return None;
            }
            let root = rational_root_exact(&b, q)?;
            let folded = pow_rational(&root, p)?;
            let out = ctx.number(folded);
            return Some(Rewrite::new(out, "fold perfect root"));
        }
        None
    }
);

define_rule!(
    /// (x^a)^b → x^(a·b) when both exponents are integers (always sound).
    PowPowRule,
    "Power of a Power",
    Some(&["Pow"]),
    |ctx, expr, rctx| {
        if let Expr::Pow(base, outer_exp) = ctx.get(expr).clone() {
            if let Expr::Pow(inner_base, inner_exp) = ctx.get(base).clone() {
                let product = match (ctx.get(inner_exp), ctx.get(outer_exp)) {
                    (Expr::Number(a), Expr::Number(b))
                        if a.is_integer() && b.is_integer() =>
                    {
                        a * b
                    }
                    _ => return None,
                };
                let exp_id = ctx.number(product);
                let out = ctx.add(Expr::Pow(inner_base, exp_id));
                return Some(Rewrite::new(out, "(x^a)^b = x^(a*b)"));
            }
        }
        None
    }
);
