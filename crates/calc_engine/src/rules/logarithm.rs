//! Logarithm reduction.

use crate::define_rule;
use crate::numeric::integer_log;
use crate::options::ComplexPolicy;
use crate::rule::Rewrite;
use calc_ast::{BuiltinFn, Constant, Expr};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

define_rule!(
    LnRule,
    "Natural Logarithm",
    Some(&["Function"]),
    |ctx, expr, rctx| {
        let (name, args) = match ctx.get(expr) {
            Expr::Function(name, args) => (*name, args.clone()),
            _ => return None,
        };
        if ctx.builtin_of(name)? != BuiltinFn::Ln || args.len() != 1 {
            return None;
        }
        let x = args[0];
        match ctx.get(x).clone() {
            Expr::Number(n) if n.is_zero() => {
                let undef = ctx.undef();
                Some(Rewrite::new(undef, "ln(0) is undefined"))
            }
            Expr::Number(n) if n.is_negative() => {
                if rctx.complex_policy == ComplexPolicy::Real {
                    let nonreal = ctx.nonreal();
                    Some(Rewrite::new(nonreal, "ln of a negative real"))
                } else {
                    None
                }
            }
            Expr::Number(n) if n.is_one() => {
                let zero = ctx.num(0);
                Some(Rewrite::new(zero, "ln(1) = 0"))
            }
            Expr::Constant(Constant::E) => {
                let one = ctx.num(1);
                Some(Rewrite::new(one, "ln(e) = 1"))
            }
            // ln(e^x) = x, sound on the principal branch for real x.
            Expr::Pow(base, exp) if matches!(ctx.get(base), Expr::Constant(Constant::E)) => {
                Some(Rewrite::new(exp, "ln(e^x) = x"))
            }
            _ => None,
        }
    }
);

define_rule!(
    /// Integer results of log fold exactly: log(100) = 2, log(8,2) = 3.
    LogFoldRule,
    "Fold Logarithm",
    Some(&["Function"]),
    |ctx, expr, rctx| {
        let (name, args) = match ctx.get(expr) {
            Expr::Function(name, args) => (*name, args.clone()),
            _ => return None,
        };
        if ctx.builtin_of(name)? != BuiltinFn::Log {
            return None;
        }
        let value = match ctx.get(args[0]) {
            Expr::Number(n) => n.clone(),
            _ => return None,
        };
        if value.is_zero() {
            let undef = ctx.undef();
            return Some(Rewrite::new(undef, "log(0) is undefined"));
        }
        if value.is_negative() {
            if rctx.complex_policy == ComplexPolicy::Real {
                let nonreal = ctx.nonreal();
                return Some(Rewrite::new(nonreal, "log of a negative real"));
            }
            return None;
        }
        let base = match args.len() {
            1 => BigRational::from_integer(BigInt::from(10)),
            _ => match ctx.get(args[1]) {
                Expr::Number(b) => b.clone(),
                _ => return None,
            },
        };
        if args.len() == 2 && (!base.is_positive() || base.is_one()) {
            let undef = ctx.undef();
            return Some(Rewrite::new(undef, "invalid logarithm base"));
        }
        let k = integer_log(&base, &value)?;
        let out = ctx.num(k);
        Some(Rewrite::new(out, "fold integer logarithm"))
    }
);
