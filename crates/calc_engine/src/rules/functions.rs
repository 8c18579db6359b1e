//! Builtin function normalization and exact folding.

use crate::define_rule;
use crate::numeric::{
    as_u64, combinations, factorial, gcd_big, lcm_big, permutations, MAX_FACTORIAL,
};
use crate::rule::Rewrite;
use calc_ast::{BuiltinFn, Constant, Expr};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

define_rule!(
    /// A builtin called with the wrong number of arguments is a domain
    /// error, expressed as data like every other domain error.
    FunctionArityRule,
    "Check Builtin Arity",
    Some(&["Function"]),
    |ctx, expr, rctx| {
        if let Expr::Function(name, args) = ctx.get(expr) {
            if let Some(builtin) = ctx.builtin_of(*name) {
                let (min, max) = builtin.arity();
                if args.len() < min || args.len() > max {
                    let undef = ctx.undef();
                    return Some(Rewrite::new(undef, "wrong argument count"));
                }
            }
        }
        None
    }
);

define_rule!(
    /// Root and exponential notation canonicalizes to powers:
    /// sqrt(x) → x^(1/2), root(x,n) → x^(1/n), exp(x) → e^x.
    ExpandFunctionNotationRule,
    "Expand Root and Exponential Notation",
    Some(&["Function"]),
    |ctx, expr, rctx| {
        let (name, args) = match ctx.get(expr) {
            Expr::Function(name, args) => (*name, args.clone()),
            _ => return None,
        };
        match ctx.builtin_of(name) {
            Some(BuiltinFn::Sqrt) if args.len() == 1 => {
                let half = ctx.rat(1, 2);
                let pow = ctx.add(Expr::Pow(args[0], half));
                Some(Rewrite::new(pow, "sqrt(x) = x^(1/2)"))
            }
            Some(BuiltinFn::Root) if args.len() == 2 => {
                let degree = args[1];
                let exponent = match ctx.get(degree) {
                    Expr::Number(n) if n.is_zero() => {
                        let undef = ctx.undef();
                        return Some(Rewrite::new(undef, "zeroth root is undefined"));
                    }
                    Expr::Number(n) => {
                        let inverse = n.recip();
                        ctx.number(inverse)
                    }
                    _ => {
                        let minus_one = ctx.num(-1);
                        ctx.add(Expr::Pow(degree, minus_one))
                    }
                };
                let pow = ctx.add(Expr::Pow(args[0], exponent));
                Some(Rewrite::new(pow, "root(x,n) = x^(1/n)"))
            }
            Some(BuiltinFn::Exp) if args.len() == 1 => {
                let e = ctx.constant(Constant::E);
                let pow = ctx.add(Expr::Pow(e, args[0]));
                Some(Rewrite::new(pow, "exp(x) = e^x"))
            }
            _ => None,
        }
    }
);

define_rule!(
    NumericFunctionFoldRule,
    "Fold Numeric Function",
    Some(&["Function"]),
    |ctx, expr, rctx| {
        let (name, args) = match ctx.get(expr) {
            Expr::Function(name, args) => (*name, args.clone()),
            _ => return None,
        };
        let builtin = ctx.builtin_of(name)?;
        match builtin {
            BuiltinFn::Abs if args.len() == 1 => {
                let n = number_arg(ctx, args[0])?;
                let out = ctx.number(n.abs());
                Some(Rewrite::new(out, "fold abs"))
            }
            BuiltinFn::Sign if args.len() == 1 => {
                let n = number_arg(ctx, args[0])?;
                let sign = if n.is_zero() {
                    0
                } else if n.is_positive() {
                    1
                } else {
                    -1
                };
                let out = ctx.num(sign);
                Some(Rewrite::new(out, "fold sign"))
            }
            BuiltinFn::Floor if args.len() == 1 => {
                let n = number_arg(ctx, args[0])?;
                let out = ctx.number(n.floor());
                Some(Rewrite::new(out, "fold floor"))
            }
            BuiltinFn::Ceil if args.len() == 1 => {
                let n = number_arg(ctx, args[0])?;
                let out = ctx.number(n.ceil());
                Some(Rewrite::new(out, "fold ceil"))
            }
            BuiltinFn::Round if args.len() == 1 => {
                let n = number_arg(ctx, args[0])?;
                let out = ctx.number(n.round());
                Some(Rewrite::new(out, "fold round"))
            }
            BuiltinFn::Factorial if args.len() == 1 => {
                let n = number_arg(ctx, args[0])?;
                match as_u64(&n) {
                    Some(k) if k <= MAX_FACTORIAL => {
                        let out = ctx.number(BigRational::from_integer(factorial(k)));
                        Some(Rewrite::new(out, "fold factorial"))
                    }
                    Some(_) => None,
                    None => {
                        let undef = ctx.undef();
                        Some(Rewrite::new(undef, "factorial needs a non-negative integer"))
                    }
                }
            }
            BuiltinFn::Permute | BuiltinFn::Binomial if args.len() == 2 => {
                let n = number_arg(ctx, args[0])?;
                let k = number_arg(ctx, args[1])?;
                match (as_u64(&n), as_u64(&k)) {
                    (Some(n), Some(k)) if k > n => {
                        let zero = ctx.num(0);
                        Some(Rewrite::new(zero, "no arrangements when k > n"))
                    }
                    (Some(n), Some(k)) => {
                        let value = if builtin == BuiltinFn::Permute {
                            permutations(n, k)
                        } else {
                            combinations(n, k)
                        };
                        let out = ctx.number(BigRational::from_integer(value));
                        Some(Rewrite::new(out, "fold combinatorics"))
                    }
                    _ => {
                        let undef = ctx.undef();
                        Some(Rewrite::new(undef, "combinatorics need non-negative integers"))
                    }
                }
            }
            BuiltinFn::Gcd | BuiltinFn::Lcm if args.len() == 2 => {
                let a = number_arg(ctx, args[0])?;
                let b = number_arg(ctx, args[1])?;
                if !a.is_integer() || !b.is_integer() {
                    let undef = ctx.undef();
                    return Some(Rewrite::new(undef, "gcd/lcm need integers"));
                }
                let value = if builtin == BuiltinFn::Gcd {
                    gcd_big(a.numer(), b.numer())
                } else {
                    lcm_big(a.numer(), b.numer())
                };
                let out = ctx.number(BigRational::from_integer(value));
                Some(Rewrite::new(out, "fold integer arithmetic"))
            }
            _ => None,
        }
    }
);

define_rule!(
    /// Statistical parameters that are provably out of range reduce to
    /// the undefined sentinel; numeric evaluation is left to the
    /// approximation engine.
    DistributionDomainRule,
    "Check Distribution Parameters",
    Some(&["Function"]),
    |ctx, expr, rctx| {
        let (name, args) = match ctx.get(expr) {
            Expr::Function(name, args) => (*name, args.clone()),
            _ => return None,
        };
        let builtin = ctx.builtin_of(name)?;
        let bad = match builtin {
            BuiltinFn::BinomPdf | BuiltinFn::BinomCdf | BuiltinFn::InvBinom
                if args.len() == 3 =>
            {
                arg_outside_unit_interval(ctx, args[2])
                    || number_arg(ctx, args[1]).is_some_and(|n| as_u64(&n).is_none())
            }
            BuiltinFn::NormPdf | BuiltinFn::NormCdf | BuiltinFn::InvNorm
                if args.len() == 3 =>
            {
                number_arg(ctx, args[2]).is_some_and(|sigma| !sigma.is_positive())
            }
            BuiltinFn::TPdf | BuiltinFn::TCdf | BuiltinFn::InvT
            | BuiltinFn::Chi2Pdf | BuiltinFn::Chi2Cdf | BuiltinFn::InvChi2
                if args.len() == 2 =>
            {
                number_arg(ctx, args[1]).is_some_and(|k| !k.is_positive())
            }
            BuiltinFn::GeomPdf | BuiltinFn::GeomCdf | BuiltinFn::InvGeom
                if args.len() == 2 =>
            {
                number_arg(ctx, args[1])
                    .is_some_and(|p| !p.is_positive() || p > BigRational::one())
            }
            BuiltinFn::PoissonPdf | BuiltinFn::PoissonCdf if args.len() == 2 => {
                number_arg(ctx, args[1]).is_some_and(|l| !l.is_positive())
            }
            _ => false,
        };
        if bad {
            let undef = ctx.undef();
            return Some(Rewrite::new(undef, "distribution parameter out of range"));
        }
        None
    }
);

fn number_arg(ctx: &calc_ast::Context, id: calc_ast::ExprId) -> Option<BigRational> {
    ctx.get(id).as_number().cloned()
}

fn arg_outside_unit_interval(ctx: &calc_ast::Context, id: calc_ast::ExprId) -> bool {
    number_arg(ctx, id).is_some_and(|p| p.is_negative() || p > BigRational::one())
}
