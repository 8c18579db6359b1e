//! Beautification: rewrite the canonical form into display shape.
//!
//! Runs only on reduced trees. Negative multiples become subtractions,
//! negative powers become fractions, half powers become radicals, and
//! logarithms in base e become `ln`. The output is still parseable and
//! re-reduces to the same canonical form; it is not itself canonical.

use crate::nary::{add_operands, build_mul, mul_operands};
use calc_ast::{BuiltinFn, Constant, Context, Expr, ExprId};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive};

pub fn deep_beautify(ctx: &mut Context, id: ExprId) -> ExprId {
    match ctx.get(id).clone() {
        Expr::Add(_, _) => beautify_sum(ctx, id),
        Expr::Mul(_, _) => beautify_product(ctx, id),
        Expr::Pow(base, exp) => beautify_pow(ctx, base, exp),
        Expr::Function(name, args) => {
            // log(x, e) is the natural logarithm.
            if Some(BuiltinFn::Log) == ctx.builtin_of(name)
                && args.len() == 2
                && matches!(ctx.get(args[1]), Expr::Constant(Constant::E))
            {
                let arg = deep_beautify(ctx, args[0]);
                return ctx.func(BuiltinFn::Ln, vec![arg]);
            }
            let pretty: Vec<ExprId> = args.iter().map(|&a| deep_beautify(ctx, a)).collect();
            if pretty == args {
                id
            } else {
                ctx.add(Expr::Function(name, pretty))
            }
        }
        Expr::Sub(l, r) => {
            let l2 = deep_beautify(ctx, l);
            let r2 = deep_beautify(ctx, r);
            if l2 == l && r2 == r {
                id
            } else {
                ctx.add(Expr::Sub(l2, r2))
            }
        }
        Expr::Div(l, r) => {
            let l2 = deep_beautify(ctx, l);
            let r2 = deep_beautify(ctx, r);
            if l2 == l && r2 == r {
                id
            } else {
                ctx.add(Expr::Div(l2, r2))
            }
        }
        Expr::Comparison(op, l, r) => {
            let l2 = deep_beautify(ctx, l);
            let r2 = deep_beautify(ctx, r);
            if l2 == l && r2 == r {
                id
            } else {
                ctx.add(Expr::Comparison(op, l2, r2))
            }
        }
        Expr::Neg(e) => {
            let e2 = deep_beautify(ctx, e);
            if e2 == e {
                id
            } else {
                ctx.add(Expr::Neg(e2))
            }
        }
        Expr::Percent(e) => {
            let e2 = deep_beautify(ctx, e);
            if e2 == e {
                id
            } else {
                ctx.add(Expr::Percent(e2))
            }
        }
        Expr::List(items) => {
            let pretty: Vec<ExprId> = items.iter().map(|&a| deep_beautify(ctx, a)).collect();
            if pretty == items {
                id
            } else {
                ctx.add(Expr::List(pretty))
            }
        }
        _ => id,
    }
}

/// a + (-1)·b + … reads as a chain of subtractions.
fn beautify_sum(ctx: &mut Context, id: ExprId) -> ExprId {
    let terms = add_operands(ctx, id);
    let mut acc = deep_beautify(ctx, terms[0]);
    for &term in &terms[1..] {
        match negated_term(ctx, term) {
            Some(positive) => {
                let pretty = deep_beautify(ctx, positive);
                acc = ctx.add(Expr::Sub(acc, pretty));
            }
            None => {
                let pretty = deep_beautify(ctx, term);
                acc = ctx.add(Expr::Add(acc, pretty));
            }
        }
    }
    acc
}

/// The term without its negative sign, when it carries one.
fn negated_term(ctx: &mut Context, term: ExprId) -> Option<ExprId> {
    match ctx.get(term).clone() {
        Expr::Number(n) if n.is_negative() => Some(ctx.number(-n)),
        Expr::Mul(_, _) => {
            let factors = mul_operands(ctx, term);
            match ctx.get(factors[0]).clone() {
                Expr::Number(n) if n.is_negative() => {
                    let flipped = -n;
                    let mut rest = factors[1..].to_vec();
                    if !flipped.is_one() {
                        let coeff = ctx.number(flipped);
                        rest.insert(0, coeff);
                    }
                    Some(build_mul(ctx, &rest))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Split a product across a fraction bar: negative powers and the
/// coefficient's denominator sink below it.
fn beautify_product(ctx: &mut Context, id: ExprId) -> ExprId {
    let factors = mul_operands(ctx, id);
    let mut negate = false;
    let mut numerator: Vec<ExprId> = Vec::new();
    let mut denominator: Vec<ExprId> = Vec::new();

    for &factor in &factors {
        match ctx.get(factor).clone() {
            Expr::Number(n) => {
                let p = n.numer().clone();
                let q = n.denom().clone();
                if p.magnitude().is_one() {
                    negate ^= p.is_negative();
                } else {
                    numerator.push(ctx.number(BigRational::from_integer(p)));
                }
                if !q.is_one() {
                    denominator.push(ctx.number(BigRational::from_integer(q)));
                }
            }
            Expr::Pow(base, exp) => {
                let negative_exp = match ctx.get(exp) {
                    Expr::Number(n) if n.is_negative() => Some(-n.clone()),
                    _ => None,
                };
                match negative_exp {
                    Some(magnitude) => denominator.push(power_of(ctx, base, magnitude)),
                    None => numerator.push(beautify_pow(ctx, base, exp)),
                }
            }
            _ => numerator.push(deep_beautify(ctx, factor)),
        }
    }

    let num = match numerator.len() {
        0 => ctx.num(1),
        _ => build_mul(ctx, &numerator),
    };
    let result = if denominator.is_empty() {
        num
    } else {
        let den = build_mul(ctx, &denominator);
        ctx.add(Expr::Div(num, den))
    };
    if negate {
        ctx.add(Expr::Neg(result))
    } else {
        result
    }
}

fn beautify_pow(ctx: &mut Context, base: ExprId, exp: ExprId) -> ExprId {
    let numeric = match ctx.get(exp) {
        Expr::Number(n) => Some(n.clone()),
        _ => None,
    };
    match numeric {
        Some(n) if n.is_negative() => {
            let below = power_of(ctx, base, -n);
            let one = ctx.num(1);
            ctx.add(Expr::Div(one, below))
        }
        Some(n) => power_of(ctx, base, n),
        None => {
            let b = deep_beautify(ctx, base);
            let e = deep_beautify(ctx, exp);
            ctx.add(Expr::Pow(b, e))
        }
    }
}

/// base^magnitude with radical notation for unit-fraction exponents.
fn power_of(ctx: &mut Context, base: ExprId, magnitude: BigRational) -> ExprId {
    let pretty_base = deep_beautify(ctx, base);
    if magnitude.is_one() {
        return pretty_base;
    }
    if magnitude.numer().is_one() && !magnitude.is_integer() {
        if *magnitude.denom() == BigInt::from(2) {
            return ctx.func(BuiltinFn::Sqrt, vec![pretty_base]);
        }
        if let Some(q) = magnitude.denom().to_i64() {
            let degree = ctx.num(q);
            return ctx.func(BuiltinFn::Root, vec![pretty_base, degree]);
        }
    }
    let e = ctx.number(magnitude);
    ctx.add(Expr::Pow(pretty_base, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(ctx: &Context, id: ExprId) -> String {
        calc_ast::DisplayExpr { context: ctx, id }.to_string()
    }

    #[test]
    fn test_negative_multiple_reads_as_subtraction() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let minus_one = ctx.num(-1);
        let y = ctx.var("y");
        let neg_y = ctx.add(Expr::Mul(minus_one, y));
        let sum = ctx.add(Expr::Add(x, neg_y));
        let pretty = deep_beautify(&mut ctx, sum);
        assert_eq!(show(&ctx, pretty), "x - y");
    }

    #[test]
    fn test_negative_power_reads_as_fraction() {
        let mut ctx = Context::new();
        let cos = {
            let x = ctx.var("x");
            ctx.func(BuiltinFn::Cos, vec![x])
        };
        let sin = {
            let x = ctx.var("x");
            ctx.func(BuiltinFn::Sin, vec![x])
        };
        let minus_one = ctx.num(-1);
        let inv = ctx.add(Expr::Pow(sin, minus_one));
        let quot = ctx.add(Expr::Mul(cos, inv));
        let pretty = deep_beautify(&mut ctx, quot);
        assert_eq!(show(&ctx, pretty), "cos(x) / sin(x)");
    }

    #[test]
    fn test_half_power_reads_as_sqrt() {
        let mut ctx = Context::new();
        let two = ctx.num(2);
        let half = ctx.rat(1, 2);
        let pow = ctx.add(Expr::Pow(two, half));
        let pretty = deep_beautify(&mut ctx, pow);
        assert_eq!(show(&ctx, pretty), "sqrt(2)");
    }

    #[test]
    fn test_third_power_reads_as_root() {
        let mut ctx = Context::new();
        let five = ctx.num(5);
        let third = ctx.rat(1, 3);
        let pow = ctx.add(Expr::Pow(five, third));
        let pretty = deep_beautify(&mut ctx, pow);
        assert_eq!(show(&ctx, pretty), "root(5,3)");
    }

    #[test]
    fn test_log_base_e_reads_as_ln() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let e = ctx.constant(Constant::E);
        let log = ctx.func(BuiltinFn::Log, vec![x, e]);
        let pretty = deep_beautify(&mut ctx, log);
        assert_eq!(show(&ctx, pretty), "ln(x)");
    }

    #[test]
    fn test_rational_coefficient_splits_across_bar() {
        let mut ctx = Context::new();
        let half = ctx.rat(1, 2);
        let x = ctx.var("x");
        let product = ctx.add(Expr::Mul(half, x));
        let pretty = deep_beautify(&mut ctx, product);
        assert_eq!(show(&ctx, pretty), "x / 2");
    }

    #[test]
    fn test_minus_one_coefficient_reads_as_negation() {
        let mut ctx = Context::new();
        let minus_one = ctx.num(-1);
        let x = ctx.var("x");
        let product = ctx.add(Expr::Mul(minus_one, x));
        let pretty = deep_beautify(&mut ctx, product);
        assert_eq!(show(&ctx, pretty), "-x");
    }
}
