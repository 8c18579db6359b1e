//! Polynomial coefficient extraction.
//!
//! Walks a reduced tree and produces the dense coefficient vector of
//! the expression viewed as a polynomial in one variable, constant term
//! first. Products and integer powers are convolved, so factored input
//! like `(x-1)*(x-2)` needs no prior expansion. Coefficient trees come
//! back unreduced; callers reduce them before use.

use crate::support::{add2, div2, mul2, neg, sub2};
use calc_ast::{contains_variable, Context, Expr, ExprId};
use num_traits::{Signed, ToPrimitive};

/// Coefficients `[a0, a1, ..., an]` of `expr` as a polynomial in `var`,
/// or `None` when the expression is not polynomial in `var` or its
/// degree exceeds `max_degree`.
pub fn extract_coefficients(
    ctx: &mut Context,
    expr: ExprId,
    var: &str,
    max_degree: usize,
) -> Option<Vec<ExprId>> {
    let coeffs = poly_of(ctx, expr, var, max_degree)?;
    debug_assert!(!coeffs.is_empty());
    Some(coeffs)
}

fn poly_of(ctx: &mut Context, expr: ExprId, var: &str, max_degree: usize) -> Option<Vec<ExprId>> {
    if !contains_variable(ctx, expr, var) {
        return Some(vec![expr]);
    }
    match ctx.get(expr).clone() {
        Expr::Variable(sym) if ctx.sym_name(sym) == var => {
            let zero = ctx.num(0);
            let one = ctx.num(1);
            Some(vec![zero, one])
        }
        Expr::Add(l, r) => {
            let lp = poly_of(ctx, l, var, max_degree)?;
            let rp = poly_of(ctx, r, var, max_degree)?;
            Some(add_polys(ctx, &lp, &rp, false))
        }
        Expr::Sub(l, r) => {
            let lp = poly_of(ctx, l, var, max_degree)?;
            let rp = poly_of(ctx, r, var, max_degree)?;
            Some(add_polys(ctx, &lp, &rp, true))
        }
        Expr::Neg(e) => {
            let p = poly_of(ctx, e, var, max_degree)?;
            Some(p.into_iter().map(|c| neg(ctx, c)).collect())
        }
        Expr::Mul(l, r) => {
            let lp = poly_of(ctx, l, var, max_degree)?;
            let rp = poly_of(ctx, r, var, max_degree)?;
            mul_polys(ctx, &lp, &rp, max_degree)
        }
        Expr::Div(l, r) => {
            // Only division by a var-free denominator stays polynomial.
            if contains_variable(ctx, r, var) {
                return None;
            }
            let lp = poly_of(ctx, l, var, max_degree)?;
            Some(lp.into_iter().map(|c| div2(ctx, c, r)).collect())
        }
        Expr::Pow(base, exp) => {
            let k = match ctx.get(exp) {
                Expr::Number(n) if n.is_integer() && n.is_positive() => n.numer().to_usize()?,
                _ => return None,
            };
            let bp = poly_of(ctx, base, var, max_degree)?;
            if (bp.len() - 1) * k > max_degree {
                return None;
            }
            let one = ctx.num(1);
            let mut acc = vec![one];
            for _ in 0..k {
                acc = mul_polys(ctx, &acc, &bp, max_degree)?;
            }
            Some(acc)
        }
        _ => None,
    }
}

fn add_polys(ctx: &mut Context, l: &[ExprId], r: &[ExprId], subtract: bool) -> Vec<ExprId> {
    let mut out = Vec::with_capacity(l.len().max(r.len()));
    for d in 0..l.len().max(r.len()) {
        let entry = match (l.get(d).copied(), r.get(d).copied()) {
            (Some(a), Some(b)) => {
                if subtract {
                    sub2(ctx, a, b)
                } else {
                    add2(ctx, a, b)
                }
            }
            (Some(a), None) => a,
            (None, Some(b)) => {
                if subtract {
                    neg(ctx, b)
                } else {
                    b
                }
            }
            (None, None) => unreachable!(),
        };
        out.push(entry);
    }
    out
}

fn mul_polys(
    ctx: &mut Context,
    l: &[ExprId],
    r: &[ExprId],
    max_degree: usize,
) -> Option<Vec<ExprId>> {
    let degree = (l.len() - 1) + (r.len() - 1);
    if degree > max_degree {
        return None;
    }
    let mut out: Vec<Option<ExprId>> = vec![None; degree + 1];
    for (i, &a) in l.iter().enumerate() {
        for (j, &b) in r.iter().enumerate() {
            let term = mul2(ctx, a, b);
            out[i + j] = Some(match out[i + j] {
                Some(existing) => add2(ctx, existing, term),
                None => term,
            });
        }
    }
    Some(
        out.into_iter()
            .map(|c| c.unwrap_or_else(|| ctx.num(0)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_engine::{NoSymbols, Reducer, ReductionContext};
    use calc_parser::parse;
    use num_rational::BigRational;

    fn reduced_coefficients(input: &str, var: &str) -> Option<Vec<BigRational>> {
        let mut reducer = Reducer::with_default_rules();
        let symbols = NoSymbols;
        let rctx = ReductionContext::new(&symbols);
        let expr = parse(input, &mut reducer.context).unwrap();
        let reduced = reducer.reduce(expr, &rctx).unwrap();
        let coeffs = extract_coefficients(&mut reducer.context, reduced, var, 8)?;
        coeffs
            .into_iter()
            .map(|c| {
                let r = reducer.reduce(c, &rctx).unwrap();
                reducer.context.get(r).as_number().cloned()
            })
            .collect()
    }

    fn rats(values: &[(i64, i64)]) -> Vec<BigRational> {
        values
            .iter()
            .map(|&(n, d)| BigRational::new(n.into(), d.into()))
            .collect()
    }

    #[test]
    fn test_expanded_quadratic() {
        assert_eq!(
            reduced_coefficients("x^2-5*x+6", "x"),
            Some(rats(&[(6, 1), (-5, 1), (1, 1)]))
        );
    }

    #[test]
    fn test_factored_cubic_convolves() {
        assert_eq!(
            reduced_coefficients("(x-1)*(x-2)*(x-3)", "x"),
            Some(rats(&[(-6, 1), (11, 1), (-6, 1), (1, 1)]))
        );
    }

    #[test]
    fn test_power_of_binomial() {
        assert_eq!(
            reduced_coefficients("(x+1)^3", "x"),
            Some(rats(&[(1, 1), (3, 1), (3, 1), (1, 1)]))
        );
    }

    #[test]
    fn test_rational_coefficients() {
        assert_eq!(
            reduced_coefficients("x^2/3+2*x/3-5", "x"),
            Some(rats(&[(-5, 1), (2, 3), (1, 3)]))
        );
    }

    #[test]
    fn test_not_polynomial() {
        assert_eq!(reduced_coefficients("1/x", "x"), None);
        assert_eq!(reduced_coefficients("sin(x)", "x"), None);
        assert_eq!(reduced_coefficients("x^x", "x"), None);
    }

    #[test]
    fn test_degree_cap() {
        let mut reducer = Reducer::with_default_rules();
        let expr = parse("x^4", &mut reducer.context).unwrap();
        assert!(extract_coefficients(&mut reducer.context, expr, "x", 3).is_none());
    }
}
