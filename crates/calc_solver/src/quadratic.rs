//! Linear and quadratic root solving.

use crate::error::SolveError;
use crate::support::{
    add2, complex_to_expr, div2, is_provably_zero, keep_root, mul2, neg, numeric, pow_int, sqrt,
    sub2,
};
use crate::SolveResult;
use calc_ast::{structural_eq, ExprId};
use calc_engine::{EngineError, Reducer, ReductionContext};
use num_complex::Complex64;
use tracing::debug;

/// `a1*x + a0 = 0` has the single root `-a0/a1`. The discriminant of a
/// linear polynomial is 1 by convention.
pub(crate) fn solve_linear(
    reducer: &mut Reducer,
    a0: ExprId,
    a1: ExprId,
    rctx: &ReductionContext,
) -> Result<SolveResult, SolveError> {
    let minus_a0 = neg(&mut reducer.context, a0);
    let quotient = div2(&mut reducer.context, minus_a0, a1);
    let root = reducer.reduce(quotient, rctx)?;
    let discriminant = reducer.context.num(1);
    let roots = if keep_root(reducer, root, rctx) {
        vec![root]
    } else {
        Vec::new()
    };
    Ok(SolveResult {
        roots,
        discriminant,
        approximate: false,
    })
}

/// `a*x^2 + b*x + c = 0` by the discriminant formula. Roots come back
/// in the fixed order `(-b - √Δ)/2a`, `(-b + √Δ)/2a`; a zero
/// discriminant yields the double root `-b/2a` once.
pub(crate) fn solve_quadratic(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    c: ExprId,
    rctx: &ReductionContext,
) -> Result<SolveResult, SolveError> {
    let discriminant = match quadratic_discriminant(reducer, a, b, c, rctx) {
        Ok(d) => d,
        Err(EngineError::OutOfMemory) | Err(EngineError::RewriteBudgetExceeded) => {
            return numeric_fallback(reducer, a, b, c, rctx)
        }
        Err(e) => return Err(e.into()),
    };
    if reducer.context.get(discriminant).is_sentinel() {
        return Ok(SolveResult {
            roots: Vec::new(),
            discriminant,
            approximate: false,
        });
    }

    let symbolic = symbolic_roots(reducer, a, b, discriminant, rctx);
    match symbolic {
        Ok(mut roots) => {
            roots.retain(|&r| keep_root(reducer, r, rctx));
            roots.dedup_by(|&mut x, &mut y| structural_eq(&reducer.context, x, y));
            Ok(SolveResult {
                roots,
                discriminant,
                approximate: false,
            })
        }
        Err(EngineError::OutOfMemory) | Err(EngineError::RewriteBudgetExceeded) => {
            debug!("symbolic quadratic roots interrupted, approximating");
            numeric_fallback(reducer, a, b, c, rctx)
        }
        Err(e) => Err(e.into()),
    }
}

fn quadratic_discriminant(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    c: ExprId,
    rctx: &ReductionContext,
) -> Result<ExprId, EngineError> {
    let ctx = &mut reducer.context;
    let b_squared = pow_int(ctx, b, 2);
    let four = ctx.num(4);
    let ac = mul2(ctx, a, c);
    let four_ac = mul2(ctx, four, ac);
    let delta = sub2(ctx, b_squared, four_ac);
    reducer.reduce(delta, rctx)
}

fn symbolic_roots(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    discriminant: ExprId,
    rctx: &ReductionContext,
) -> Result<Vec<ExprId>, EngineError> {
    if is_provably_zero(reducer, discriminant, rctx) {
        let ctx = &mut reducer.context;
        let minus_b = neg(ctx, b);
        let two = ctx.num(2);
        let two_a = mul2(ctx, two, a);
        let quotient = div2(ctx, minus_b, two_a);
        let root = reducer.reduce(quotient, rctx)?;
        return Ok(vec![root]);
    }

    let mut roots = Vec::with_capacity(2);
    for plus in [false, true] {
        let ctx = &mut reducer.context;
        let minus_b = neg(ctx, b);
        let radical = sqrt(ctx, discriminant);
        let numerator = if plus {
            add2(ctx, minus_b, radical)
        } else {
            sub2(ctx, minus_b, radical)
        };
        let two = ctx.num(2);
        let two_a = mul2(ctx, two, a);
        let quotient = div2(ctx, numerator, two_a);
        roots.push(reducer.reduce(quotient, rctx)?);
    }
    Ok(roots)
}

/// Numeric roots when symbolic reduction could not finish. Coefficients
/// that do not resolve to numbers make the fallback impossible and
/// surface as `NoClosedForm`.
fn numeric_fallback(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    c: ExprId,
    rctx: &ReductionContext,
) -> Result<SolveResult, SolveError> {
    let av = numeric(reducer, a, rctx);
    let bv = numeric(reducer, b, rctx);
    let cv = numeric(reducer, c, rctx);
    if [av, bv, cv].iter().any(|v| v.re.is_nan() || v.im.is_nan()) {
        return Err(SolveError::NoClosedForm);
    }

    let delta = bv * bv - 4.0 * av * cv;
    let radical = delta.sqrt();
    let two_a = 2.0 * av;
    let candidates = if delta == Complex64::new(0.0, 0.0) {
        vec![-bv / two_a]
    } else {
        vec![(-bv - radical) / two_a, (-bv + radical) / two_a]
    };

    let mut roots = Vec::new();
    for z in candidates {
        if let Some(id) = complex_to_expr(&mut reducer.context, z, rctx.complex_policy) {
            roots.push(id);
        }
    }
    let discriminant = complex_to_expr(&mut reducer.context, delta, rctx.complex_policy)
        .unwrap_or_else(|| reducer.context.undef());
    Ok(SolveResult {
        roots,
        discriminant,
        approximate: true,
    })
}
