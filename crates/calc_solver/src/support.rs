//! Tree builders and numeric probes shared by the solving strategies.

use calc_ast::{BuiltinFn, Constant, Context, Expr, ExprId};
use calc_engine::{approximate, ApproxContext, ComplexPolicy, Reducer, ReductionContext};
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::Zero;

pub(crate) fn add2(ctx: &mut Context, l: ExprId, r: ExprId) -> ExprId {
    ctx.add(Expr::Add(l, r))
}

pub(crate) fn sub2(ctx: &mut Context, l: ExprId, r: ExprId) -> ExprId {
    ctx.add(Expr::Sub(l, r))
}

pub(crate) fn mul2(ctx: &mut Context, l: ExprId, r: ExprId) -> ExprId {
    ctx.add(Expr::Mul(l, r))
}

pub(crate) fn mul3(ctx: &mut Context, a: ExprId, b: ExprId, c: ExprId) -> ExprId {
    let ab = mul2(ctx, a, b);
    mul2(ctx, ab, c)
}

pub(crate) fn div2(ctx: &mut Context, l: ExprId, r: ExprId) -> ExprId {
    ctx.add(Expr::Div(l, r))
}

pub(crate) fn neg(ctx: &mut Context, e: ExprId) -> ExprId {
    ctx.add(Expr::Neg(e))
}

pub(crate) fn pow_int(ctx: &mut Context, base: ExprId, exp: i64) -> ExprId {
    let e = ctx.num(exp);
    ctx.add(Expr::Pow(base, e))
}

pub(crate) fn sqrt(ctx: &mut Context, e: ExprId) -> ExprId {
    ctx.func(BuiltinFn::Sqrt, vec![e])
}

pub(crate) fn cbrt(ctx: &mut Context, e: ExprId) -> ExprId {
    let three = ctx.num(3);
    ctx.func(BuiltinFn::Root, vec![e, three])
}

/// Numeric value of a reduced subtree, complex values kept so the
/// probes below can tell "negative" from "left the real line".
pub(crate) fn numeric(reducer: &Reducer, id: ExprId, rctx: &ReductionContext) -> Complex64 {
    let actx = ApproxContext::from(rctx).with_complex_policy(ComplexPolicy::Cartesian);
    approximate(&reducer.context, id, &actx)
        .scalar()
        .unwrap_or(Complex64::new(f64::NAN, 0.0))
}

/// Whether a reduced subtree is zero: an exact zero literal, or a
/// symbolic form whose numeric value is exactly zero.
pub(crate) fn is_provably_zero(reducer: &Reducer, id: ExprId, rctx: &ReductionContext) -> bool {
    match reducer.context.get(id) {
        Expr::Number(n) => n.is_zero(),
        Expr::Undefined | Expr::Nonreal => false,
        _ => numeric(reducer, id, rctx) == Complex64::new(0.0, 0.0),
    }
}

/// Sign of a reduced discriminant. A complex or unresolvable value is
/// treated as negative, matching how the root count degrades.
pub(crate) fn discriminant_sign(reducer: &Reducer, id: ExprId, rctx: &ReductionContext) -> i8 {
    if is_provably_zero(reducer, id, rctx) {
        return 0;
    }
    let v = numeric(reducer, id, rctx);
    if v.im != 0.0 || v.re.is_nan() {
        -1
    } else if v.re > 0.0 {
        1
    } else if v.re < 0.0 {
        -1
    } else {
        0
    }
}

/// Whether a computed root belongs in the result: sentinels never do,
/// and under the real policy neither does a provably complex value.
/// Symbolic roots whose value cannot be resolved are kept.
pub(crate) fn keep_root(reducer: &Reducer, root: ExprId, rctx: &ReductionContext) -> bool {
    if reducer.context.get(root).is_sentinel() {
        return false;
    }
    if rctx.complex_policy == ComplexPolicy::Real {
        let v = numeric(reducer, root, rctx);
        if v.im != 0.0 && !v.im.is_nan() {
            return false;
        }
    }
    true
}

/// A float as an exact rational literal; non-finite values degrade to
/// the undefined sentinel.
pub(crate) fn number_from_f64(ctx: &mut Context, x: f64) -> ExprId {
    match BigRational::from_float(x) {
        Some(r) => ctx.number(r),
        None => ctx.undef(),
    }
}

/// A complex value as a tree, `re + im*i`. Returns `None` for NaN, and
/// for off-axis values under the real policy.
pub(crate) fn complex_to_expr(
    ctx: &mut Context,
    z: Complex64,
    policy: ComplexPolicy,
) -> Option<ExprId> {
    if z.re.is_nan() || z.im.is_nan() {
        return None;
    }
    if z.im == 0.0 {
        return Some(number_from_f64(ctx, z.re));
    }
    if policy == ComplexPolicy::Real {
        return None;
    }
    let im = number_from_f64(ctx, z.im);
    let i = ctx.constant(Constant::I);
    let imaginary = mul2(ctx, im, i);
    if z.re == 0.0 {
        return Some(imaginary);
    }
    let re = number_from_f64(ctx, z.re);
    Some(add2(ctx, re, imaginary))
}

/// Evaluate the polynomial at `candidate` (Horner form) and reduce; a
/// root leaves exactly zero behind.
pub(crate) fn is_root(
    reducer: &mut Reducer,
    coeffs: &[ExprId],
    candidate: ExprId,
    rctx: &ReductionContext,
) -> Result<bool, calc_engine::EngineError> {
    let mut acc = *coeffs.last().expect("at least one coefficient");
    for &c in coeffs[..coeffs.len() - 1].iter().rev() {
        let scaled = mul2(&mut reducer.context, acc, candidate);
        acc = add2(&mut reducer.context, scaled, c);
    }
    let reduced = reducer.reduce(acc, rctx)?;
    Ok(is_provably_zero(reducer, reduced, rctx))
}
