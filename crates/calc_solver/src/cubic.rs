//! Cubic root solving.
//!
//! Strategy order, cheapest first: a zero constant term factors out x,
//! a depressed `a*x^3 + d` solves by cube roots of unity, a rational
//! root search runs over integer-normalized coefficients, then a root
//! hidden among the quadratic coefficient's addends is tried. Any found
//! root deflates the cubic to the quadratic case. Only when every
//! shortcut fails does Cardano's formula run, numerically unless the
//! Cardano number reduces to an exact value.

use crate::error::SolveError;
use crate::quadratic::solve_quadratic;
use crate::rational_roots::find_rational_root;
use crate::support::{
    add2, cbrt, complex_to_expr, div2, is_provably_zero, is_root, keep_root, mul2, mul3, neg,
    numeric, pow_int, sqrt, sub2,
};
use crate::SolveResult;
use calc_ast::{count_nodes, structural_eq, Constant, Expr, ExprId};
use calc_engine::{nary, ComplexPolicy, EngineError, Reducer, ReductionContext};
use num_complex::Complex64;
use tracing::debug;

/// Discriminants bigger than this many nodes are approximated before
/// their sign is needed.
const MAX_DISCRIMINANT_NODES: usize = 16;

pub(crate) fn solve_cubic(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    c: ExprId,
    d: ExprId,
    rctx: &ReductionContext,
) -> Result<SolveResult, SolveError> {
    let mut discriminant = cubic_discriminant(reducer, a, b, c, d, rctx)?;
    if reducer.context.get(discriminant).is_sentinel() {
        return Ok(SolveResult {
            roots: Vec::new(),
            discriminant,
            approximate: false,
        });
    }
    if count_nodes(&reducer.context, discriminant) > MAX_DISCRIMINANT_NODES {
        let v = numeric(reducer, discriminant, rctx);
        if let Some(id) = complex_to_expr(&mut reducer.context, v, ComplexPolicy::Cartesian) {
            discriminant = id;
        }
    }

    // A zero constant term factors the polynomial by x.
    if is_provably_zero(reducer, d, rctx) {
        let zero = reducer.context.num(0);
        return deflate(reducer, a, b, c, d, zero, discriminant, rctx);
    }

    // Depressed a*x^3 + d: the real cube root times the cube roots of
    // unity. All three roots are cheap, so the quadratic deflation is
    // skipped.
    if is_provably_zero(reducer, b, rctx) && is_provably_zero(reducer, c, rctx) {
        return solve_depressed(reducer, a, d, discriminant, rctx);
    }

    // Polynomials of the forms k*x^2*(c*x+d)+c*x+d and
    // k*x*(b*x^2+d)+b*x^2+d have the simple root -d/c.
    let ratio = {
        let ctx = &mut reducer.context;
        let minus_d = neg(ctx, d);
        div2(ctx, minus_d, c)
    };
    let candidate = reducer.reduce(ratio, rctx)?;
    if !reducer.context.get(candidate).is_sentinel()
        && is_root(reducer, &[d, c, b, a], candidate, rctx)?
    {
        return deflate(reducer, a, b, c, d, candidate, discriminant, rctx);
    }

    // Rational coefficients: rational root theorem.
    if let Some(coeffs) = rational_coefficients(reducer, &[d, c, b, a]) {
        if let Some(r) = find_rational_root(&coeffs) {
            let root = reducer.context.number(r);
            return deflate(reducer, a, b, c, d, root, discriminant, rctx);
        }
    }

    // b is minus the sum of the roots; an irrational root left explicit
    // in b's addends may survive reduction.
    if let Some(root) = sum_root_search(reducer, a, b, &[d, c, b, a], rctx)? {
        return deflate(reducer, a, b, c, d, root, discriminant, rctx);
    }

    cardano(reducer, a, b, c, d, discriminant, rctx)
}

/// Δ = (bc)² + 18abcd − 27(ad)² − 4ac³ − 4db³, reduced.
fn cubic_discriminant(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    c: ExprId,
    d: ExprId,
    rctx: &ReductionContext,
) -> Result<ExprId, EngineError> {
    let ctx = &mut reducer.context;
    let bc = mul2(ctx, b, c);
    let bc_squared = pow_int(ctx, bc, 2);
    let eighteen = ctx.num(18);
    let abcd = {
        let ab = mul2(ctx, a, b);
        let cd = mul2(ctx, c, d);
        mul2(ctx, ab, cd)
    };
    let term18 = mul2(ctx, eighteen, abcd);
    let minus27 = ctx.num(-27);
    let ad = mul2(ctx, a, d);
    let ad_squared = pow_int(ctx, ad, 2);
    let term27 = mul2(ctx, minus27, ad_squared);
    let minus4 = ctx.num(-4);
    let c_cubed = pow_int(ctx, c, 3);
    let term4ac = mul3(ctx, minus4, a, c_cubed);
    let minus4b = ctx.num(-4);
    let b_cubed = pow_int(ctx, b, 3);
    let term4db = mul3(ctx, minus4b, d, b_cubed);
    let delta = nary::build_add(ctx, &[bc_squared, term18, term27, term4ac, term4db]);
    reducer.reduce(delta, rctx)
}

fn rational_coefficients(
    reducer: &Reducer,
    ids: &[ExprId],
) -> Option<Vec<num_rational::BigRational>> {
    ids.iter()
        .map(|&id| reducer.context.get(id).as_number().cloned())
        .collect()
}

fn sum_root_search(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    coeffs: &[ExprId],
    rctx: &ReductionContext,
) -> Result<Option<ExprId>, SolveError> {
    let addends = match reducer.context.get(b) {
        Expr::Add(_, _) => nary::add_operands(&reducer.context, b),
        _ => vec![b],
    };
    for term in addends {
        let quotient = {
            let ctx = &mut reducer.context;
            let minus_term = neg(ctx, term);
            div2(ctx, minus_term, a)
        };
        let candidate = reducer.reduce(quotient, rctx)?;
        if !reducer.context.get(candidate).is_sentinel()
            && is_root(reducer, coeffs, candidate, rctx)?
        {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// One root in hand: factor it out and solve the remaining quadratic.
/// The quotient of `ax^3+bx^2+cx+d` by `(x - r)` is
/// `ax^2 + (b + ar)x + gamma` with `gamma = c` when r is zero and
/// `-d/r` otherwise.
fn deflate(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    c: ExprId,
    d: ExprId,
    root: ExprId,
    discriminant: ExprId,
    rctx: &ReductionContext,
) -> Result<SolveResult, SolveError> {
    let beta = {
        let ctx = &mut reducer.context;
        let ar = mul2(ctx, a, root);
        add2(ctx, b, ar)
    };
    let beta = reducer.reduce(beta, rctx)?;
    let gamma = if is_provably_zero(reducer, root, rctx) {
        c
    } else {
        let ctx = &mut reducer.context;
        let quotient = div2(ctx, d, root);
        let negated = neg(ctx, quotient);
        reducer.reduce(negated, rctx)?
    };
    let quadratic = solve_quadratic(reducer, a, beta, gamma, rctx)?;

    let mut roots = Vec::with_capacity(3);
    if keep_root(reducer, root, rctx) {
        roots.push(root);
    }
    roots.extend(quadratic.roots);
    dedup_structural(reducer, &mut roots);
    Ok(SolveResult {
        roots,
        discriminant,
        approximate: quadratic.approximate,
    })
}

/// `a*x^3 + d = 0`: root1 = ∛(-d/a), root2 = ζ·root1, root3 = ζ̄·root1
/// with ζ = (-1 + i√3)/2.
fn solve_depressed(
    reducer: &mut Reducer,
    a: ExprId,
    d: ExprId,
    discriminant: ExprId,
    rctx: &ReductionContext,
) -> Result<SolveResult, SolveError> {
    let radicand = {
        let ctx = &mut reducer.context;
        let minus_d = neg(ctx, d);
        div2(ctx, minus_d, a)
    };
    let principal = {
        let ctx = &mut reducer.context;
        cbrt(ctx, radicand)
    };
    let principal = reducer.reduce(principal, rctx)?;

    let mut roots = Vec::with_capacity(3);
    roots.push(principal);
    for conjugate in [false, true] {
        let ctx = &mut reducer.context;
        let zeta = unity_root(ctx, conjugate);
        let rotated = mul2(ctx, principal, zeta);
        roots.push(reducer.reduce(rotated, rctx)?);
    }
    roots.retain(|&r| keep_root(reducer, r, rctx));
    dedup_structural(reducer, &mut roots);
    Ok(SolveResult {
        roots,
        discriminant,
        approximate: false,
    })
}

/// ζ = (-1 + i√3)/2, or its conjugate.
fn unity_root(ctx: &mut calc_ast::Context, conjugate: bool) -> ExprId {
    let three = ctx.num(3);
    let sqrt3 = sqrt(ctx, three);
    let i = ctx.constant(Constant::I);
    let imaginary = mul2(ctx, i, sqrt3);
    let minus_one = ctx.num(-1);
    let numerator = if conjugate {
        sub2(ctx, minus_one, imaginary)
    } else {
        add2(ctx, minus_one, imaginary)
    };
    let two = ctx.num(2);
    div2(ctx, numerator, two)
}

fn cardano(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    c: ExprId,
    d: ExprId,
    discriminant: ExprId,
    rctx: &ReductionContext,
) -> Result<SolveResult, SolveError> {
    let sign = crate::support::discriminant_sign(reducer, discriminant, rctx);

    // Δ0 = b² − 3ac
    let delta0 = {
        let ctx = &mut reducer.context;
        let b_squared = pow_int(ctx, b, 2);
        let three = ctx.num(3);
        let three_ac = mul3(ctx, three, a, c);
        sub2(ctx, b_squared, three_ac)
    };
    let delta0 = reducer.reduce(delta0, rctx)?;

    if sign == 0 {
        return multiple_root_cubic(reducer, a, b, c, d, delta0, discriminant, rctx);
    }

    // Δ1 = 2b³ − 9abc + 27a²d
    let delta1 = {
        let ctx = &mut reducer.context;
        let two = ctx.num(2);
        let b_cubed = pow_int(ctx, b, 3);
        let term2 = mul2(ctx, two, b_cubed);
        let minus9 = ctx.num(-9);
        let abc = mul3(ctx, a, b, c);
        let term9 = mul2(ctx, minus9, abc);
        let twenty_seven = ctx.num(27);
        let a_squared = pow_int(ctx, a, 2);
        let a2d = mul2(ctx, a_squared, d);
        let term27 = mul2(ctx, twenty_seven, a2d);
        let sum = add2(ctx, term2, term9);
        add2(ctx, sum, term27)
    };
    let delta1 = reducer.reduce(delta1, rctx)?;

    // Cardano reasons in the complex plane even for real equations, so
    // the intermediate reductions run under the cartesian policy.
    let cartesian = rctx.with_complex_policy(ComplexPolicy::Cartesian);
    let cardano = cardano_number(reducer, delta0, delta1, &cartesian)?;

    let exact = match reducer.context.get(cardano) {
        Expr::Number(n) => !num_traits::Zero::is_zero(n),
        _ => false,
    };
    if exact {
        debug!("exact Cardano number, building symbolic roots");
        let mut roots = cardano_roots_symbolic(reducer, a, b, delta0, cardano, rctx)?;
        roots.retain(|&r| keep_root(reducer, r, rctx));
        dedup_structural(reducer, &mut roots);
        return Ok(SolveResult {
            roots,
            discriminant,
            approximate: false,
        });
    }

    match cardano_roots_numeric(reducer, a, b, c, d, sign, rctx) {
        Some(mut roots) => {
            dedup_structural(reducer, &mut roots);
            Ok(SolveResult {
                roots,
                discriminant,
                approximate: true,
            })
        }
        None => Err(SolveError::NoClosedForm),
    }
}

/// Δ = 0: either a triple root −b/3a, or a double root
/// (9ad − bc)/2Δ0 next to the simple root (4abc − 9a²d − b³)/aΔ0.
fn multiple_root_cubic(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    c: ExprId,
    d: ExprId,
    delta0: ExprId,
    discriminant: ExprId,
    rctx: &ReductionContext,
) -> Result<SolveResult, SolveError> {
    let mut roots = Vec::with_capacity(2);
    if is_provably_zero(reducer, delta0, rctx) {
        let quotient = {
            let ctx = &mut reducer.context;
            let minus3 = ctx.num(-3);
            let denominator = mul2(ctx, minus3, a);
            div2(ctx, b, denominator)
        };
        roots.push(reducer.reduce(quotient, rctx)?);
    } else {
        let double = {
            let ctx = &mut reducer.context;
            let nine = ctx.num(9);
            let nine_ad = mul3(ctx, nine, a, d);
            let bc = mul2(ctx, b, c);
            let numerator = sub2(ctx, nine_ad, bc);
            let two = ctx.num(2);
            let denominator = mul2(ctx, two, delta0);
            div2(ctx, numerator, denominator)
        };
        roots.push(reducer.reduce(double, rctx)?);
        let simple = {
            let ctx = &mut reducer.context;
            let four = ctx.num(4);
            let ab = mul2(ctx, a, b);
            let four_abc = mul3(ctx, four, ab, c);
            let minus9 = ctx.num(-9);
            let a_squared = pow_int(ctx, a, 2);
            let a2d = mul2(ctx, a_squared, d);
            let term9 = mul2(ctx, minus9, a2d);
            let b_cubed = pow_int(ctx, b, 3);
            let sum = add2(ctx, four_abc, term9);
            let numerator = sub2(ctx, sum, b_cubed);
            let denominator = mul2(ctx, a, delta0);
            div2(ctx, numerator, denominator)
        };
        roots.push(reducer.reduce(simple, rctx)?);
    }
    roots.retain(|&r| keep_root(reducer, r, rctx));
    dedup_structural(reducer, &mut roots);
    Ok(SolveResult {
        roots,
        discriminant,
        approximate: false,
    })
}

/// C = ∛((Δ1 ± √(Δ1² − 4Δ0³))/2). The sign follows Δ1 so the larger
/// of the two candidates is kept and cancellation is avoided; when Δ0
/// is zero, C = ∛Δ1.
fn cardano_number(
    reducer: &mut Reducer,
    delta0: ExprId,
    delta1: ExprId,
    rctx: &ReductionContext,
) -> Result<ExprId, SolveError> {
    let radicand = if is_provably_zero(reducer, delta0, rctx) {
        delta1
    } else {
        let inner = {
            let ctx = &mut reducer.context;
            let delta1_squared = pow_int(ctx, delta1, 2);
            let four = ctx.num(4);
            let delta0_cubed = pow_int(ctx, delta0, 3);
            let four_d0 = mul2(ctx, four, delta0_cubed);
            sub2(ctx, delta1_squared, four_d0)
        };
        let radical = {
            let ctx = &mut reducer.context;
            sqrt(ctx, inner)
        };
        let delta1_negative = numeric(reducer, delta1, rctx).re < 0.0;
        let ctx = &mut reducer.context;
        let numerator = if delta1_negative {
            sub2(ctx, delta1, radical)
        } else {
            add2(ctx, delta1, radical)
        };
        let two = ctx.num(2);
        div2(ctx, numerator, two)
    };
    let root = cbrt(&mut reducer.context, radicand);
    Ok(reducer.reduce(root, rctx)?)
}

/// Roots −(b + ζᵏC + Δ0/(ζᵏC))/3a for k = 0, 1, 2, in that order.
fn cardano_roots_symbolic(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    delta0: ExprId,
    cardano_number: ExprId,
    rctx: &ReductionContext,
) -> Result<Vec<ExprId>, SolveError> {
    let mut roots = Vec::with_capacity(3);
    for k in 0..3u8 {
        let quotient = {
            let ctx = &mut reducer.context;
            let cz = match k {
                0 => cardano_number,
                _ => {
                    let zeta = unity_root(ctx, k == 2);
                    mul2(ctx, cardano_number, zeta)
                }
            };
            let correction = div2(ctx, delta0, cz);
            let sum = add2(ctx, b, cz);
            let numerator = add2(ctx, sum, correction);
            let minus3 = ctx.num(-3);
            let denominator = mul2(ctx, minus3, a);
            div2(ctx, numerator, denominator)
        };
        roots.push(reducer.reduce(quotient, rctx)?);
    }
    Ok(roots)
}

/// Numeric Cardano. For a real equation a positive Δ means three real
/// roots (imaginary residue is rounding noise and is stripped); a
/// negative Δ means exactly one real root, the one with the smallest
/// imaginary magnitude.
fn cardano_roots_numeric(
    reducer: &mut Reducer,
    a: ExprId,
    b: ExprId,
    c: ExprId,
    d: ExprId,
    sign: i8,
    rctx: &ReductionContext,
) -> Option<Vec<ExprId>> {
    let av = numeric(reducer, a, rctx);
    let bv = numeric(reducer, b, rctx);
    let cv = numeric(reducer, c, rctx);
    let dv = numeric(reducer, d, rctx);
    if [av, bv, cv, dv]
        .iter()
        .any(|v| v.re.is_nan() || v.im.is_nan())
    {
        return None;
    }
    let real_equation = [av, bv, cv, dv].iter().all(|v| v.im == 0.0);

    let delta0 = bv * bv - 3.0 * av * cv;
    let delta1 = 2.0 * bv * bv * bv - 9.0 * av * bv * cv + 27.0 * av * av * dv;
    let mut radical = (delta1 * delta1 - 4.0 * delta0 * delta0 * delta0).sqrt();
    if (delta1 + radical).norm() < (delta1 - radical).norm() {
        radical = -radical;
    }
    let mut cardano = ((delta1 + radical) / 2.0).cbrt();
    if cardano.norm() == 0.0 {
        cardano = delta1.cbrt();
    }
    if cardano.norm() == 0.0 {
        // Triple root; the multiple-root branch should have caught it.
        let z = -bv / (3.0 * av);
        return Some(
            complex_to_expr(&mut reducer.context, z, rctx.complex_policy)
                .into_iter()
                .collect(),
        );
    }

    let zeta = Complex64::new(-0.5, 0.75f64.sqrt());
    let mut values = [Complex64::new(0.0, 0.0); 3];
    for (k, value) in values.iter_mut().enumerate() {
        let cz = cardano * zeta.powu(k as u32);
        *value = -(bv + cz + delta0 / cz) / (3.0 * av);
    }

    if real_equation && sign > 0 {
        for v in values.iter_mut() {
            v.im = 0.0;
        }
    } else if real_equation && sign < 0 {
        let lone = values
            .iter()
            .enumerate()
            .min_by(|(_, x), (_, y)| x.im.abs().total_cmp(&y.im.abs()))
            .map(|(k, _)| k)
            .unwrap();
        values[lone].im = 0.0;
    }

    let mut roots = Vec::with_capacity(3);
    for v in values {
        if let Some(id) = complex_to_expr(&mut reducer.context, v, rctx.complex_policy) {
            roots.push(id);
        }
    }
    Some(roots)
}

fn dedup_structural(reducer: &Reducer, roots: &mut Vec<ExprId>) {
    let mut kept: Vec<ExprId> = Vec::with_capacity(roots.len());
    roots.retain(|&r| {
        if kept.iter().any(|&k| structural_eq(&reducer.context, k, r)) {
            false
        } else {
            kept.push(r);
            true
        }
    });
}
