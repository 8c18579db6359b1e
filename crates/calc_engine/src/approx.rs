//! Numeric evaluation.
//!
//! One generic core computes every node at the precision the context
//! names; `f32` and `f64` instantiations come from the same formulas.
//! Domain errors are NaN, the numeric face of the undefined sentinel,
//! never a Rust error. Random nodes draw from the process-wide
//! generator on every call and are deliberately not memoized.

use crate::options::{ApproxContext, ComplexPolicy, Precision};
use calc_ast::{BuiltinFn, Constant, Context, Expr, ExprId};
use calc_dist::Distribution;
use num_complex::Complex;
use num_traits::{Float, FloatConst, ToPrimitive};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::cell::RefCell;

/// Result of approximating a tree: a scalar, or one value per element
/// for a list-typed subtree. Values are reported in double width even
/// when computed in single precision.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Scalar(Complex<f64>),
    List(Vec<Complex<f64>>),
}

impl Evaluation {
    pub fn scalar(&self) -> Option<Complex<f64>> {
        match self {
            Evaluation::Scalar(c) => Some(*c),
            Evaluation::List(_) => None,
        }
    }

    /// The real value, NaN when the result is complex or a list.
    pub fn real(&self) -> f64 {
        match self.scalar() {
            Some(c) if c.im == 0.0 => c.re,
            _ => f64::NAN,
        }
    }
}

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_entropy());
}

fn random_unit() -> f64 {
    RNG.with(|r| r.borrow_mut().gen::<f64>())
}

/// Evaluate a tree at the precision named in the context.
pub fn approximate(ctx: &Context, expr: ExprId, actx: &ApproxContext) -> Evaluation {
    match actx.precision {
        Precision::Single => match approx_node::<f32>(ctx, expr, actx) {
            Value::Scalar(c) => Evaluation::Scalar(finalize(widen(c), actx)),
            Value::List(v) => {
                Evaluation::List(v.into_iter().map(|c| finalize(widen(c), actx)).collect())
            }
        },
        Precision::Double => match approx_node::<f64>(ctx, expr, actx) {
            Value::Scalar(c) => Evaluation::Scalar(finalize(c, actx)),
            Value::List(v) => Evaluation::List(v.into_iter().map(|c| finalize(c, actx)).collect()),
        },
    }
}

/// Convenience entry for callers that expect a real scalar.
pub fn approximate_real(ctx: &Context, expr: ExprId, actx: &ApproxContext) -> f64 {
    approximate(ctx, expr, actx).real()
}

fn widen(c: Complex<f32>) -> Complex<f64> {
    Complex::new(c.re as f64, c.im as f64)
}

/// Under the real policy a complex result is the numeric nonreal
/// sentinel.
fn finalize(c: Complex<f64>, actx: &ApproxContext) -> Complex<f64> {
    if actx.complex_policy == ComplexPolicy::Real && c.im != 0.0 {
        return Complex::new(f64::NAN, 0.0);
    }
    c
}

enum Value<T> {
    Scalar(Complex<T>),
    List(Vec<Complex<T>>),
}

fn approx_node<T: Float + FloatConst>(
    ctx: &Context,
    expr: ExprId,
    actx: &ApproxContext,
) -> Value<T> {
    if let Expr::List(items) = ctx.get(expr) {
        return Value::List(items.iter().map(|&i| scalar(ctx, i, actx)).collect());
    }
    Value::Scalar(scalar(ctx, expr, actx))
}

fn nan<T: Float>() -> Complex<T> {
    Complex::new(T::nan(), T::zero())
}

fn real<T: Float>(x: T) -> Complex<T> {
    Complex::new(x, T::zero())
}

fn from_f64<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// The value as a real, when the imaginary part is exactly zero.
fn real_part<T: Float>(c: Complex<T>) -> Option<T> {
    if c.im == T::zero() {
        Some(c.re)
    } else {
        None
    }
}

fn as_integer<T: Float>(x: T) -> Option<i64> {
    if x.fract() == T::zero() {
        x.to_f64().and_then(|v| {
            if v.abs() < 9.0e15 {
                Some(v as i64)
            } else {
                None
            }
        })
    } else {
        None
    }
}

fn scalar<T: Float + FloatConst>(ctx: &Context, expr: ExprId, actx: &ApproxContext) -> Complex<T> {
    match ctx.get(expr) {
        Expr::Number(n) => real(from_f64(n.to_f64().unwrap_or(f64::NAN))),
        Expr::Constant(c) => match c {
            Constant::Pi => real(T::PI()),
            Constant::E => real(T::E()),
            Constant::I => Complex::new(T::zero(), T::one()),
            Constant::Infinity => real(T::infinity()),
        },
        Expr::Variable(sym) => {
            let name = ctx.sym_name(*sym);
            match actx.symbols.resolve(name) {
                Some(bound) => scalar::<T>(ctx, bound, actx),
                None => nan(),
            }
        }
        Expr::Add(l, r) => scalar::<T>(ctx, *l, actx) + scalar::<T>(ctx, *r, actx),
        Expr::Sub(l, r) => scalar::<T>(ctx, *l, actx) - scalar::<T>(ctx, *r, actx),
        Expr::Mul(l, r) => scalar::<T>(ctx, *l, actx) * scalar::<T>(ctx, *r, actx),
        Expr::Div(l, r) => {
            let denom = scalar::<T>(ctx, *r, actx);
            if denom == Complex::new(T::zero(), T::zero()) {
                return nan();
            }
            scalar::<T>(ctx, *l, actx) / denom
        }
        Expr::Pow(b, e) => {
            let base = scalar::<T>(ctx, *b, actx);
            let exp = scalar::<T>(ctx, *e, actx);
            complex_pow(base, exp)
        }
        Expr::Neg(e) => -scalar::<T>(ctx, *e, actx),
        Expr::Percent(e) => scalar::<T>(ctx, *e, actx) / real(from_f64(100.0)),
        Expr::Function(name, args) => {
            let builtin = match ctx.builtin_of(*name) {
                Some(b) => b,
                None => return nan(),
            };
            apply_builtin(ctx, builtin, args, actx)
        }
        Expr::Random => real(from_f64(random_unit())),
        Expr::List(_) | Expr::Comparison(_, _, _) | Expr::Undefined | Expr::Nonreal => nan(),
    }
}

/// Powers stay on the real path whenever the inputs allow it, so real
/// results carry no imaginary rounding residue.
fn complex_pow<T: Float>(base: Complex<T>, exp: Complex<T>) -> Complex<T> {
    let zero = T::zero();
    if base.im == zero && exp.im == zero {
        let (b, x) = (base.re, exp.re);
        if b == zero {
            if x > zero {
                return real(zero);
            }
            return nan();
        }
        if let Some(k) = as_integer(x) {
            if k.abs() < i32::MAX as i64 {
                return real(b.powi(k as i32));
            }
        }
        if b > zero {
            return real(b.powf(x));
        }
    }
    if base == Complex::new(zero, zero) {
        return nan();
    }
    base.powc(exp)
}

fn apply_builtin<T: Float + FloatConst>(
    ctx: &Context,
    builtin: BuiltinFn,
    args: &[ExprId],
    actx: &ApproxContext,
) -> Complex<T> {
    let arg = |i: usize| -> Complex<T> {
        args.get(i)
            .map(|&a| scalar(ctx, a, actx))
            .unwrap_or_else(nan)
    };
    let to_radians = from_f64::<T>(actx.angle_unit.radians_per_unit());
    let zero = Complex::new(T::zero(), T::zero());

    match builtin {
        BuiltinFn::Sin => (arg(0) * to_radians).sin(),
        BuiltinFn::Cos => (arg(0) * to_radians).cos(),
        BuiltinFn::Tan => (arg(0) * to_radians).tan(),
        BuiltinFn::Sec => {
            let c = (arg(0) * to_radians).cos();
            if c == zero {
                nan()
            } else {
                c.inv()
            }
        }
        BuiltinFn::Csc => {
            let s = (arg(0) * to_radians).sin();
            if s == zero {
                nan()
            } else {
                s.inv()
            }
        }
        BuiltinFn::Cot => {
            let s = (arg(0) * to_radians).sin();
            if s == zero {
                nan()
            } else {
                (arg(0) * to_radians).cos() / s
            }
        }
        BuiltinFn::Asin => arg(0).asin() / to_radians,
        BuiltinFn::Acos => arg(0).acos() / to_radians,
        BuiltinFn::Atan => arg(0).atan() / to_radians,
        BuiltinFn::Asec => {
            let x = arg(0);
            if x == zero {
                nan()
            } else {
                x.inv().acos() / to_radians
            }
        }
        BuiltinFn::Acsc => {
            let x = arg(0);
            if x == zero {
                nan()
            } else {
                x.inv().asin() / to_radians
            }
        }
        BuiltinFn::Acot => {
            let x = arg(0);
            if x == zero {
                nan()
            } else {
                x.inv().atan() / to_radians
            }
        }
        BuiltinFn::Sinh => arg(0).sinh(),
        BuiltinFn::Cosh => arg(0).cosh(),
        BuiltinFn::Tanh => arg(0).tanh(),
        BuiltinFn::Ln => {
            let x = arg(0);
            if x == zero {
                nan()
            } else {
                x.ln()
            }
        }
        BuiltinFn::Log => {
            let x = arg(0);
            if x == zero {
                return nan();
            }
            let base = if args.len() == 2 {
                arg(1)
            } else {
                real(from_f64(10.0))
            };
            if base == zero || base == Complex::new(T::one(), T::zero()) {
                return nan();
            }
            x.ln() / base.ln()
        }
        BuiltinFn::Exp => arg(0).exp(),
        BuiltinFn::Sqrt => arg(0).sqrt(),
        BuiltinFn::Root => nth_root(arg(0), arg(1)),
        BuiltinFn::Abs => real(arg(0).norm()),
        BuiltinFn::Sign => match real_part(arg(0)) {
            Some(x) if x.is_nan() => nan(),
            Some(x) if x == T::zero() => real(T::zero()),
            Some(x) => real(x.signum()),
            None => nan(),
        },
        BuiltinFn::Floor => real_map(arg(0), T::floor),
        BuiltinFn::Ceil => real_map(arg(0), T::ceil),
        BuiltinFn::Round => real_map(arg(0), T::round),
        BuiltinFn::Factorial => match real_part(arg(0)).and_then(as_integer) {
            Some(n) if n >= 0 => real(integer_product(1, n)),
            _ => nan(),
        },
        BuiltinFn::Permute => match integer_pair(arg(0), arg(1)) {
            Some((n, k)) if k > n => real(T::zero()),
            Some((n, k)) => real(integer_product(n - k + 1, n)),
            None => nan(),
        },
        BuiltinFn::Binomial => match integer_pair(arg(0), arg(1)) {
            Some((n, k)) if k > n => real(T::zero()),
            Some((n, k)) => {
                let above: T = integer_product(n - k + 1, n);
                let below: T = integer_product(1, k);
                real(above / below)
            }
            None => nan(),
        },
        BuiltinFn::Gcd => match integer_pair(arg(0), arg(1)) {
            Some((a, b)) => real(from_f64(gcd_i64(a.abs(), b.abs()) as f64)),
            None => nan(),
        },
        BuiltinFn::Lcm => match integer_pair(arg(0), arg(1)) {
            Some((a, b)) => {
                let g = gcd_i64(a.abs(), b.abs());
                if g == 0 {
                    real(T::zero())
                } else {
                    real(from_f64(((a.abs() / g) * b.abs()) as f64))
                }
            }
            None => nan(),
        },
        BuiltinFn::Min | BuiltinFn::Max => {
            let values = match list_values(ctx, args, actx) {
                Some(v) if !v.is_empty() => v,
                _ => return nan(),
            };
            let mut best: T = match real_part(values[0]) {
                Some(x) => x,
                None => return nan(),
            };
            for &v in &values[1..] {
                let x = match real_part(v) {
                    Some(x) => x,
                    None => return nan(),
                };
                best = match builtin {
                    BuiltinFn::Min => best.min(x),
                    _ => best.max(x),
                };
            }
            real(best)
        }
        BuiltinFn::Sum => match list_values(ctx, args, actx) {
            Some(v) => v.into_iter().fold(zero, |acc, x| acc + x),
            None => nan(),
        },
        BuiltinFn::Product => match list_values(ctx, args, actx) {
            Some(v) => v
                .into_iter()
                .fold(Complex::new(T::one(), T::zero()), |acc, x| acc * x),
            None => nan(),
        },
        BuiltinFn::Dim => match args.first().map(|&a| ctx.get(a)) {
            Some(Expr::List(items)) => real(from_f64(items.len() as f64)),
            _ => nan(),
        },
        // Sorting is a tree operation; its approximation is undefined.
        BuiltinFn::Sort => nan(),

        BuiltinFn::BinomPdf | BuiltinFn::BinomCdf | BuiltinFn::InvBinom => {
            dist_eval(builtin, arg(0), binomial_dist(arg(1), arg(2)))
        }
        BuiltinFn::NormPdf | BuiltinFn::NormCdf | BuiltinFn::InvNorm => {
            let (mu, sigma) = if args.len() == 3 {
                (arg(1), arg(2))
            } else {
                (zero, Complex::new(T::one(), T::zero()))
            };
            dist_eval(builtin, arg(0), normal_dist(mu, sigma))
        }
        BuiltinFn::TPdf | BuiltinFn::TCdf | BuiltinFn::InvT => {
            dist_eval(builtin, arg(0), student_dist(arg(1)))
        }
        BuiltinFn::GeomPdf | BuiltinFn::GeomCdf | BuiltinFn::InvGeom => {
            dist_eval(builtin, arg(0), geometric_dist(arg(1)))
        }
        BuiltinFn::PoissonPdf | BuiltinFn::PoissonCdf => {
            dist_eval(builtin, arg(0), poisson_dist(arg(1)))
        }
        BuiltinFn::Chi2Pdf | BuiltinFn::Chi2Cdf | BuiltinFn::InvChi2 => {
            dist_eval(builtin, arg(0), chi_squared_dist(arg(1)))
        }
    }
}

fn real_map<T: Float>(c: Complex<T>, f: impl Fn(T) -> T) -> Complex<T> {
    match real_part(c) {
        Some(x) => real(f(x)),
        None => nan(),
    }
}

/// Product of the integers in [lo, hi], as a float.
fn integer_product<T: Float>(lo: i64, hi: i64) -> T {
    let mut acc = T::one();
    let mut k = lo.max(1);
    while k <= hi {
        acc = acc * T::from(k).unwrap_or_else(T::nan);
        k += 1;
    }
    acc
}

fn integer_pair<T: Float>(a: Complex<T>, b: Complex<T>) -> Option<(i64, i64)> {
    let a = real_part(a).and_then(as_integer)?;
    let b = real_part(b).and_then(as_integer)?;
    if a < 0 || b < 0 {
        return None;
    }
    Some((a, b))
}

fn gcd_i64(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// nth root with the real branch for odd roots of negative reals.
fn nth_root<T: Float>(x: Complex<T>, degree: Complex<T>) -> Complex<T> {
    let n = match real_part(degree).and_then(as_integer) {
        Some(n) if n != 0 => n,
        _ => return nan(),
    };
    let inv = T::one() / T::from(n).unwrap_or_else(T::nan);
    if x.im == T::zero() && x.re < T::zero() && n % 2 != 0 {
        let magnitude = (-x.re).powf(inv);
        return real(if n > 0 { -magnitude } else { -magnitude.recip() });
    }
    complex_pow(x, real(inv))
}

fn evaluate_list_arg<T: Float + FloatConst>(
    ctx: &Context,
    arg: ExprId,
    actx: &ApproxContext,
) -> Option<Vec<Complex<T>>> {
    match ctx.get(arg) {
        Expr::List(items) => Some(items.iter().map(|&i| scalar(ctx, i, actx)).collect()),
        _ => None,
    }
}

fn list_values<T: Float + FloatConst>(
    ctx: &Context,
    args: &[ExprId],
    actx: &ApproxContext,
) -> Option<Vec<Complex<T>>> {
    args.first().and_then(|&a| evaluate_list_arg(ctx, a, actx))
}

// ---- distribution bridging ----

fn binomial_dist<T: Float>(n: Complex<T>, p: Complex<T>) -> Option<Distribution<T>> {
    Some(Distribution::Binomial {
        n: real_part(n)?,
        p: real_part(p)?,
    })
}

fn normal_dist<T: Float>(mu: Complex<T>, sigma: Complex<T>) -> Option<Distribution<T>> {
    Some(Distribution::Normal {
        mu: real_part(mu)?,
        sigma: real_part(sigma)?,
    })
}

fn student_dist<T: Float>(k: Complex<T>) -> Option<Distribution<T>> {
    Some(Distribution::Student { k: real_part(k)? })
}

fn geometric_dist<T: Float>(p: Complex<T>) -> Option<Distribution<T>> {
    Some(Distribution::Geometric { p: real_part(p)? })
}

fn poisson_dist<T: Float>(lambda: Complex<T>) -> Option<Distribution<T>> {
    Some(Distribution::Poisson {
        lambda: real_part(lambda)?,
    })
}

fn chi_squared_dist<T: Float>(k: Complex<T>) -> Option<Distribution<T>> {
    Some(Distribution::ChiSquared { k: real_part(k)? })
}

fn dist_eval<T: Float + FloatConst>(
    builtin: BuiltinFn,
    x: Complex<T>,
    dist: Option<Distribution<T>>,
) -> Complex<T> {
    let dist = match dist {
        Some(d) => d,
        None => return nan(),
    };
    let x = match real_part(x) {
        Some(x) => x,
        None => return nan(),
    };
    let value = match builtin {
        BuiltinFn::BinomPdf
        | BuiltinFn::NormPdf
        | BuiltinFn::TPdf
        | BuiltinFn::GeomPdf
        | BuiltinFn::PoissonPdf
        | BuiltinFn::Chi2Pdf => dist.pdf(x),
        BuiltinFn::BinomCdf
        | BuiltinFn::NormCdf
        | BuiltinFn::TCdf
        | BuiltinFn::GeomCdf
        | BuiltinFn::PoissonCdf
        | BuiltinFn::Chi2Cdf => dist.cdf(x),
        _ => dist.inverse_cdf(x),
    };
    real(value)
}
