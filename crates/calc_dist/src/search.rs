//! Root bracketing and bisection for inverse CDFs.
//!
//! PRECONDITION: `f` must be monotonic increasing (a CDF shifted by the
//! target probability). The bracket expansion tests [0,10], [10,100],
//! [100,1000]… — or the mirrored intervals when the root lies left of
//! zero — so a non-monotonic function yields an unspecified result.
//! Callers own that guarantee; the search does not try to detect
//! violations.

use num_traits::Float;

/// Growth steps before giving up, ≈ log₁₀ of the largest double.
pub const MAX_BRACKET_ITERATIONS: usize = 308;

pub const MAX_BISECTION_ITERATIONS: usize = 300;

/// Find [xmin, xmax] enclosing the sign change of `f`, expanding the
/// upper bound tenfold per step. The final interval is widened by one on
/// each side so the bounds are never too close to the root.
pub fn bracket_root<T: Float>(f: impl Fn(T) -> T) -> (T, T) {
    let ten = T::from(10.0).unwrap_or_else(T::nan);
    let mut xmin = T::zero();
    let mut xmax = ten;
    let sign_of_root = if f(T::zero()) < T::zero() {
        T::one()
    } else {
        -T::one()
    };

    let mut iteration = 0;
    while sign_of_root * f(sign_of_root * xmax) < T::zero()
        && iteration < MAX_BRACKET_ITERATIONS
    {
        xmin = xmax;
        xmax = xmax * ten;
        iteration += 1;
    }
    xmax = xmax + T::one();
    xmin = xmin - T::one();

    if sign_of_root < T::zero() {
        (-xmax, -xmin)
    } else {
        (xmin, xmax)
    }
}

/// Bisection on an increasing `f` with a sign change in [lo, hi].
pub fn bisect<T: Float>(f: impl Fn(T) -> T, mut lo: T, mut hi: T, tolerance: T) -> T {
    let two = T::from(2.0).unwrap_or_else(T::nan);
    let mut mid = (lo + hi) / two;
    for _ in 0..MAX_BISECTION_ITERATIONS {
        if hi - lo <= tolerance {
            break;
        }
        if f(mid) < T::zero() {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = (lo + hi) / two;
    }
    mid
}

/// Bracket then bisect.
pub fn invert_increasing<T: Float>(f: impl Fn(T) -> T, tolerance: T) -> T {
    let (lo, hi) = bracket_root(&f);
    bisect(f, lo, hi, tolerance)
}
