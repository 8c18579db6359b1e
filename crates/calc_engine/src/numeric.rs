//! Exact rational arithmetic helpers shared by the rules.
//!
//! Folding is bounded: results that would blow past the digit budget of
//! an embedded calculator stay symbolic rather than grow without limit.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Largest integer exponent the engine folds eagerly.
pub const MAX_FOLDED_EXPONENT: i64 = 256;

/// Largest argument `factorial` folds to an exact integer.
pub const MAX_FACTORIAL: u64 = 100;

/// `base^exp` by repeated squaring, refusing exponents past the budget.
pub fn pow_rational(base: &BigRational, exp: i64) -> Option<BigRational> {
    if exp.abs() > MAX_FOLDED_EXPONENT {
        return None;
    }
    if exp == 0 {
        return if base.is_zero() {
            None
        } else {
            Some(BigRational::one())
        };
    }
    if base.is_zero() {
        return if exp > 0 {
            Some(BigRational::zero())
        } else {
            None
        };
    }
    let mut result = BigRational::one();
    let mut square = if exp > 0 { base.clone() } else { base.recip() };
    let mut remaining = exp.unsigned_abs();
    while remaining > 0 {
        if remaining & 1 == 1 {
            result *= &square;
        }
        square = &square * &square;
        remaining >>= 1;
    }
    Some(result)
}

/// Exact integer k-th root, if one exists.
pub fn nth_root_exact(n: &BigInt, k: u32) -> Option<BigInt> {
    if k == 0 {
        return None;
    }
    if n.is_negative() && k % 2 == 0 {
        return None;
    }
    let root = n.nth_root(k);
    if root.pow(k) == *n {
        Some(root)
    } else {
        None
    }
}

/// Exact rational k-th root, if both numerator and denominator have one.
pub fn rational_root_exact(r: &BigRational, k: u32) -> Option<BigRational> {
    let numer = nth_root_exact(r.numer(), k)?;
    let denom = nth_root_exact(r.denom(), k)?;
    Some(BigRational::new(numer, denom))
}

/// The value as an i64, when it is an integer in range.
pub fn as_i64(n: &BigRational) -> Option<i64> {
    if n.is_integer() {
        n.numer().to_i64()
    } else {
        None
    }
}

/// The value as a non-negative u64, when it is one.
pub fn as_u64(n: &BigRational) -> Option<u64> {
    if n.is_integer() && !n.is_negative() {
        n.numer().to_u64()
    } else {
        None
    }
}

pub fn factorial(n: u64) -> BigInt {
    let mut acc = BigInt::one();
    for k in 2..=n {
        acc *= k;
    }
    acc
}

/// k-permutations of n: n·(n−1)⋯(n−k+1).
pub fn permutations(n: u64, k: u64) -> BigInt {
    let mut acc = BigInt::one();
    for j in 0..k {
        acc *= n - j;
    }
    acc
}

/// Binomial coefficient, for k ≤ n.
pub fn combinations(n: u64, k: u64) -> BigInt {
    let k = k.min(n - k);
    let mut acc = BigInt::one();
    for j in 0..k {
        acc *= n - j;
        acc /= j + 1;
    }
    acc
}

pub fn gcd_big(a: &BigInt, b: &BigInt) -> BigInt {
    a.gcd(b)
}

pub fn lcm_big(a: &BigInt, b: &BigInt) -> BigInt {
    a.lcm(b)
}

/// Integer k with `base^k == value`, searching both directions.
pub fn integer_log(base: &BigRational, value: &BigRational) -> Option<i64> {
    if base.is_zero() || base.is_one() || !base.is_positive() || !value.is_positive() {
        return None;
    }
    if value.is_one() {
        return Some(0);
    }
    let mut acc = base.clone();
    for k in 1..=128i64 {
        if acc == *value {
            return Some(k);
        }
        acc *= base;
    }
    let recip = base.recip();
    let mut acc = recip.clone();
    for k in 1..=128i64 {
        if acc == *value {
            return Some(-k);
        }
        acc *= &recip;
    }
    None
}
