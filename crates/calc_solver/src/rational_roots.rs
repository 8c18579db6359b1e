//! Rational root search.
//!
//! For a polynomial with rational coefficients, any rational root p/q
//! (coprime, after clearing denominators) must have p dividing the
//! constant term and q dividing the leading coefficient. The search
//! enumerates divisor pairs under a fixed budget; a constant term or
//! leading coefficient with too many divisors, or one that does not fit
//! a machine word, makes the search give up rather than run long.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Divisor lists longer than this abort the search.
const MAX_DIVISORS: usize = 64;

/// Largest magnitude worth factoring by trial division.
const MAX_FACTORED: u64 = 1_000_000_000_000;

/// Clear denominators: multiply every coefficient by the lcm of the
/// denominators, producing an integer coefficient vector.
pub fn normalize_to_integers(coeffs: &[BigRational]) -> Vec<BigInt> {
    let mut lcm = BigInt::one();
    for c in coeffs {
        if !c.is_zero() {
            lcm = lcm.lcm(c.denom());
        }
    }
    coeffs
        .iter()
        .map(|c| (c * BigRational::from_integer(lcm.clone())).to_integer())
        .collect()
}

fn positive_divisors(n: &BigInt) -> Option<Vec<BigInt>> {
    let n = n.magnitude().to_u64()?;
    if n == 0 || n > MAX_FACTORED {
        return None;
    }
    let mut low = Vec::new();
    let mut high = Vec::new();
    let mut d = 1u64;
    while d * d <= n {
        if n % d == 0 {
            low.push(BigInt::from(d));
            if d * d != n {
                high.push(BigInt::from(n / d));
            }
            if low.len() + high.len() > MAX_DIVISORS {
                return None;
            }
        }
        d += 1;
    }
    high.reverse();
    low.extend(high);
    Some(low)
}

/// Horner evaluation of the polynomial at `x`, constant term first.
pub fn eval_rational_poly(coeffs: &[BigRational], x: &BigRational) -> BigRational {
    let mut acc = BigRational::zero();
    for c in coeffs.iter().rev() {
        acc = acc * x + c;
    }
    acc
}

/// First rational root found, testing candidates p/q with p and q
/// coprime, smallest numerators first, positive before negative.
pub fn find_rational_root(coeffs: &[BigRational]) -> Option<BigRational> {
    debug_assert!(coeffs.len() >= 2);
    if coeffs[0].is_zero() {
        return Some(BigRational::zero());
    }
    let ints = normalize_to_integers(coeffs);
    let p_divisors = positive_divisors(&ints[0])?;
    let q_divisors = positive_divisors(ints.last().unwrap())?;
    for p in &p_divisors {
        for q in &q_divisors {
            if !p.gcd(q).is_one() {
                // p/q in lowest terms was already tested.
                continue;
            }
            let candidate = BigRational::new(p.clone(), q.clone());
            if eval_rational_poly(coeffs, &candidate).is_zero() {
                return Some(candidate);
            }
            let negated = -candidate;
            if eval_rational_poly(coeffs, &negated).is_zero() {
                return Some(negated);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    #[test]
    fn test_normalize_to_integers() {
        let ints = normalize_to_integers(&[rat(-9, 2), rat(-15, 4), rat(1, 1), rat(1, 1)]);
        assert_eq!(
            ints,
            vec![
                BigInt::from(-18),
                BigInt::from(-15),
                BigInt::from(4),
                BigInt::from(4)
            ]
        );
    }

    #[test]
    fn test_find_integer_root() {
        // (x-1)(x-2)(x-3) = -6 + 11x - 6x^2 + x^3
        let coeffs = [rat(-6, 1), rat(11, 1), rat(-6, 1), rat(1, 1)];
        assert_eq!(find_rational_root(&coeffs), Some(rat(1, 1)));
    }

    #[test]
    fn test_find_fractional_root() {
        // (2x-3)(x+5) = -15 + 7x + 2x^2
        let coeffs = [rat(-15, 1), rat(7, 1), rat(2, 1)];
        assert_eq!(find_rational_root(&coeffs), Some(rat(3, 2)));
    }

    #[test]
    fn test_negative_root() {
        // (x+2)(x^2+1) = 2 + x + 2x^2 + x^3
        let coeffs = [rat(2, 1), rat(1, 1), rat(2, 1), rat(1, 1)];
        assert_eq!(find_rational_root(&coeffs), Some(rat(-2, 1)));
    }

    #[test]
    fn test_no_rational_root() {
        // x^2 - 2
        let coeffs = [rat(-2, 1), rat(0, 1), rat(1, 1)];
        assert_eq!(find_rational_root(&coeffs), None);
    }

    #[test]
    fn test_zero_constant_term() {
        let coeffs = [rat(0, 1), rat(1, 1), rat(1, 1)];
        assert_eq!(find_rational_root(&coeffs), Some(rat(0, 1)));
    }

    #[test]
    fn test_eval_rational_poly() {
        let coeffs = [rat(-6, 1), rat(11, 1), rat(-6, 1), rat(1, 1)];
        assert!(eval_rational_poly(&coeffs, &rat(2, 1)).is_zero());
        assert_eq!(eval_rational_poly(&coeffs, &rat(0, 1)), rat(-6, 1));
    }
}
