//! Statistical distributions: PDF, CDF and inverse CDF at either float
//! width.
//!
//! Parameters live in the variant payloads; invalid parameters make
//! every probability function return NaN (domain errors are data, not
//! errors). Continuous inversion runs the bracket-and-bisect search
//! from `search`; discrete inversion scans the cumulative sum for the
//! smallest abscissa reaching the target probability.

pub mod search;
pub mod special;

use num_traits::Float;
use special::{beta_i, erf, gamma_p, ln_gamma};

const DISCRETE_SCAN_CAP: u64 = 100_000;

fn c<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

fn search_tolerance<T: Float>() -> T {
    T::epsilon().sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution<T> {
    Binomial { n: T, p: T },
    Normal { mu: T, sigma: T },
    Student { k: T },
    Geometric { p: T },
    Poisson { lambda: T },
    ChiSquared { k: T },
}

impl<T: Float> Distribution<T> {
    fn is_valid(&self) -> bool {
        match *self {
            Distribution::Binomial { n, p } => {
                n >= T::zero()
                    && n.fract() == T::zero()
                    && n.is_finite()
                    && p >= T::zero()
                    && p <= T::one()
            }
            Distribution::Normal { mu, sigma } => {
                mu.is_finite() && sigma.is_finite() && sigma > T::zero()
            }
            Distribution::Student { k } => k.is_finite() && k > T::zero(),
            Distribution::Geometric { p } => p > T::zero() && p <= T::one(),
            Distribution::Poisson { lambda } => lambda.is_finite() && lambda > T::zero(),
            Distribution::ChiSquared { k } => k.is_finite() && k > T::zero(),
        }
    }

    pub fn pdf(&self, x: T) -> T {
        if !self.is_valid() || x.is_nan() {
            return T::nan();
        }
        match *self {
            Distribution::Binomial { n, p } => {
                if x < T::zero() || x > n || x.fract() != T::zero() {
                    return T::zero();
                }
                if p == T::zero() {
                    return if x == T::zero() { T::one() } else { T::zero() };
                }
                if p == T::one() {
                    return if x == n { T::one() } else { T::zero() };
                }
                (ln_gamma(n + T::one()) - ln_gamma(x + T::one()) - ln_gamma(n - x + T::one())
                    + x * p.ln()
                    + (n - x) * (T::one() - p).ln())
                .exp()
            }
            Distribution::Normal { mu, sigma } => {
                let z = (x - mu) / sigma;
                (-z * z / c(2.0)).exp()
                    / (sigma
                        * (c::<T>(2.0) * T::from(std::f64::consts::PI).unwrap_or_else(T::nan))
                            .sqrt())
            }
            Distribution::Student { k } => {
                let half = c::<T>(0.5);
                let norm = (ln_gamma((k + T::one()) * half) - ln_gamma(k * half)).exp()
                    / (k * T::from(std::f64::consts::PI).unwrap_or_else(T::nan)).sqrt();
                norm * (T::one() + x * x / k).powf(-(k + T::one()) * half)
            }
            Distribution::Geometric { p } => {
                if x < T::one() || x.fract() != T::zero() {
                    return T::zero();
                }
                p * (T::one() - p).powf(x - T::one())
            }
            Distribution::Poisson { lambda } => {
                if x < T::zero() || x.fract() != T::zero() {
                    return T::zero();
                }
                (-lambda + x * lambda.ln() - ln_gamma(x + T::one())).exp()
            }
            Distribution::ChiSquared { k } => {
                if x <= T::zero() {
                    return T::zero();
                }
                let half = c::<T>(0.5);
                ((k * half - T::one()) * x.ln()
                    - x * half
                    - ln_gamma(k * half)
                    - k * half * c::<T>(2.0).ln())
                .exp()
            }
        }
    }

    pub fn cdf(&self, x: T) -> T {
        if !self.is_valid() || x.is_nan() {
            return T::nan();
        }
        match *self {
            Distribution::Binomial { n, .. } => {
                if x < T::zero() {
                    return T::zero();
                }
                if x >= n {
                    return T::one();
                }
                let mut total = T::zero();
                let mut k = T::zero();
                while k <= x.floor() {
                    total = total + self.pdf(k);
                    k = k + T::one();
                }
                total.min(T::one())
            }
            Distribution::Normal { mu, sigma } => {
                let z = (x - mu) / (sigma * c::<T>(2.0).sqrt());
                (T::one() + erf(z)) / c(2.0)
            }
            Distribution::Student { k } => {
                let half = c::<T>(0.5);
                let x2 = k / (k + x * x);
                let half_tail = half * beta_i(k * half, half, x2);
                if x > T::zero() {
                    T::one() - half_tail
                } else {
                    half_tail
                }
            }
            Distribution::Geometric { p } => {
                if x < T::one() {
                    return T::zero();
                }
                T::one() - (T::one() - p).powf(x.floor())
            }
            Distribution::Poisson { .. } => {
                if x < T::zero() {
                    return T::zero();
                }
                let mut total = T::zero();
                let mut k = T::zero();
                while k <= x.floor() {
                    total = total + self.pdf(k);
                    k = k + T::one();
                }
                total.min(T::one())
            }
            Distribution::ChiSquared { k } => {
                if x <= T::zero() {
                    return T::zero();
                }
                gamma_p(k * c::<T>(0.5), x * c::<T>(0.5))
            }
        }
    }

    /// Smallest abscissa whose CDF reaches `p`.
    ///
    /// Continuous distributions bracket and bisect against their own
    /// CDF, which is monotonic on the support; see the `search` module
    /// for the monotonicity precondition.
    pub fn inverse_cdf(&self, p: T) -> T {
        if !self.is_valid() || p.is_nan() || p < T::zero() || p > T::one() {
            return T::nan();
        }
        match *self {
            Distribution::Binomial { n, .. } => {
                let mut total = T::zero();
                let mut k = T::zero();
                while k <= n {
                    total = total + self.pdf(k);
                    if total >= p {
                        return k;
                    }
                    k = k + T::one();
                }
                n
            }
            Distribution::Normal { .. } | Distribution::Student { .. } => {
                if p == T::zero() {
                    return T::neg_infinity();
                }
                if p == T::one() {
                    return T::infinity();
                }
                search::invert_increasing(|x| self.cdf(x) - p, search_tolerance())
            }
            Distribution::Geometric { .. } => self.discrete_scan(p, T::one()),
            Distribution::Poisson { .. } => self.discrete_scan(p, T::zero()),
            Distribution::ChiSquared { .. } => {
                if p == T::zero() {
                    return T::zero();
                }
                if p == T::one() {
                    return T::infinity();
                }
                search::invert_increasing(|x| self.cdf(x) - p, search_tolerance())
            }
        }
    }

    fn discrete_scan(&self, p: T, start: T) -> T {
        let mut total = T::zero();
        let mut k = start;
        for _ in 0..DISCRETE_SCAN_CAP {
            total = total + self.pdf(k);
            if total >= p {
                return k;
            }
            k = k + T::one();
        }
        T::nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_pdf_peak() {
        let d = Distribution::Normal { mu: 0.0f64, sigma: 1.0 };
        assert!((d.pdf(0.0) - 0.398_942_280_4).abs() < 1e-8);
    }

    #[test]
    fn test_normal_cdf_values() {
        let d = Distribution::Normal { mu: 0.0f64, sigma: 1.0 };
        assert!((d.cdf(0.0) - 0.5).abs() < 1e-12);
        assert!((d.cdf(1.96) - 0.975).abs() < 1e-4);
        assert!((d.cdf(-1.96) - 0.025).abs() < 1e-4);
    }

    #[test]
    fn test_inverse_normal_median() {
        let d = Distribution::Normal { mu: 0.0f64, sigma: 1.0 };
        assert!(d.inverse_cdf(0.5).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_normal_shifted() {
        let d = Distribution::Normal { mu: 10.0f64, sigma: 2.0 };
        assert!((d.inverse_cdf(0.5) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_student_cauchy_quartile() {
        // One degree of freedom is the Cauchy distribution:
        // cdf(1) = 3/4, cdf(0) = 1/2.
        let d = Distribution::Student { k: 1.0f64 };
        assert!((d.cdf(0.0) - 0.5).abs() < 1e-10);
        assert!((d.cdf(1.0) - 0.75).abs() < 1e-8);
    }

    #[test]
    fn test_chi_squared_two_dof() {
        // k = 2 is the exponential with rate 1/2.
        let d = Distribution::ChiSquared { k: 2.0f64 };
        let x = 2.0;
        assert!((d.cdf(x) - (1.0 - (-x / 2.0f64).exp())).abs() < 1e-10);
    }

    #[test]
    fn test_binomial_exact() {
        let d = Distribution::Binomial { n: 2.0f64, p: 0.5 };
        assert!((d.pdf(1.0) - 0.5).abs() < 1e-12);
        assert!((d.cdf(1.0) - 0.75).abs() < 1e-12);
        assert_eq!(d.pdf(0.5), 0.0);
    }

    #[test]
    fn test_binomial_inverse_scan() {
        let d = Distribution::Binomial { n: 10.0f64, p: 0.5 };
        assert_eq!(d.inverse_cdf(0.5), 5.0);
        assert_eq!(d.inverse_cdf(1.0), 10.0);
    }

    #[test]
    fn test_geometric() {
        let d = Distribution::Geometric { p: 0.5f64 };
        assert!((d.pdf(2.0) - 0.25).abs() < 1e-12);
        assert!((d.cdf(2.0) - 0.75).abs() < 1e-12);
        assert_eq!(d.inverse_cdf(0.7), 2.0);
    }

    #[test]
    fn test_poisson() {
        let d = Distribution::Poisson { lambda: 1.0f64 };
        assert!((d.pdf(0.0) - (-1.0f64).exp()).abs() < 1e-10);
        assert!((d.cdf(1.0) - 2.0 * (-1.0f64).exp()).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_parameters_are_nan() {
        let d = Distribution::Normal { mu: 0.0f64, sigma: -1.0 };
        assert!(d.pdf(0.0).is_nan());
        assert!(d.cdf(0.0).is_nan());
        assert!(d.inverse_cdf(0.5).is_nan());
        let d = Distribution::Binomial { n: 2.5f64, p: 0.5 };
        assert!(d.pdf(1.0).is_nan());
    }

    #[test]
    fn test_single_precision_variants() {
        let d = Distribution::Normal { mu: 0.0f32, sigma: 1.0 };
        assert!((d.cdf(0.0) - 0.5).abs() < 1e-6);
        assert!(d.inverse_cdf(0.5).abs() < 1e-3);
    }
}
