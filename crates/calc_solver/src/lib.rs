//! Closed-form polynomial root solving, degree 1 through 3.
//!
//! Coefficients are expression trees and may be symbolic. Roots come
//! back as trees in a fixed formula order (never sorted at runtime)
//! together with the discriminant; `approximate` reports when closed
//! forms ran out and the roots are numeric.

pub mod coefficients;
mod cubic;
pub mod error;
mod quadratic;
pub mod rational_roots;
mod support;

pub use coefficients::extract_coefficients;
pub use error::SolveError;

use calc_ast::{Expr, ExprId};
use calc_engine::{Reducer, ReductionContext};
use tracing::debug;

/// Highest degree with a closed-form strategy.
pub const MAX_DEGREE: usize = 3;

/// Roots of a polynomial, in formula order, with its discriminant.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub roots: Vec<ExprId>,
    pub discriminant: ExprId,
    /// True when closed-form solving fell back to numeric roots.
    pub approximate: bool,
}

/// Solve `expr = 0` for `var`. An equation node is moved to one side
/// first; the expression must be polynomial in `var` of degree at most
/// three.
pub fn solve_in_variable(
    reducer: &mut Reducer,
    expr: ExprId,
    var: &str,
    rctx: &ReductionContext,
) -> Result<SolveResult, SolveError> {
    let expr = match reducer.context.get(expr).clone() {
        Expr::Comparison(_, lhs, rhs) => reducer.context.add(Expr::Sub(lhs, rhs)),
        _ => expr,
    };
    let reduced = reducer.reduce(expr, rctx)?;
    // Extract past the closed-form range so a quartic is reported as
    // too high a degree rather than as non-polynomial.
    let coeffs = extract_coefficients(&mut reducer.context, reduced, var, 2 * MAX_DEGREE)
        .ok_or_else(|| SolveError::NotPolynomial(var.to_string()))?;
    solve_polynomial(reducer, &coeffs, rctx)
}

/// Solve from coefficient trees `[a0, a1, ..., an]`, constant term
/// first. Leading coefficients that are provably zero shift the degree
/// down; an all-zero polynomial is degenerate.
pub fn solve_polynomial(
    reducer: &mut Reducer,
    coeffs: &[ExprId],
    rctx: &ReductionContext,
) -> Result<SolveResult, SolveError> {
    let mut reduced = Vec::with_capacity(coeffs.len());
    for &c in coeffs {
        reduced.push(reducer.reduce(c, rctx)?);
    }
    while reduced.len() > 1 {
        let leading = *reduced.last().expect("nonempty");
        if support::is_provably_zero(reducer, leading, rctx) {
            reduced.pop();
        } else {
            break;
        }
    }

    debug!(degree = reduced.len() - 1, "solving polynomial");
    match reduced.as_slice() {
        [] => Err(SolveError::Degenerate),
        [only] => {
            if support::is_provably_zero(reducer, *only, rctx) {
                // 0 = 0 holds everywhere; there is no root set to report.
                Err(SolveError::Degenerate)
            } else {
                // A nonzero constant has no roots at all.
                let discriminant = reducer.context.num(1);
                Ok(SolveResult {
                    roots: Vec::new(),
                    discriminant,
                    approximate: false,
                })
            }
        }
        &[a0, a1] => quadratic::solve_linear(reducer, a0, a1, rctx),
        &[c, b, a] => quadratic::solve_quadratic(reducer, a, b, c, rctx),
        &[d, c, b, a] => cubic::solve_cubic(reducer, a, b, c, d, rctx),
        _ => Err(SolveError::DegreeTooHigh),
    }
}
