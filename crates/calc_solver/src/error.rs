use calc_engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("expression is not polynomial in '{0}'")]
    NotPolynomial(String),
    #[error("polynomial degree exceeds the closed-form range")]
    DegreeTooHigh,
    #[error("every coefficient is zero")]
    Degenerate,
    #[error("no closed form found and the coefficients are not numeric")]
    NoClosedForm,
    #[error(transparent)]
    Engine(#[from] EngineError),
}
