use calc_ast::ArenaError;
use thiserror::Error;

/// Fatal resource and invariant errors.
///
/// Mathematical domain problems never appear here: they reduce to the
/// `Undefined`/`Nonreal` sentinel nodes and flow through as data. An
/// `Err` from the engine means the computation was aborted; the last
/// committed tree is still intact (no partial mutation is published).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("expression pool exhausted")]
    OutOfMemory,
    #[error("rewrite budget exceeded")]
    RewriteBudgetExceeded,
    #[error(transparent)]
    Arena(#[from] ArenaError),
}
