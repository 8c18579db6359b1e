use thiserror::Error;

/// Resource and structural errors from the node pool.
///
/// These are fatal to the current computation. Mathematical domain
/// problems never appear here; they are `Expr::Undefined` / `Expr::Nonreal`
/// values in the tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    #[error("expression pool exhausted ({capacity} nodes)")]
    OutOfMemory { capacity: usize },
    #[error("child index {index} out of range for arity {arity}")]
    InvalidChildIndex { index: usize, arity: usize },
    #[error("cannot insert or remove children of a fixed-arity node")]
    FixedArity,
}
