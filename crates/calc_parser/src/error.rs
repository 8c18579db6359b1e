use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("syntax error near '{0}'")]
    Syntax(String),
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}
