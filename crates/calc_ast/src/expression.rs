use crate::context::ExprId;
use crate::symbol::SymbolId;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::fmt;

/// Named mathematical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
    I,
    Infinity,
}

impl Constant {
    pub const fn name(self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::E => "e",
            Constant::I => "i",
            Constant::Infinity => "∞",
        }
    }
}

/// Comparison operators, serialized as a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelOp::Eq => write!(f, "="),
            RelOp::Neq => write!(f, "≠"),
            RelOp::Lt => write!(f, "<"),
            RelOp::Gt => write!(f, ">"),
            RelOp::Leq => write!(f, "≤"),
            RelOp::Geq => write!(f, "≥"),
        }
    }
}

/// An expression node. Children are arena handles, never owned pointers.
///
/// Rationals in `Number` are always coprime with a positive denominator
/// (`BigRational` normalizes on construction). `Undefined` and `Nonreal`
/// are the domain-error sentinels: they are values, not errors, and
/// propagate through reduction like any other node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(BigRational),
    Constant(Constant),
    Variable(SymbolId),
    Add(ExprId, ExprId),
    Sub(ExprId, ExprId),
    Mul(ExprId, ExprId),
    Div(ExprId, ExprId),
    Pow(ExprId, ExprId),
    Neg(ExprId),
    Function(SymbolId, Vec<ExprId>),
    List(Vec<ExprId>),
    Comparison(RelOp, ExprId, ExprId),
    Percent(ExprId),
    Random,
    Undefined,
    Nonreal,
}

impl Expr {
    /// Variant name, used by rules to declare which node kinds they target.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Number(_) => "Number",
            Expr::Constant(_) => "Constant",
            Expr::Variable(_) => "Variable",
            Expr::Add(_, _) => "Add",
            Expr::Sub(_, _) => "Sub",
            Expr::Mul(_, _) => "Mul",
            Expr::Div(_, _) => "Div",
            Expr::Pow(_, _) => "Pow",
            Expr::Neg(_) => "Neg",
            Expr::Function(_, _) => "Function",
            Expr::List(_) => "List",
            Expr::Comparison(_, _, _) => "Comparison",
            Expr::Percent(_) => "Percent",
            Expr::Random => "Random",
            Expr::Undefined => "Undefined",
            Expr::Nonreal => "Nonreal",
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Expr::Undefined | Expr::Nonreal)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Expr::Number(_))
    }

    /// The rational payload, if this node is a literal number.
    pub fn as_number(&self) -> Option<&BigRational> {
        match self {
            Expr::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Number(n) if n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Number(n) if n.is_one())
    }

    pub fn is_minus_one(&self) -> bool {
        matches!(
            self,
            Expr::Number(n) if n.is_integer() && n.is_negative() && n.numer().magnitude().is_one()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_number_predicates() {
        assert!(Expr::Number(rat(0, 1)).is_zero());
        assert!(Expr::Number(rat(2, 2)).is_one());
        assert!(Expr::Number(rat(-3, 3)).is_minus_one());
        assert!(!Expr::Number(rat(-1, 2)).is_minus_one());
    }

    #[test]
    fn test_rationals_normalize() {
        // BigRational keeps num/den coprime with positive denominator.
        let n = rat(4, -6);
        assert_eq!(n, rat(-2, 3));
    }

    #[test]
    fn test_relop_display() {
        assert_eq!(RelOp::Leq.to_string(), "≤");
        assert_eq!(RelOp::Eq.to_string(), "=");
    }
}
