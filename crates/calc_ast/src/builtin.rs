//! Builtin function identifiers.
//!
//! The engine dispatches on `BuiltinFn` instead of comparing name strings.
//! `Context` interns every builtin at construction so the symbol id of a
//! builtin can be fetched without allocation, and a `Function` node's
//! symbol can be mapped back to its `BuiltinFn` in O(1).

/// Known built-in functions. Serialized names are fixed lowercase ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BuiltinFn {
    // Trigonometric
    Sin = 0,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,

    // Inverse trigonometric
    Asin,
    Acos,
    Atan,
    Asec,
    Acsc,
    Acot,

    // Hyperbolic
    Sinh,
    Cosh,
    Tanh,

    // Logarithmic / exponential
    Ln,
    Log,
    Exp,

    // Roots
    Sqrt,
    Root,

    // Rounding and elementary
    Abs,
    Sign,
    Floor,
    Ceil,
    Round,

    // Combinatorics / integer arithmetic
    Factorial,
    Permute,
    Binomial,
    Gcd,
    Lcm,

    // List operations
    Sort,
    Min,
    Max,
    Sum,
    Product,
    Dim,

    // Distributions
    BinomPdf,
    BinomCdf,
    InvBinom,
    NormPdf,
    NormCdf,
    InvNorm,
    TPdf,
    TCdf,
    InvT,
    GeomPdf,
    GeomCdf,
    InvGeom,
    PoissonPdf,
    PoissonCdf,
    Chi2Pdf,
    Chi2Cdf,
    InvChi2,
}

impl BuiltinFn {
    pub const ALL: &'static [BuiltinFn] = &[
        BuiltinFn::Sin,
        BuiltinFn::Cos,
        BuiltinFn::Tan,
        BuiltinFn::Sec,
        BuiltinFn::Csc,
        BuiltinFn::Cot,
        BuiltinFn::Asin,
        BuiltinFn::Acos,
        BuiltinFn::Atan,
        BuiltinFn::Asec,
        BuiltinFn::Acsc,
        BuiltinFn::Acot,
        BuiltinFn::Sinh,
        BuiltinFn::Cosh,
        BuiltinFn::Tanh,
        BuiltinFn::Ln,
        BuiltinFn::Log,
        BuiltinFn::Exp,
        BuiltinFn::Sqrt,
        BuiltinFn::Root,
        BuiltinFn::Abs,
        BuiltinFn::Sign,
        BuiltinFn::Floor,
        BuiltinFn::Ceil,
        BuiltinFn::Round,
        BuiltinFn::Factorial,
        BuiltinFn::Permute,
        BuiltinFn::Binomial,
        BuiltinFn::Gcd,
        BuiltinFn::Lcm,
        BuiltinFn::Sort,
        BuiltinFn::Min,
        BuiltinFn::Max,
        BuiltinFn::Sum,
        BuiltinFn::Product,
        BuiltinFn::Dim,
        BuiltinFn::BinomPdf,
        BuiltinFn::BinomCdf,
        BuiltinFn::InvBinom,
        BuiltinFn::NormPdf,
        BuiltinFn::NormCdf,
        BuiltinFn::InvNorm,
        BuiltinFn::TPdf,
        BuiltinFn::TCdf,
        BuiltinFn::InvT,
        BuiltinFn::GeomPdf,
        BuiltinFn::GeomCdf,
        BuiltinFn::InvGeom,
        BuiltinFn::PoissonPdf,
        BuiltinFn::PoissonCdf,
        BuiltinFn::Chi2Pdf,
        BuiltinFn::Chi2Cdf,
        BuiltinFn::InvChi2,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Canonical serialized name.
    pub const fn name(self) -> &'static str {
        match self {
            BuiltinFn::Sin => "sin",
            BuiltinFn::Cos => "cos",
            BuiltinFn::Tan => "tan",
            BuiltinFn::Sec => "sec",
            BuiltinFn::Csc => "csc",
            BuiltinFn::Cot => "cot",
            BuiltinFn::Asin => "asin",
            BuiltinFn::Acos => "acos",
            BuiltinFn::Atan => "atan",
            BuiltinFn::Asec => "asec",
            BuiltinFn::Acsc => "acsc",
            BuiltinFn::Acot => "acot",
            BuiltinFn::Sinh => "sinh",
            BuiltinFn::Cosh => "cosh",
            BuiltinFn::Tanh => "tanh",
            BuiltinFn::Ln => "ln",
            BuiltinFn::Log => "log",
            BuiltinFn::Exp => "exp",
            BuiltinFn::Sqrt => "sqrt",
            BuiltinFn::Root => "root",
            BuiltinFn::Abs => "abs",
            BuiltinFn::Sign => "sign",
            BuiltinFn::Floor => "floor",
            BuiltinFn::Ceil => "ceil",
            BuiltinFn::Round => "round",
            BuiltinFn::Factorial => "factorial",
            BuiltinFn::Permute => "permute",
            BuiltinFn::Binomial => "binomial",
            BuiltinFn::Gcd => "gcd",
            BuiltinFn::Lcm => "lcm",
            BuiltinFn::Sort => "sort",
            BuiltinFn::Min => "min",
            BuiltinFn::Max => "max",
            BuiltinFn::Sum => "sum",
            BuiltinFn::Product => "product",
            BuiltinFn::Dim => "dim",
            BuiltinFn::BinomPdf => "binompdf",
            BuiltinFn::BinomCdf => "binomcdf",
            BuiltinFn::InvBinom => "invbinom",
            BuiltinFn::NormPdf => "normpdf",
            BuiltinFn::NormCdf => "normcdf",
            BuiltinFn::InvNorm => "invnorm",
            BuiltinFn::TPdf => "tpdf",
            BuiltinFn::TCdf => "tcdf",
            BuiltinFn::InvT => "invt",
            BuiltinFn::GeomPdf => "geompdf",
            BuiltinFn::GeomCdf => "geomcdf",
            BuiltinFn::InvGeom => "invgeom",
            BuiltinFn::PoissonPdf => "poissonpdf",
            BuiltinFn::PoissonCdf => "poissoncdf",
            BuiltinFn::Chi2Pdf => "chi2pdf",
            BuiltinFn::Chi2Cdf => "chi2cdf",
            BuiltinFn::InvChi2 => "invchi2",
        }
    }

    /// Accepted argument counts, as an inclusive (min, max) range.
    ///
    /// `normcdf(x)` defaults to the standard normal; `normcdf(x, μ, σ)`
    /// names the parameters explicitly, and likewise for the other
    /// normal-family entries. `log(x)` is base 10, `log(x, b)` explicit.
    pub const fn arity(self) -> (usize, usize) {
        match self {
            BuiltinFn::Log => (1, 2),
            BuiltinFn::Root => (2, 2),
            BuiltinFn::Permute | BuiltinFn::Binomial => (2, 2),
            BuiltinFn::Gcd | BuiltinFn::Lcm => (2, 2),
            BuiltinFn::Sort
            | BuiltinFn::Min
            | BuiltinFn::Max
            | BuiltinFn::Sum
            | BuiltinFn::Product
            | BuiltinFn::Dim => (1, 1),
            BuiltinFn::BinomPdf | BuiltinFn::BinomCdf | BuiltinFn::InvBinom => (3, 3),
            BuiltinFn::NormPdf | BuiltinFn::NormCdf | BuiltinFn::InvNorm => (1, 3),
            BuiltinFn::TPdf | BuiltinFn::TCdf | BuiltinFn::InvT => (2, 2),
            BuiltinFn::GeomPdf | BuiltinFn::GeomCdf | BuiltinFn::InvGeom => (2, 2),
            BuiltinFn::PoissonPdf | BuiltinFn::PoissonCdf => (2, 2),
            BuiltinFn::Chi2Pdf | BuiltinFn::Chi2Cdf | BuiltinFn::InvChi2 => (2, 2),
            _ => (1, 1),
        }
    }

    pub fn from_name(name: &str) -> Option<BuiltinFn> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for &b in BuiltinFn::ALL {
            assert_eq!(BuiltinFn::from_name(b.name()), Some(b));
        }
    }

    #[test]
    fn test_count_matches_all() {
        assert_eq!(BuiltinFn::COUNT, BuiltinFn::ALL.len());
    }

    #[test]
    fn test_arity() {
        assert_eq!(BuiltinFn::Sin.arity(), (1, 1));
        assert_eq!(BuiltinFn::Log.arity(), (1, 2));
        assert_eq!(BuiltinFn::BinomPdf.arity(), (3, 3));
    }
}
