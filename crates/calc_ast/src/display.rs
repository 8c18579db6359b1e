//! Canonical text serialization.
//!
//! `DisplayExpr` prints the exact textual form the parser reads back:
//! for every canonical tree T, `parse(T.to_string()) == T` structurally.
//! Parenthesization is precedence-driven; rational literals take the
//! precedence of the operators their spelling contains ("3/4", "-2") so
//! they re-parse into the same node.

use crate::context::{Context, ExprId};
use crate::expression::Expr;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;
use std::fmt;

pub struct DisplayExpr<'a> {
    pub context: &'a Context,
    pub id: ExprId,
}

const PREC_COMPARISON: u8 = 0;
const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_NEG: u8 = 3;
const PREC_POW: u8 = 4;
const PREC_PERCENT: u8 = 5;
const PREC_ATOM: u8 = 6;

fn precedence(ctx: &Context, id: ExprId) -> u8 {
    match ctx.get(id) {
        Expr::Comparison(_, _, _) => PREC_COMPARISON,
        Expr::Add(_, _) | Expr::Sub(_, _) => PREC_ADD,
        Expr::Mul(_, _) | Expr::Div(_, _) => PREC_MUL,
        Expr::Neg(_) => PREC_NEG,
        Expr::Pow(_, _) => PREC_POW,
        Expr::Percent(_) => PREC_PERCENT,
        // A rational literal re-parses through the operators its spelling
        // contains: "3/4" is a division, "-2" a negation.
        Expr::Number(n) => {
            if !n.is_integer() {
                PREC_MUL
            } else if n.is_negative() {
                PREC_NEG
            } else {
                PREC_ATOM
            }
        }
        _ => PREC_ATOM,
    }
}

impl fmt::Display for DisplayExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self.context, self.id)
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, ctx: &Context, id: ExprId, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "(")?;
        write_expr(f, ctx, id)?;
        write!(f, ")")
    } else {
        write_expr(f, ctx, id)
    }
}

fn write_expr(f: &mut fmt::Formatter<'_>, ctx: &Context, id: ExprId) -> fmt::Result {
    match ctx.get(id) {
        Expr::Number(n) => write_rational(f, n),
        Expr::Constant(c) => write!(f, "{}", c.name()),
        Expr::Variable(sym) => write!(f, "{}", ctx.sym_name(*sym)),
        Expr::Add(l, r) => {
            write_child(f, ctx, *l, precedence(ctx, *l) < PREC_ADD)?;
            write!(f, " + ")?;
            write_child(f, ctx, *r, precedence(ctx, *r) <= PREC_ADD)
        }
        Expr::Sub(l, r) => {
            write_child(f, ctx, *l, precedence(ctx, *l) < PREC_ADD)?;
            write!(f, " - ")?;
            write_child(f, ctx, *r, precedence(ctx, *r) <= PREC_ADD)
        }
        Expr::Mul(l, r) => {
            write_child(f, ctx, *l, precedence(ctx, *l) < PREC_MUL)?;
            write!(f, " * ")?;
            write_child(f, ctx, *r, precedence(ctx, *r) <= PREC_MUL)
        }
        Expr::Div(l, r) => {
            write_child(f, ctx, *l, precedence(ctx, *l) < PREC_MUL)?;
            write!(f, " / ")?;
            write_child(f, ctx, *r, precedence(ctx, *r) <= PREC_MUL)
        }
        Expr::Pow(b, e) => {
            write_child(f, ctx, *b, precedence(ctx, *b) <= PREC_POW)?;
            write!(f, "^")?;
            write_child(f, ctx, *e, precedence(ctx, *e) < PREC_NEG)
        }
        Expr::Neg(e) => {
            write!(f, "-")?;
            write_child(f, ctx, *e, precedence(ctx, *e) < PREC_NEG)
        }
        Expr::Percent(e) => {
            write_child(f, ctx, *e, precedence(ctx, *e) < PREC_PERCENT)?;
            write!(f, "%")
        }
        Expr::Function(name, args) => {
            write!(f, "{}(", ctx.sym_name(*name))?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write_expr(f, ctx, *arg)?;
            }
            write!(f, ")")
        }
        Expr::List(items) => {
            write!(f, "{{")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write_expr(f, ctx, *item)?;
            }
            write!(f, "}}")
        }
        Expr::Comparison(op, l, r) => {
            write_expr(f, ctx, *l)?;
            write!(f, " {} ", op)?;
            write_expr(f, ctx, *r)
        }
        Expr::Random => write!(f, "random()"),
        Expr::Undefined => write!(f, "undef"),
        Expr::Nonreal => write!(f, "nonreal"),
    }
}

fn write_rational(f: &mut fmt::Formatter<'_>, n: &BigRational) -> fmt::Result {
    if n.is_integer() {
        write!(f, "{}", n.numer())
    } else {
        write!(f, "{}/{}", n.numer(), n.denom())
    }
}

// ---- float printing ----

/// How approximation results are rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatDisplayMode {
    Decimal,
    Scientific,
}

/// Render a float with the given display mode and significant digit
/// count. Decimal mode falls back to scientific notation outside the
/// magnitudes a calculator screen shows positionally.
pub fn print_float(x: f64, mode: FloatDisplayMode, significant_digits: usize) -> String {
    if x.is_nan() {
        return "undef".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }

    let sig = significant_digits.max(1);
    let exponent = x.abs().log10().floor() as i32;
    let scientific =
        mode == FloatDisplayMode::Scientific || exponent >= 10 || exponent < -5;

    if scientific {
        let mut exp = exponent;
        let scale = 10f64.powi(sig as i32 - 1);
        let mut mantissa = (x / 10f64.powi(exp) * scale).round() / scale;
        if mantissa.abs() >= 10.0 {
            mantissa /= 10.0;
            exp += 1;
        }
        let body = trim_zeros(format!("{:.*}", sig - 1, mantissa));
        format!("{}ᴇ{}", body, exp)
    } else {
        let decimals = (sig as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(format!("{:.*}", decimals, x))
    }
}

fn trim_zeros(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::BuiltinFn;
    use crate::expression::RelOp;

    fn show(ctx: &Context, id: ExprId) -> String {
        DisplayExpr { context: ctx, id }.to_string()
    }

    #[test]
    fn test_precedence_parens() {
        let mut ctx = Context::new();
        let a = ctx.var("a");
        let b = ctx.var("b");
        let sum = ctx.add(Expr::Add(a, b));
        let two = ctx.num(2);
        let pow = ctx.add(Expr::Pow(sum, two));
        assert_eq!(show(&ctx, pow), "(a + b)^2");
    }

    #[test]
    fn test_left_nested_chain_without_parens() {
        let mut ctx = Context::new();
        let a = ctx.var("a");
        let b = ctx.var("b");
        let c = ctx.var("c");
        let ab = ctx.add(Expr::Add(a, b));
        let abc = ctx.add(Expr::Add(ab, c));
        assert_eq!(show(&ctx, abc), "a + b + c");
    }

    #[test]
    fn test_right_nested_sub_parenthesized() {
        let mut ctx = Context::new();
        let a = ctx.var("a");
        let b = ctx.var("b");
        let c = ctx.var("c");
        let bc = ctx.add(Expr::Sub(b, c));
        let expr = ctx.add(Expr::Sub(a, bc));
        assert_eq!(show(&ctx, expr), "a - (b - c)");
    }

    #[test]
    fn test_rational_literal_parenthesized_in_pow() {
        let mut ctx = Context::new();
        let base = ctx.rat(3, 4);
        let x = ctx.var("x");
        let pow = ctx.add(Expr::Pow(base, x));
        assert_eq!(show(&ctx, pow), "(3/4)^x");
    }

    #[test]
    fn test_negative_base_parenthesized() {
        let mut ctx = Context::new();
        let base = ctx.num(-2);
        let x = ctx.var("x");
        let pow = ctx.add(Expr::Pow(base, x));
        assert_eq!(show(&ctx, pow), "(-2)^x");
    }

    #[test]
    fn test_negative_exponent_unparenthesized() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let e = ctx.num(-1);
        let pow = ctx.add(Expr::Pow(x, e));
        assert_eq!(show(&ctx, pow), "x^-1");
    }

    #[test]
    fn test_pow_right_assoc() {
        let mut ctx = Context::new();
        let a = ctx.var("a");
        let b = ctx.var("b");
        let c = ctx.var("c");
        let bc = ctx.add(Expr::Pow(b, c));
        let abc = ctx.add(Expr::Pow(a, bc));
        assert_eq!(show(&ctx, abc), "a^b^c");
        let ab = ctx.add(Expr::Pow(a, b));
        let abc2 = ctx.add(Expr::Pow(ab, c));
        assert_eq!(show(&ctx, abc2), "(a^b)^c");
    }

    #[test]
    fn test_function_and_list() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let sin = ctx.func(BuiltinFn::Sin, vec![x]);
        assert_eq!(show(&ctx, sin), "sin(x)");
        let one = ctx.num(1);
        let two = ctx.num(2);
        let list = ctx.add(Expr::List(vec![one, two]));
        assert_eq!(show(&ctx, list), "{1,2}");
    }

    #[test]
    fn test_comparison() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let two = ctx.num(2);
        let cmp = ctx.add(Expr::Comparison(RelOp::Leq, x, two));
        assert_eq!(show(&ctx, cmp), "x ≤ 2");
    }

    #[test]
    fn test_percent() {
        let mut ctx = Context::new();
        let n = ctx.num(25);
        let pct = ctx.add(Expr::Percent(n));
        assert_eq!(show(&ctx, pct), "25%");
    }

    #[test]
    fn test_sentinels() {
        let mut ctx = Context::new();
        let u = ctx.undef();
        assert_eq!(show(&ctx, u), "undef");
        let nr = ctx.nonreal();
        assert_eq!(show(&ctx, nr), "nonreal");
    }

    #[test]
    fn test_print_float_decimal() {
        assert_eq!(print_float(14.0, FloatDisplayMode::Decimal, 7), "14");
        assert_eq!(print_float(0.5, FloatDisplayMode::Decimal, 7), "0.5");
        assert_eq!(
            print_float(1234.5678, FloatDisplayMode::Decimal, 6),
            "1234.57"
        );
    }

    #[test]
    fn test_print_float_scientific() {
        assert_eq!(print_float(1234.0, FloatDisplayMode::Scientific, 4), "1.234ᴇ3");
        assert_eq!(print_float(0.00001, FloatDisplayMode::Scientific, 3), "1ᴇ-5");
    }

    #[test]
    fn test_print_float_decimal_falls_back() {
        assert_eq!(print_float(1e12, FloatDisplayMode::Decimal, 5), "1ᴇ12");
        assert_eq!(print_float(-1.2e-6, FloatDisplayMode::Decimal, 3), "-1.2ᴇ-6");
    }

    #[test]
    fn test_print_float_specials() {
        assert_eq!(print_float(f64::NAN, FloatDisplayMode::Decimal, 7), "undef");
        assert_eq!(
            print_float(f64::INFINITY, FloatDisplayMode::Decimal, 7),
            "∞"
        );
        assert_eq!(print_float(0.0, FloatDisplayMode::Scientific, 7), "0");
    }
}
