//! Trigonometric reduction.
//!
//! Advanced functions expand into the sin/cos/tan kernel; exact values
//! fold at the quarter-turn points, keyed by the angle unit in effect.

use crate::define_rule;
use crate::options::AngleUnit;
use crate::rule::Rewrite;
use calc_ast::{BuiltinFn, Constant, Context, Expr, ExprId};
use num_rational::BigRational;
use num_traits::Zero;

define_rule!(
    /// sec, csc and cot reduce to their sin/cos quotients; the inverse
    /// advanced functions to compositions with the reciprocal.
    ExpandAdvancedTrigRule,
    "Expand Advanced Trigonometric Function",
    Some(&["Function"]),
    |ctx, expr, rctx| {
        let (name, args) = match ctx.get(expr) {
            Expr::Function(name, args) => (*name, args.clone()),
            _ => return None,
        };
        if args.len() != 1 {
            return None;
        }
        let x = args[0];
        match ctx.builtin_of(name)? {
            BuiltinFn::Sec => {
                let cos = ctx.func(BuiltinFn::Cos, vec![x]);
                let minus_one = ctx.num(-1);
                let out = ctx.add(Expr::Pow(cos, minus_one));
                Some(Rewrite::new(out, "sec(x) = 1/cos(x)"))
            }
            BuiltinFn::Csc => {
                let sin = ctx.func(BuiltinFn::Sin, vec![x]);
                let minus_one = ctx.num(-1);
                let out = ctx.add(Expr::Pow(sin, minus_one));
                Some(Rewrite::new(out, "csc(x) = 1/sin(x)"))
            }
            BuiltinFn::Cot => {
                let cos = ctx.func(BuiltinFn::Cos, vec![x]);
                let sin = ctx.func(BuiltinFn::Sin, vec![x]);
                let minus_one = ctx.num(-1);
                let inv_sin = ctx.add(Expr::Pow(sin, minus_one));
                let out = ctx.add(Expr::Mul(cos, inv_sin));
                Some(Rewrite::new(out, "cot(x) = cos(x)/sin(x)"))
            }
            BuiltinFn::Asec => {
                let inv = reciprocal(ctx, x)?;
                let out = ctx.func(BuiltinFn::Acos, vec![inv]);
                Some(Rewrite::new(out, "asec(x) = acos(1/x)"))
            }
            BuiltinFn::Acsc => {
                let inv = reciprocal(ctx, x)?;
                let out = ctx.func(BuiltinFn::Asin, vec![inv]);
                Some(Rewrite::new(out, "acsc(x) = asin(1/x)"))
            }
            BuiltinFn::Acot => {
                let inv = reciprocal(ctx, x)?;
                let out = ctx.func(BuiltinFn::Atan, vec![inv]);
                Some(Rewrite::new(out, "acot(x) = atan(1/x)"))
            }
            _ => None,
        }
    }
);

define_rule!(
    TrigExactValueRule,
    "Exact Trigonometric Value",
    Some(&["Function"]),
    |ctx, expr, rctx| {
        let (name, args) = match ctx.get(expr) {
            Expr::Function(name, args) => (*name, args.clone()),
            _ => return None,
        };
        if args.len() != 1 {
            return None;
        }
        let builtin = ctx.builtin_of(name)?;
        if !matches!(builtin, BuiltinFn::Sin | BuiltinFn::Cos | BuiltinFn::Tan) {
            return None;
        }
        let angle = classify_angle(ctx, args[0], rctx.angle_unit)?;
        let value = match (builtin, angle) {
            (BuiltinFn::Sin, SpecialAngle::Zero) => Some(0),
            (BuiltinFn::Sin, SpecialAngle::HalfTurn) => Some(0),
            (BuiltinFn::Sin, SpecialAngle::QuarterTurn) => Some(1),
            (BuiltinFn::Cos, SpecialAngle::Zero) => Some(1),
            (BuiltinFn::Cos, SpecialAngle::HalfTurn) => Some(-1),
            (BuiltinFn::Cos, SpecialAngle::QuarterTurn) => Some(0),
            (BuiltinFn::Tan, SpecialAngle::Zero) => Some(0),
            (BuiltinFn::Tan, SpecialAngle::HalfTurn) => Some(0),
            (BuiltinFn::Tan, SpecialAngle::QuarterTurn) => None,
            _ => return None,
        };
        let out = match value {
            Some(v) => ctx.num(v),
            None => ctx.undef(),
        };
        Some(Rewrite::new(out, "exact value at a quarter-turn point"))
    }
);

define_rule!(
    /// Direct compositions collapse: sin(asin(x)) = x and friends, plus
    /// the zero points of the inverse functions.
    InverseTrigCompositionRule,
    "Inverse Trigonometric Composition",
    Some(&["Function"]),
    |ctx, expr, rctx| {
        let (name, args) = match ctx.get(expr) {
            Expr::Function(name, args) => (*name, args.clone()),
            _ => return None,
        };
        if args.len() != 1 {
            return None;
        }
        let builtin = ctx.builtin_of(name)?;
        let inverse = match builtin {
            BuiltinFn::Sin => BuiltinFn::Asin,
            BuiltinFn::Cos => BuiltinFn::Acos,
            BuiltinFn::Tan => BuiltinFn::Atan,
            BuiltinFn::Asin | BuiltinFn::Atan => {
                if ctx.get(args[0]).is_zero() {
                    let zero = ctx.num(0);
                    return Some(Rewrite::new(zero, "inverse of 0"));
                }
                return None;
            }
            BuiltinFn::Acos => {
                if ctx.get(args[0]).is_one() {
                    let zero = ctx.num(0);
                    return Some(Rewrite::new(zero, "acos(1) = 0"));
                }
                return None;
            }
            _ => return None,
        };
        if let Expr::Function(inner_name, inner_args) = ctx.get(args[0]) {
            if *inner_name == ctx.builtin_id(inverse) && inner_args.len() == 1 {
                let out = inner_args[0];
                return Some(Rewrite::new(out, "f(f⁻¹(x)) = x"));
            }
        }
        None
    }
);

#[derive(Clone, Copy, PartialEq)]
enum SpecialAngle {
    Zero,
    QuarterTurn,
    HalfTurn,
}

fn classify_angle(ctx: &Context, arg: ExprId, unit: AngleUnit) -> Option<SpecialAngle> {
    match unit {
        AngleUnit::Radian => match ctx.get(arg) {
            Expr::Number(n) if n.is_zero() => Some(SpecialAngle::Zero),
            Expr::Constant(Constant::Pi) => Some(SpecialAngle::HalfTurn),
            Expr::Mul(l, r) => {
                let half = BigRational::new(1.into(), 2.into());
                match (ctx.get(*l), ctx.get(*r)) {
                    (Expr::Number(n), Expr::Constant(Constant::Pi)) if *n == half => {
                        Some(SpecialAngle::QuarterTurn)
                    }
                    _ => None,
                }
            }
            _ => None,
        },
        AngleUnit::Degree | AngleUnit::Gradian => {
            let half_turn = BigRational::from_integer(unit.half_turn_divisor().into());
            let quarter_turn = &half_turn / BigRational::from_integer(2.into());
            match ctx.get(arg) {
                Expr::Number(n) if n.is_zero() => Some(SpecialAngle::Zero),
                Expr::Number(n) if *n == half_turn => Some(SpecialAngle::HalfTurn),
                Expr::Number(n) if *n == quarter_turn => Some(SpecialAngle::QuarterTurn),
                _ => None,
            }
        }
    }
}

/// 1/x as a canonical power; a literal zero argument is a domain error
/// handled by the caller's sentinel path.
fn reciprocal(ctx: &mut Context, x: ExprId) -> Option<ExprId> {
    if ctx.get(x).is_zero() {
        return Some(ctx.undef());
    }
    let minus_one = ctx.num(-1);
    Some(ctx.add(Expr::Pow(x, minus_one)))
}
