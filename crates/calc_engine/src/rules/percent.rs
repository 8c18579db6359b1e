//! Percent notation.
//!
//! Percents carry meaning from their additive parent: `a + b%` grows a
//! by b percent, while a standalone `b%` is b/100. That context is gone
//! once children reduce independently, so percents are expanded in a
//! dedicated pre-pass over the raw tree, before any rule runs.

use calc_ast::{Context, Expr, ExprId};

/// Rewrite every `Percent` node away. `a + b%` → `a·(1 + b/100)`,
/// `a - b%` → `a·(1 - b/100)`, elsewhere `b%` → `b/100`. Chained
/// percents compound: `a + b% + c%` scales twice.
pub fn expand_percents(ctx: &mut Context, expr: ExprId) -> ExprId {
    match ctx.get(expr).clone() {
        Expr::Add(l, r) => {
            if let Expr::Percent(inner) = ctx.get(r).clone() {
                let base = expand_percents(ctx, l);
                let rate = expand_percents(ctx, inner);
                let scale = growth_factor(ctx, rate, false);
                return ctx.add(Expr::Mul(base, scale));
            }
            rebuild2(ctx, expr, l, r, |l, r| Expr::Add(l, r))
        }
        Expr::Sub(l, r) => {
            if let Expr::Percent(inner) = ctx.get(r).clone() {
                let base = expand_percents(ctx, l);
                let rate = expand_percents(ctx, inner);
                let scale = growth_factor(ctx, rate, true);
                return ctx.add(Expr::Mul(base, scale));
            }
            rebuild2(ctx, expr, l, r, |l, r| Expr::Sub(l, r))
        }
        Expr::Percent(inner) => {
            let value = expand_percents(ctx, inner);
            let hundred = ctx.num(100);
            ctx.add(Expr::Div(value, hundred))
        }
        Expr::Mul(l, r) => rebuild2(ctx, expr, l, r, |l, r| Expr::Mul(l, r)),
        Expr::Div(l, r) => rebuild2(ctx, expr, l, r, |l, r| Expr::Div(l, r)),
        Expr::Pow(l, r) => rebuild2(ctx, expr, l, r, |l, r| Expr::Pow(l, r)),
        Expr::Comparison(op, l, r) => rebuild2(ctx, expr, l, r, move |l, r| {
            Expr::Comparison(op, l, r)
        }),
        Expr::Neg(e) => {
            let e2 = expand_percents(ctx, e);
            if e2 == e {
                expr
            } else {
                ctx.add(Expr::Neg(e2))
            }
        }
        Expr::Function(name, args) => {
            let expanded: Vec<ExprId> = args.iter().map(|&a| expand_percents(ctx, a)).collect();
            if expanded == args {
                expr
            } else {
                ctx.add(Expr::Function(name, expanded))
            }
        }
        Expr::List(items) => {
            let expanded: Vec<ExprId> = items.iter().map(|&a| expand_percents(ctx, a)).collect();
            if expanded == items {
                expr
            } else {
                ctx.add(Expr::List(expanded))
            }
        }
        _ => expr,
    }
}

/// `1 ± rate/100`.
fn growth_factor(ctx: &mut Context, rate: ExprId, shrink: bool) -> ExprId {
    let hundred = ctx.num(100);
    let fraction = ctx.add(Expr::Div(rate, hundred));
    let one = ctx.num(1);
    if shrink {
        ctx.add(Expr::Sub(one, fraction))
    } else {
        ctx.add(Expr::Add(one, fraction))
    }
}

fn rebuild2(
    ctx: &mut Context,
    original: ExprId,
    l: ExprId,
    r: ExprId,
    build: impl FnOnce(ExprId, ExprId) -> Expr,
) -> ExprId {
    let l2 = expand_percents(ctx, l);
    let r2 = expand_percents(ctx, r);
    if l2 == l && r2 == r {
        original
    } else {
        ctx.add(build(l2, r2))
    }
}
