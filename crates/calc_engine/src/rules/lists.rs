//! List operations.
//!
//! `sort` uses the engine's total order, so it applies to symbolic
//! elements too; the result is always a permutation of the input.
//! A list-typed builtin applied to a non-list reduces to the undefined
//! sentinel.

use crate::define_rule;
use crate::nary::{build_add, build_mul};
use crate::rule::Rewrite;
use calc_ast::{compare_expr, BuiltinFn, Expr};

define_rule!(
    ListOperationRule,
    "List Operation",
    Some(&["Function"]),
    |ctx, expr, rctx| {
        let (name, args) = match ctx.get(expr) {
            Expr::Function(name, args) => (*name, args.clone()),
            _ => return None,
        };
        let builtin = ctx.builtin_of(name)?;
        if !matches!(
            builtin,
            BuiltinFn::Sort
                | BuiltinFn::Min
                | BuiltinFn::Max
                | BuiltinFn::Sum
                | BuiltinFn::Product
                | BuiltinFn::Dim
        ) {
            return None;
        }
        if args.len() != 1 {
            return None;
        }
        let items = match ctx.get(args[0]) {
            Expr::List(items) => items.clone(),
            _ => {
                let undef = ctx.undef();
                return Some(Rewrite::new(undef, "expected a list argument"));
            }
        };
        match builtin {
            BuiltinFn::Sort => {
                // Always rewrites to the plain list, so `sort({1,2})`
                // and `{1,2}` share one canonical form.
                let mut sorted = items.clone();
                sorted.sort_by(|&a, &b| compare_expr(ctx, a, b));
                let out = ctx.add(Expr::List(sorted));
                Some(Rewrite::new(out, "sort by canonical order"))
            }
            BuiltinFn::Min | BuiltinFn::Max => {
                if items.is_empty() {
                    let undef = ctx.undef();
                    return Some(Rewrite::new(undef, "extremum of an empty list"));
                }
                if !items.iter().all(|&i| ctx.get(i).is_number()) {
                    return None;
                }
                let mut best = items[0];
                for &item in &items[1..] {
                    let replace = match builtin {
                        BuiltinFn::Min => compare_expr(ctx, item, best).is_lt(),
                        _ => compare_expr(ctx, item, best).is_gt(),
                    };
                    if replace {
                        best = item;
                    }
                }
                Some(Rewrite::new(best, "numeric extremum"))
            }
            BuiltinFn::Sum => {
                let out = build_add(ctx, &items);
                Some(Rewrite::new(out, "sum the elements"))
            }
            BuiltinFn::Product => {
                let out = build_mul(ctx, &items);
                Some(Rewrite::new(out, "multiply the elements"))
            }
            BuiltinFn::Dim => {
                let out = ctx.num(items.len() as i64);
                Some(Rewrite::new(out, "element count"))
            }
            _ => None,
        }
    }
);

#[cfg(test)]
mod tests {
    use crate::options::{NoSymbols, ReductionContext};
    use crate::reducer::Reducer;
    use calc_ast::Expr;

    #[test]
    fn test_sort_symbolic_is_permutation() {
        let mut r = Reducer::with_default_rules();
        let x = r.context.var("x");
        let one = r.context.num(1);
        let three = r.context.num(3);
        let list = r.context.add(Expr::List(vec![x, three, one]));
        let sort = r.context.func(calc_ast::BuiltinFn::Sort, vec![list]);
        let rctx = ReductionContext::new(&NoSymbols);
        let out = r.reduce(sort, &rctx).unwrap();
        match r.context.get(out) {
            Expr::List(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0], one);
                assert_eq!(items[1], three);
                assert_eq!(items[2], x);
            }
            other => panic!("expected sorted list, got {:?}", other),
        }
    }
}
