//! Property laws: serialization round-trip, reduction idempotence,
//! sentinel propagation and the sort law, over generated trees.

use calc_ast::{compare_expr, structural_eq, BuiltinFn, Context, DisplayExpr, Expr, ExprId};
use calc_engine::{NoSymbols, Reducer, ReductionContext};
use calc_parser::parse;
use num_rational::BigRational;
use proptest::prelude::*;

/// Construction plan for an expression; built into an arena per case.
/// Shapes the parser folds at lowering (numeric division, negated
/// literals) are excluded so round-trips stay structural.
#[derive(Debug, Clone)]
enum Plan {
    Int(i32),
    Rat(i32, u8),
    Var(u8),
    Pi,
    Add(Box<Plan>, Box<Plan>),
    Sub(Box<Plan>, Box<Plan>),
    Mul(Box<Plan>, Box<Plan>),
    PowInt(Box<Plan>, u8),
    Sin(Box<Plan>),
    Abs(Box<Plan>),
    List(Vec<Plan>),
}

impl Plan {
    fn build(&self, ctx: &mut Context) -> ExprId {
        match self {
            Plan::Int(n) => ctx.num(*n as i64),
            Plan::Rat(n, d) => ctx.rat(*n as i64, *d as i64 + 1),
            Plan::Var(v) => ctx.var(["x", "y", "z"][*v as usize % 3]),
            Plan::Pi => ctx.constant(calc_ast::Constant::Pi),
            Plan::Add(l, r) => {
                let l = l.build(ctx);
                let r = r.build(ctx);
                ctx.add(Expr::Add(l, r))
            }
            Plan::Sub(l, r) => {
                let l = l.build(ctx);
                let r = r.build(ctx);
                ctx.add(Expr::Sub(l, r))
            }
            Plan::Mul(l, r) => {
                let l = l.build(ctx);
                let r = r.build(ctx);
                ctx.add(Expr::Mul(l, r))
            }
            Plan::PowInt(base, e) => {
                let b = base.build(ctx);
                let e = ctx.num(*e as i64);
                ctx.add(Expr::Pow(b, e))
            }
            Plan::Sin(arg) => {
                let a = arg.build(ctx);
                ctx.func(BuiltinFn::Sin, vec![a])
            }
            Plan::Abs(arg) => {
                let a = arg.build(ctx);
                ctx.func(BuiltinFn::Abs, vec![a])
            }
            Plan::List(items) => {
                let built: Vec<ExprId> = items.iter().map(|p| p.build(ctx)).collect();
                ctx.add(Expr::List(built))
            }
        }
    }
}

fn plan_strategy() -> impl Strategy<Value = Plan> {
    let leaf = prop_oneof![
        (-99i32..100).prop_map(Plan::Int),
        ((-99i32..100), (0u8..9)).prop_map(|(n, d)| Plan::Rat(n, d)),
        (0u8..3).prop_map(Plan::Var),
        Just(Plan::Pi),
    ];
    leaf.prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(l, r)| Plan::Add(Box::new(l), Box::new(r))),
            (inner.clone(), inner.clone())
                .prop_map(|(l, r)| Plan::Sub(Box::new(l), Box::new(r))),
            (inner.clone(), inner.clone())
                .prop_map(|(l, r)| Plan::Mul(Box::new(l), Box::new(r))),
            (inner.clone(), 0u8..5).prop_map(|(b, e)| Plan::PowInt(Box::new(b), e)),
            inner.clone().prop_map(|a| Plan::Sin(Box::new(a))),
            inner.clone().prop_map(|a| Plan::Abs(Box::new(a))),
            prop::collection::vec(inner, 1..4).prop_map(Plan::List),
        ]
    })
}

proptest! {
    #[test]
    fn prop_serialize_parse_round_trip(plan in plan_strategy()) {
        let mut ctx = Context::new();
        let tree = plan.build(&mut ctx);
        let printed = DisplayExpr { context: &ctx, id: tree }.to_string();
        let reparsed = parse(&printed, &mut ctx).unwrap();
        prop_assert!(
            structural_eq(&ctx, tree, reparsed),
            "round-trip changed the tree: {:?}",
            printed
        );
    }

    #[test]
    fn prop_reduce_is_idempotent(plan in plan_strategy()) {
        let mut reducer = Reducer::with_default_rules();
        let tree = plan.build(&mut reducer.context);
        let rctx = ReductionContext::new(&NoSymbols);
        let once = reducer.reduce(tree, &rctx).unwrap();
        let twice = reducer.reduce(once, &rctx).unwrap();
        prop_assert!(
            structural_eq(&reducer.context, once, twice),
            "not idempotent: {} vs {}",
            DisplayExpr { context: &reducer.context, id: once },
            DisplayExpr { context: &reducer.context, id: twice }
        );
    }

    #[test]
    fn prop_undefined_child_poisons_the_tree(plan in plan_strategy()) {
        let mut reducer = Reducer::with_default_rules();
        let tree = plan.build(&mut reducer.context);
        let undef = reducer.context.undef();
        let poisoned = reducer.context.add(Expr::Add(tree, undef));
        let rctx = ReductionContext::new(&NoSymbols);
        let out = reducer.reduce(poisoned, &rctx).unwrap();
        prop_assert!(matches!(reducer.context.get(out), Expr::Undefined));
    }

    #[test]
    fn prop_sort_is_ordered_permutation(values in prop::collection::vec(-1000i64..1000, 0..12)) {
        let mut reducer = Reducer::with_default_rules();
        let items: Vec<ExprId> = values.iter().map(|&v| reducer.context.num(v)).collect();
        let list = reducer.context.add(Expr::List(items));
        let call = reducer.context.func(BuiltinFn::Sort, vec![list]);
        let rctx = ReductionContext::new(&NoSymbols);
        let out = reducer.reduce(call, &rctx).unwrap();

        let sorted = match reducer.context.get(out) {
            Expr::List(items) => items.clone(),
            other => panic!("expected a list, got {:?}", other),
        };
        for window in sorted.windows(2) {
            prop_assert!(!compare_expr(&reducer.context, window[0], window[1]).is_gt());
        }
        let mut expected: Vec<BigRational> = values
            .iter()
            .map(|&v| BigRational::from_integer(v.into()))
            .collect();
        expected.sort();
        let actual: Vec<BigRational> = sorted
            .iter()
            .map(|&i| reducer.context.get(i).as_number().cloned().unwrap())
            .collect();
        prop_assert_eq!(actual, expected);
    }
}
