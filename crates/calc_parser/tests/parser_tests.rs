use calc_ast::{structural_eq, Constant, Context, DisplayExpr, Expr, RelOp};
use calc_parser::{parse, ParseError};

fn show(ctx: &Context, id: calc_ast::ExprId) -> String {
    DisplayExpr { context: ctx, id }.to_string()
}

#[test]
fn test_precedence() {
    let mut ctx = Context::new();
    let e = parse("2 + 3 * 4", &mut ctx).unwrap();
    match ctx.get(e) {
        Expr::Add(l, r) => {
            assert!(matches!(ctx.get(*l), Expr::Number(n) if n.to_string() == "2"));
            assert!(matches!(ctx.get(*r), Expr::Mul(_, _)));
        }
        other => panic!("expected Add, got {:?}", other),
    }
}

#[test]
fn test_left_associativity() {
    let mut ctx = Context::new();
    let e = parse("10 - 4 - 3", &mut ctx).unwrap();
    match ctx.get(e) {
        Expr::Sub(l, _) => assert!(matches!(ctx.get(*l), Expr::Sub(_, _))),
        other => panic!("expected Sub, got {:?}", other),
    }
}

#[test]
fn test_power_right_associative() {
    let mut ctx = Context::new();
    let e = parse("2^3^2", &mut ctx).unwrap();
    match ctx.get(e) {
        Expr::Pow(_, exp) => assert!(matches!(ctx.get(*exp), Expr::Pow(_, _))),
        other => panic!("expected Pow, got {:?}", other),
    }
}

#[test]
fn test_numeric_division_folds() {
    let mut ctx = Context::new();
    let e = parse("1/2", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Number(n) if n.to_string() == "1/2"));
}

#[test]
fn test_division_by_zero_preserved() {
    let mut ctx = Context::new();
    let e = parse("1/0", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Div(_, _)));
}

#[test]
fn test_negative_literal_folds() {
    let mut ctx = Context::new();
    let e = parse("-3", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Number(n) if n.to_string() == "-3"));
}

#[test]
fn test_unary_minus_on_symbol() {
    let mut ctx = Context::new();
    let e = parse("-x", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Neg(_)));
}

#[test]
fn test_decimal_literal() {
    let mut ctx = Context::new();
    let e = parse("0.25", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Number(n) if n.to_string() == "1/4"));
}

#[test]
fn test_function_call() {
    let mut ctx = Context::new();
    let e = parse("sin(x)", &mut ctx).unwrap();
    match ctx.get(e) {
        Expr::Function(name, args) => {
            assert_eq!(ctx.sym_name(*name), "sin");
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected Function, got {:?}", other),
    }
}

#[test]
fn test_two_argument_function() {
    let mut ctx = Context::new();
    let e = parse("root(x,3)", &mut ctx).unwrap();
    match ctx.get(e) {
        Expr::Function(name, args) => {
            assert_eq!(ctx.sym_name(*name), "root");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected Function, got {:?}", other),
    }
}

#[test]
fn test_implicit_multiplication() {
    let mut ctx = Context::new();
    let e = parse("2x", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Mul(_, _)));
    let e = parse("2(x + 1)", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Mul(_, _)));
    let e = parse("sin(x)cos(x)", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Mul(_, _)));
}

#[test]
fn test_implicit_power_binds_tighter() {
    let mut ctx = Context::new();
    let e = parse("2x^2", &mut ctx).unwrap();
    match ctx.get(e) {
        Expr::Mul(_, r) => assert!(matches!(ctx.get(*r), Expr::Pow(_, _))),
        other => panic!("expected Mul, got {:?}", other),
    }
}

#[test]
fn test_constants() {
    let mut ctx = Context::new();
    let e = parse("π", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Constant(Constant::Pi)));
    let e = parse("pi", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Constant(Constant::Pi)));
    let e = parse("e", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Constant(Constant::E)));
    let e = parse("∞", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Constant(Constant::Infinity)));
}

#[test]
fn test_sentinel_tokens() {
    let mut ctx = Context::new();
    let e = parse("undef", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Undefined));
    let e = parse("nonreal", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Nonreal));
}

#[test]
fn test_random_call() {
    let mut ctx = Context::new();
    let e = parse("random()", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Random));
}

#[test]
fn test_list_literal() {
    let mut ctx = Context::new();
    let e = parse("{3, 1, 2}", &mut ctx).unwrap();
    match ctx.get(e) {
        Expr::List(items) => assert_eq!(items.len(), 3),
        other => panic!("expected List, got {:?}", other),
    }
}

#[test]
fn test_comparison_operators() {
    let mut ctx = Context::new();
    for (text, op) in [
        ("x = 2", RelOp::Eq),
        ("x < 2", RelOp::Lt),
        ("x > 2", RelOp::Gt),
        ("x <= 2", RelOp::Leq),
        ("x ≤ 2", RelOp::Leq),
        ("x >= 2", RelOp::Geq),
        ("x != 2", RelOp::Neq),
        ("x ≠ 2", RelOp::Neq),
    ] {
        let e = parse(text, &mut ctx).unwrap();
        match ctx.get(e) {
            Expr::Comparison(parsed, _, _) => assert_eq!(*parsed, op, "input {:?}", text),
            other => panic!("expected Comparison for {:?}, got {:?}", text, other),
        }
    }
}

#[test]
fn test_percent_postfix() {
    let mut ctx = Context::new();
    let e = parse("25%", &mut ctx).unwrap();
    assert!(matches!(ctx.get(e), Expr::Percent(_)));
}

#[test]
fn test_factorial_postfix() {
    let mut ctx = Context::new();
    let e = parse("5!", &mut ctx).unwrap();
    match ctx.get(e) {
        Expr::Function(name, args) => {
            assert_eq!(ctx.sym_name(*name), "factorial");
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected factorial call, got {:?}", other),
    }
}

#[test]
fn test_errors() {
    let mut ctx = Context::new();
    assert_eq!(parse("", &mut ctx), Err(ParseError::Empty));
    assert_eq!(parse("   ", &mut ctx), Err(ParseError::Empty));
    assert!(matches!(parse("1 +", &mut ctx), Err(ParseError::Syntax(_))));
    assert!(matches!(
        parse("1 ) 2", &mut ctx),
        Err(ParseError::TrailingInput(_))
    ));
}

#[test]
fn test_serialize_parse_roundtrip() {
    // parse must be the left inverse of serialization.
    let mut ctx = Context::new();
    for text in [
        "x + y + 1",
        "2 * x^2",
        "sin(x)",
        "root(x,3)",
        "x^-1",
        "(3/4)^x",
        "{1,2,3}",
        "x ≤ 2",
        "25%",
        "undef",
        "cos(x) / sin(x)",
        "-x",
    ] {
        let first = parse(text, &mut ctx).unwrap();
        let printed = show(&ctx, first);
        let second = parse(&printed, &mut ctx).unwrap();
        assert!(
            structural_eq(&ctx, first, second),
            "round-trip changed {:?}: printed {:?}",
            text,
            printed
        );
    }
}
