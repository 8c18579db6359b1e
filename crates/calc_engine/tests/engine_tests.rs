use calc_ast::{structural_eq, Context, DisplayExpr, Expr, ExprId};
use calc_engine::{
    approximate, approximate_real, AngleUnit, ApproxContext, Bindings, ComplexPolicy, EngineError,
    Evaluation, NoSymbols, Precision, Reducer, ReductionContext, Target,
};
use calc_parser::parse;

fn reduced(input: &str) -> (Reducer, ExprId) {
    let mut reducer = Reducer::with_default_rules();
    let expr = parse(input, &mut reducer.context).unwrap();
    let rctx = ReductionContext::new(&NoSymbols);
    let out = reducer.reduce(expr, &rctx).unwrap();
    (reducer, out)
}

fn show(reducer: &Reducer, id: ExprId) -> String {
    DisplayExpr {
        context: &reducer.context,
        id,
    }
    .to_string()
}

fn assert_reduces_to(input: &str, expected: &str) {
    let (reducer, out) = reduced(input);
    assert_eq!(show(&reducer, out), expected, "input {:?}", input);
}

// ---- canonical reduction ----

#[test]
fn test_constant_arithmetic_folds() {
    assert_reduces_to("2+3*4", "14");
    assert_reduces_to("10-4-3", "3");
    assert_reduces_to("2^10", "1024");
    assert_reduces_to("1/2+1/3", "5/6");
}

#[test]
fn test_like_terms_collect() {
    assert_reduces_to("x+x", "2 * x");
    assert_reduces_to("3*x-x", "2 * x");
    assert_reduces_to("x*x", "x^2");
    assert_reduces_to("2*x*3", "6 * x");
}

#[test]
fn test_division_by_zero_is_undefined() {
    let (reducer, out) = reduced("1/0");
    assert!(matches!(reducer.context.get(out), Expr::Undefined));
}

#[test]
fn test_zero_power_zero_is_undefined() {
    let (reducer, out) = reduced("0^0");
    assert!(matches!(reducer.context.get(out), Expr::Undefined));
}

#[test]
fn test_reduction_is_idempotent() {
    for input in [
        "2+3*4",
        "x+x+y",
        "cot(x)",
        "sqrt(18)",
        "(x+1)*(x-1)",
        "100+10%",
        "sort({3,1,2})",
        "x/y",
        "2^x*2^x",
    ] {
        let mut reducer = Reducer::with_default_rules();
        let expr = parse(input, &mut reducer.context).unwrap();
        let rctx = ReductionContext::new(&NoSymbols);
        let once = reducer.reduce(expr, &rctx).unwrap();
        let twice = reducer.reduce(once, &rctx).unwrap();
        assert!(
            structural_eq(&reducer.context, once, twice),
            "reduction of {:?} is not idempotent: {} vs {}",
            input,
            show(&reducer, once),
            show(&reducer, twice)
        );
    }
}

// ---- sentinel propagation ----

#[test]
fn test_sentinel_propagates_upward() {
    for input in ["5+1/0", "sin(1/0)", "{1, 1/0}", "(1/0)^2", "0*(1/0)"] {
        let (reducer, out) = reduced(input);
        assert!(
            matches!(reducer.context.get(out), Expr::Undefined),
            "input {:?} reduced to {}",
            input,
            show(&reducer, out)
        );
    }
}

#[test]
fn test_even_root_of_negative_real_is_nonreal() {
    let (reducer, out) = reduced("sqrt(-4)");
    assert!(matches!(reducer.context.get(out), Expr::Nonreal));
}

#[test]
fn test_even_root_of_negative_stays_symbolic_under_cartesian() {
    let mut reducer = Reducer::with_default_rules();
    let expr = parse("sqrt(-4)", &mut reducer.context).unwrap();
    let rctx = ReductionContext::new(&NoSymbols).with_complex_policy(ComplexPolicy::Cartesian);
    let out = reducer.reduce(expr, &rctx).unwrap();
    assert!(matches!(reducer.context.get(out), Expr::Pow(_, _)));
}

#[test]
fn test_undefined_dominates_nonreal() {
    let (reducer, out) = reduced("sqrt(-4)+1/0");
    assert!(matches!(reducer.context.get(out), Expr::Undefined));
}

// ---- functions and percents ----

#[test]
fn test_trig_exact_values() {
    assert_reduces_to("sin(0)", "0");
    assert_reduces_to("cos(pi)", "-1");
    assert_reduces_to("sin(pi/2)", "1");
    let (reducer, out) = reduced("tan(pi/2)");
    assert!(matches!(reducer.context.get(out), Expr::Undefined));
}

#[test]
fn test_trig_exact_values_in_degrees() {
    let mut reducer = Reducer::with_default_rules();
    let expr = parse("sin(90)", &mut reducer.context).unwrap();
    let rctx = ReductionContext::new(&NoSymbols).with_angle_unit(AngleUnit::Degree);
    let out = reducer.reduce(expr, &rctx).unwrap();
    assert_eq!(show(&reducer, out), "1");
}

#[test]
fn test_logarithms() {
    assert_reduces_to("ln(1)", "0");
    assert_reduces_to("ln(e)", "1");
    assert_reduces_to("log(100)", "2");
    assert_reduces_to("log(8,2)", "3");
    let (reducer, out) = reduced("ln(0)");
    assert!(matches!(reducer.context.get(out), Expr::Undefined));
}

#[test]
fn test_combinatorics_fold() {
    assert_reduces_to("5!", "120");
    assert_reduces_to("permute(5,2)", "20");
    assert_reduces_to("binomial(5,2)", "10");
    assert_reduces_to("gcd(12,18)", "6");
    assert_reduces_to("lcm(4,6)", "12");
    let (reducer, out) = reduced("(-1)!");
    assert!(matches!(reducer.context.get(out), Expr::Undefined));
}

#[test]
fn test_percent_arithmetic() {
    assert_reduces_to("100+10%", "110");
    assert_reduces_to("200-10%", "180");
    assert_reduces_to("50%", "1/2");
}

#[test]
fn test_list_operations() {
    assert_reduces_to("sort({3,1,2})", "{1,2,3}");
    assert_reduces_to("sum({1,2,3})", "6");
    assert_reduces_to("product({1,2,3,4})", "24");
    assert_reduces_to("min({3,1,2})", "1");
    assert_reduces_to("max({3,1,2})", "3");
    assert_reduces_to("dim({3,1,2})", "3");
}

#[test]
fn test_wrong_arity_is_undefined() {
    let (reducer, out) = reduced("sin(1,2)");
    assert!(matches!(reducer.context.get(out), Expr::Undefined));
}

#[test]
fn test_distribution_parameter_domain() {
    let (reducer, out) = reduced("normcdf(0,0,-1)");
    assert!(matches!(reducer.context.get(out), Expr::Undefined));
    let (reducer, out) = reduced("geompdf(1,2)");
    assert!(matches!(reducer.context.get(out), Expr::Undefined));
}

// ---- beautification ----

#[test]
fn test_cot_beautifies_to_quotient() {
    let mut reducer = Reducer::with_default_rules();
    let expr = parse("cot(x)", &mut reducer.context).unwrap();
    let rctx = ReductionContext::new(&NoSymbols).with_target(Target::User);
    let out = reducer.reduce_for_target(expr, &rctx).unwrap();
    assert_eq!(show(&reducer, out), "cos(x) / sin(x)");
}

#[test]
fn test_beautified_form_re_reduces_to_same_canonical() {
    let mut reducer = Reducer::with_default_rules();
    let expr = parse("cot(x)", &mut reducer.context).unwrap();
    let rctx = ReductionContext::new(&NoSymbols);
    let canonical = reducer.reduce(expr, &rctx).unwrap();
    let pretty = reducer.beautify(canonical);
    let back = reducer.reduce(pretty, &rctx).unwrap();
    assert!(structural_eq(&reducer.context, canonical, back));
}

// ---- approximation ----

#[test]
fn test_cot_approximates_at_quarter_pi() {
    let mut reducer = Reducer::with_default_rules();
    let angle = parse("pi/4", &mut reducer.context).unwrap();
    let mut bindings = Bindings::new();
    bindings.bind("x", angle);
    let expr = parse("cot(x)", &mut reducer.context).unwrap();
    let actx = ApproxContext::new(&bindings);
    assert!((approximate_real(&reducer.context, expr, &actx) - 1.0).abs() < 1e-12);
}

#[test]
fn test_inverse_normal_at_half_is_zero() {
    let mut ctx = Context::new();
    let expr = parse("invnorm(1/2)", &mut ctx).unwrap();
    let actx = ApproxContext::new(&NoSymbols);
    assert!(approximate_real(&ctx, expr, &actx).abs() < 1e-6);
}

#[test]
fn test_distribution_surface_evaluates() {
    let mut ctx = Context::new();
    let actx = ApproxContext::new(&NoSymbols);
    let e = parse("binompdf(2,4,1/2)", &mut ctx).unwrap();
    assert!((approximate_real(&ctx, e, &actx) - 0.375).abs() < 1e-12);
    let e = parse("normcdf(0)", &mut ctx).unwrap();
    assert!((approximate_real(&ctx, e, &actx) - 0.5).abs() < 1e-7);
    let e = parse("poissoncdf(2,3)", &mut ctx).unwrap();
    let expected = (1.0 + 3.0 + 4.5) * (-3.0f64).exp();
    assert!((approximate_real(&ctx, e, &actx) - expected).abs() < 1e-9);
}

#[test]
fn test_angle_unit_scales_approximation() {
    let mut ctx = Context::new();
    let expr = parse("sin(90)", &mut ctx).unwrap();
    let actx = ApproxContext::new(&NoSymbols).with_angle_unit(AngleUnit::Degree);
    assert!((approximate_real(&ctx, expr, &actx) - 1.0).abs() < 1e-12);
}

#[test]
fn test_precision_flag_changes_width() {
    let mut ctx = Context::new();
    let expr = parse("1/3", &mut ctx).unwrap();
    let double = approximate_real(&ctx, expr, &ApproxContext::new(&NoSymbols));
    let single = approximate_real(
        &ctx,
        expr,
        &ApproxContext::new(&NoSymbols).with_precision(Precision::Single),
    );
    assert_eq!(double, 1.0 / 3.0);
    assert_eq!(single, (1.0f32 / 3.0f32) as f64);
    assert_ne!(single, double);
}

#[test]
fn test_domain_errors_approximate_to_nan() {
    let mut ctx = Context::new();
    let actx = ApproxContext::new(&NoSymbols);
    for input in ["1/0", "ln(0)", "asin(2)", "x+1"] {
        let e = parse(input, &mut ctx).unwrap();
        let v = approximate_real(&ctx, e, &actx);
        assert!(v.is_nan(), "input {:?} evaluated to {}", input, v);
    }
}

#[test]
fn test_complex_result_is_nan_under_real_policy() {
    let mut ctx = Context::new();
    let e = parse("sqrt(-4)", &mut ctx).unwrap();
    let real = approximate_real(&ctx, e, &ApproxContext::new(&NoSymbols));
    assert!(real.is_nan());
    let cartesian = approximate(
        &ctx,
        e,
        &ApproxContext::new(&NoSymbols).with_complex_policy(ComplexPolicy::Cartesian),
    );
    let z = cartesian.scalar().unwrap();
    assert!((z.im - 2.0).abs() < 1e-12 && z.re.abs() < 1e-12);
}

#[test]
fn test_list_approximates_elementwise() {
    let mut ctx = Context::new();
    let e = parse("{1, 2+3, 1/0}", &mut ctx).unwrap();
    match approximate(&ctx, e, &ApproxContext::new(&NoSymbols)) {
        Evaluation::List(values) => {
            assert_eq!(values.len(), 3);
            assert_eq!(values[0].re, 1.0);
            assert_eq!(values[1].re, 5.0);
            assert!(values[2].re.is_nan());
        }
        other => panic!("expected a list evaluation, got {:?}", other),
    }
}

#[test]
fn test_random_draws_fresh_values_in_unit_interval() {
    let mut ctx = Context::new();
    let e = parse("random()", &mut ctx).unwrap();
    let actx = ApproxContext::new(&NoSymbols);
    let mut distinct = false;
    let first = approximate_real(&ctx, e, &actx);
    for _ in 0..32 {
        let v = approximate_real(&ctx, e, &actx);
        assert!((0.0..1.0).contains(&v));
        distinct |= v != first;
    }
    assert!(distinct, "32 draws never differed");
}

// ---- resource errors ----

#[test]
fn test_arena_exhaustion_aborts_reduction() {
    let mut reducer = Reducer::with_default_rules();
    reducer.context = Context::with_capacity(8);
    let expr = parse("2+3*4+x^2", &mut reducer.context).unwrap();
    let rctx = ReductionContext::new(&NoSymbols);
    assert_eq!(reducer.reduce(expr, &rctx), Err(EngineError::OutOfMemory));
    // The input tree survives the failed pass untouched.
    assert!(reducer.context.is_live(expr));
}

#[test]
fn test_rewrite_budget_bounds_symbol_cycles() {
    let mut reducer = Reducer::with_default_rules();
    reducer.rewrite_budget = 64;
    let x = parse("x", &mut reducer.context).unwrap();
    let mut bindings = Bindings::new();
    bindings.bind("x", x);
    let rctx = ReductionContext::new(&bindings);
    assert_eq!(
        reducer.reduce(x, &rctx),
        Err(EngineError::RewriteBudgetExceeded)
    );
}
