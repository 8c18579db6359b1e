use crate::error::ParseError;
use calc_ast::{Constant, Context, Expr, ExprId, RelOp};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char as symbol, digit0, digit1, multispace0, satisfy},
    combinator::recognize,
    multi::separated_list0,
    sequence::{delimited, pair, tuple},
    IResult,
};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

/// Intermediate tree built by the combinators, lowered into the arena in
/// one pass at the end.
#[derive(Debug, Clone)]
enum ParseNode {
    Number(BigRational),
    Constant(Constant),
    Variable(String),
    Call(String, Vec<ParseNode>),
    List(Vec<ParseNode>),
    Add(Box<ParseNode>, Box<ParseNode>),
    Sub(Box<ParseNode>, Box<ParseNode>),
    Mul(Box<ParseNode>, Box<ParseNode>),
    Div(Box<ParseNode>, Box<ParseNode>),
    Pow(Box<ParseNode>, Box<ParseNode>),
    Neg(Box<ParseNode>),
    Percent(Box<ParseNode>),
    Comparison(RelOp, Box<ParseNode>, Box<ParseNode>),
    Random,
    Undefined,
    Nonreal,
}

impl ParseNode {
    /// Lower into the arena. Pure numeric negation and division fold to
    /// exact rationals here, so the textual forms the serializer emits
    /// ("-2", "3/4") come back as the `Number` nodes they were printed
    /// from. Division by a literal zero is preserved for reduction to
    /// turn into the undefined sentinel.
    fn lower(self, ctx: &mut Context) -> ExprId {
        match self {
            ParseNode::Number(n) => ctx.number(n),
            ParseNode::Constant(c) => ctx.constant(c),
            ParseNode::Variable(name) => ctx.var(&name),
            ParseNode::Call(name, args) => {
                let arg_ids = args.into_iter().map(|a| a.lower(ctx)).collect();
                ctx.call(&name, arg_ids)
            }
            ParseNode::List(items) => {
                let ids = items.into_iter().map(|a| a.lower(ctx)).collect();
                ctx.add(Expr::List(ids))
            }
            ParseNode::Add(l, r) => {
                let lid = l.lower(ctx);
                let rid = r.lower(ctx);
                ctx.add(Expr::Add(lid, rid))
            }
            ParseNode::Sub(l, r) => {
                let lid = l.lower(ctx);
                let rid = r.lower(ctx);
                ctx.add(Expr::Sub(lid, rid))
            }
            ParseNode::Mul(l, r) => {
                let lid = l.lower(ctx);
                let rid = r.lower(ctx);
                ctx.add(Expr::Mul(lid, rid))
            }
            ParseNode::Div(l, r) => {
                let lid = l.lower(ctx);
                let rid = r.lower(ctx);
                let folded = match (ctx.get(lid), ctx.get(rid)) {
                    (Expr::Number(a), Expr::Number(b)) if !b.is_zero() => Some(a / b),
                    _ => None,
                };
                match folded {
                    Some(q) => ctx.number(q),
                    None => ctx.add(Expr::Div(lid, rid)),
                }
            }
            ParseNode::Pow(b, e) => {
                let bid = b.lower(ctx);
                let eid = e.lower(ctx);
                ctx.add(Expr::Pow(bid, eid))
            }
            ParseNode::Neg(inner) => {
                let id = inner.lower(ctx);
                let folded = match ctx.get(id) {
                    Expr::Number(n) => Some(-n.clone()),
                    _ => None,
                };
                match folded {
                    Some(m) => ctx.number(m),
                    None => ctx.add(Expr::Neg(id)),
                }
            }
            ParseNode::Percent(inner) => {
                let id = inner.lower(ctx);
                ctx.add(Expr::Percent(id))
            }
            ParseNode::Comparison(op, l, r) => {
                let lid = l.lower(ctx);
                let rid = r.lower(ctx);
                ctx.add(Expr::Comparison(op, lid, rid))
            }
            ParseNode::Random => ctx.add(Expr::Random),
            ParseNode::Undefined => ctx.add(Expr::Undefined),
            ParseNode::Nonreal => ctx.add(Expr::Nonreal),
        }
    }
}

/// Parse canonical text into the arena.
pub fn parse(input: &str, ctx: &mut Context) -> Result<ExprId, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let (rest, node) = match comparison(input) {
        Ok(ok) => ok,
        Err(_) => return Err(ParseError::Syntax(snippet(input))),
    };
    let rest = rest.trim();
    if !rest.is_empty() {
        return Err(ParseError::TrailingInput(snippet(rest)));
    }
    Ok(node.lower(ctx))
}

fn snippet(s: &str) -> String {
    s.chars().take(24).collect()
}

// ---- grammar, loosest binding first ----

fn comparison(input: &str) -> IResult<&str, ParseNode> {
    let (input, lhs) = additive(input)?;
    let (input, _) = multispace0(input)?;
    if let Ok((rest, op)) = rel_op(input) {
        let (rest, rhs) = additive(rest)?;
        return Ok((rest, ParseNode::Comparison(op, Box::new(lhs), Box::new(rhs))));
    }
    Ok((input, lhs))
}

fn rel_op(input: &str) -> IResult<&str, RelOp> {
    alt((
        map_tag("≤", RelOp::Leq),
        map_tag("<=", RelOp::Leq),
        map_tag("≥", RelOp::Geq),
        map_tag(">=", RelOp::Geq),
        map_tag("≠", RelOp::Neq),
        map_tag("!=", RelOp::Neq),
        map_tag("=", RelOp::Eq),
        map_tag("<", RelOp::Lt),
        map_tag(">", RelOp::Gt),
    ))(input)
}

fn map_tag(t: &'static str, op: RelOp) -> impl FnMut(&str) -> IResult<&str, RelOp> {
    move |input| {
        let (rest, _) = tag(t)(input)?;
        Ok((rest, op))
    }
}

fn additive(input: &str) -> IResult<&str, ParseNode> {
    let (mut input, mut acc) = term(input)?;
    loop {
        let (rest, _) = multispace0(input)?;
        let op = match rest.chars().next() {
            Some('+') => '+',
            Some('-') => '-',
            _ => break,
        };
        let (rest, rhs) = term(&rest[1..])?;
        acc = match op {
            '+' => ParseNode::Add(Box::new(acc), Box::new(rhs)),
            _ => ParseNode::Sub(Box::new(acc), Box::new(rhs)),
        };
        input = rest;
    }
    Ok((input, acc))
}

fn term(input: &str) -> IResult<&str, ParseNode> {
    let (mut input, mut acc) = unary(input)?;
    loop {
        let (rest, _) = multispace0(input)?;
        match rest.chars().next() {
            Some('*') => {
                let (rest, rhs) = unary(&rest[1..])?;
                acc = ParseNode::Mul(Box::new(acc), Box::new(rhs));
                input = rest;
            }
            Some('/') => {
                let (rest, rhs) = unary(&rest[1..])?;
                acc = ParseNode::Div(Box::new(acc), Box::new(rhs));
                input = rest;
            }
            // Implicit multiplication: "2x", "2(x+1)", "sin(x)cos(x)".
            Some(c) if c == '(' || c == '{' || c == '∞' || c.is_alphabetic() || c == '_' => {
                let (rest, rhs) = power(rest)?;
                acc = ParseNode::Mul(Box::new(acc), Box::new(rhs));
                input = rest;
            }
            _ => break,
        }
    }
    Ok((input, acc))
}

fn unary(input: &str) -> IResult<&str, ParseNode> {
    let (input, _) = multispace0(input)?;
    if let Some(rest) = input.strip_prefix('-') {
        let (rest, inner) = unary(rest)?;
        return Ok((rest, ParseNode::Neg(Box::new(inner))));
    }
    power(input)
}

fn power(input: &str) -> IResult<&str, ParseNode> {
    let (input, base) = postfix(input)?;
    let (after_ws, _) = multispace0(input)?;
    if let Some(rest) = after_ws.strip_prefix('^') {
        // Right-associative; the exponent may carry a leading sign.
        let (rest, exp) = unary(rest)?;
        return Ok((rest, ParseNode::Pow(Box::new(base), Box::new(exp))));
    }
    Ok((input, base))
}

fn postfix(input: &str) -> IResult<&str, ParseNode> {
    let (mut input, mut acc) = atom(input)?;
    loop {
        if let Some(rest) = input.strip_prefix('%') {
            acc = ParseNode::Percent(Box::new(acc));
            input = rest;
        } else if input.starts_with('!') && !input[1..].starts_with('=') {
            acc = ParseNode::Call("factorial".to_string(), vec![acc]);
            input = &input[1..];
        } else {
            break;
        }
    }
    Ok((input, acc))
}

fn atom(input: &str) -> IResult<&str, ParseNode> {
    let (input, _) = multispace0(input)?;
    alt((paren_expr, list_literal, number, infinity, name_atom))(input)
}

fn paren_expr(input: &str) -> IResult<&str, ParseNode> {
    delimited(
        symbol('('),
        delimited(multispace0, comparison, multispace0),
        symbol(')'),
    )(input)
}

fn list_literal(input: &str) -> IResult<&str, ParseNode> {
    let (rest, items) = delimited(
        symbol('{'),
        separated_list0(
            delimited(multispace0, symbol(','), multispace0),
            comparison,
        ),
        tuple((multispace0, symbol('}'))),
    )(input)?;
    Ok((rest, ParseNode::List(items)))
}

fn number(input: &str) -> IResult<&str, ParseNode> {
    let (rest, text) = recognize(alt((
        recognize(tuple((digit1, symbol('.'), digit0))),
        recognize(pair(symbol('.'), digit1)),
        recognize(digit1),
    )))(input)?;
    Ok((rest, ParseNode::Number(decimal_to_rational(text))))
}

fn infinity(input: &str) -> IResult<&str, ParseNode> {
    let (rest, _) = tag("∞")(input)?;
    Ok((rest, ParseNode::Constant(Constant::Infinity)))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

fn name_atom(input: &str) -> IResult<&str, ParseNode> {
    let (input, name) = identifier(input)?;
    // `name(` with no whitespace is a call; `name (` multiplies.
    if input.starts_with('(') {
        let (rest, args) = delimited(
            symbol('('),
            separated_list0(
                delimited(multispace0, symbol(','), multispace0),
                comparison,
            ),
            tuple((multispace0, symbol(')'))),
        )(input)?;
        if name == "random" && args.is_empty() {
            return Ok((rest, ParseNode::Random));
        }
        return Ok((rest, ParseNode::Call(name.to_string(), args)));
    }
    let node = match name {
        "π" | "pi" => ParseNode::Constant(Constant::Pi),
        "e" => ParseNode::Constant(Constant::E),
        "i" => ParseNode::Constant(Constant::I),
        "inf" => ParseNode::Constant(Constant::Infinity),
        "undef" => ParseNode::Undefined,
        "nonreal" => ParseNode::Nonreal,
        _ => ParseNode::Variable(name.to_string()),
    };
    Ok((input, node))
}

/// "8.25" → 33/4. For "A.B": numerator A·10^k + B over 10^k, k = len(B).
fn decimal_to_rational(text: &str) -> BigRational {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text, ""),
    };
    let mut numer: BigInt = if int_part.is_empty() {
        BigInt::from(0)
    } else {
        int_part.parse().unwrap_or_else(|_| BigInt::from(0))
    };
    let mut denom = BigInt::from(1);
    for c in frac_part.chars() {
        numer = numer * 10u32 + (c as u32 - '0' as u32);
        denom *= 10u32;
    }
    BigRational::new(numer, denom)
}
