//! Rendering boundary: glyph-metric layout of expressions.
//!
//! The engine never touches pixels. It hands the renderer a layout tree
//! measured in glyph cells: width, height, and baseline (rows above the
//! reference line, so a plain text run has baseline 1). Optional slots
//! are filled with `Ghost` so fixed-arity layout code can address every
//! child index uniformly.

use crate::context::{Context, ExprId};
use crate::display::DisplayExpr;
use crate::expression::Expr;

#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// A run of glyphs on the baseline.
    Text(String),
    /// Horizontal juxtaposition, baselines aligned.
    Row(Vec<Layout>),
    /// Numerator over denominator with a bar on the baseline.
    Fraction { num: Box<Layout>, den: Box<Layout> },
    /// Base with a raised exponent.
    Script { base: Box<Layout>, superscript: Box<Layout> },
    /// Radical sign over the radicand; `index` is the ghost-fillable
    /// degree slot (√ has a ghost there, cube roots carry a 3).
    Radical { index: Box<Layout>, radicand: Box<Layout> },
    /// Parenthesized sub-layout.
    Parenthesized(Box<Layout>),
    /// Placeholder for an empty optional slot.
    Ghost,
}

/// Shape a node presents to its neighbor, for parenthesization decisions
/// made by the renderer (e.g. a fraction next to a fraction needs
/// parentheses even when precedence alone would not require them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacencyShape {
    /// Ordinary glyph run.
    Flat,
    /// Vertically extended (fractions, radicals).
    Tall,
    /// Already fenced by its own delimiters.
    Fenced,
}

impl Layout {
    pub fn width(&self) -> usize {
        match self {
            Layout::Text(s) => s.chars().count(),
            Layout::Row(parts) => parts.iter().map(Layout::width).sum(),
            Layout::Fraction { num, den } => num.width().max(den.width()) + 2,
            Layout::Script { base, superscript } => base.width() + superscript.width(),
            Layout::Radical { index, radicand } => index.width() + radicand.width() + 1,
            Layout::Parenthesized(inner) => inner.width() + 2,
            Layout::Ghost => 1,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Layout::Text(_) | Layout::Ghost => 1,
            Layout::Row(parts) => {
                let above = parts.iter().map(Layout::baseline).max().unwrap_or(1);
                let below = parts
                    .iter()
                    .map(|p| p.height() - p.baseline())
                    .max()
                    .unwrap_or(0);
                above + below
            }
            Layout::Fraction { num, den } => num.height() + den.height() + 1,
            Layout::Script { base, superscript } => base.height() + superscript.height(),
            Layout::Radical { index, radicand } => radicand.height().max(index.height()) + 1,
            Layout::Parenthesized(inner) => inner.height(),
        }
    }

    /// Rows at or above the reference line.
    pub fn baseline(&self) -> usize {
        match self {
            Layout::Text(_) | Layout::Ghost => 1,
            Layout::Row(parts) => parts.iter().map(Layout::baseline).max().unwrap_or(1),
            Layout::Fraction { num, .. } => num.height() + 1,
            Layout::Script { base, superscript } => base.baseline() + superscript.height(),
            Layout::Radical { index, radicand } => {
                radicand.baseline().max(index.height()) + 1
            }
            Layout::Parenthesized(inner) => inner.baseline(),
        }
    }

    pub fn adjacency(&self) -> AdjacencyShape {
        match self {
            Layout::Fraction { .. } | Layout::Radical { .. } => AdjacencyShape::Tall,
            Layout::Parenthesized(_) => AdjacencyShape::Fenced,
            Layout::Script { base, .. } => base.adjacency(),
            _ => AdjacencyShape::Flat,
        }
    }

    fn boxed_text(s: impl Into<String>) -> Box<Layout> {
        Box::new(Layout::Text(s.into()))
    }
}

/// Build the layout tree for an expression.
pub fn layout_expr(ctx: &Context, id: ExprId) -> Layout {
    match ctx.get(id) {
        Expr::Div(num, den) => Layout::Fraction {
            num: Box::new(layout_operand(ctx, *num)),
            den: Box::new(layout_operand(ctx, *den)),
        },
        Expr::Pow(base, exp) => {
            let base_layout = layout_operand(ctx, *base);
            let fenced_base = match base_layout.adjacency() {
                AdjacencyShape::Flat | AdjacencyShape::Fenced => base_layout,
                AdjacencyShape::Tall => Layout::Parenthesized(Box::new(base_layout)),
            };
            Layout::Script {
                base: Box::new(fenced_base),
                superscript: Box::new(layout_expr(ctx, *exp)),
            }
        }
        Expr::Function(name, args) if is_sqrt(ctx, *name) && args.len() == 1 => Layout::Radical {
            index: Box::new(Layout::Ghost),
            radicand: Box::new(layout_expr(ctx, args[0])),
        },
        Expr::Function(name, args) if is_root(ctx, *name) && args.len() == 2 => Layout::Radical {
            index: Box::new(layout_expr(ctx, args[1])),
            radicand: Box::new(layout_expr(ctx, args[0])),
        },
        _ => Layout::Text(DisplayExpr { context: ctx, id }.to_string()),
    }
}

fn is_sqrt(ctx: &Context, name: crate::symbol::SymbolId) -> bool {
    name == ctx.builtin_id(crate::builtin::BuiltinFn::Sqrt)
}

fn is_root(ctx: &Context, name: crate::symbol::SymbolId) -> bool {
    name == ctx.builtin_id(crate::builtin::BuiltinFn::Root)
}

/// Child layout, parenthesized when its textual form would rebind.
fn layout_operand(ctx: &Context, id: ExprId) -> Layout {
    match ctx.get(id) {
        Expr::Add(_, _) | Expr::Sub(_, _) | Expr::Comparison(_, _, _) => {
            Layout::Parenthesized(Box::new(layout_expr(ctx, id)))
        }
        _ => layout_expr(ctx, id),
    }
}
