//! The reduction driver.
//!
//! `deep_reduce` applies shallow rules bottom-up: every child is reduced
//! before the parent's rules run, so rules may assume canonical children.
//! The driver owns the two cross-cutting behaviors rules must not
//! reimplement: symbol resolution and sentinel propagation.
//!
//! Termination and the all-or-nothing failure contract rest on three
//! driver-level guards checked between rule applications: the rewrite
//! budget, the arena budget, and the requirement that no rule fires on
//! its own output.

use crate::error::EngineError;
use crate::options::{ReductionContext, Target};
use crate::rule::Rule;
use calc_ast::{Context, Expr, ExprId};
use rustc_hash::FxHashMap;
use tracing::debug;

pub const DEFAULT_REWRITE_BUDGET: usize = 4096;

pub struct Reducer {
    pub context: Context,
    rules: Vec<Box<dyn Rule>>,
    pub rewrite_budget: usize,
}

impl Default for Reducer {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl Reducer {
    /// A reducer with no rules registered; `reduce` only resolves
    /// symbols and propagates sentinels.
    pub fn new() -> Self {
        Self {
            context: Context::new(),
            rules: Vec::new(),
            rewrite_budget: DEFAULT_REWRITE_BUDGET,
        }
    }

    pub fn with_default_rules() -> Self {
        let mut r = Self::new();
        crate::rules::register_default_rules(&mut r);
        r
    }

    /// Registration order is application order within a node.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Reduce to canonical form. Idempotent: reducing the result again
    /// returns it unchanged.
    pub fn reduce(
        &mut self,
        expr: ExprId,
        rctx: &ReductionContext,
    ) -> Result<ExprId, EngineError> {
        let expr = crate::rules::percent::expand_percents(&mut self.context, expr);
        let mut memo = FxHashMap::default();
        let mut budget = self.rewrite_budget;
        self.deep_reduce(expr, rctx, &mut memo, &mut budget)
    }

    /// Reduce, then beautify when the context targets user display.
    pub fn reduce_for_target(
        &mut self,
        expr: ExprId,
        rctx: &ReductionContext,
    ) -> Result<ExprId, EngineError> {
        let reduced = self.reduce(expr, rctx)?;
        Ok(match rctx.target {
            Target::User => self.beautify(reduced),
            Target::System => reduced,
        })
    }

    pub fn beautify(&mut self, expr: ExprId) -> ExprId {
        crate::beautify::deep_beautify(&mut self.context, expr)
    }

    fn deep_reduce(
        &mut self,
        expr: ExprId,
        rctx: &ReductionContext,
        memo: &mut FxHashMap<ExprId, ExprId>,
        budget: &mut usize,
    ) -> Result<ExprId, EngineError> {
        if let Some(&done) = memo.get(&expr) {
            return Ok(done);
        }

        let rebuilt = self.reduce_children(expr, rctx, memo, budget)?;

        // Bound symbols take their binding's reduced form. The budget
        // charge makes circular bindings fail instead of recursing
        // forever; diagnosing the cycle itself is the collaborator's job.
        if let Expr::Variable(sym) = self.context.get(rebuilt) {
            let name = self.context.sym_name(*sym).to_string();
            if let Some(bound) = rctx.symbols.resolve(&name) {
                spend(budget)?;
                let out = self.deep_reduce(bound, rctx, memo, budget)?;
                memo.insert(expr, out);
                return Ok(out);
            }
        }

        if let Some(sentinel) = self.sentinel_child(rebuilt) {
            memo.insert(expr, sentinel);
            memo.insert(rebuilt, sentinel);
            return Ok(sentinel);
        }

        let kind = self.context.get(rebuilt).kind_name();
        for i in 0..self.rules.len() {
            let rule = &self.rules[i];
            if let Some(targets) = rule.target_kinds() {
                if !targets.contains(&kind) {
                    continue;
                }
            }
            if let Some(rewrite) = rule.apply(&mut self.context, rebuilt, rctx) {
                spend(budget)?;
                if self.context.is_exhausted() {
                    return Err(EngineError::OutOfMemory);
                }
                debug!(rule = self.rules[i].name(), "{}", rewrite.description);
                let out = self.deep_reduce(rewrite.new_expr, rctx, memo, budget)?;
                memo.insert(expr, out);
                memo.insert(rebuilt, out);
                return Ok(out);
            }
        }

        memo.insert(expr, rebuilt);
        memo.insert(rebuilt, rebuilt);
        Ok(rebuilt)
    }

    fn reduce_children(
        &mut self,
        expr: ExprId,
        rctx: &ReductionContext,
        memo: &mut FxHashMap<ExprId, ExprId>,
        budget: &mut usize,
    ) -> Result<ExprId, EngineError> {
        let node = self.context.get(expr).clone();
        let rebuilt = match node {
            Expr::Add(l, r) => {
                let (l2, r2) = self.reduce_pair(l, r, rctx, memo, budget)?;
                if l2 == l && r2 == r {
                    return Ok(expr);
                }
                self.context.add(Expr::Add(l2, r2))
            }
            Expr::Sub(l, r) => {
                let (l2, r2) = self.reduce_pair(l, r, rctx, memo, budget)?;
                if l2 == l && r2 == r {
                    return Ok(expr);
                }
                self.context.add(Expr::Sub(l2, r2))
            }
            Expr::Mul(l, r) => {
                let (l2, r2) = self.reduce_pair(l, r, rctx, memo, budget)?;
                if l2 == l && r2 == r {
                    return Ok(expr);
                }
                self.context.add(Expr::Mul(l2, r2))
            }
            Expr::Div(l, r) => {
                let (l2, r2) = self.reduce_pair(l, r, rctx, memo, budget)?;
                if l2 == l && r2 == r {
                    return Ok(expr);
                }
                self.context.add(Expr::Div(l2, r2))
            }
            Expr::Pow(l, r) => {
                let (l2, r2) = self.reduce_pair(l, r, rctx, memo, budget)?;
                if l2 == l && r2 == r {
                    return Ok(expr);
                }
                self.context.add(Expr::Pow(l2, r2))
            }
            Expr::Comparison(op, l, r) => {
                let (l2, r2) = self.reduce_pair(l, r, rctx, memo, budget)?;
                if l2 == l && r2 == r {
                    return Ok(expr);
                }
                self.context.add(Expr::Comparison(op, l2, r2))
            }
            Expr::Neg(e) => {
                let e2 = self.deep_reduce(e, rctx, memo, budget)?;
                if e2 == e {
                    return Ok(expr);
                }
                self.context.add(Expr::Neg(e2))
            }
            Expr::Percent(e) => {
                let e2 = self.deep_reduce(e, rctx, memo, budget)?;
                if e2 == e {
                    return Ok(expr);
                }
                self.context.add(Expr::Percent(e2))
            }
            Expr::Function(name, args) => {
                let mut changed = false;
                let mut reduced = Vec::with_capacity(args.len());
                for &arg in &args {
                    let a2 = self.deep_reduce(arg, rctx, memo, budget)?;
                    changed |= a2 != arg;
                    reduced.push(a2);
                }
                if !changed {
                    return Ok(expr);
                }
                self.context.add(Expr::Function(name, reduced))
            }
            Expr::List(items) => {
                let mut changed = false;
                let mut reduced = Vec::with_capacity(items.len());
                for &item in &items {
                    let i2 = self.deep_reduce(item, rctx, memo, budget)?;
                    changed |= i2 != item;
                    reduced.push(i2);
                }
                if !changed {
                    return Ok(expr);
                }
                self.context.add(Expr::List(reduced))
            }
            Expr::Number(_)
            | Expr::Constant(_)
            | Expr::Variable(_)
            | Expr::Random
            | Expr::Undefined
            | Expr::Nonreal => return Ok(expr),
        };
        Ok(rebuilt)
    }

    fn reduce_pair(
        &mut self,
        l: ExprId,
        r: ExprId,
        rctx: &ReductionContext,
        memo: &mut FxHashMap<ExprId, ExprId>,
        budget: &mut usize,
    ) -> Result<(ExprId, ExprId), EngineError> {
        let l2 = self.deep_reduce(l, rctx, memo, budget)?;
        let r2 = self.deep_reduce(r, rctx, memo, budget)?;
        Ok((l2, r2))
    }

    /// First sentinel among the children; `Undefined` dominates.
    fn sentinel_child(&self, id: ExprId) -> Option<ExprId> {
        let mut nonreal = None;
        for child in self.context.children(id) {
            match self.context.get(child) {
                Expr::Undefined => return Some(child),
                Expr::Nonreal => nonreal = nonreal.or(Some(child)),
                _ => {}
            }
        }
        nonreal
    }
}

fn spend(budget: &mut usize) -> Result<(), EngineError> {
    if *budget == 0 {
        return Err(EngineError::RewriteBudgetExceeded);
    }
    *budget -= 1;
    Ok(())
}
