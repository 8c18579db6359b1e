//! The default rule set.
//!
//! Registration order is application order within a node, and it
//! matters: structural normalization runs before the canonical
//! sum/product rebuild, and the cheap identity checks run before the
//! folding rules they protect.

pub mod arithmetic;
pub mod functions;
pub mod lists;
pub mod logarithm;
pub mod percent;
pub mod power;
pub mod trig;

use crate::reducer::Reducer;

pub fn register_default_rules(r: &mut Reducer) {
    r.register(Box::new(functions::FunctionArityRule));
    r.register(Box::new(arithmetic::NormalizeRule));

    r.register(Box::new(power::PowZeroExponentRule));
    r.register(Box::new(power::PowOneExponentRule));
    r.register(Box::new(power::PowOneBaseRule));
    r.register(Box::new(power::PowZeroBaseRule));
    r.register(Box::new(power::EvaluatePowerRule));
    r.register(Box::new(power::PowPowRule));

    r.register(Box::new(functions::ExpandFunctionNotationRule));
    r.register(Box::new(trig::ExpandAdvancedTrigRule));
    r.register(Box::new(trig::TrigExactValueRule));
    r.register(Box::new(trig::InverseTrigCompositionRule));
    r.register(Box::new(logarithm::LnRule));
    r.register(Box::new(logarithm::LogFoldRule));
    r.register(Box::new(functions::NumericFunctionFoldRule));
    r.register(Box::new(functions::DistributionDomainRule));
    r.register(Box::new(lists::ListOperationRule));

    r.register(Box::new(arithmetic::CanonicalizeAddRule));
    r.register(Box::new(arithmetic::CanonicalizeMulRule));
}
