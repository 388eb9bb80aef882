//! Guesses the textbook rule an integral "probably" needs.
//!
//! The label is for display only and never influences the computation. It is decided by
//! substring checks on the normalized input, tried in a fixed order; the first match wins.

use serde::Serialize;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum IntegrationMethod {
    #[strum(serialize = "Power Rule")]
    #[serde(rename = "Power Rule")]
    PowerRule,
    #[strum(serialize = "Sum Rule")]
    #[serde(rename = "Sum Rule")]
    SumRule,
    #[strum(serialize = "Constant Rule")]
    #[serde(rename = "Constant Rule")]
    ConstantRule,
    #[strum(serialize = "Integration by Parts")]
    #[serde(rename = "Integration by Parts")]
    ByParts,
    #[strum(serialize = "Trigonometric Integration")]
    #[serde(rename = "Trigonometric Integration")]
    Trigonometric,
    #[strum(serialize = "Exponential Integration")]
    #[serde(rename = "Exponential Integration")]
    Exponential,
    #[strum(serialize = "Division Rule")]
    #[serde(rename = "Division Rule")]
    DivisionRule,
    #[strum(serialize = "Product Rule")]
    #[serde(rename = "Product Rule")]
    ProductRule,
    #[strum(serialize = "Basic Integration")]
    #[serde(rename = "Basic Integration")]
    Basic,
}

const PARTS_FUNCTIONS: [&str; 4] = ["sin", "cos", "exp", "log"];
const TRIG_FUNCTIONS: [&str; 6] = ["sin", "cos", "tan", "sec", "csc", "cot"];

fn contains_any(expr: &str, names: &[&str]) -> bool {
    names.iter().any(|name| expr.contains(name))
}

fn looks_like_parts(expr: &str) -> bool {
    expr.contains('*') && contains_any(expr, &PARTS_FUNCTIONS)
}

fn looks_like_sum(expr: &str) -> bool {
    expr.contains('+') || expr.contains('-')
}

/// `^` still counts for callers that skip normalization
fn looks_like_power(expr: &str) -> bool {
    expr.contains("**") || expr.contains('^')
}

fn looks_like_constant(expr: &str) -> bool {
    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    !compact.is_empty() && compact.parse::<f64>().is_ok_and(f64::is_finite)
}

fn looks_like_trig(expr: &str) -> bool {
    contains_any(expr, &TRIG_FUNCTIONS)
}

fn looks_like_exponential(expr: &str) -> bool {
    expr.contains("exp") || expr.contains("e**")
}

fn looks_like_division(expr: &str) -> bool {
    expr.contains('/')
}

fn looks_like_product(expr: &str) -> bool {
    expr.contains('*')
}

/// Ordered decision list, first matching predicate wins.
pub const DECISION_LIST: &[(fn(&str) -> bool, IntegrationMethod)] = &[
    (looks_like_parts, IntegrationMethod::ByParts),
    (looks_like_sum, IntegrationMethod::SumRule),
    (looks_like_power, IntegrationMethod::PowerRule),
    (looks_like_constant, IntegrationMethod::ConstantRule),
    (looks_like_trig, IntegrationMethod::Trigonometric),
    (looks_like_exponential, IntegrationMethod::Exponential),
    (looks_like_division, IntegrationMethod::DivisionRule),
    (looks_like_product, IntegrationMethod::ProductRule),
];

/// Label for a normalized expression string. Case does not matter.
pub fn classify(expr: &str) -> IntegrationMethod {
    let expr = expr.to_lowercase();
    DECISION_LIST
        .iter()
        .find(|(matches, _)| matches(&expr))
        .map(|(_, method)| *method)
        .unwrap_or(IntegrationMethod::Basic)
}
