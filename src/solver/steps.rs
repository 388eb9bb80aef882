//! Canned explanation lines for a few expression shapes.
//!
//! Only pure powers of the variable, sums and bare constants get dedicated lines.
//! Everything else receives the closing summary line alone.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::format_number;

pub const POWER_RULE: &str = "Using the Power Rule: ∫ xⁿ dx = xⁿ⁺¹/(n+1) + C (n ≠ -1)";
pub const SUM_RULE: &str = "Using the Sum Rule: ∫ (f(x) + g(x)) dx = ∫ f(x) dx + ∫ g(x) dx";
pub const CONSTANT_RULE: &str = "Using the Constant Rule: ∫ k dx = k·x + C";

/// Explanation steps for `∫ expr d(var) = result`.
pub fn narrate(expr: &Expr, result: &Expr, var: &str) -> Vec<String> {
    let mut steps = Vec::new();
    if let Some(n) = expr.power_of(var) {
        steps.push(POWER_RULE.to_string());
        steps.push(power_step(expr, n, var));
    } else if expr.is_sum() {
        steps.push(SUM_RULE.to_string());
        steps.extend(expr.sum_terms().iter().map(|term| term_step(term, var)));
    } else if let Some(k) = expr.as_number() {
        steps.push(CONSTANT_RULE.to_string());
        steps.push(format!(
            "Here k = {}: ∫ {} d{} = {} + C",
            format_number(k),
            expr,
            var,
            result
        ));
    }
    steps.push(format!("Therefore, ∫ {} d{} = {} + C", expr, var, result));
    steps
}

fn power_step(expr: &Expr, n: f64, var: &str) -> String {
    if n == -1.0 {
        return format!(
            "Here n = -1, so the Power Rule does not apply: ∫ {} d{} = log({}) + C",
            expr, var, var
        );
    }
    let raised = Expr::var(var).pow(Expr::Const(n + 1.0)) / Expr::Const(n + 1.0);
    format!(
        "Here n = {}: ∫ {} d{} = {}**({})/({}) + C = {} + C",
        format_number(n),
        expr,
        var,
        var,
        format_number(n + 1.0),
        format_number(n + 1.0),
        raised.simplify()
    )
}

/// each addend is integrated on its own
fn term_step(term: &Expr, var: &str) -> String {
    match term.integrate(var) {
        Ok(antiderivative) => format!("∫ {} d{} = {} + C", term, var, antiderivative),
        Err(_) => format!("∫ {} d{} has no elementary form here", term, var),
    }
}
