//! # Integral solver
//!
//! Glues the pipeline together: normalize the text, parse it, integrate it, label the
//! method and narrate the steps. `solve_integral` never fails; problems with the input end
//! up in a `SolveResult` with `success == false`.
//!
//! ```
//! use RustedIntegrals::solver::integral_solver::IntegralSolver;
//! let solver = IntegralSolver::new();
//! let res = solver.solve_integral("∫ x^2 dx");
//! assert!(res.success);
//! assert_eq!(res.result.as_deref(), Some("x**3/3 + C"));
//! ```

use crate::error::SolverError;
use crate::solver::classifier::{IntegrationMethod, classify};
use crate::solver::normalizer::normalize;
use crate::solver::steps::narrate;
use crate::symbolic::symbolic_engine::Expr;
use log::{Level, debug, error, info, log_enabled, warn};
use serde::Serialize;

/// user-facing message for any expression that cannot be solved
pub const INVALID_EXPRESSION: &str = "Please enter a valid expression (e.g. x^2, sin(x), x*exp(x)).";

/// interval and tolerance of the numeric self-check done at debug level
const CHECK_START: f64 = 0.5;
const CHECK_END: f64 = 1.5;
const CHECK_POINTS: usize = 50;
const CHECK_TOLERANCE: f64 = 1e-4;

/// Outcome of one solve, serialized as the `/solve` response body.
/// On success `error`/`details` are absent, on failure everything but `error`/`details` is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<IntegrationMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_latex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_latex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SolveResult {
    pub fn from_solution(solution: &Solution) -> Self {
        SolveResult {
            success: true,
            input: Some(solution.input_text()),
            result: Some(solution.result_text()),
            steps: Some(solution.steps.clone()),
            method: Some(solution.method),
            input_latex: Some(solution.input_latex()),
            result_latex: Some(solution.result_latex()),
            error: None,
            details: None,
        }
    }

    pub fn failure(err: &SolverError) -> Self {
        SolveResult {
            success: false,
            input: None,
            result: None,
            steps: None,
            method: None,
            input_latex: None,
            result_latex: None,
            error: Some(INVALID_EXPRESSION.to_string()),
            details: Some(err.details().to_string()),
        }
    }
}

/// Typed result of a successful solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub var: String,
    /// input after `normalize`
    pub normalized: String,
    /// parsed and simplified integrand
    pub expression: Expr,
    /// antiderivative without the constant of integration
    pub antiderivative: Expr,
    pub method: IntegrationMethod,
    pub steps: Vec<String>,
}

impl Solution {
    pub fn input_text(&self) -> String {
        format!("∫ {} d{}", self.expression, self.var)
    }

    pub fn result_text(&self) -> String {
        format!("{} + C", self.antiderivative)
    }

    pub fn input_latex(&self) -> String {
        format!("\\int {} \\, d{}", self.expression.to_latex(), self.var)
    }

    pub fn result_latex(&self) -> String {
        format!("{} + C", self.antiderivative.to_latex())
    }
}

/// Stateless apart from the integration variable, shared between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralSolver {
    var: String,
}

impl Default for IntegralSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegralSolver {
    pub fn new() -> Self {
        Self::with_variable("x")
    }

    pub fn with_variable(var: &str) -> Self {
        IntegralSolver {
            var: var.to_string(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.var
    }

    /// Solves and packs the outcome for display. Errors are logged, not returned.
    pub fn solve_integral(&self, raw: &str) -> SolveResult {
        info!("Attempting to solve integral: {}", raw);
        match self.try_solve(raw) {
            Ok(solution) => {
                info!(
                    "solved {} = {} ({})",
                    solution.input_text(),
                    solution.result_text(),
                    solution.method
                );
                SolveResult::from_solution(&solution)
            }
            Err(err) => {
                error!("Error solving integral '{}': {}", raw, err);
                SolveResult::failure(&err)
            }
        }
    }

    /// normalize -> parse -> simplify -> integrate -> classify -> narrate
    pub fn try_solve(&self, raw: &str) -> Result<Solution, SolverError> {
        let normalized = normalize(raw);
        debug!("normalized '{}' to '{}'", raw, normalized);

        let expression = Expr::parse_expression(&normalized)
            .map_err(SolverError::Parse)?
            .simplify();
        debug!("parsed expression: {}", expression);

        let antiderivative = expression
            .integrate(&self.var)
            .map_err(SolverError::Integration)?;
        // constant folding can overflow to inf or produce NaN
        if expression.has_non_finite_constant() || antiderivative.has_non_finite_constant() {
            return Err(SolverError::Integration(format!(
                "Numeric constant out of range in {}",
                expression
            )));
        }
        if log_enabled!(Level::Debug) {
            self.self_check(&expression, &antiderivative);
        }

        let method = classify(&normalized);
        let steps = narrate(&expression, &antiderivative, &self.var);
        Ok(Solution {
            var: self.var.clone(),
            normalized,
            expression,
            antiderivative,
            method,
            steps,
        })
    }

    /// Compares the derivative of the result with the integrand on a small grid.
    fn self_check(&self, expression: &Expr, antiderivative: &Expr) {
        match antiderivative.is_antiderivative_of(
            expression,
            &self.var,
            CHECK_START,
            CHECK_END,
            CHECK_POINTS,
            CHECK_TOLERANCE,
        ) {
            Ok((norm, true)) => debug!("self-check passed, rms difference {:e}", norm),
            Ok((norm, false)) => warn!(
                "self-check: d/d{} of {} differs from {} (rms {:e})",
                self.var, antiderivative, expression, norm
            ),
            Err(msg) => debug!("self-check skipped: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_rule_result() {
        let res = IntegralSolver::new().solve_integral("x**2");
        assert!(res.success);
        assert_eq!(res.input.as_deref(), Some("∫ x**2 dx"));
        assert_eq!(res.result.as_deref(), Some("x**3/3 + C"));
        assert_eq!(res.method, Some(IntegrationMethod::PowerRule));
        assert_eq!(res.error, None);
        assert_eq!(res.steps.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_trig_result() {
        let res = IntegralSolver::new().solve_integral("sin(x)");
        assert!(res.success);
        assert_eq!(res.result.as_deref(), Some("-cos(x) + C"));
        assert_eq!(res.method, Some(IntegrationMethod::Trigonometric));
        assert_eq!(res.result_latex.as_deref(), Some("-\\cos\\left(x\\right) + C"));
        assert_eq!(res.input_latex.as_deref(), Some("\\int \\sin\\left(x\\right) \\, dx"));
    }

    #[test]
    fn test_user_notation() {
        let solver = IntegralSolver::new();
        let res = solver.solve_integral("∫ e^x dx");
        assert_eq!(res.result.as_deref(), Some("exp(x) + C"));
        assert_eq!(res.method, Some(IntegrationMethod::Exponential));

        let res = solver.solve_integral("ln(x)");
        assert_eq!(res.result.as_deref(), Some("x*log(x) - x + C"));

        let res = solver.solve_integral("x*sin(x)");
        assert_eq!(res.result.as_deref(), Some("-x*cos(x) + sin(x) + C"));
        assert_eq!(res.method, Some(IntegrationMethod::ByParts));
    }

    #[test]
    fn test_malformed_input_fails_softly() {
        let solver = IntegralSolver::new();
        for input in ["sin(x", "foo(x)", "", "x +* 2", "2x", ")(", "x**x", "exp(x**2)"] {
            let res = solver.solve_integral(input);
            assert!(!res.success, "{input} should fail");
            assert_eq!(res.error.as_deref(), Some(INVALID_EXPRESSION));
            assert!(res.details.is_some());
            assert_eq!(res.result, None);
            assert_eq!(res.steps, None);
            assert_eq!(res.method, None);
        }
    }

    #[test]
    fn test_typed_errors() {
        let solver = IntegralSolver::new();
        assert_eq!(
            solver.try_solve("sin(x").unwrap_err(),
            SolverError::Parse("Unbalanced parentheses".to_string())
        );
        assert!(matches!(
            solver.try_solve("x**x"),
            Err(SolverError::Integration(_))
        ));
        let solution = solver.try_solve("∫ 2*x + 3 dx").unwrap();
        assert_eq!(solution.normalized, "2*x + 3");
        assert_eq!(solution.result_text(), "x**2 + 3*x + C");
    }

    #[test]
    fn test_other_variable() {
        let solver = IntegralSolver::with_variable("t");
        let solution = solver.try_solve("t**2 + x").unwrap();
        assert_eq!(solution.input_text(), "∫ t**2 + x dt");
        assert_eq!(solution.result_text(), "t**3/3 + x*t + C");
    }

    #[test]
    fn test_serialized_shape() {
        let solver = IntegralSolver::new();
        let ok = serde_json::to_value(solver.solve_integral("5")).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["result"], "5*x + C");
        assert_eq!(ok["method"], "Constant Rule");
        assert!(ok.get("error").is_none());

        let failed = serde_json::to_value(solver.solve_integral("sin(x")).unwrap();
        assert_eq!(failed["success"], false);
        assert_eq!(failed["details"], "Unbalanced parentheses");
        assert!(failed.get("result").is_none());
        assert!(failed.get("steps").is_none());
    }

    #[test]
    fn test_decimal_constants() {
        let solver = IntegralSolver::new();
        assert_eq!(
            solver.solve_integral("x^1.5").result.as_deref(),
            Some("2*x**(5/2)/5 + C")
        );
        assert_eq!(solver.solve_integral("2.5").result.as_deref(), Some("5*x/2 + C"));
        for input in ["x/2.5", "(x+1)**0.5", "(2*x+1)**0.5", "0.5*x + 1.25", "x**0.5*log(x)"] {
            let solution = solver.try_solve(input).unwrap();
            let (norm, ok) = solution
                .antiderivative
                .is_antiderivative_of(&solution.expression, "x", 0.5, 1.5, 50, 1e-4)
                .unwrap();
            assert!(ok, "{}: {} (norm {})", input, solution.result_text(), norm);
        }
    }

    #[test]
    fn test_oversized_and_nested_input_fails_softly() {
        let solver = IntegralSolver::new();
        let deep = format!("{}x{}", "(".repeat(5000), ")".repeat(5000));
        let res = solver.solve_integral(&deep);
        assert!(!res.success);
        assert_eq!(res.error.as_deref(), Some(INVALID_EXPRESSION));

        let nested = format!("{}x{}", "(".repeat(300), ")".repeat(300));
        assert_eq!(
            solver.try_solve(&nested).unwrap_err(),
            SolverError::Parse("Expression nested too deeply".to_string())
        );
    }

    #[test]
    fn test_overflowing_constants_are_rejected() {
        let solver = IntegralSolver::new();
        let err = solver.try_solve("1e308*x*1e308").unwrap_err();
        assert!(matches!(err, SolverError::Integration(_)));
        assert!(err.details().starts_with("Numeric constant out of range"));
        assert!(!solver.solve_integral("1e400").success);
    }
}
