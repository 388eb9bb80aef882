//! Analytical derivatives, numerical evaluation and numerical cross-checks of expressions.
//!
//! The cross-checks are how the integrator is validated: an antiderivative `F` of `f` is
//! accepted when the central difference of `F` matches `f` on a grid.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{linspace, norm, numerical_derivative};
use std::f64::consts::PI;

impl Expr {
    /// Analytical derivative with respect to `var`. The result is not simplified.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x**2
    /// let df_dx = f.diff("x").simplify(); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) => {
                if exp.contains_variable(var) {
                    // d(b**e) = b**e * (e' * ln(b) + e * b'/b)
                    let log_derivative = Expr::Add(
                        Box::new(Expr::Mul(Box::new(exp.diff(var)), Box::new(base.as_ref().clone().ln()))),
                        Box::new(Expr::Div(
                            Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                            base.clone(),
                        )),
                    );
                    Expr::Mul(Box::new(self.clone()), Box::new(log_derivative))
                } else {
                    Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                            )),
                        )),
                        Box::new(base.diff(var)),
                    )
                }
            }
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::arcctg(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
        }
    } // end of diff

    /// Evaluates the expression numerically.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching values array
    /// * `values` - Numerical values for each variable
    ///
    /// The symbol `pi` evaluates to π unless it is listed in `vars`. Any other variable
    /// missing from `vars` is an error.
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> Result<f64, String> {
        let value = match self {
            Expr::Var(name) => match vars.iter().position(|&x| x == name) {
                Some(index) => values
                    .get(index)
                    .copied()
                    .ok_or_else(|| format!("No value given for variable '{}'", name))?,
                None if name == "pi" => PI,
                None => return Err(format!("Unknown variable '{}'", name)),
            },
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval_expression(vars, values)? + rhs.eval_expression(vars, values)?,
            Expr::Sub(lhs, rhs) => lhs.eval_expression(vars, values)? - rhs.eval_expression(vars, values)?,
            Expr::Mul(lhs, rhs) => lhs.eval_expression(vars, values)? * rhs.eval_expression(vars, values)?,
            Expr::Div(lhs, rhs) => lhs.eval_expression(vars, values)? / rhs.eval_expression(vars, values)?,
            Expr::Pow(base, exp) => {
                let base_fn = base.eval_expression(vars, values)?;
                let exp_fn = exp.eval_expression(vars, values)?;
                base_fn.powf(exp_fn)
            }
            Expr::Exp(expr) => expr.eval_expression(vars, values)?.exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values)?.ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values)?.sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values)?.cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values)?.tan(),
            Expr::ctg(expr) => 1.0 / expr.eval_expression(vars, values)?.tan(),
            Expr::arcsin(expr) => expr.eval_expression(vars, values)?.asin(),
            Expr::arccos(expr) => expr.eval_expression(vars, values)?.acos(),
            Expr::arctg(expr) => expr.eval_expression(vars, values)?.atan(),
            Expr::arcctg(expr) => PI / 2.0 - expr.eval_expression(vars, values)?.atan(),
        };
        Ok(value)
    } // end of eval_expression

    /// Values of a one-variable expression on a grid.
    pub fn eval_on_grid(&self, var: &str, grid: &[f64]) -> Result<Vec<f64>, String> {
        grid.iter()
            .map(|x| self.eval_expression(&[var], &[*x]))
            .collect()
    }

    /// Validates the analytical derivative against a numerical approximation.
    ///
    /// # Returns
    /// Tuple of (rms difference, is_within_tolerance)
    pub fn compare_num1D(
        &self,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> Result<(f64, bool), String> {
        let derivative = self.diff(var);
        numeric_match(self, &derivative, var, start, end, num_values, max_norm)
    }

    /// Checks numerically that `self` is an antiderivative of `integrand`, i.e. that the
    /// central difference of `self` matches `integrand` on `num_values` points of [start, end].
    pub fn is_antiderivative_of(
        &self,
        integrand: &Expr,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> Result<(f64, bool), String> {
        numeric_match(self, integrand, var, start, end, num_values, max_norm)
    }
}

fn numeric_match(
    function: &Expr,
    derivative: &Expr,
    var: &str,
    start: f64,
    end: f64,
    num_values: usize,
    max_norm: f64,
) -> Result<(f64, bool), String> {
    let domain = linspace(start, end, num_values);
    let analytical = derivative.eval_on_grid(var, &domain)?;
    // fail early on unknown symbols; the closure below cannot report errors
    function.eval_expression(&[var], &[start])?;
    let step = 1e-4 * (end - start) / (num_values as f64 - 1.0);
    let numerical = numerical_derivative(
        |x| function.eval_expression(&[var], &[x]).unwrap_or(f64::NAN),
        &domain,
        step,
    );
    let norma_val = norm(&analytical, &numerical);
    Ok((norma_val, norma_val < max_norm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(input: &str) -> Expr {
        Expr::parse_expression(input).unwrap()
    }

    #[test]
    fn test_diff_simplified() {
        assert_eq!(parse("x**3").diff("x").simplify().to_string(), "3*x**2");
        assert_eq!(parse("sin(x)").diff("x").simplify().to_string(), "cos(x)");
        assert_eq!(parse("exp(2*x)").diff("x").simplify().to_string(), "2*exp(2*x)");
        assert_eq!(parse("5*x + 3").diff("x").simplify().to_string(), "5");
        assert_eq!(parse("y*x").diff("y").simplify().to_string(), "x");
    }

    #[test]
    fn test_eval_expression() {
        let expr = parse("x**2 + y");
        assert_relative_eq!(expr.eval_expression(&["x", "y"], &[3.0, 1.0]).unwrap(), 10.0);
        assert_relative_eq!(parse("sin(pi/2)").eval_expression(&[], &[]).unwrap(), 1.0);
        assert_relative_eq!(parse("acot(1)").eval_expression(&[], &[]).unwrap(), PI / 4.0);
        assert!(parse("x + z").eval_expression(&["x"], &[1.0]).is_err());
    }

    #[test]
    fn test_compare_num1D() {
        for input in ["x**3", "sin(x)*x", "log(x)", "atan(x)", "2**x", "x**x"] {
            let (norm, ok) = parse(input).compare_num1D("x", 0.5, 2.0, 50, 1e-4).unwrap();
            assert!(ok, "{} derivative mismatch, norm {}", input, norm);
        }
    }

    #[test]
    fn test_is_antiderivative_of() {
        let antiderivative = parse("x**3/3");
        let (_, ok) = antiderivative
            .is_antiderivative_of(&parse("x**2"), "x", 0.0, 1.0, 20, 1e-6)
            .unwrap();
        assert!(ok);
        let (_, ok) = antiderivative
            .is_antiderivative_of(&parse("x**3"), "x", 0.0, 1.0, 20, 1e-6)
            .unwrap();
        assert!(!ok);
    }
}
