#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedIntegrals::symbolic::symbolic_engine::Expr;
/// let input = "x**2*log(x) + 1";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert!(Expr::parse_expression("foo(x)").is_err());
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree and prints it back in plain text
/// 2) differentiates and evaluates expressions (used to check antiderivatives numerically)
///# Example#
/// ```
/// use RustedIntegrals::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x*exp(x)").unwrap();
/// let df_dx = f.diff("x").simplify();
/// println!("df_dx = {}", df_dx);
/// let value = f.eval_expression(&["x"], &[1.0]).unwrap();
/// assert!((value - std::f64::consts::E).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// rule-based indefinite integration
///# Example#
/// ```
/// use RustedIntegrals::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x*sin(x)").unwrap();
/// let F = f.integrate("x").unwrap();
/// assert_eq!(F.to_string(), "-x*cos(x) + sin(x)");
/// let (norm, ok) = F.compare_num1D("x", 0.5, 2.0, 50, 1e-4).unwrap();
/// println!("norm = {}, ok = {}", norm, ok);
/// ```
pub mod symbolic_integration;
/// LaTeX output for the web page
pub mod symbolic_latex;
pub mod symbolic_simplify;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions for bracket checking, number printing and numeric checks
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
