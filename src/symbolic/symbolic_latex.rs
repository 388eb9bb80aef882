//! LaTeX rendering of expressions for the web page.
//!
//! Follows the same displayed tree as the plain-text printer (`display_form`), so
//! `x**3/3` becomes `\frac{x^{3}}{3}` and `2*x**(3/2)/3` becomes `\frac{2 x^{\frac{3}{2}}}{3}`.

use crate::symbolic::symbolic_engine::{Expr, PREC_POWER, PREC_PRODUCT, PREC_SUM};
use crate::symbolic::utils::format_number;

fn parens(text: String) -> String {
    format!("\\left({}\\right)", text)
}

impl Expr {
    /// LaTeX source for the expression.
    ///
    /// # Examples
    /// ```
    /// use RustedIntegrals::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("sin(x)/x").unwrap();
    /// assert_eq!(f.to_latex(), "\\frac{\\sin\\left(x\\right)}{x}");
    /// ```
    pub fn to_latex(&self) -> String {
        match self.display_form() {
            Expr::Var(name) => match name.as_str() {
                "pi" => "\\pi".to_string(),
                _ => name,
            },
            Expr::Const(c) => format_number(c),
            sum @ (Expr::Add(_, _) | Expr::Sub(_, _)) => {
                let mut out = String::new();
                for (i, term) in sum.sum_terms().iter().enumerate() {
                    let (negative, shown) = match term.negated_form() {
                        Some(positive) => (true, positive),
                        None => (false, term.clone()),
                    };
                    let text = shown.latex_wrapped(shown.precedence() <= PREC_SUM);
                    match (i, negative) {
                        (0, false) => out.push_str(&text),
                        (0, true) => out.push_str(&format!("-{}", text)),
                        (_, false) => out.push_str(&format!(" + {}", text)),
                        (_, true) => out.push_str(&format!(" - {}", text)),
                    }
                }
                out
            }
            Expr::Mul(lhs, rhs) => {
                if lhs.as_number() == Some(-1.0) {
                    return format!("-{}", rhs.latex_wrapped(rhs.precedence() < PREC_PRODUCT));
                }
                let left = lhs.latex_wrapped(lhs.precedence() < PREC_PRODUCT);
                let right = rhs.latex_wrapped(
                    rhs.precedence() < PREC_PRODUCT || rhs.negated_form().is_some(),
                );
                // 2 \cdot 3 stays readable, 2 x does not need a dot
                if rhs.as_number().is_some() {
                    format!("{} \\cdot {}", left, right)
                } else {
                    format!("{} {}", left, right)
                }
            }
            Expr::Div(num, den) => match num.negated_form() {
                Some(positive) => format!("-\\frac{{{}}}{{{}}}", positive.to_latex(), den.to_latex()),
                None => format!("\\frac{{{}}}{{{}}}", num.to_latex(), den.to_latex()),
            },
            Expr::Pow(base, exp) => {
                if exp.as_number() == Some(0.5) {
                    return format!("\\sqrt{{{}}}", base.to_latex());
                }
                let base_text = base.latex_wrapped(
                    base.precedence() <= PREC_POWER || base.negated_form().is_some(),
                );
                format!("{}^{{{}}}", base_text, exp.to_latex())
            }
            Expr::Exp(arg) => format!("e^{{{}}}", arg.to_latex()),
            Expr::Ln(arg) => format!("\\ln{}", parens(arg.to_latex())),
            Expr::sin(arg) => format!("\\sin{}", parens(arg.to_latex())),
            Expr::cos(arg) => format!("\\cos{}", parens(arg.to_latex())),
            Expr::tg(arg) => format!("\\tan{}", parens(arg.to_latex())),
            Expr::ctg(arg) => format!("\\cot{}", parens(arg.to_latex())),
            Expr::arcsin(arg) => format!("\\arcsin{}", parens(arg.to_latex())),
            Expr::arccos(arg) => format!("\\arccos{}", parens(arg.to_latex())),
            Expr::arctg(arg) => format!("\\arctan{}", parens(arg.to_latex())),
            Expr::arcctg(arg) => format!("\\operatorname{{arccot}}{}", parens(arg.to_latex())),
        }
    }

    fn latex_wrapped(&self, wrap: bool) -> String {
        if wrap {
            parens(self.to_latex())
        } else {
            self.to_latex()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::symbolic_engine::Expr;

    fn latex(input: &str) -> String {
        Expr::parse_expression(input).unwrap().simplify().to_latex()
    }

    #[test]
    fn test_latex_powers_and_fractions() {
        assert_eq!(latex("x**2"), "x^{2}");
        assert_eq!(latex("x**3/3"), "\\frac{x^{3}}{3}");
        assert_eq!(latex("1/x"), "\\frac{1}{x}");
        assert_eq!(latex("sqrt(x)"), "\\sqrt{x}");
        assert_eq!(latex("(x + 1)**2"), "\\left(x + 1\\right)^{2}");
    }

    #[test]
    fn test_latex_functions() {
        assert_eq!(latex("exp(2*x)"), "e^{2 x}");
        assert_eq!(latex("log(x)"), "\\ln\\left(x\\right)");
        assert_eq!(latex("x*sin(x)"), "x \\sin\\left(x\\right)");
        assert_eq!(latex("atan(x)"), "\\arctan\\left(x\\right)");
        assert_eq!(latex("acot(x)"), "\\operatorname{arccot}\\left(x\\right)");
    }

    #[test]
    fn test_latex_signs() {
        assert_eq!(latex("-cos(x)"), "-\\cos\\left(x\\right)");
        assert_eq!(latex("x - 2"), "x - 2");
        assert_eq!(latex("pi*x"), "\\pi x");
    }
}
