//! Turns a string expression into a symbolic expression.
//!
//! Recursive-descent grammar written with `nom` combinators:
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := ('-' | '+') unary | power
//! power := atom ('**' unary)?
//! atom  := number | name '(' expr ')' | name | '(' expr ')'
//! ```
//!
//! `**` is right associative and binds tighter than unary minus, so `-x**2` is `-(x**2)`
//! and `2**-1` is `2**(-1)`. Implicit multiplication (`2x`) is not supported.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::brackets_balanced;
use itertools::Itertools;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, one_of},
    combinator::{all_consuming, map, not, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use regex::Regex;
use std::sync::LazyLock;

type ParseResult<'a, O> = IResult<&'a str, O>;

/// Function names accepted in calls, with the aliases of each.
pub const KNOWN_FUNCTIONS: &[&str] = &[
    "exp", "log", "ln", "sqrt", "sin", "cos", "tan", "tg", "cot", "ctg", "sec", "csc", "asin",
    "arcsin", "acos", "arccos", "atan", "arctan", "arctg", "acot", "arccot", "arcctg",
];

/// longest accepted input, in characters
pub const MAX_EXPRESSION_LENGTH: usize = 1000;
/// deepest accepted nesting of parentheses, signs and powers, and deepest parsed tree
pub const MAX_NESTING: usize = 200;

static CALL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*\(").expect("static regex"));

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn mantissa(input: &str) -> ParseResult<'_, &str> {
    take_while1(|c: char| c.is_ascii_digit() || c == '.').parse(input)
}

fn exponent(input: &str) -> ParseResult<'_, Option<(char, Option<char>, &str)>> {
    opt((one_of("eE"), opt(one_of("+-")), digit1)).parse(input)
}

/// unsigned decimal: `12`, `1.5`, `1.`, `.5`, `2e-3`
fn number(input: &str) -> ParseResult<'_, f64> {
    let (rest, mantissa) = mantissa(input)?;
    let (rest, exponent) = exponent(rest)?;
    let mut text = mantissa.to_string();
    if let Some((e, sign, digits)) = exponent {
        text.push(e);
        if let Some(sign) = sign {
            text.push(sign);
        }
        text.push_str(digits);
    }
    match text.parse::<f64>() {
        Ok(value) => Ok((rest, value)),
        Err(_) => Err(nom::Err::Error(nom::error::Error {
            input,
            code: nom::error::ErrorKind::Float,
        })),
    }
}

fn identifier(input: &str) -> ParseResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Builds the node for `name(arg)`; aliases collapse onto the same variant.
fn build_function(name: &str, arg: Expr) -> Option<Expr> {
    let arg = arg.boxed();
    let expr = match name {
        "exp" => Expr::Exp(arg),
        "log" | "ln" => Expr::Ln(arg),
        "sqrt" => Expr::Pow(arg, Expr::Const(0.5).boxed()),
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tan" | "tg" => Expr::tg(arg),
        "cot" | "ctg" => Expr::ctg(arg),
        "sec" => Expr::Div(Expr::Const(1.0).boxed(), Expr::cos(arg).boxed()),
        "csc" => Expr::Div(Expr::Const(1.0).boxed(), Expr::sin(arg).boxed()),
        "asin" | "arcsin" => Expr::arcsin(arg),
        "acos" | "arccos" => Expr::arccos(arg),
        "atan" | "arctan" | "arctg" => Expr::arctg(arg),
        "acot" | "arccot" | "arcctg" => Expr::arcctg(arg),
        _ => return None,
    };
    Some(expr)
}

fn function_call(input: &str) -> ParseResult<'_, Expr> {
    let (rest, name) = identifier(input)?;
    let (rest, arg) = delimited(ws(char('(')), expression, char(')')).parse(rest)?;
    match build_function(name, arg) {
        Some(expr) => Ok((rest, expr)),
        None => Err(nom::Err::Failure(nom::error::Error {
            input,
            code: nom::error::ErrorKind::Verify,
        })),
    }
}

fn symbol(input: &str) -> ParseResult<'_, Expr> {
    map(identifier, |name: &str| match name {
        "E" => Expr::Exp(Expr::Const(1.0).boxed()),
        _ => Expr::Var(name.to_string()),
    })
    .parse(input)
}

fn atom(input: &str) -> ParseResult<'_, Expr> {
    ws(alt((
        map(number, Expr::Const),
        function_call,
        symbol,
        delimited(char('('), expression, char(')')),
    )))
    .parse(input)
}

fn power(input: &str) -> ParseResult<'_, Expr> {
    let (input, base) = atom(input)?;
    let (input, exponent) = opt(preceded(ws(tag("**")), unary)).parse(input)?;
    let expr = match exponent {
        Some(exponent) => Expr::Pow(base.boxed(), exponent.boxed()),
        None => base,
    };
    Ok((input, expr))
}

fn unary(input: &str) -> ParseResult<'_, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |expr| -expr),
        preceded(ws(char('+')), unary),
        power,
    ))
    .parse(input)
}

fn term(input: &str) -> ParseResult<'_, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(
        ws(alt((terminated(char('*'), not(char('*'))), char('/')))),
        unary,
    ))
    .parse(input)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => acc * rhs,
        _ => acc / rhs,
    });
    Ok((input, expr))
}

fn expression(input: &str) -> ParseResult<'_, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(ws(one_of("+-")), term)).parse(input)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => acc + rhs,
        _ => acc - rhs,
    });
    Ok((input, expr))
}

/// Upper bound of the parser recursion a text needs: the deepest parenthesis plus the
/// longest run of unary signs plus the number of `**` operators.
fn nesting_depth(input: &str) -> usize {
    let mut parens = 0usize;
    let mut deepest_parens = 0;
    let mut signs = 0usize;
    let mut longest_signs = 0;
    for c in input.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '(' => {
                parens += 1;
                deepest_parens = deepest_parens.max(parens);
            }
            ')' => parens = parens.saturating_sub(1),
            _ => {}
        }
        if matches!(c, '+' | '-') {
            signs += 1;
            longest_signs = longest_signs.max(signs);
        } else {
            signs = 0;
        }
    }
    deepest_parens + longest_signs + input.matches("**").count()
}

/// Parses a full expression. Errors name the problem: an empty or oversized input,
/// unbalanced parentheses, too much nesting, an unknown function, or the text where the
/// syntax stops making sense.
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    if input.trim().is_empty() {
        return Err("Empty expression".to_string());
    }
    if input.chars().count() > MAX_EXPRESSION_LENGTH {
        return Err(format!(
            "Expression too long (at most {} characters)",
            MAX_EXPRESSION_LENGTH
        ));
    }
    if !brackets_balanced(input) {
        return Err("Unbalanced parentheses".to_string());
    }
    if nesting_depth(input) > MAX_NESTING {
        return Err("Expression nested too deeply".to_string());
    }
    if let Some(unknown) = CALL_NAME
        .captures_iter(input)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|name| !KNOWN_FUNCTIONS.contains(name))
    {
        return Err(format!(
            "Unknown function '{}' (known functions: {})",
            unknown,
            KNOWN_FUNCTIONS.iter().join(", ")
        ));
    }
    match all_consuming(ws(expression)).parse(input) {
        Ok((_, expr)) if expr.depth() > MAX_NESTING => {
            Err("Expression nested too deeply".to_string())
        }
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let near = e.input.trim();
            if near.is_empty() {
                Err("Invalid syntax: unexpected end of expression".to_string())
            } else {
                Err(format!("Invalid syntax near '{}'", near))
            }
        }
        Err(nom::Err::Incomplete(_)) => Err("Invalid syntax: incomplete expression".to_string()),
    }
}

impl Expr {
    /// Parses a string into an expression, reporting what went wrong instead of panicking.
    ///
    /// # Examples
    /// ```
    /// use RustedIntegrals::symbolic::symbolic_engine::Expr;
    /// let expr = Expr::parse_expression("x**2 + 2*x + 1").unwrap();
    /// assert_eq!(expr.to_string(), "x**2 + 2*x + 1");
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        parse_expression_func(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_expression_func("5").unwrap(), Expr::Const(5.0));
        assert_eq!(parse_expression_func("2.5").unwrap(), Expr::Const(2.5));
        assert_eq!(parse_expression_func(".5").unwrap(), Expr::Const(0.5));
        assert_eq!(parse_expression_func("1e-3").unwrap(), Expr::Const(0.001));
        assert_eq!(parse_expression_func("-4").unwrap(), Expr::Const(-4.0));
    }

    #[test]
    fn test_parse_precedence() {
        let parsed = parse_expression_func("2*x + 3").unwrap();
        assert_eq!(parsed, Expr::Const(2.0) * x() + Expr::Const(3.0));

        let parsed = parse_expression_func("x - 1 - 2").unwrap();
        assert_eq!(parsed, (x() - Expr::Const(1.0)) - Expr::Const(2.0));

        let parsed = parse_expression_func("x/2/3").unwrap();
        assert_eq!(parsed, (x() / Expr::Const(2.0)) / Expr::Const(3.0));
    }

    #[test]
    fn test_parse_power_associativity() {
        let parsed = parse_expression_func("x**2**3").unwrap();
        assert_eq!(parsed, x().pow(Expr::Const(2.0).pow(Expr::Const(3.0))));

        let parsed = parse_expression_func("-x**2").unwrap();
        assert_eq!(parsed, -(x().pow(Expr::Const(2.0))));

        let parsed = parse_expression_func("x**-1").unwrap();
        assert_eq!(parsed, x().pow(Expr::Const(-1.0)));

        let parsed = parse_expression_func("2 * x ** 3").unwrap();
        assert_eq!(parsed, Expr::Const(2.0) * x().pow(Expr::Const(3.0)));
    }

    #[test]
    fn test_parse_functions_and_aliases() {
        let parsed = parse_expression_func("x*exp(x)").unwrap();
        assert_eq!(parsed, x() * x().exp());

        assert_eq!(parse_expression_func("ln(x)").unwrap(), x().ln());
        assert_eq!(parse_expression_func("log(x)").unwrap(), x().ln());
        assert_eq!(parse_expression_func("tan(x)").unwrap(), Expr::tg(x().boxed()));
        assert_eq!(parse_expression_func("arctan(x)").unwrap(), Expr::arctg(x().boxed()));
        assert_eq!(
            parse_expression_func("sqrt(x)").unwrap(),
            x().pow(Expr::Const(0.5))
        );
        assert_eq!(
            parse_expression_func("sec(x)").unwrap(),
            Expr::Const(1.0) / Expr::cos(x().boxed())
        );
        assert_eq!(
            parse_expression_func("sin( (x + 1) )").unwrap(),
            Expr::sin((x() + Expr::Const(1.0)).boxed())
        );
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse_expression_func("pi").unwrap(), Expr::var("pi"));
        assert_eq!(parse_expression_func("E").unwrap(), Expr::Const(1.0).exp());
        assert_eq!(parse_expression_func("y_1").unwrap(), Expr::var("y_1"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_expression_func("sin(x").unwrap_err(),
            "Unbalanced parentheses"
        );
        assert_eq!(parse_expression_func("   ").unwrap_err(), "Empty expression");
        assert!(
            parse_expression_func("foo(x)")
                .unwrap_err()
                .starts_with("Unknown function 'foo'")
        );
        assert!(
            parse_expression_func("x +* 2")
                .unwrap_err()
                .starts_with("Invalid syntax")
        );
        assert!(parse_expression_func("2x").is_err());
        assert!(parse_expression_func("x +").is_err());
        assert!(parse_expression_func("()").is_err());
    }

    #[test]
    fn test_parse_decimals_anywhere() {
        assert_eq!(parse_expression_func("1.5").unwrap(), Expr::Const(1.5));
        assert_eq!(parse_expression_func("1.").unwrap(), Expr::Const(1.0));
        assert_eq!(parse_expression_func("2.5e2").unwrap(), Expr::Const(250.0));
        assert_eq!(
            parse_expression_func("x**1.5").unwrap(),
            x().pow(Expr::Const(1.5))
        );
        assert_eq!(
            parse_expression_func("x + 1.5").unwrap(),
            x() + Expr::Const(1.5)
        );
        assert_eq!(
            parse_expression_func("(x+1)**0.5").unwrap(),
            (x() + Expr::Const(1.0)).pow(Expr::Const(0.5))
        );
        assert_eq!(
            parse_expression_func("x/2.5").unwrap(),
            x() / Expr::Const(2.5)
        );
        assert!(parse_expression_func("1.2.3").is_err());
        assert!(parse_expression_func(".").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |n: usize| format!("{}x{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(parse_expression_func(&nested(50)).unwrap(), x());
        assert_eq!(
            parse_expression_func(&nested(MAX_NESTING + 1)).unwrap_err(),
            "Expression nested too deeply"
        );
        let signs = format!("{}x", "-".repeat(MAX_NESTING + 1));
        assert_eq!(
            parse_expression_func(&signs).unwrap_err(),
            "Expression nested too deeply"
        );
        let tower = vec!["x"; MAX_NESTING + 2].join("**");
        assert_eq!(
            parse_expression_func(&tower).unwrap_err(),
            "Expression nested too deeply"
        );
        // a flat sum builds a deep left-leaning tree
        let sum = vec!["x"; MAX_NESTING + 5].join("+");
        assert_eq!(
            parse_expression_func(&sum).unwrap_err(),
            "Expression nested too deeply"
        );
        let short_sum = vec!["x"; 20].join("+");
        assert!(parse_expression_func(&short_sum).is_ok());
    }

    #[test]
    fn test_length_limit() {
        let huge = format!("{}x{}", "(".repeat(5000), ")".repeat(5000));
        assert!(
            parse_expression_func(&huge)
                .unwrap_err()
                .starts_with("Expression too long")
        );
        let long_but_fine = format!("x{}", " ".repeat(MAX_EXPRESSION_LENGTH - 1));
        assert_eq!(parse_expression_func(&long_but_fine).unwrap(), x());
    }
}
