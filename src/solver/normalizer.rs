//! Text preprocessing applied before parsing.
//!
//! Every rule is a plain substitution that knows nothing about the grammar, so
//! `sec^2(x)` becomes `sec**2(x)` and fails later in the parser, which is fine.

use regex::Regex;
use std::sync::LazyLock;

static INTEGRAL_SIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*∫\s*").expect("static regex"));

/// One pass of the rewrite rules in their fixed order.
fn normalize_once(input: &str) -> String {
    let expr = INTEGRAL_SIGN.replace_all(input, "");
    let expr = expr.replace('^', "**");
    let expr = expr.replace("e**x", "exp(x)").replace("e^x", "exp(x)");
    let expr = expr.replace("ln(", "log(");
    let expr = expr.replace("dx", "");
    expr.trim().to_string()
}

/// Rewrites user input into the syntax the parser understands:
/// strips `∫`, turns `^` into `**`, `e**x` into `exp(x)`, `ln(` into `log(`,
/// drops `dx` and trims.
///
/// The pass is repeated until nothing changes, so the function is idempotent.
/// Every pass that changes the string removes a `d`, a `^`, an `ln(` or an `e**x`
/// (or whitespace) without creating the earlier ones, so the loop ends.
pub fn normalize(input: &str) -> String {
    let mut current = normalize_once(input);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_rules() {
        assert_eq!(normalize("x^2"), "x**2");
        assert_eq!(normalize("∫ x^2 dx"), "x**2");
        assert_eq!(normalize("e^x"), "exp(x)");
        assert_eq!(normalize("x*e**x"), "x*exp(x)");
        assert_eq!(normalize("ln(x)"), "log(x)");
        assert_eq!(normalize("  sin(x)  "), "sin(x)");
        assert_eq!(normalize("∫∫ 1/x dx"), "1/x");
    }

    #[test]
    fn test_normalize_is_plain_substitution() {
        // not context aware: the `e^x` inside `re^x` is rewritten too
        assert_eq!(normalize("re^x"), "rexp(x)");
        // removing `dx` can expose another rewrite
        assert_eq!(normalize("ddxx"), "");
        assert_eq!(normalize("e**dxx"), "exp(x)");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   ∫  dx "), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in r"[ex\^\*lnd()∫+ 0-9sic/-]{0,24}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_is_idempotent_on_any_text(s in ".{0,32}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
