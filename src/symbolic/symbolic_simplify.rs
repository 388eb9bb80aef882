//! # Symbolic Expression Simplification Module
//!
//! Algebraic simplification used before and after integration. The goal is a canonical,
//! readable tree rather than a minimal one.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic on numerical constants is evaluated
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, 0 * x = 0, x / x = 1, x ** 1 = x
//! 3. **Coefficients**: constants are pulled to the left of products and division by a
//!    constant becomes multiplication by its reciprocal (`x/3` → `(1/3)*x`)
//! 4. **Power Rules**: same-base factors merge (`x * x**2` → `x**3`, `x**3 / x` → `x**2`)
//! 5. **Function Identities**: `log(exp(u))` → `u`, `exp(log(u))` → `u`, `sin(0)` → `0`, ...
//! 6. **Like Term Collection**: sums are flattened and terms with the same non-constant part
//!    are combined (`3*x + 2*x` → `5*x`), the constant term goes last
//!
//! `simplify()` repeats the bottom-up pass until the tree stops changing.

use crate::symbolic::symbolic_engine::Expr;

/// upper bound of bottom-up passes in `simplify`
const MAX_PASSES: usize = 16;
/// coefficients this close to zero vanish when like terms are collected
const ZERO_COEFFICIENT: f64 = 1e-12;

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Simplifies until a fixed point (or `MAX_PASSES`) is reached.
    pub fn simplify(&self) -> Expr {
        let mut current = self.simplify_();
        for _ in 0..MAX_PASSES {
            let next = current.simplify_();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// One bottom-up simplification pass.
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => simplify_sum(lhs.simplify_(), rhs.simplify_()),
            Expr::Sub(lhs, rhs) => simplify_difference(lhs.simplify_(), rhs.simplify_()),
            Expr::Mul(lhs, rhs) => simplify_product(lhs.simplify_(), rhs.simplify_()),
            Expr::Div(lhs, rhs) => simplify_quotient(lhs.simplify_(), rhs.simplify_()),
            Expr::Pow(base, exp) => simplify_power(base.simplify_(), exp.simplify_()),
            _ => simplify_function(self.map_argument(|arg| arg.simplify_())),
        }
    }
}

pub(crate) fn negate(expr: Expr) -> Expr {
    simplify_product(Expr::Const(-1.0), expr)
}

pub(crate) fn simplify_sum(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
        _ if lhs.is_zero() => rhs,
        _ if rhs.is_zero() => lhs,
        _ => {
            let expr = Expr::Add(lhs.boxed(), rhs.boxed());
            collect_like_terms(&expr).unwrap_or(expr)
        }
    }
}

pub(crate) fn simplify_difference(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
        _ if rhs.is_zero() => lhs,
        _ if lhs.is_zero() => negate(rhs),
        _ if lhs == rhs => Expr::Const(0.0),
        _ => {
            // a - (-b) = a + b
            let expr = match rhs.negated_form() {
                Some(positive) => Expr::Add(lhs.boxed(), positive.boxed()),
                None => Expr::Sub(lhs.boxed(), rhs.boxed()),
            };
            collect_like_terms(&expr).unwrap_or(expr)
        }
    }
}

pub(crate) fn simplify_product(lhs: Expr, rhs: Expr) -> Expr {
    if let (Expr::Const(a), Expr::Const(b)) = (&lhs, &rhs) {
        return Expr::Const(a * b);
    }
    if lhs.is_zero() || rhs.is_zero() {
        return Expr::Const(0.0);
    }
    if lhs.is_one() {
        return rhs;
    }
    if rhs.is_one() {
        return lhs;
    }
    // constants go to the left
    if matches!(rhs, Expr::Const(_)) {
        return simplify_product(rhs, lhs);
    }
    if let Expr::Const(a) = lhs {
        match &rhs {
            Expr::Mul(inner_lhs, inner_rhs) => {
                if let Expr::Const(b) = inner_lhs.as_ref() {
                    return simplify_product(Expr::Const(a * b), inner_rhs.as_ref().clone());
                }
            }
            // a * (b / d) = (a*b) / d
            Expr::Div(num, den) => {
                if let Expr::Const(b) = num.as_ref() {
                    return simplify_quotient(Expr::Const(a * b), den.as_ref().clone());
                }
            }
            _ => {}
        }
        return Expr::Mul(lhs.boxed(), rhs.boxed());
    }
    if let Expr::Mul(inner_lhs, inner_rhs) = &lhs {
        if let Expr::Const(a) = inner_lhs.as_ref() {
            let product = simplify_product(inner_rhs.as_ref().clone(), rhs);
            return simplify_product(Expr::Const(*a), product);
        }
    }
    if let Expr::Mul(inner_lhs, inner_rhs) = &rhs {
        if let Expr::Const(a) = inner_lhs.as_ref() {
            let product = simplify_product(lhs, inner_rhs.as_ref().clone());
            return simplify_product(Expr::Const(*a), product);
        }
    }
    if let (Expr::Exp(a), Expr::Exp(b)) = (&lhs, &rhs) {
        return Expr::Exp(simplify_sum(a.as_ref().clone(), b.as_ref().clone()).boxed());
    }
    if let Some(merged) = merge_powers(&lhs, &rhs, 1.0) {
        return merged;
    }
    Expr::Mul(lhs.boxed(), rhs.boxed())
}

pub(crate) fn simplify_quotient(num: Expr, den: Expr) -> Expr {
    if let (Expr::Const(a), Expr::Const(b)) = (&num, &den) {
        if *b != 0.0 {
            return Expr::Const(a / b);
        }
    }
    if den.is_one() {
        return num;
    }
    if num.is_zero() && !den.is_zero() {
        return Expr::Const(0.0);
    }
    if let Expr::Const(b) = den {
        if b != 0.0 {
            return simplify_product(Expr::Const(1.0 / b), num);
        }
    }
    if num == den {
        return Expr::Const(1.0);
    }
    if let Expr::Mul(inner_lhs, inner_rhs) = &num {
        if let Expr::Const(a) = inner_lhs.as_ref() {
            let quotient = simplify_quotient(inner_rhs.as_ref().clone(), den);
            return simplify_product(Expr::Const(*a), quotient);
        }
    }
    if let Expr::Mul(inner_lhs, inner_rhs) = &den {
        if let Expr::Const(a) = inner_lhs.as_ref() {
            if *a != 0.0 {
                let quotient = simplify_quotient(num, inner_rhs.as_ref().clone());
                return simplify_product(Expr::Const(1.0 / a), quotient);
            }
        }
    }
    if let Some(merged) = merge_powers(&num, &den, -1.0) {
        return merged;
    }
    Expr::Div(num.boxed(), den.boxed())
}

pub(crate) fn simplify_power(base: Expr, exp: Expr) -> Expr {
    if let (Expr::Const(a), Expr::Const(b)) = (&base, &exp) {
        let value = a.powf(*b);
        if value.is_finite() && (b.fract() == 0.0 || value.fract() == 0.0) {
            return Expr::Const(value);
        }
    }
    if exp.is_zero() {
        return Expr::Const(1.0);
    }
    if exp.is_one() {
        return base;
    }
    if base.is_one() {
        return Expr::Const(1.0);
    }
    if base.is_zero() && matches!(exp, Expr::Const(n) if n > 0.0) {
        return Expr::Const(0.0);
    }
    match (&base, &exp) {
        // (b**m)**n = b**(m*n) for integer n
        (Expr::Pow(inner_base, inner_exp), Expr::Const(n)) if n.fract() == 0.0 => {
            if let Expr::Const(m) = inner_exp.as_ref() {
                return simplify_power(inner_base.as_ref().clone(), Expr::Const(m * n));
            }
            Expr::Pow(base.boxed(), exp.boxed())
        }
        // (a/b)**n = a**n/b**n for integer n
        (Expr::Div(num, den), Expr::Const(n)) if n.fract() == 0.0 => simplify_quotient(
            simplify_power(num.as_ref().clone(), Expr::Const(*n)),
            simplify_power(den.as_ref().clone(), Expr::Const(*n)),
        ),
        (Expr::Exp(arg), _) => Expr::Exp(simplify_product(arg.as_ref().clone(), exp).boxed()),
        _ => Expr::Pow(base.boxed(), exp.boxed()),
    }
}

fn simplify_function(expr: Expr) -> Expr {
    match &expr {
        Expr::Exp(arg) => match arg.as_ref() {
            Expr::Const(c) if *c == 0.0 => Expr::Const(1.0),
            Expr::Ln(inner) => inner.as_ref().clone(),
            _ => expr,
        },
        Expr::Ln(arg) => match arg.as_ref() {
            Expr::Const(c) if *c == 1.0 => Expr::Const(0.0),
            Expr::Exp(inner) => inner.as_ref().clone(),
            _ => expr,
        },
        Expr::sin(arg) | Expr::tg(arg) | Expr::arcsin(arg) | Expr::arctg(arg) if arg.is_zero() => {
            Expr::Const(0.0)
        }
        Expr::cos(arg) if arg.is_zero() => Expr::Const(1.0),
        // odd functions pull the sign out, cos is even
        Expr::sin(arg) | Expr::tg(arg) | Expr::ctg(arg) => match arg.negated_form() {
            Some(positive) => negate(expr.map_argument(|_| positive)),
            None => expr,
        },
        Expr::cos(arg) => match arg.negated_form() {
            Some(positive) => Expr::cos(positive.boxed()),
            None => expr,
        },
        _ => expr,
    }
}

/// `b**m * b**n` (sign = 1) or `b**m / b**n` (sign = -1) with numeric exponents.
fn merge_powers(lhs: &Expr, rhs: &Expr, sign: f64) -> Option<Expr> {
    let (lhs_base, lhs_exp) = split_power(lhs);
    let (rhs_base, rhs_exp) = split_power(rhs);
    if lhs_base != rhs_base || matches!(lhs_base, Expr::Const(_)) {
        return None;
    }
    match (lhs_exp, rhs_exp) {
        (Expr::Const(m), Expr::Const(n)) => {
            Some(simplify_power(lhs_base.clone(), Expr::Const(m + sign * n)))
        }
        _ => None,
    }
}

fn split_power(expr: &Expr) -> (&Expr, Expr) {
    match expr {
        Expr::Pow(base, exp) => (base.as_ref(), exp.as_ref().clone()),
        _ => (expr, Expr::Const(1.0)),
    }
}

/// Flatten nested Add/Sub expressions into a list of terms; a constant factor in front of a
/// sum is distributed over it, so `(a + b) - 2*(c + d)` becomes `[a, b, -2*c, -2*d]`.
fn flatten_add(expr: &Expr, coefficient: f64, out: &mut Vec<Expr>) {
    match expr {
        Expr::Add(a, b) => {
            flatten_add(a, coefficient, out);
            flatten_add(b, coefficient, out);
        }
        Expr::Sub(a, b) => {
            flatten_add(a, coefficient, out);
            flatten_add(b, -coefficient, out);
        }
        Expr::Mul(lhs, rhs) if matches!(rhs.as_ref(), Expr::Add(_, _) | Expr::Sub(_, _)) => {
            match lhs.as_ref() {
                Expr::Const(c) => flatten_add(rhs, coefficient * c, out),
                _ => out.push(scaled(expr, coefficient)),
            }
        }
        _ => out.push(scaled(expr, coefficient)),
    }
}

fn scaled(expr: &Expr, coefficient: f64) -> Expr {
    if coefficient == 1.0 {
        expr.clone()
    } else {
        simplify_product(Expr::Const(coefficient), expr.clone())
    }
}

/// Numeric coefficient and the rest of a term: `-3*x**2` → `(-3, x**2)`, `5` → `(5, 1)`.
fn split_coefficient(term: &Expr) -> (f64, Expr) {
    match term {
        Expr::Const(c) => (*c, Expr::Const(1.0)),
        Expr::Mul(lhs, rhs) => match lhs.as_ref() {
            Expr::Const(c) => {
                let (inner, rest) = split_coefficient(rhs);
                (c * inner, rest)
            }
            _ => (1.0, term.clone()),
        },
        Expr::Div(num, den) => {
            let (c, rest) = split_coefficient(num);
            if c == 1.0 {
                (1.0, term.clone())
            } else {
                (c, simplify_quotient(rest, den.as_ref().clone()))
            }
        }
        _ => (1.0, term.clone()),
    }
}

/// Combines like terms of a sum. Returns `None` when nothing changes, so callers keep
/// the original (and its term order).
fn collect_like_terms(expr: &Expr) -> Option<Expr> {
    let mut terms = Vec::new();
    flatten_add(expr, 1.0, &mut terms);

    let mut collected: Vec<(Expr, f64)> = Vec::new();
    let mut constant = 0.0;
    let mut constant_terms = 0usize;
    let mut changed = false;
    for term in &terms {
        let (coeff, rest) = split_coefficient(term);
        if rest.is_one() {
            constant += coeff;
            constant_terms += 1;
            continue;
        }
        match collected.iter_mut().find(|(existing, _)| *existing == rest) {
            Some((_, total)) => {
                *total += coeff;
                changed = true;
            }
            None => collected.push((rest, coeff)),
        }
    }
    let constant_last = terms
        .last()
        .is_some_and(|term| matches!(term, Expr::Const(_)));
    if constant_terms > 1 || (constant_terms == 1 && !constant_last) {
        changed = true;
    }
    if !changed {
        return None;
    }

    let mut result: Option<Expr> = None;
    let mut push = |term: Expr| {
        result = Some(match result.take() {
            None => term,
            Some(acc) => Expr::Add(acc.boxed(), term.boxed()),
        });
    };
    for (rest, coeff) in collected {
        if coeff.abs() > ZERO_COEFFICIENT {
            push(simplify_product(Expr::Const(coeff), rest));
        }
    }
    if constant.abs() > ZERO_COEFFICIENT {
        push(Expr::Const(constant));
    }
    Some(result.unwrap_or(Expr::Const(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    fn simplified(input: &str) -> String {
        Expr::parse_expression(input).unwrap().simplify().to_string()
    }

    #[test]
    fn test_constant_folding() {
        assert_eq!(simplified("2 + 3*4"), "14");
        assert_eq!(simplified("2**3"), "8");
        assert_eq!(simplified("1/4"), "1/4");
        assert_eq!(simplified("2**0.5"), "sqrt(2)");
    }

    #[test]
    fn test_identities() {
        assert_eq!(simplified("x + 0"), "x");
        assert_eq!(simplified("1*x"), "x");
        assert_eq!(simplified("0*sin(x)"), "0");
        assert_eq!(simplified("x/x"), "1");
        assert_eq!(simplified("x**1"), "x");
        assert_eq!(simplified("x**0"), "1");
        assert_eq!(simplified("x - x"), "0");
    }

    #[test]
    fn test_coefficients() {
        assert_eq!(simplified("x/3"), "x/3");
        assert_eq!(simplified("x**3/3"), "x**3/3");
        assert_eq!(simplified("x*2"), "2*x");
        assert_eq!(simplified("2*(3*x)"), "6*x");
        assert_eq!(simplified("6*x/3"), "2*x");
        assert_eq!(simplified("x/(2*x)"), "1/2");
    }

    #[test]
    fn test_power_merging() {
        assert_eq!(simplified("x*x"), "x**2");
        assert_eq!(simplified("x*x**2"), "x**3");
        assert_eq!(simplified("x**3/x"), "x**2");
        assert_eq!(simplified("x/x**2"), "1/x");
        assert_eq!(simplified("(x**2)**3"), "x**6");
        assert_eq!(simplified("exp(x)*exp(2*x)"), "exp(3*x)");
    }

    #[test]
    fn test_function_identities() {
        assert_eq!(simplified("log(exp(x))"), "x");
        assert_eq!(simplified("exp(log(x))"), "x");
        assert_eq!(simplified("sin(0)"), "0");
        assert_eq!(simplified("cos(0) + x"), "x + 1");
        assert_eq!(simplified("sin(-x)"), "-sin(x)");
        assert_eq!(simplified("cos(-x)"), "cos(x)");
    }

    #[test]
    fn test_like_terms() {
        assert_eq!(simplified("3*x + 2*x"), "5*x");
        assert_eq!(simplified("x + 1 + x"), "2*x + 1");
        assert_eq!(simplified("1 + x**2"), "x**2 + 1");
        assert_eq!(simplified("sin(x) + sin(x)"), "2*sin(x)");
        assert_eq!(simplified("x - (x - 1)"), "1");
        assert_eq!(simplified("x**2/2 + x**2/2"), "x**2");
    }

    #[test]
    fn test_order_is_kept_without_like_terms() {
        assert_eq!(simplified("x**2/2 + x"), "x**2/2 + x");
        assert_eq!(simplified("x - sin(x)"), "x - sin(x)");
        assert_eq!(simplified("x - -sin(x)"), "x + sin(x)");
    }

    #[test]
    fn test_simplify_is_stable() {
        for input in ["x*exp(x) - exp(x)", "2*x**(3/2)/3", "-x*cos(x) + sin(x)", "log(x+1)/2"] {
            let once = Expr::parse_expression(input).unwrap().simplify();
            assert_eq!(once.simplify(), once);
        }
        let product = simplify_product(x(), Expr::Const(-1.0) * Expr::cos(x().boxed()));
        assert_eq!(product.to_string(), "-x*cos(x)");
    }
}
