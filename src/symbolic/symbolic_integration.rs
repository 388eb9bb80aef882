use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_simplify::{
    negate, simplify_difference, simplify_power, simplify_product, simplify_quotient, simplify_sum,
};

/// integration by parts stops after this many differentiations of the polynomial factor
const MAX_PARTS_DEPTH: usize = 12;
/// `(sum)**n` is expanded before integration only for integer n up to this value
const MAX_EXPANSION_POWER: f64 = 8.0;
/// highest power handled by polynomial division and by the odd sin/cos power rule
const MAX_POLYNOMIAL_DEGREE: usize = 16;

impl Expr {
    /// SYMBOLIC INTEGRATION

    /// Indefinite integral with respect to `var`, without the constant of integration.
    /// The input is simplified first and so is the result.
    ///
    /// # Examples
    /// ```
    /// use RustedIntegrals::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("x**2").unwrap();
    /// assert_eq!(f.integrate("x").unwrap().to_string(), "x**3/3");
    /// ```
    pub fn integrate(&self, var: &str) -> Result<Expr, String> {
        let expr = self.simplify();
        expr.integrate_simplified(var).map(|result| result.simplify())
    }

    fn integrate_simplified(&self, var: &str) -> Result<Expr, String> {
        let x = Expr::var(var);
        // ∫ c dx = c*x, also for expressions free of var
        if !self.contains_variable(var) {
            return Ok(simplify_product(self.clone(), x));
        }
        match self {
            // ∫ x dx = x²/2
            Expr::Var(_) => Ok(x.pow(Expr::Const(2.0)) / Expr::Const(2.0)),

            // ∫ (f ± g) dx = ∫ f dx ± ∫ g dx
            Expr::Add(lhs, rhs) => Ok(lhs.integrate(var)? + rhs.integrate(var)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.integrate(var)? - rhs.integrate(var)?),

            Expr::Mul(lhs, rhs) => self.integrate_multiplication(lhs, rhs, var),
            Expr::Div(lhs, rhs) => self.integrate_division(lhs, rhs, var),
            Expr::Pow(base, exp) => self.integrate_power(base, exp, var),
            _ => self.integrate_function(var),
        }
    }

    /// ∫ f(a*x + b) dx = F(a*x + b)/a for the elementary functions
    fn integrate_function(&self, var: &str) -> Result<Expr, String> {
        let fail = || format!("Cannot integrate {}", self);
        let arg = self.argument().ok_or_else(fail)?;
        let slope = arg.linear_slope(var).ok_or_else(fail)?;
        let antiderivative = self.standard_antiderivative(arg).ok_or_else(fail)?;
        Ok(simplify_quotient(antiderivative, Expr::Const(slope)))
    }

    /// Enhanced multiplication integration that tries different strategies
    fn integrate_multiplication(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Expr, String> {
        // Check if one factor is constant
        if !lhs.contains_variable(var) {
            let rhs_int = rhs.integrate(var)?;
            return Ok(simplify_product(lhs.clone(), rhs_int));
        }
        if !rhs.contains_variable(var) {
            let lhs_int = lhs.integrate(var)?;
            return Ok(simplify_product(rhs.clone(), lhs_int));
        }

        // sec(u)*tan(u) and csc(u)*cot(u)
        for (factor, other) in [(lhs, rhs), (rhs, lhs)] {
            if let Expr::Div(coefficient, den) = factor {
                if let Some(result) = integrate_secant_tangent(coefficient, den, other, var) {
                    return Ok(result);
                }
            }
        }

        // polynomial * exp/sin/cos of a linear argument
        if let Some(result) = integrate_by_parts(lhs, rhs, var) {
            return Ok(result);
        }
        if let Some(result) = integrate_by_parts(rhs, lhs, var) {
            return Ok(result);
        }

        // exp * sin/cos, where parts cycle back to the integrand
        if let Some(result) = integrate_exp_times_trig(lhs, rhs, var) {
            return Ok(result);
        }
        if let Some(result) = integrate_exp_times_trig(rhs, lhs, var) {
            return Ok(result);
        }

        // x**n * ln(x)
        if let Some(result) = integrate_power_times_logarithm(lhs, rhs, var) {
            return Ok(result);
        }
        if let Some(result) = integrate_power_times_logarithm(rhs, lhs, var) {
            return Ok(result);
        }

        // f(g(x)) * c*g'(x)
        if let Some(result) = integrate_by_substitution(lhs, rhs, var) {
            return Ok(result);
        }
        if let Some(result) = integrate_by_substitution(rhs, lhs, var) {
            return Ok(result);
        }

        if lhs.is_sum() || rhs.is_sum() {
            return distribute(lhs, rhs).integrate(var);
        }

        Err(format!("Cannot integrate {}", self))
    }

    /// Handle division in integration
    fn integrate_division(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Expr, String> {
        let x = Expr::var(var);
        // ∫ f(x)/c dx = ∫ f(x) dx / c
        if !rhs.contains_variable(var) {
            let lhs_int = lhs.integrate(var)?;
            return Ok(simplify_quotient(lhs_int, rhs.clone()));
        }

        if !lhs.contains_variable(var) {
            // ∫ c/(a*x + b) dx = c*ln(a*x + b)/a
            if let Some(slope) = rhs.linear_slope(var) {
                let log = simplify_product(lhs.clone(), rhs.clone().ln());
                return Ok(simplify_quotient(log, Expr::Const(slope)));
            }
            // ∫ c/u**n dx = c * ∫ u**(-n) dx
            if let Expr::Pow(base, exp) = rhs {
                if let Expr::Const(n) = exp.as_ref() {
                    if base.linear_slope(var).is_some() {
                        let reciprocal = simplify_power(base.as_ref().clone(), Expr::Const(-n));
                        return Ok(simplify_product(lhs.clone(), reciprocal.integrate(var)?));
                    }
                }
            }
            if let Some(result) = integrate_reciprocal_square(lhs, rhs, var) {
                return Ok(result);
            }
            // ∫ c/(x**2 + k) dx = c/sqrt(k) * atan(x/sqrt(k))
            if let Expr::Add(square, shift) = rhs {
                if let (Some(n), Some(k)) = (square.power_of(var), shift.as_number()) {
                    if n == 2.0 && k > 0.0 {
                        let root = k.sqrt();
                        let angle = Expr::arctg(simplify_quotient(x, Expr::Const(root)).boxed());
                        return Ok(simplify_product(
                            simplify_quotient(lhs.clone(), Expr::Const(root)),
                            angle,
                        ));
                    }
                }
            }
            // ∫ c/sqrt(1 - x**2) dx = c*asin(x)
            let unit_circle = Expr::Const(1.0) - x.clone().pow(Expr::Const(2.0));
            if *rhs == unit_circle.pow(Expr::Const(0.5)).simplify() {
                return Ok(simplify_product(lhs.clone(), Expr::arcsin(x.boxed())));
            }
        }

        if let Some(result) = integrate_secant_tangent(&Expr::Const(1.0), rhs, lhs, var) {
            return Ok(result);
        }
        if let Some(result) = integrate_polynomial_over_linear(lhs, rhs, var) {
            return Ok(result);
        }

        // Special case: ∫ c*f'(x)/f(x) dx = c*ln(f(x))
        let derivative = rhs.diff(var).simplify();
        if !derivative.is_zero() {
            let ratio = simplify_quotient(lhs.clone(), derivative);
            if !ratio.contains_variable(var) {
                return Ok(simplify_product(ratio, rhs.clone().ln()));
            }
        }

        // ∫ (f + g)/h dx = ∫ f/h dx + ∫ g/h dx
        if lhs.is_sum() {
            let mut result: Option<Expr> = None;
            for term in lhs.sum_terms() {
                let part = simplify_quotient(term, rhs.clone()).integrate(var)?;
                result = Some(match result {
                    None => part,
                    Some(acc) => acc + part,
                });
            }
            if let Some(result) = result {
                return Ok(result);
            }
        }

        let reciprocal = simplify_quotient(Expr::Const(1.0), rhs.clone());
        if let Some(result) = integrate_by_substitution(lhs, &reciprocal, var) {
            return Ok(result);
        }
        let inverse = simplify_power(rhs.clone(), Expr::Const(-1.0));
        if let Some(result) = integrate_by_substitution(&inverse, lhs, var) {
            return Ok(result);
        }

        Err(format!("Cannot integrate {}", self))
    }

    /// Handle power integration
    fn integrate_power(&self, base: &Expr, exp: &Expr, var: &str) -> Result<Expr, String> {
        if let Some(n) = exp.as_number() {
            // ∫ (a*x + b)**n dx = (a*x + b)**(n+1)/((n+1)*a), n = -1 gives the logarithm
            if let Some(slope) = base.linear_slope(var) {
                if n == -1.0 {
                    return Ok(simplify_quotient(base.clone().ln(), Expr::Const(slope)));
                }
                let raised = base.clone().pow(Expr::Const(n + 1.0));
                return Ok(simplify_quotient(raised, Expr::Const((n + 1.0) * slope)));
            }
            if n == 2.0 {
                if let Some(result) = integrate_trig_square(base, var) {
                    return Ok(result);
                }
            }
            if let Some(result) = integrate_odd_trig_power(base, n, var) {
                return Ok(result);
            }
            if base.is_sum() && n.fract() == 0.0 && (2.0..=MAX_EXPANSION_POWER).contains(&n) {
                let mut expanded = base.clone();
                for _ in 1..(n as usize) {
                    expanded = distribute(&expanded, base);
                }
                return expanded.integrate(var);
            }
        }

        // ∫ c**(a*x + b) dx = c**(a*x + b)/(a*ln(c))
        if let Some(c) = base.as_number() {
            if c > 0.0 && c != 1.0 {
                if let Some(slope) = exp.linear_slope(var) {
                    let scale = simplify_product(Expr::Const(slope), Expr::Const(c).ln());
                    return Ok(simplify_quotient(self.clone(), scale));
                }
            }
        }

        Err(format!("Cannot integrate {}", self))
    }

    /// Slope `a` when the expression is `a*var + b` with a numeric nonzero `a`.
    pub fn linear_slope(&self, var: &str) -> Option<f64> {
        if !self.contains_variable(var) {
            return None;
        }
        match self.diff(var).simplify().as_number() {
            Some(a) if a != 0.0 && a.is_finite() => Some(a),
            _ => None,
        }
    }

    /// true for polynomials in `var` (coefficients may contain other symbols)
    pub fn is_polynomial_in(&self, var: &str) -> bool {
        match self {
            Expr::Var(_) | Expr::Const(_) => true,
            Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) | Expr::Mul(lhs, rhs) => {
                lhs.is_polynomial_in(var) && rhs.is_polynomial_in(var)
            }
            Expr::Div(lhs, rhs) => lhs.is_polynomial_in(var) && !rhs.contains_variable(var),
            Expr::Pow(base, exp) => match exp.as_ref() {
                Expr::Const(n) if *n >= 0.0 && n.fract() == 0.0 => base.is_polynomial_in(var),
                _ => !self.contains_variable(var),
            },
            _ => !self.contains_variable(var),
        }
    }

    /// Antiderivative of a one-argument function node with respect to its own argument,
    /// written in terms of `u`.
    fn standard_antiderivative(&self, u: &Expr) -> Option<Expr> {
        let u_box = || u.clone().boxed();
        let one_plus_square = || Expr::Const(1.0) + u.clone().pow(Expr::Const(2.0));
        let root = || (Expr::Const(1.0) - u.clone().pow(Expr::Const(2.0))).pow(Expr::Const(0.5));
        let result = match self {
            Expr::Exp(_) => Expr::Exp(u_box()),
            Expr::Ln(_) => u.clone() * u.clone().ln() - u.clone(),
            Expr::sin(_) => negate(Expr::cos(u_box())),
            Expr::cos(_) => Expr::sin(u_box()),
            Expr::tg(_) => negate(Expr::cos(u_box()).ln()),
            Expr::ctg(_) => Expr::sin(u_box()).ln(),
            Expr::arcsin(_) => u.clone() * Expr::arcsin(u_box()) + root(),
            Expr::arccos(_) => u.clone() * Expr::arccos(u_box()) - root(),
            Expr::arctg(_) => {
                u.clone() * Expr::arctg(u_box()) - one_plus_square().ln() / Expr::Const(2.0)
            }
            Expr::arcctg(_) => {
                u.clone() * Expr::arcctg(u_box()) + one_plus_square().ln() / Expr::Const(2.0)
            }
            _ => return None,
        };
        Some(result)
    }
}

/// (a + b)*(c + d) = a*c + a*d + b*c + b*d
fn distribute(lhs: &Expr, rhs: &Expr) -> Expr {
    let left = lhs.sum_terms();
    let right = rhs.sum_terms();
    let mut result = Expr::Const(0.0);
    for l in &left {
        for r in &right {
            result = simplify_sum(result, simplify_product(l.clone(), r.clone()));
        }
    }
    result
}

/// ∫ p(x) f(a*x + b) dx for a polynomial p and f in {exp, sin, cos}:
/// p F1 - p' F2 + p'' F3 - ... where F(k+1) is an antiderivative of F(k)
fn integrate_by_parts(poly: &Expr, other: &Expr, var: &str) -> Option<Expr> {
    if !poly.is_polynomial_in(var) {
        return None;
    }
    match other {
        Expr::Exp(arg) | Expr::sin(arg) | Expr::cos(arg) => {
            arg.linear_slope(var)?;
        }
        _ => return None,
    }
    let mut derivative = poly.clone();
    let mut antiderivative = other.integrate(var).ok()?;
    let mut sign = 1.0;
    let mut result = Expr::Const(0.0);
    for _ in 0..MAX_PARTS_DEPTH {
        if derivative.is_zero() {
            break;
        }
        let term = simplify_product(
            Expr::Const(sign),
            simplify_product(derivative.clone(), antiderivative.clone()),
        );
        result = simplify_sum(result, term);
        derivative = derivative.diff(var).simplify();
        antiderivative = antiderivative.integrate(var).ok()?;
        sign = -sign;
    }
    if derivative.is_zero() { Some(result) } else { None }
}

/// ∫ x**n ln(x) dx = x**(n+1) ln(x)/(n+1) - x**(n+1)/(n+1)**2, n != -1
fn integrate_power_times_logarithm(power: &Expr, log: &Expr, var: &str) -> Option<Expr> {
    let n = power.power_of(var)?;
    match log {
        Expr::Ln(arg) if arg.as_ref() == &Expr::var(var) && n != -1.0 => {
            let raised = Expr::var(var).pow(Expr::Const(n + 1.0));
            let first = simplify_quotient(
                simplify_product(raised.clone(), log.clone()),
                Expr::Const(n + 1.0),
            );
            let second = simplify_quotient(raised, Expr::Const((n + 1.0) * (n + 1.0)));
            Some(simplify_difference(first, second))
        }
        _ => None,
    }
}

/// ∫ F(g(x)) * c*g'(x) dx = c * ∫ F(u) du at u = g(x), for F a power, an elementary
/// function, or the identity (∫ g g' dx = g²/2)
fn integrate_by_substitution(outer: &Expr, cofactor: &Expr, var: &str) -> Option<Expr> {
    let mut candidates: Vec<(Expr, Expr)> = Vec::new();
    if let Expr::Pow(g, exp) = outer {
        if let (Some(n), true) = (exp.as_number(), g.contains_variable(var)) {
            let antiderivative = if n == -1.0 {
                g.as_ref().clone().ln()
            } else {
                g.as_ref().clone().pow(Expr::Const(n + 1.0)) / Expr::Const(n + 1.0)
            };
            candidates.push((g.as_ref().clone(), antiderivative));
        }
    }
    if let Some(g) = outer.argument() {
        if let Some(antiderivative) = outer.standard_antiderivative(g) {
            candidates.push((g.clone(), antiderivative));
        }
    }
    if !matches!(outer, Expr::Var(_)) {
        candidates.push((outer.clone(), outer.clone().pow(Expr::Const(2.0)) / Expr::Const(2.0)));
    }

    candidates.into_iter().find_map(|(g, antiderivative)| {
        let derivative = g.diff(var).simplify();
        if derivative.is_zero() {
            return None;
        }
        let ratio = simplify_quotient(cofactor.clone(), derivative);
        if ratio.contains_variable(var) {
            None
        } else {
            Some(simplify_product(ratio, antiderivative))
        }
    })
}

/// ∫ sin(u)**2, cos(u)**2, tan(u)**2, cot(u)**2 for a linear u
fn integrate_trig_square(base: &Expr, var: &str) -> Option<Expr> {
    let u = base.argument()?;
    let slope = u.linear_slope(var)?;
    let x = Expr::var(var);
    let half_x = simplify_quotient(x.clone(), Expr::Const(2.0));
    let double = || Expr::sin(simplify_product(Expr::Const(2.0), u.clone()).boxed());
    let result = match base {
        // sin²u = (1 - cos 2u)/2
        Expr::sin(_) => half_x - double() / Expr::Const(4.0 * slope),
        // cos²u = (1 + cos 2u)/2
        Expr::cos(_) => half_x + double() / Expr::Const(4.0 * slope),
        // tan²u = sec²u - 1
        Expr::tg(_) => Expr::tg(u.clone().boxed()) / Expr::Const(slope) - x,
        // cot²u = csc²u - 1
        Expr::ctg(_) => negate(Expr::ctg(u.clone().boxed())) / Expr::Const(slope) - x,
        _ => return None,
    };
    Some(result)
}

/// ∫ c/cos(u)**2 = c*tan(u)/a, ∫ c/sin(u)**2 = -c*cot(u)/a
fn integrate_reciprocal_square(numerator: &Expr, den: &Expr, var: &str) -> Option<Expr> {
    let Expr::Pow(base, exp) = den else {
        return None;
    };
    if exp.as_number() != Some(2.0) {
        return None;
    }
    let u = base.argument()?;
    let slope = u.linear_slope(var)?;
    let antiderivative = match base.as_ref() {
        Expr::cos(_) => Expr::tg(u.clone().boxed()),
        Expr::sin(_) => negate(Expr::ctg(u.clone().boxed())),
        _ => return None,
    };
    Some(simplify_quotient(
        simplify_product(numerator.clone(), antiderivative),
        Expr::Const(slope),
    ))
}

/// ∫ c*tan(u)/cos(u) dx = c/(a*cos(u)), ∫ c*cot(u)/sin(u) dx = -c/(a*sin(u))
fn integrate_secant_tangent(coefficient: &Expr, den: &Expr, other: &Expr, var: &str) -> Option<Expr> {
    if coefficient.contains_variable(var) {
        return None;
    }
    let (u, antiderivative) = match (den, other) {
        (Expr::cos(u), Expr::tg(v)) if u == v => {
            (u, simplify_quotient(coefficient.clone(), den.clone()))
        }
        (Expr::sin(u), Expr::ctg(v)) if u == v => {
            (u, negate(simplify_quotient(coefficient.clone(), den.clone())))
        }
        _ => return None,
    };
    let slope = u.linear_slope(var)?;
    Some(simplify_quotient(antiderivative, Expr::Const(slope)))
}

/// ∫ exp(a*x + b) sin(c*x + d) dx = exp(..)(a sin(..) - c cos(..))/(a² + c²)
/// ∫ exp(a*x + b) cos(c*x + d) dx = exp(..)(a cos(..) + c sin(..))/(a² + c²)
fn integrate_exp_times_trig(exponential: &Expr, trig: &Expr, var: &str) -> Option<Expr> {
    let Expr::Exp(power) = exponential else {
        return None;
    };
    let a = power.linear_slope(var)?;
    let u = trig.argument()?;
    let c = u.linear_slope(var)?;
    let sin = || Expr::sin(u.clone().boxed());
    let cos = || Expr::cos(u.clone().boxed());
    let combination = match trig {
        Expr::sin(_) => simplify_difference(
            simplify_product(Expr::Const(a), sin()),
            simplify_product(Expr::Const(c), cos()),
        ),
        Expr::cos(_) => simplify_sum(
            simplify_product(Expr::Const(a), cos()),
            simplify_product(Expr::Const(c), sin()),
        ),
        _ => return None,
    };
    Some(simplify_quotient(
        simplify_product(exponential.clone(), combination),
        Expr::Const(a * a + c * c),
    ))
}

/// ∫ cos(u)**n, sin(u)**n for odd n >= 3. With s = sin(u) the integrand is (1 - s²)**k ds/a,
/// k = (n - 1)/2, which expands by the binomial theorem; sin swaps the roles and the sign.
fn integrate_odd_trig_power(base: &Expr, n: f64, var: &str) -> Option<Expr> {
    if n < 3.0 || n.fract() != 0.0 || n > MAX_POLYNOMIAL_DEGREE as f64 || n % 2.0 == 0.0 {
        return None;
    }
    let u = base.argument()?;
    let slope = u.linear_slope(var)?;
    let (other, sign) = match base {
        Expr::cos(_) => (Expr::sin(u.clone().boxed()), 1.0),
        Expr::sin(_) => (Expr::cos(u.clone().boxed()), -1.0),
        _ => return None,
    };
    let k = (n as usize - 1) / 2;
    let mut binomial = 1.0;
    let mut result = Expr::Const(0.0);
    for j in 0..=k {
        let power = (2 * j + 1) as f64;
        let alternating = if j % 2 == 0 { 1.0 } else { -1.0 };
        let coefficient = sign * alternating * binomial / (power * slope);
        let term = simplify_product(
            Expr::Const(coefficient),
            simplify_power(other.clone(), Expr::Const(power)),
        );
        result = simplify_sum(result, term);
        binomial = binomial * (k - j) as f64 / (j + 1) as f64;
    }
    Some(result)
}

/// ∫ p(x)/(a*x + b) dx: p = (a*x + b) q + r gives ∫ q dx + r ln(a*x + b)/a
fn integrate_polynomial_over_linear(num: &Expr, den: &Expr, var: &str) -> Option<Expr> {
    let slope = den.linear_slope(var)?;
    let intercept = den
        .substitute_variable(var, &Expr::Const(0.0))
        .simplify()
        .as_number()?;
    let mut coefficients = polynomial_coefficients(num, var)?;
    while coefficients.len() > 1 && coefficients.last() == Some(&0.0) {
        coefficients.pop();
    }
    if coefficients.len() < 2 || coefficients.len() > MAX_POLYNOMIAL_DEGREE + 1 {
        return None;
    }

    // synthetic division by (x - root); dividing by a is done on the integral
    let root = -intercept / slope;
    let mut quotient = vec![0.0; coefficients.len() - 1];
    let mut carry = 0.0;
    for k in (0..coefficients.len()).rev() {
        carry = carry * root + coefficients[k];
        if k > 0 {
            quotient[k - 1] = carry;
        }
    }
    let remainder = carry;

    let x = Expr::var(var);
    let mut polynomial = Expr::Const(0.0);
    for (k, q) in quotient.iter().enumerate() {
        let monomial = simplify_power(x.clone(), Expr::Const(k as f64));
        polynomial = simplify_sum(polynomial, simplify_product(Expr::Const(*q), monomial));
    }
    let integral = simplify_quotient(polynomial.integrate(var).ok()?, Expr::Const(slope));
    if remainder == 0.0 {
        return Some(integral);
    }
    let log = simplify_product(Expr::Const(remainder / slope), den.clone().ln());
    Some(simplify_sum(integral, log))
}

/// Coefficients c0, c1, ... of a polynomial in `var` with numeric coefficients.
fn polynomial_coefficients(expr: &Expr, var: &str) -> Option<Vec<f64>> {
    let coefficients = match expr {
        Expr::Const(c) => vec![*c],
        Expr::Var(name) if name == var => vec![0.0, 1.0],
        Expr::Add(lhs, rhs) => add_coefficients(
            &polynomial_coefficients(lhs, var)?,
            &polynomial_coefficients(rhs, var)?,
            1.0,
        ),
        Expr::Sub(lhs, rhs) => add_coefficients(
            &polynomial_coefficients(lhs, var)?,
            &polynomial_coefficients(rhs, var)?,
            -1.0,
        ),
        Expr::Mul(lhs, rhs) => multiply_coefficients(
            &polynomial_coefficients(lhs, var)?,
            &polynomial_coefficients(rhs, var)?,
        ),
        Expr::Div(lhs, rhs) => {
            let c = rhs.as_number().filter(|c| *c != 0.0)?;
            polynomial_coefficients(lhs, var)?
                .into_iter()
                .map(|value| value / c)
                .collect()
        }
        Expr::Pow(base, exp) => {
            let n = exp.as_number()?;
            if n < 0.0 || n.fract() != 0.0 || n > MAX_POLYNOMIAL_DEGREE as f64 {
                return None;
            }
            let base = polynomial_coefficients(base, var)?;
            let mut result = vec![1.0];
            for _ in 0..(n as usize) {
                result = multiply_coefficients(&result, &base);
            }
            result
        }
        _ => return None,
    };
    Some(coefficients)
}

fn add_coefficients(lhs: &[f64], rhs: &[f64], sign: f64) -> Vec<f64> {
    (0..lhs.len().max(rhs.len()))
        .map(|k| lhs.get(k).copied().unwrap_or(0.0) + sign * rhs.get(k).copied().unwrap_or(0.0))
        .collect()
}

fn multiply_coefficients(lhs: &[f64], rhs: &[f64]) -> Vec<f64> {
    let mut product = vec![0.0; lhs.len() + rhs.len() - 1];
    for (i, a) in lhs.iter().enumerate() {
        for (j, b) in rhs.iter().enumerate() {
            product[i + j] += a * b;
        }
    }
    product
}
