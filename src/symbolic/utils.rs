// the collection of utility functions for bracket checking, number printing and numeric checks

/// true if every closing bracket matches an opening one of the same kind and none is left open
pub fn brackets_balanced(s: &str) -> bool {
    let mut stack = Vec::new();
    for c in s.chars() {
        match c {
            '(' | '{' | '[' => stack.push(c),
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return false;
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

const RATIONAL_TOLERANCE: f64 = 1e-9;
const MAX_DENOMINATOR: i64 = 1000;

/// Smallest-denominator fraction p/q (q <= 1000) equal to `value` up to rounding noise.
pub fn as_rational(value: f64) -> Option<(i64, i64)> {
    if !value.is_finite() || value.abs() >= 1e15 {
        return None;
    }
    for q in 1..=MAX_DENOMINATOR {
        let scaled = value * q as f64;
        let p = scaled.round();
        if (scaled - p).abs() < RATIONAL_TOLERANCE * q as f64 {
            return Some((p as i64, q));
        }
    }
    None
}

/// Integers without a trailing ".0", everything else as f64 prints it.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.abs() < 1e15 && (value - value.round()).abs() < RATIONAL_TOLERANCE
    {
        let rounded = value.round() as i64;
        format!("{}", rounded)
    } else {
        format!("{}", value)
    }
}

pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(num_values);
    let step = (end - start) / (num_values as f64 - 1.0);

    for i in 0..num_values {
        let value = start + (i as f64 * step);
        values.push(value);
    }

    values
}

/*
    central difference:
    let x_values = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    let h = 0.001;
    let derivatives = numerical_derivative(f, x_values, h);
*/
pub fn numerical_derivative<F>(f: F, x_values: &[f64], h: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    let mut derivatives = Vec::with_capacity(x_values.len());

    for &x in x_values {
        let f_x_plus_h = f(x + h);
        let f_x_minus_h = f(x - h);
        let derivative = (f_x_plus_h - f_x_minus_h) / (2.0 * h);
        derivatives.push(derivative);
    }

    derivatives
}

// root mean square of the difference of two vectors of the same length
pub fn norm(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || x.len() != y.len() {
        return f64::INFINITY;
    }
    let sum = x
        .iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>();
    (sum / x.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_brackets_balanced() {
        assert!(brackets_balanced("sin(x)*(x+1)"));
        assert!(brackets_balanced("x"));
        assert!(!brackets_balanced("sin(x"));
        assert!(!brackets_balanced("x)("));
        assert!(!brackets_balanced("(x]"));
    }

    #[test]
    fn test_as_rational() {
        assert_eq!(as_rational(1.0 / 3.0), Some((1, 3)));
        assert_eq!(as_rational(-2.5), Some((-5, 2)));
        assert_eq!(as_rational(4.0), Some((4, 1)));
        assert_eq!(as_rational(std::f64::consts::PI), None);
        assert_eq!(as_rational(f64::NAN), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(2.9999999999999996), "3");
    }

    #[test]
    fn test_numeric_helpers() {
        let grid = linspace(0.0, 1.0, 5);
        assert_eq!(grid.len(), 5);
        assert_relative_eq!(grid[4], 1.0);
        let derivative = numerical_derivative(|x| x * x, &grid, 1e-5);
        for (x, d) in grid.iter().zip(derivative.iter()) {
            assert_relative_eq!(*d, 2.0 * x, epsilon = 1e-6);
        }
        assert_relative_eq!(norm(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
    }
}
